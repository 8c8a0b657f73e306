//! # Нормализация временных меток
//!
//! Модуль для разбора и нормализации временных меток субтитров.
//! Все функции тотальны: некорректный ввод приводит к нулевой метке,
//! а не к ошибке, поэтому их безопасно вызывать на любом тексте,
//! полученном от пользователя или от AI сервиса.

/// Длительность последней LRC-строки, если следующей строки нет
pub const LRC_LAST_CUE_DEFAULT_MS: i64 = 3000;

/// Разбирает временную метку в миллисекунды.
///
/// Поддерживаются разделители `,`, `.` и `:` перед дробной частью
/// из 1-3 цифр, а также 1, 2 или 3 сегмента времени (S, MM:SS, HH:MM:SS).
/// Возвращает `None`, если строка не похожа на время.
fn parse_timestamp_parts(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Отделяем дробную часть по последнему вхождению `,` или `.`
    let (time_part, frac_part) = match trimmed.rfind([',', '.']) {
        Some(pos) => (&trimmed[..pos], Some(&trimmed[pos + 1..])),
        None => {
            // Форма HH:MM:SS:mmm - четвёртый сегмент считается миллисекундами
            let segments: Vec<&str> = trimmed.split(':').collect();
            if segments.len() == 4 {
                let split_at = trimmed.rfind(':').unwrap();
                (&trimmed[..split_at], Some(&trimmed[split_at + 1..]))
            } else {
                (trimmed, None)
            }
        }
    };

    let frac_ms = match frac_part {
        Some(frac) => parse_fraction(frac)?,
        None => 0,
    };

    // Сегменты времени: S, MM:SS или HH:MM:SS; отсутствующие равны нулю
    let (hours, minutes, seconds) = if time_part.is_empty() {
        (0, 0, 0)
    } else {
        let segments: Vec<&str> = time_part.split(':').collect();
        match segments.len() {
            1 => (0, 0, segments[0].trim().parse::<u64>().ok()?),
            2 => (
                0,
                segments[0].trim().parse::<u64>().ok()?,
                segments[1].trim().parse::<u64>().ok()?,
            ),
            3 => (
                segments[0].trim().parse::<u64>().ok()?,
                segments[1].trim().parse::<u64>().ok()?,
                segments[2].trim().parse::<u64>().ok()?,
            ),
            _ => return None,
        }
    };

    // Переполнение секунд и минут переносится в старшие единицы
    // самой арифметикой: 95 секунд дают 1 минуту 35 секунд при обратном
    // разложении в ms_to_timestamp
    Some(hours * 3_600_000 + minutes * 60_000 + seconds * 1000 + frac_ms)
}

/// Разбирает дробную часть из 1-3 цифр в миллисекунды.
/// Короткая группа дополняется нулями справа: `5` -> 500 мс.
fn parse_fraction(frac: &str) -> Option<u64> {
    if frac.is_empty() || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let digits = if frac.len() > 3 { &frac[..3] } else { frac };
    let value = digits.parse::<u64>().ok()?;
    Some(value * 10u64.pow(3 - digits.len() as u32))
}

/// Нормализует произвольный текст времени в каноническую форму `HH:MM:SS,mmm`.
///
/// # Аргументы
///
/// * `raw` - Строка времени в любом из поддерживаемых форматов
///
/// # Возвращает
///
/// Каноническую строку; для пустого или некорректного ввода - `00:00:00,000`
pub fn normalize_timestamp(raw: &str) -> String {
    ms_to_timestamp(parse_timestamp_parts(raw).unwrap_or(0) as i64)
}

/// Преобразует строку времени в миллисекунды. Никогда не завершается ошибкой:
/// некорректный ввод даёт 0.
pub fn timestamp_to_ms(ts: &str) -> i64 {
    parse_timestamp_parts(ts).unwrap_or(0) as i64
}

/// Преобразует миллисекунды в каноническую строку `HH:MM:SS,mmm`.
/// Отрицательные значения обрезаются до нуля.
pub fn ms_to_timestamp(ms: i64) -> String {
    let total = ms.max(0) as u64;
    let millis = total % 1000;
    let seconds = (total / 1000) % 60;
    let minutes = (total / 60_000) % 60;
    let hours = total / 3_600_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Преобразует миллисекунды в LRC-форму `MM:SS.xx` (сотые доли секунды,
/// с округлением вниз). Отрицательные значения обрезаются до нуля.
pub fn ms_to_lrc_timestamp(ms: i64) -> String {
    let total_cs = ms.max(0) as u64 / 10;
    let cs = total_cs % 100;
    let total_s = total_cs / 100;
    let s = total_s % 60;
    let m = total_s / 60;
    format!("{:02}:{:02}.{:02}", m, s, cs)
}
