//! Модуль редактирования списка субтитров
//!
//! Структурные операции над списком: вставка, удаление, слияние,
//! разделение, перемещение и правка полей. Каждая операция - чистая
//! функция `(список, параметры) -> новый список`; вызывающая сторона
//! проводит результат через историю снимков (см. [`history`] и
//! [`session`]).
//!
//! Политика ошибок: ссылка на несуществующий номер, недопустимое
//! смещение разделения или слияние за последним элементом дают
//! неизменённый список, а не ошибку.

use serde::{Deserialize, Serialize};

use crate::subtitle::timestamp::timestamp_to_ms;
use crate::subtitle::{reindex, SubtitleEntry};

pub mod history;
pub mod session;

#[cfg(test)]
mod tests;

/// Текст по умолчанию для вставленного субтитра
pub const DEFAULT_ENTRY_TEXT: &str = "Новый субтитр";

/// Направление перемещения субтитра на соседнюю позицию
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    /// К началу списка
    Up,
    /// К концу списка
    Down,
}

/// Редактируемое поле субтитра
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryField {
    /// Время начала
    StartTime,
    /// Время окончания
    EndTime,
    /// Текст
    Text,
}

/// Позиция субтитра с данным номером, либо `None`
fn position_of(entries: &[SubtitleEntry], seq: usize) -> Option<usize> {
    entries.iter().position(|entry| entry.index == seq)
}

/// Вставляет новый субтитр сразу после указанного.
///
/// Начало и конец нового субтитра равны концу предыдущего
/// (нулевая длительность, время задаст пользователь).
pub fn insert_after(entries: &[SubtitleEntry], after_seq: usize) -> Vec<SubtitleEntry> {
    let mut result = entries.to_vec();
    let Some(pos) = position_of(entries, after_seq) else {
        return result;
    };

    let anchor_ms = entries[pos].end_ms;
    result.insert(
        pos + 1,
        SubtitleEntry::new(0, anchor_ms, anchor_ms, DEFAULT_ENTRY_TEXT.to_string()),
    );
    reindex(&mut result);
    result
}

/// Удаляет субтитр с указанным номером
pub fn delete_entry(entries: &[SubtitleEntry], seq: usize) -> Vec<SubtitleEntry> {
    let mut result = entries.to_vec();
    let Some(pos) = position_of(entries, seq) else {
        return result;
    };

    result.remove(pos);
    reindex(&mut result);
    result
}

/// Меняет субтитр местами с соседним в указанном направлении.
/// На границе списка - ничего не делает.
pub fn move_entry(
    entries: &[SubtitleEntry],
    seq: usize,
    direction: MoveDirection,
) -> Vec<SubtitleEntry> {
    let mut result = entries.to_vec();
    let Some(pos) = position_of(entries, seq) else {
        return result;
    };

    match direction {
        MoveDirection::Up if pos > 0 => result.swap(pos, pos - 1),
        MoveDirection::Down if pos + 1 < result.len() => result.swap(pos, pos + 1),
        _ => return result,
    }
    reindex(&mut result);
    result
}

/// Объединяет субтитр со следующим: начало от первого, конец от второго,
/// тексты обрезаются и соединяются переводом строки.
/// Для последнего субтитра - ничего не делает.
pub fn merge_with_next(entries: &[SubtitleEntry], seq: usize) -> Vec<SubtitleEntry> {
    let mut result = entries.to_vec();
    let Some(pos) = position_of(entries, seq) else {
        return result;
    };
    if pos + 1 >= entries.len() {
        return result;
    }

    let next = result.remove(pos + 1);
    let merged_text = format!("{}\n{}", result[pos].text.trim(), next.text.trim());
    result[pos].end_ms = next.end_ms;
    result[pos].text = merged_text;
    reindex(&mut result);
    result
}

/// Разделяет субтитр на два по смещению в символах.
///
/// Точка разделения по времени вычисляется линейной интерполяцией
/// по доле текста. Смещение на границе текста или разделение,
/// дающее пустую половину, не выполняется.
pub fn split_at(entries: &[SubtitleEntry], seq: usize, char_offset: usize) -> Vec<SubtitleEntry> {
    let mut result = entries.to_vec();
    let Some(pos) = position_of(entries, seq) else {
        return result;
    };

    let entry = &entries[pos];
    let char_count = entry.text.chars().count();
    if char_offset == 0 || char_offset >= char_count {
        return result;
    }

    let byte_offset = entry
        .text
        .char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(entry.text.len());
    let first_text = entry.text[..byte_offset].trim().to_string();
    let second_text = entry.text[byte_offset..].trim().to_string();
    if first_text.is_empty() || second_text.is_empty() {
        return result;
    }

    // Интерполируем время разделения по доле текста; при нулевой
    // длительности обе половины начинаются с исходного начала
    let span = (entry.end_ms - entry.start_ms).max(0);
    let split_ms =
        entry.start_ms + (span as f64 * char_offset as f64 / char_count as f64).round() as i64;

    let original_end = entry.end_ms;
    result[pos].end_ms = split_ms;
    result[pos].text = first_text;
    result.insert(
        pos + 1,
        SubtitleEntry::new(0, split_ms, original_end, second_text),
    );
    reindex(&mut result);
    result
}

/// Перемещает субтитр на произвольную позицию списка (drag-and-drop).
/// В отличие от [`move_entry`] не ограничено соседними позициями.
pub fn reorder(
    entries: &[SubtitleEntry],
    from_index: usize,
    to_index: usize,
) -> Vec<SubtitleEntry> {
    let mut result = entries.to_vec();
    if from_index >= result.len() {
        return result;
    }

    let to_index = to_index.min(result.len() - 1);
    if from_index == to_index {
        return result;
    }

    let entry = result.remove(from_index);
    result.insert(to_index, entry);
    reindex(&mut result);
    result
}

/// Заменяет одно поле субтитра.
///
/// Временные поля нормализуются при подтверждении: свободный ввод
/// во время редактирования остаётся на стороне UI.
pub fn update_field(
    entries: &[SubtitleEntry],
    seq: usize,
    field: EntryField,
    value: &str,
) -> Vec<SubtitleEntry> {
    let mut result = entries.to_vec();
    let Some(pos) = position_of(entries, seq) else {
        return result;
    };

    match field {
        EntryField::StartTime => result[pos].start_ms = timestamp_to_ms(value),
        EntryField::EndTime => result[pos].end_ms = timestamp_to_ms(value),
        EntryField::Text => result[pos].text = value.to_string(),
    }
    result
}

/// Устанавливает временное поле в текущую позицию воспроизведения
/// с защитой от перекрытия с соседями.
///
/// Для начала: не раньше конца предыдущего субтитра; конец подбирается
/// так, чтобы сохранить исходную длительность, но не позже начала
/// следующего (при необходимости длительность сокращается, а начало
/// схлопывается к концу). Для конца: в пределах от собственного начала
/// до начала следующего.
pub fn set_field_to_playback_time(
    entries: &[SubtitleEntry],
    seq: usize,
    field: EntryField,
    playback_ms: i64,
) -> Vec<SubtitleEntry> {
    let mut result = entries.to_vec();
    let Some(pos) = position_of(entries, seq) else {
        return result;
    };

    let prev_end = if pos > 0 { Some(entries[pos - 1].end_ms) } else { None };
    let next_start = entries.get(pos + 1).map(|next| next.start_ms);

    match field {
        EntryField::StartTime => {
            let duration = entries[pos].duration_ms();
            let mut new_start = playback_ms.max(prev_end.unwrap_or(0));
            let mut new_end = new_start + duration;
            if let Some(next_start) = next_start {
                new_end = new_end.min(next_start);
            }
            if new_start > new_end {
                new_start = new_end;
            }
            result[pos].start_ms = new_start;
            result[pos].end_ms = new_end;
        }
        EntryField::EndTime => {
            let mut new_end = playback_ms;
            if let Some(next_start) = next_start {
                new_end = new_end.min(next_start);
            }
            result[pos].end_ms = new_end.max(entries[pos].start_ms);
        }
        EntryField::Text => {}
    }

    result
}
