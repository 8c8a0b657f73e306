//! # LRC кодек
//!
//! Формат текстов песен: одна строка `[MM:SS.xx]текст` на реплику.
//! LRC не хранит время окончания, поэтому оно синтезируется из начала
//! следующей строки.

use lazy_static::lazy_static;
use regex::Regex;

use crate::subtitle::timestamp::{ms_to_lrc_timestamp, timestamp_to_ms, LRC_LAST_CUE_DEFAULT_MS};
use crate::subtitle::{reindex, SubtitleEntry};

lazy_static! {
    /// Строка LRC: [MM:SS.xx]текст
    static ref LRC_LINE_RE: Regex =
        Regex::new(r"^\[(\d{1,3}):(\d{1,2})(?:[.:](\d{1,3}))?\]\s*(.*)$").unwrap();
}

/// Разбирает содержимое LRC файла в список субтитров.
///
/// Строки без временной метки (включая метаданные вроде `[ar:...]`)
/// и строки с пустым текстом отбрасываются. Время окончания реплики -
/// начало следующей, для последней - начало плюс 3 секунды.
pub fn parse_lrc(content: &str) -> Vec<SubtitleEntry> {
    let mut starts_and_texts: Vec<(i64, String)> = Vec::new();

    for line in content.lines() {
        let captures = match LRC_LINE_RE.captures(line.trim()) {
            Some(c) => c,
            None => continue,
        };

        let text = captures.get(4).map_or("", |m| m.as_str()).trim();
        if text.is_empty() {
            continue;
        }

        // Метка времени проходит через ту же нормализацию, что и
        // любой другой пользовательский ввод
        let minutes = captures.get(1).map_or("0", |m| m.as_str());
        let seconds = captures.get(2).map_or("0", |m| m.as_str());
        let start_ms = match captures.get(3) {
            Some(frac) => timestamp_to_ms(&format!("{}:{}.{}", minutes, seconds, frac.as_str())),
            None => timestamp_to_ms(&format!("{}:{}", minutes, seconds)),
        };

        starts_and_texts.push((start_ms, text.to_string()));
    }

    let mut entries = Vec::with_capacity(starts_and_texts.len());
    for i in 0..starts_and_texts.len() {
        let (start_ms, ref text) = starts_and_texts[i];
        let end_ms = match starts_and_texts.get(i + 1) {
            Some(&(next_start, _)) => next_start,
            None => start_ms + LRC_LAST_CUE_DEFAULT_MS,
        };
        entries.push(SubtitleEntry::new(0, start_ms, end_ms, text.clone()));
    }

    reindex(&mut entries);
    entries
}

/// Сериализует список субтитров в LRC.
/// Внутренние переводы строк заменяются пробелами: LRC - однострочный формат.
pub fn serialize_lrc(entries: &[SubtitleEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let text = entry.text.lines().collect::<Vec<&str>>().join(" ");
        out.push_str(&format!(
            "[{}]{}\n",
            ms_to_lrc_timestamp(entry.start_ms),
            text
        ));
    }
    out
}
