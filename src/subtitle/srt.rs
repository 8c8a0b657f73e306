//! # SRT кодек
//!
//! Модуль для разбора и сериализации субтитров в формате SRT.
//! Разбор лоялен к мусору: некорректные блоки пропускаются,
//! остальные разбираются. SRT является основным форматом экспорта.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::subtitle::timestamp::{ms_to_timestamp, timestamp_to_ms};
use crate::subtitle::{reindex, SubtitleEntry};

lazy_static! {
    /// Блоки разделяются одной или несколькими пустыми строками
    pub(crate) static ref BLOCK_SPLIT_RE: Regex = Regex::new(r"\r?\n\s*\r?\n").unwrap();
}

/// Разбирает строку временного интервала `start --> end`.
/// Текст после метки конца (настройки кью VTT) отбрасывается.
pub(crate) fn parse_time_range(line: &str) -> Option<(i64, i64)> {
    let (start_raw, end_raw) = line.split_once("-->")?;
    let end_token = end_raw.split_whitespace().next().unwrap_or("");
    Some((timestamp_to_ms(start_raw.trim()), timestamp_to_ms(end_token)))
}

/// Разбирает содержимое SRT файла в список субтитров.
///
/// # Аргументы
///
/// * `content` - Текст SRT файла
///
/// # Возвращает
///
/// Вектор субтитров с пересчитанными порядковыми номерами.
/// Блоки без номера или без строки `start --> end` пропускаются.
pub fn parse_srt(content: &str) -> Vec<SubtitleEntry> {
    let mut entries = Vec::new();

    for block in BLOCK_SPLIT_RE.split(content) {
        if let Some(entry) = parse_srt_block(block) {
            entries.push(entry);
        }
    }

    reindex(&mut entries);
    debug!("Parsed {} entries from SRT content", entries.len());
    entries
}

/// Разбирает один блок SRT
fn parse_srt_block(block: &str) -> Option<SubtitleEntry> {
    let lines: Vec<&str> = block
        .lines()
        .skip_while(|line| line.trim().is_empty())
        .collect();
    if lines.len() < 2 {
        return None;
    }

    // Первая строка - порядковый номер; он служит только признаком
    // границы блока и не используется как итоговый индекс
    if lines[0].trim().parse::<u64>().is_err() {
        return None;
    }

    let (start_ms, end_ms) = parse_time_range(lines[1])?;
    let text = lines[2..].join("\n");

    Some(SubtitleEntry::new(0, start_ms, end_ms, text))
}

/// Сериализует список субтитров в SRT.
///
/// Порядковые номера выводятся заново из позиции в списке,
/// переводы строк в тексте приводятся к CRLF.
pub fn serialize_srt(entries: &[SubtitleEntry]) -> String {
    let mut blocks = Vec::with_capacity(entries.len());

    for (i, entry) in entries.iter().enumerate() {
        let text = entry
            .text
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .replace('\n', "\r\n");
        blocks.push(format!(
            "{}\r\n{} --> {}\r\n{}",
            i + 1,
            ms_to_timestamp(entry.start_ms),
            ms_to_timestamp(entry.end_ms),
            text
        ));
    }

    let mut out = blocks.join("\r\n\r\n");
    if !out.is_empty() {
        out.push_str("\r\n");
    }
    out
}
