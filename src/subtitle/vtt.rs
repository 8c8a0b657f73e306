//! # WebVTT кодек
//!
//! Модуль для разбора WebVTT субтитров и конвертации SRT -> VTT
//! для предпросмотра в браузерном плеере.

use log::debug;

use crate::subtitle::srt::{parse_time_range, BLOCK_SPLIT_RE};
use crate::subtitle::{reindex, SubtitleEntry};

/// Настройки кью, добавляемые при конвертации SRT -> VTT:
/// выравнивание по центру и фиксированная ширина
const VTT_CUE_SETTINGS: &str = "align:middle size:80%";

/// Разбирает содержимое WebVTT файла в список субтитров.
///
/// Заголовок `WEBVTT` отбрасывается, идентификаторы кью допускаются,
/// настройки кью после временных меток игнорируются. Порядковые номера
/// синтезируются по порядку блоков, так как VTT их не обязан содержать.
pub fn parse_vtt(content: &str) -> Vec<SubtitleEntry> {
    let body = content.trim_start_matches('\u{feff}');

    // Пропускаем строку заголовка WEBVTT, если она есть
    let body = match body.split_once('\n') {
        Some((first, rest)) if first.trim_end().starts_with("WEBVTT") => rest,
        _ => body,
    };

    let mut entries = Vec::new();

    for block in BLOCK_SPLIT_RE.split(body) {
        let lines: Vec<&str> = block
            .lines()
            .skip_while(|line| line.trim().is_empty())
            .collect();

        // Ищем строку с временным интервалом; всё до неё - идентификатор кью
        let timing_position = match lines.iter().position(|line| line.contains("-->")) {
            Some(pos) => pos,
            None => continue,
        };

        let (start_ms, end_ms) = match parse_time_range(lines[timing_position]) {
            Some(range) => range,
            None => continue,
        };

        let text = lines[timing_position + 1..].join("\n");
        entries.push(SubtitleEntry::new(0, start_ms, end_ms, text));
    }

    reindex(&mut entries);
    debug!("Parsed {} cues from VTT content", entries.len());
    entries
}

/// Конвертирует SRT текст в WebVTT.
///
/// Добавляет заголовок `WEBVTT`, убирает числовые номера блоков,
/// заменяет запятую в миллисекундах на точку и добавляет настройки
/// позиционирования к строке времени. Блоки, которые не удаётся
/// разобрать, переносятся как есть.
pub fn srt_to_vtt(srt_content: &str) -> String {
    let mut out = String::from("WEBVTT\n\n");

    for block in BLOCK_SPLIT_RE.split(srt_content) {
        if block.trim().is_empty() {
            continue;
        }

        let mut cue_lines: Vec<String> = Vec::new();
        for (i, line) in block.lines().enumerate() {
            if i == 0 && line.trim().parse::<u64>().is_ok() {
                // Числовой номер блока в VTT не нужен
                continue;
            }
            if line.contains("-->") {
                cue_lines.push(format!(
                    "{} {}",
                    line.trim().replace(',', "."),
                    VTT_CUE_SETTINGS
                ));
            } else {
                cue_lines.push(line.to_string());
            }
        }

        out.push_str(&cue_lines.join("\n"));
        out.push_str("\n\n");
    }

    out
}
