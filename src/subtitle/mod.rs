//! Модуль субтитров: типы и кодеки текстовых форматов
//!
//! Содержит структуру субтитра и функции разбора/сериализации
//! форматов SRT, WebVTT и LRC.

use serde::{Deserialize, Serialize};

pub mod lrc;
pub mod srt;
pub mod timestamp;
pub mod vtt;

pub use timestamp::{
    ms_to_lrc_timestamp, ms_to_timestamp, normalize_timestamp, timestamp_to_ms,
    LRC_LAST_CUE_DEFAULT_MS,
};

/// Структура для представления одного субтитра
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleEntry {
    /// Порядковый номер субтитра (с единицы, всегда пересчитывается
    /// из позиции в списке)
    pub index: usize,
    /// Время начала в миллисекундах. Для корректного субтитра
    /// неотрицательно; транзиентные отрицательные значения обрезаются
    /// при сериализации
    pub start_ms: i64,
    /// Время окончания в миллисекундах
    pub end_ms: i64,
    /// Текст субтитра, может содержать переводы строк
    pub text: String,
}

impl SubtitleEntry {
    /// Создает новый субтитр
    pub fn new(index: usize, start_ms: i64, end_ms: i64, text: String) -> Self {
        Self {
            index,
            start_ms,
            end_ms,
            text,
        }
    }

    /// Длительность субтитра в миллисекундах
    pub fn duration_ms(&self) -> i64 {
        (self.end_ms - self.start_ms).max(0)
    }
}

/// Пересчитывает порядковые номера из позиций в списке.
/// Вызывается после каждой структурной операции над списком.
pub fn reindex(entries: &mut [SubtitleEntry]) {
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.index = i + 1;
    }
}
