//! Типы данных для обмена с AI сервисом

use serde::{Deserialize, Serialize};

/// Сырая запись транскрипции, как её возвращает AI сервис.
///
/// Временные метки приходят строками в произвольном формате и не
/// считаются каноническими: перед использованием они проходят через
/// нормализацию кодека.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTranscriptEntry {
    /// Порядковый номер, плотный с единицы
    #[serde(default)]
    pub index: usize,
    /// Время начала в виде строки
    pub start_time: String,
    /// Время окончания в виде строки
    pub end_time: String,
    /// Распознанный текст
    #[serde(default)]
    pub text: String,
}
