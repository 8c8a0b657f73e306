//! Модуль обработки ошибок библиотеки subnova
//!
//! Этот модуль содержит типы ошибок, которые могут возникнуть при работе библиотеки.

use serde::Serialize;
use thiserror::Error;

/// Ошибки библиотеки subnova
#[derive(Debug, Error, Serialize)]
pub enum SubnovaError {
    /// Ошибка HTTP запроса
    #[error("HTTP request error: {0}")]
    #[serde(serialize_with = "serialize_to_string")]
    Http(#[from] reqwest::Error),

    /// Ошибка ввода-вывода
    #[error("IO error: {0}")]
    #[serde(serialize_with = "serialize_to_string")]
    Io(#[from] std::io::Error),

    /// Ошибка сериализации/десериализации JSON
    #[error("JSON error: {0}")]
    #[serde(serialize_with = "serialize_to_string")]
    Json(#[from] serde_json::Error),

    /// Ошибка конфигурации
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// AI сервис вернул пустой результат
    #[error("AI service returned an empty result: {0}")]
    AiEmptyResult(String),

    /// AI сервис вернул неверное количество сегментов при уточнении таймингов
    #[error("AI refine returned {actual} entries, expected {expected}")]
    AiEntryCountMismatch { expected: usize, actual: usize },

    /// Ответ AI сервиса пришёл после того, как состояние уже было изменено
    #[error("AI response is stale and was discarded: {0}")]
    AiStaleResponse(String),

    /// Ошибка ответа AI сервиса
    #[error("AI service error: {0}")]
    AiService(String),

    /// Другая ошибка
    #[error("Other error: {0}")]
    Other(String),
}

// std::io::Error и прочие внешние ошибки не реализуют serde::Serialize
fn serialize_to_string<T, S>(err: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: serde::Serializer,
{
    serializer.serialize_str(&err.to_string())
}

impl From<&str> for SubnovaError {
    fn from(s: &str) -> Self {
        SubnovaError::Other(s.to_string())
    }
}

impl From<String> for SubnovaError {
    fn from(s: String) -> Self {
        SubnovaError::Other(s)
    }
}

/// Тип Result для библиотеки subnova
pub type Result<T> = std::result::Result<T, SubnovaError>;
