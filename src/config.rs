//! Модуль конфигурации библиотеки subnova
//!
//! Этот модуль содержит структуры для настройки AI провайдера.

use serde::{Deserialize, Serialize};

/// Конфигурация AI провайдера
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// API ключ для OpenAI
    pub openai_api_key: String,
    /// Модель для транскрибации аудио
    pub transcription_model: String,
    /// Модель для уточнения таймингов
    pub refine_model: String,
    /// Базовый URL API
    pub api_base_url: String,
    /// Таймаут запроса в секундах
    pub request_timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            transcription_model: "whisper-1".to_string(),
            refine_model: "gpt-4o-audio-preview".to_string(),
            api_base_url: "https://api.openai.com/v1".to_string(),
            request_timeout_secs: 120,
        }
    }
}
