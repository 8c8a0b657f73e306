//! Провайдер таймингов на основе OpenAI API
//!
//! Транскрибация выполняется через Whisper endpoint (multipart запрос),
//! уточнение таймингов - через chat completions с аудио во вложении.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use log::{debug, error, info};
use serde::Deserialize;

use crate::config::AiConfig;
use crate::error::{Result, SubnovaError};
use crate::services::ai::{RawTranscriptEntry, TimingProvider};
use crate::subtitle::{ms_to_timestamp, SubtitleEntry};

const REFINE_SYSTEM_PROMPT: &str = "You are a subtitle timing assistant. \
You receive an audio track and a JSON array of subtitle entries. \
Adjust startTime and endTime of every entry to match the audio precisely. \
Return a JSON array with exactly the same number of entries and the same \
order. Do not change the text. Respond with JSON only.";

/// Ответ Whisper в формате verbose_json
#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    #[serde(default)]
    segments: Vec<TranscriptionSegment>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionSegment {
    start: f64,
    end: f64,
    text: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

/// Провайдер таймингов, работающий с OpenAI API
pub struct OpenAiProvider {
    config: AiConfig,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Создаёт провайдер с указанной конфигурацией
    pub fn new(config: AiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    fn validate_api_key(&self) -> Result<()> {
        if self.config.openai_api_key.trim().is_empty() {
            error!("OpenAI API key is empty");
            return Err(SubnovaError::Configuration(
                "OpenAI API key is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Определяет формат аудио для chat completions по MIME типу
fn audio_format_from_mime(mime_type: &str) -> &str {
    match mime_type {
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/wav" | "audio/x-wav" => "wav",
        _ => mime_type.rsplit('/').next().unwrap_or("mp3"),
    }
}

/// Вырезает JSON массив из текста ответа модели.
/// Модель иногда оборачивает JSON в markdown-ограждения.
fn extract_json_array(content: &str) -> &str {
    match (content.find('['), content.rfind(']')) {
        (Some(open), Some(close)) if open < close => &content[open..=close],
        _ => content,
    }
}

#[async_trait]
impl TimingProvider for OpenAiProvider {
    async fn generate_from_media(
        &self,
        media: Bytes,
        mime_type: &str,
        source_text: Option<&str>,
    ) -> Result<Vec<RawTranscriptEntry>> {
        self.validate_api_key()?;
        info!("Sending transcription request ({} bytes, {})", media.len(), mime_type);

        let file_part = reqwest::multipart::Part::bytes(media.to_vec())
            .file_name("audio")
            .mime_str(mime_type)
            .map_err(|e| SubnovaError::AiService(format!("Invalid MIME type: {}", e)))?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.config.transcription_model.clone())
            .text("response_format", "verbose_json");

        // Текст песни передаётся как подсказка: модель выравнивает
        // его по звуку вместо распознавания с нуля
        if let Some(text) = source_text {
            form = form.text("prompt", text.to_string());
        }

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.config.api_base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.config.openai_api_key),
            )
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        info!("Transcription API response status: {}", status);
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Transcription API error: HTTP {}", status);
            return Err(SubnovaError::AiService(format!(
                "API request failed (HTTP {}): {}",
                status, error_text
            )));
        }

        let transcription: VerboseTranscription = response.json().await?;
        debug!("Received {} segments", transcription.segments.len());

        let entries = transcription
            .segments
            .iter()
            .enumerate()
            .map(|(i, segment)| RawTranscriptEntry {
                index: i + 1,
                start_time: format!("{:.3}", segment.start),
                end_time: format!("{:.3}", segment.end),
                text: segment.text.trim().to_string(),
            })
            .collect();

        Ok(entries)
    }

    async fn refine_timings(
        &self,
        media: Bytes,
        mime_type: &str,
        entries: &[SubtitleEntry],
    ) -> Result<Vec<RawTranscriptEntry>> {
        self.validate_api_key()?;
        info!(
            "Sending refine request for {} entries ({} bytes of audio)",
            entries.len(),
            media.len()
        );

        // Текущие записи уходят модели в каноническом виде
        let wire_entries: Vec<RawTranscriptEntry> = entries
            .iter()
            .map(|entry| RawTranscriptEntry {
                index: entry.index,
                start_time: ms_to_timestamp(entry.start_ms),
                end_time: ms_to_timestamp(entry.end_ms),
                text: entry.text.clone(),
            })
            .collect();

        let payload = serde_json::json!({
            "model": self.config.refine_model,
            "messages": [
                { "role": "system", "content": REFINE_SYSTEM_PROMPT },
                { "role": "user", "content": [
                    { "type": "input_audio", "input_audio": {
                        "data": BASE64.encode(&media),
                        "format": audio_format_from_mime(mime_type)
                    }},
                    { "type": "text", "text": serde_json::to_string(&wire_entries)? }
                ]}
            ]
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.config.openai_api_key),
            )
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        info!("Refine API response status: {}", status);
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Refine API error: HTTP {}", status);
            return Err(SubnovaError::AiService(format!(
                "API request failed (HTTP {}): {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .unwrap_or("");

        let refined: Vec<RawTranscriptEntry> = serde_json::from_str(extract_json_array(content))
            .map_err(|e| {
                error!("Failed to parse refine response: {}", e);
                SubnovaError::AiService(format!("Unexpected refine response format: {}", e))
            })?;

        debug!("Received {} refined entries", refined.len());
        Ok(refined)
    }
}
