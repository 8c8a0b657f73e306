//! AI сервис транскрибации и выравнивания таймингов
//!
//! Сервис рассматривается как чёрный ящик: он получает медиа и текст,
//! а возвращает список записей с временными метками-строками.
//! Валидация контракта (пустой результат, несовпадение количества
//! при уточнении) выполняется на стороне вызывающего кода
//! в [`crate::editor::session::EditorSession`].

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::subtitle::{reindex, timestamp_to_ms, SubtitleEntry};

pub mod openai;
pub mod types;

pub use openai::OpenAiProvider;
pub use types::RawTranscriptEntry;

/// Провайдер таймингов: транскрибация медиа и уточнение временных меток
#[async_trait]
pub trait TimingProvider: Send + Sync {
    /// Транскрибирует медиа в список записей с временными метками.
    /// Если передан `source_text` (текст песни или готовый текст),
    /// провайдер выравнивает его по звуку вместо распознавания с нуля.
    async fn generate_from_media(
        &self,
        media: Bytes,
        mime_type: &str,
        source_text: Option<&str>,
    ) -> Result<Vec<RawTranscriptEntry>>;

    /// Уточняет тайминги существующих записей по звуку.
    /// Контракт: количество записей в ответе равно количеству на входе;
    /// используется только тайминг, текст ответа не считается достоверным.
    async fn refine_timings(
        &self,
        media: Bytes,
        mime_type: &str,
        entries: &[SubtitleEntry],
    ) -> Result<Vec<RawTranscriptEntry>>;
}

/// Преобразует сырые записи AI в субтитры.
///
/// Каждая временная метка проходит нормализацию кодека, порядковые
/// номера пересчитываются по позиции: присланным номерам не доверяем.
pub fn raw_to_entries(raw: &[RawTranscriptEntry]) -> Vec<SubtitleEntry> {
    let mut entries: Vec<SubtitleEntry> = raw
        .iter()
        .map(|record| {
            SubtitleEntry::new(
                0,
                timestamp_to_ms(&record.start_time),
                timestamp_to_ms(&record.end_time),
                record.text.clone(),
            )
        })
        .collect();
    reindex(&mut entries);
    entries
}
