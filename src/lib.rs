//! Основной файл библиотеки subnova
//!
//! Библиотека предоставляет ядро редактора субтитров и текстов песен:
//! нормализацию временных меток, кодеки форматов SRT/WebVTT/LRC,
//! структурные операции редактирования с историей отмены и клиент
//! AI сервиса транскрибации и выравнивания таймингов.

pub mod config;
pub mod editor;
pub mod error;
pub mod services;
pub mod subtitle;
pub mod utils;

pub use config::AiConfig;
pub use editor::history::EditHistory;
pub use editor::session::{DraftSnapshot, EditorSession, RequestTicket};
pub use editor::{EntryField, MoveDirection};
pub use error::{Result, SubnovaError};
pub use services::ai::{OpenAiProvider, RawTranscriptEntry, TimingProvider};
pub use subtitle::SubtitleEntry;
