//! Сеанс редактирования
//!
//! [`EditorSession`] владеет историей снимков, накопленными глобальными
//! сдвигами и контрактом с AI сервисом. Все изменяющие операции проходят
//! через сеанс: операция вычисляет новый список, сеанс проводит его через
//! историю. Каждая операция выполняется целиком на `&mut self`, поэтому
//! правки атомарны с точки зрения вызывающего кода; многопоточному хосту
//! достаточно обернуть сеанс в мьютекс.

use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editor::history::EditHistory;
use crate::editor::{self, EntryField, MoveDirection};
use crate::error::{Result, SubnovaError};
use crate::services::ai::{raw_to_entries, RawTranscriptEntry, TimingProvider};
use crate::subtitle::srt::serialize_srt;
use crate::subtitle::timestamp::timestamp_to_ms;
use crate::subtitle::vtt::srt_to_vtt;
use crate::subtitle::{lrc, reindex, srt, vtt, SubtitleEntry};

/// Билет запроса к AI сервису.
///
/// Выдаётся перед отправкой запроса и предъявляется вместе с ответом.
/// Если между выдачей и ответом состояние сеанса изменилось, билет
/// устаревает и ответ отбрасывается вместо того, чтобы затереть более
/// поздние правки пользователя.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    id: Uuid,
    generation: u64,
}

/// Снимок черновика для локального сохранения на стороне хоста
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSnapshot {
    /// Текущий список субтитров
    pub entries: Vec<SubtitleEntry>,
    /// Накопленный глобальный сдвиг
    pub offset_ms: i64,
    /// Накопленное удлинение концов
    pub end_padding_ms: i64,
    /// Имя исходного файла
    pub source_name: Option<String>,
    /// Время сохранения
    pub saved_at: DateTime<Utc>,
}

/// Сеанс редактирования списка субтитров
pub struct EditorSession {
    history: EditHistory,
    /// Накопленный глобальный сдвиг: слайдер хранится как абсолютное
    /// значение, применяется всегда разница с предыдущим
    offset_ms: i64,
    /// Накопленное удлинение концов субтитров
    end_padding_ms: i64,
    source_name: Option<String>,
    /// Поколение состояния: растёт при каждом изменении, используется
    /// для отбраковки устаревших ответов AI
    generation: u64,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// Создаёт пустой сеанс
    pub fn new() -> Self {
        Self {
            history: EditHistory::new(Vec::new()),
            offset_ms: 0,
            end_padding_ms: 0,
            source_name: None,
            generation: 0,
        }
    }

    /// Текущий список субтитров
    pub fn entries(&self) -> &[SubtitleEntry] {
        self.history.current()
    }

    /// Накопленный глобальный сдвиг
    pub fn offset_ms(&self) -> i64 {
        self.offset_ms
    }

    /// Накопленное удлинение концов
    pub fn end_padding_ms(&self) -> i64 {
        self.end_padding_ms
    }

    /// Имя текущего источника
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Принимает новый источник: история сбрасывается к одному снимку,
    /// накопленные сдвиги обнуляются. Это граница "нового документа".
    pub fn adopt_source(&mut self, source_name: Option<String>, mut entries: Vec<SubtitleEntry>) {
        reindex(&mut entries);
        info!(
            "Adopting new source '{}' with {} entries",
            source_name.as_deref().unwrap_or("<untitled>"),
            entries.len()
        );
        self.history.reset(entries);
        self.offset_ms = 0;
        self.end_padding_ms = 0;
        self.source_name = source_name;
        self.generation += 1;
    }

    /// Импортирует SRT текст как новый источник
    pub fn import_srt(&mut self, source_name: Option<String>, content: &str) {
        self.adopt_source(source_name, srt::parse_srt(content));
    }

    /// Импортирует WebVTT текст как новый источник
    pub fn import_vtt(&mut self, source_name: Option<String>, content: &str) {
        self.adopt_source(source_name, vtt::parse_vtt(content));
    }

    /// Импортирует LRC текст как новый источник
    pub fn import_lrc(&mut self, source_name: Option<String>, content: &str) {
        self.adopt_source(source_name, lrc::parse_lrc(content));
    }

    /// Экспортирует текущее состояние в SRT
    pub fn export_srt(&self) -> String {
        serialize_srt(self.entries())
    }

    /// Экспортирует текущее состояние в LRC
    pub fn export_lrc(&self) -> String {
        lrc::serialize_lrc(self.entries())
    }

    /// Строит WebVTT для предпросмотра в браузерном плеере
    pub fn export_vtt_preview(&self) -> String {
        srt_to_vtt(&self.export_srt())
    }

    fn commit(&mut self, snapshot: Vec<SubtitleEntry>) -> bool {
        let changed = self.history.push(snapshot);
        if changed {
            self.generation += 1;
        }
        changed
    }

    /// Возможна ли отмена
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Возможен ли повтор
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Отмена последней правки
    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        if moved {
            self.generation += 1;
        }
        moved
    }

    /// Повтор отменённой правки
    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        if moved {
            self.generation += 1;
        }
        moved
    }

    /// Вставляет новый субтитр после указанного
    pub fn insert_after(&mut self, after_seq: usize) -> bool {
        let next = editor::insert_after(self.history.current(), after_seq);
        self.commit(next)
    }

    /// Удаляет субтитр
    pub fn delete_entry(&mut self, seq: usize) -> bool {
        let next = editor::delete_entry(self.history.current(), seq);
        self.commit(next)
    }

    /// Перемещает субтитр на соседнюю позицию
    pub fn move_entry(&mut self, seq: usize, direction: MoveDirection) -> bool {
        let next = editor::move_entry(self.history.current(), seq, direction);
        self.commit(next)
    }

    /// Объединяет субтитр со следующим
    pub fn merge_with_next(&mut self, seq: usize) -> bool {
        let next = editor::merge_with_next(self.history.current(), seq);
        self.commit(next)
    }

    /// Разделяет субтитр по смещению в символах
    pub fn split_at(&mut self, seq: usize, char_offset: usize) -> bool {
        let next = editor::split_at(self.history.current(), seq, char_offset);
        self.commit(next)
    }

    /// Перемещает субтитр на произвольную позицию
    pub fn reorder(&mut self, from_index: usize, to_index: usize) -> bool {
        let next = editor::reorder(self.history.current(), from_index, to_index);
        self.commit(next)
    }

    /// Заменяет поле субтитра
    pub fn update_field(&mut self, seq: usize, field: EntryField, value: &str) -> bool {
        let next = editor::update_field(self.history.current(), seq, field, value);
        self.commit(next)
    }

    /// Устанавливает временное поле в позицию воспроизведения
    pub fn set_field_to_playback_time(
        &mut self,
        seq: usize,
        field: EntryField,
        playback_ms: i64,
    ) -> bool {
        let next =
            editor::set_field_to_playback_time(self.history.current(), seq, field, playback_ms);
        self.commit(next)
    }

    /// Применяет глобальный сдвиг.
    ///
    /// Слайдер передаёт абсолютное значение; к субтитрам применяется
    /// разница с предыдущим значением, поэтому повторный вызов с тем же
    /// значением ничего не меняет, а возврат к прежнему значению точно
    /// отменяет свой вклад.
    pub fn apply_global_offset(&mut self, new_offset_ms: i64) -> bool {
        let delta = new_offset_ms - self.offset_ms;
        self.offset_ms = new_offset_ms;
        if delta == 0 {
            return false;
        }

        let shifted = self
            .history
            .current()
            .iter()
            .map(|entry| {
                let mut entry = entry.clone();
                entry.start_ms += delta;
                entry.end_ms += delta;
                entry
            })
            .collect();
        self.commit(shifted)
    }

    /// Применяет удлинение концов субтитров.
    ///
    /// Конец каждого субтитра сдвигается на разницу с предыдущим
    /// значением. При увеличении конец не заходит за начало следующего
    /// субтитра; в обе стороны конец не опускается ниже собственного
    /// начала.
    pub fn apply_end_padding(&mut self, new_padding_ms: i64) -> bool {
        let delta = new_padding_ms - self.end_padding_ms;
        self.end_padding_ms = new_padding_ms;
        if delta == 0 {
            return false;
        }

        let current = self.history.current();
        let padded = current
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let mut entry = entry.clone();
                let mut new_end = entry.end_ms + delta;
                if delta > 0 {
                    if let Some(next) = current.get(i + 1) {
                        new_end = new_end.min(next.start_ms);
                    }
                }
                entry.end_ms = new_end.max(entry.start_ms);
                entry
            })
            .collect();
        self.commit(padded)
    }

    /// Выдаёт билет для запроса к AI сервису
    pub fn begin_ai_request(&self) -> RequestTicket {
        RequestTicket {
            id: Uuid::new_v4(),
            generation: self.generation,
        }
    }

    fn ensure_fresh(&self, ticket: &RequestTicket) -> Result<()> {
        if ticket.generation != self.generation {
            return Err(SubnovaError::AiStaleResponse(format!(
                "request {} was superseded by later edits",
                ticket.id
            )));
        }
        Ok(())
    }

    /// Принимает результат генерации как новый источник.
    ///
    /// Пустой результат - нарушение контракта сервиса и жёсткая ошибка;
    /// прежнее состояние при этом не меняется.
    pub fn adopt_generated(
        &mut self,
        ticket: &RequestTicket,
        raw: Vec<RawTranscriptEntry>,
        source_name: Option<String>,
    ) -> Result<usize> {
        self.ensure_fresh(ticket)?;
        if raw.is_empty() {
            return Err(SubnovaError::AiEmptyResult(
                "the service returned no entries".to_string(),
            ));
        }

        let entries = raw_to_entries(&raw);
        let count = entries.len();
        self.adopt_source(source_name, entries);
        Ok(count)
    }

    /// Принимает уточнённые тайминги.
    ///
    /// Контракт "только тайминги": количество записей должно совпадать,
    /// текст и номера берутся из текущих субтитров, а не из ответа.
    /// Несовпадение количества - жёсткая ошибка, состояние не меняется.
    pub fn apply_refined(
        &mut self,
        ticket: &RequestTicket,
        raw: Vec<RawTranscriptEntry>,
    ) -> Result<()> {
        self.ensure_fresh(ticket)?;

        let current = self.history.current();
        if raw.len() != current.len() {
            return Err(SubnovaError::AiEntryCountMismatch {
                expected: current.len(),
                actual: raw.len(),
            });
        }

        let refined: Vec<SubtitleEntry> = current
            .iter()
            .zip(raw.iter())
            .map(|(original, record)| {
                SubtitleEntry::new(
                    original.index,
                    timestamp_to_ms(&record.start_time),
                    timestamp_to_ms(&record.end_time),
                    original.text.clone(),
                )
            })
            .collect();

        self.commit(refined);
        Ok(())
    }

    /// Транскрибирует медиа через провайдер и принимает результат
    /// как новый источник. Возвращает количество субтитров.
    pub async fn generate_with(
        &mut self,
        provider: &dyn TimingProvider,
        media: bytes::Bytes,
        mime_type: &str,
        source_text: Option<&str>,
        source_name: Option<String>,
    ) -> Result<usize> {
        let ticket = self.begin_ai_request();
        let raw = provider
            .generate_from_media(media, mime_type, source_text)
            .await?;
        self.adopt_generated(&ticket, raw, source_name)
    }

    /// Уточняет тайминги текущих субтитров через провайдер
    pub async fn refine_with(
        &mut self,
        provider: &dyn TimingProvider,
        media: bytes::Bytes,
        mime_type: &str,
    ) -> Result<()> {
        let ticket = self.begin_ai_request();
        let snapshot = self.history.current().to_vec();
        let raw = provider.refine_timings(media, mime_type, &snapshot).await?;
        self.apply_refined(&ticket, raw)
    }

    /// Снимок черновика для сохранения
    pub fn to_draft(&self) -> DraftSnapshot {
        DraftSnapshot {
            entries: self.entries().to_vec(),
            offset_ms: self.offset_ms,
            end_padding_ms: self.end_padding_ms,
            source_name: self.source_name.clone(),
            saved_at: Utc::now(),
        }
    }

    /// Восстанавливает сеанс из черновика. Как и любое принятие
    /// источника, сбрасывает историю к одному снимку.
    pub fn restore_draft(&mut self, draft: DraftSnapshot) {
        self.adopt_source(draft.source_name.clone(), draft.entries);
        self.offset_ms = draft.offset_ms;
        self.end_padding_ms = draft.end_padding_ms;
    }

    /// Сохраняет черновик в JSON файл
    pub async fn save_draft<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.to_draft())?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Загружает черновик из JSON файла
    pub async fn load_draft<P: AsRef<Path>>(path: P) -> Result<DraftSnapshot> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}
