use super::*;
use crate::editor::session::EditorSession;
use crate::services::ai::{RawTranscriptEntry, TimingProvider};
use crate::subtitle::SubtitleEntry;

use async_trait::async_trait;
use bytes::Bytes;

fn entry(index: usize, start_ms: i64, end_ms: i64, text: &str) -> SubtitleEntry {
    SubtitleEntry::new(index, start_ms, end_ms, text.to_string())
}

fn raw(index: usize, start: &str, end: &str, text: &str) -> RawTranscriptEntry {
    RawTranscriptEntry {
        index,
        start_time: start.to_string(),
        end_time: end.to_string(),
        text: text.to_string(),
    }
}

#[test]
fn test_insert_after_creates_zero_duration_entry() {
    // Сценарий из UI: вставка после первого субтитра
    let entries = vec![entry(1, 1000, 2000, "a")];
    let result = insert_after(&entries, 1);

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].index, 1);
    assert_eq!(result[1].index, 2);
    assert_eq!(result[1].start_ms, 2000);
    assert_eq!(result[1].end_ms, 2000);
    assert_eq!(result[1].text, DEFAULT_ENTRY_TEXT);
}

#[test]
fn test_unknown_seq_is_noop() {
    let entries = vec![entry(1, 0, 1000, "a")];

    assert_eq!(insert_after(&entries, 99), entries);
    assert_eq!(delete_entry(&entries, 99), entries);
    assert_eq!(merge_with_next(&entries, 99), entries);
    assert_eq!(split_at(&entries, 99, 1), entries);
    assert_eq!(update_field(&entries, 99, EntryField::Text, "x"), entries);
}

#[test]
fn test_delete_reindexes() {
    let entries = vec![
        entry(1, 0, 1000, "a"),
        entry(2, 1000, 2000, "b"),
        entry(3, 2000, 3000, "c"),
    ];
    let result = delete_entry(&entries, 2);

    assert_eq!(result.len(), 2);
    assert_eq!(result[1].text, "c");
    assert_eq!(result[1].index, 2);
}

#[test]
fn test_move_entry_swaps_and_stops_at_boundaries() {
    let entries = vec![entry(1, 0, 1000, "a"), entry(2, 1000, 2000, "b")];

    let moved = move_entry(&entries, 2, MoveDirection::Up);
    assert_eq!(moved[0].text, "b");
    assert_eq!(moved[0].index, 1);
    assert_eq!(moved[1].text, "a");

    // На границах списка перемещение ничего не делает
    assert_eq!(move_entry(&entries, 1, MoveDirection::Up), entries);
    assert_eq!(move_entry(&entries, 2, MoveDirection::Down), entries);
}

#[test]
fn test_merge_with_next() {
    let entries = vec![
        entry(1, 1000, 2000, "первая  "),
        entry(2, 2500, 4000, "  вторая"),
    ];
    let result = merge_with_next(&entries, 1);

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].start_ms, 1000);
    assert_eq!(result[0].end_ms, 4000);
    assert_eq!(result[0].text, "первая\nвторая");
}

#[test]
fn test_merge_with_next_on_last_entry_is_noop() {
    let entries = vec![entry(1, 0, 1000, "a"), entry(2, 1000, 2000, "b")];
    assert_eq!(merge_with_next(&entries, 2), entries);
}

#[test]
fn test_split_at_interpolates_time() {
    // 4 символа, разделение после второго: середина интервала
    let entries = vec![entry(1, 1000, 2000, "абвг")];
    let result = split_at(&entries, 1, 2);

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].text, "аб");
    assert_eq!(result[0].start_ms, 1000);
    assert_eq!(result[0].end_ms, 1500);
    assert_eq!(result[1].text, "вг");
    assert_eq!(result[1].start_ms, 1500);
    assert_eq!(result[1].end_ms, 2000);
    assert_eq!(result[1].index, 2);
}

#[test]
fn test_split_at_boundaries_is_noop() {
    let entries = vec![entry(1, 1000, 2000, "абвг")];
    assert_eq!(split_at(&entries, 1, 0), entries);
    assert_eq!(split_at(&entries, 1, 4), entries);
}

#[test]
fn test_split_with_empty_half_is_noop() {
    // Первая половина после обрезки пустая
    let entries = vec![entry(1, 1000, 2000, " аб")];
    assert_eq!(split_at(&entries, 1, 1), entries);
}

#[test]
fn test_split_zero_duration_entry() {
    let entries = vec![entry(1, 2000, 2000, "аб")];
    let result = split_at(&entries, 1, 1);

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].end_ms, 2000);
    assert_eq!(result[1].start_ms, 2000);
}

#[test]
fn test_reorder_moves_to_arbitrary_position() {
    let entries = vec![
        entry(1, 0, 1000, "a"),
        entry(2, 1000, 2000, "b"),
        entry(3, 2000, 3000, "c"),
    ];
    let result = reorder(&entries, 0, 2);

    assert_eq!(result[0].text, "b");
    assert_eq!(result[1].text, "c");
    assert_eq!(result[2].text, "a");
    assert_eq!(result[2].index, 3);

    // Выход за границы списка не приводит к панике
    assert_eq!(reorder(&entries, 5, 0), entries);
}

#[test]
fn test_update_field_normalizes_time_on_commit() {
    let entries = vec![entry(1, 0, 1000, "a")];

    let result = update_field(&entries, 1, EntryField::StartTime, "1:02,5");
    assert_eq!(result[0].start_ms, 62_500);

    let result = update_field(&entries, 1, EntryField::Text, "новый текст");
    assert_eq!(result[0].text, "новый текст");
}

#[test]
fn test_set_start_to_playback_time_respects_neighbours() {
    let entries = vec![
        entry(1, 0, 1000, "a"),
        entry(2, 2000, 3000, "b"),
        entry(3, 3500, 4000, "c"),
    ];

    // Позиция раньше конца предыдущего: начало прижимается к нему,
    // длительность сохраняется
    let result = set_field_to_playback_time(&entries, 2, EntryField::StartTime, 500);
    assert_eq!(result[1].start_ms, 1000);
    assert_eq!(result[1].end_ms, 2000);

    // Конец не заходит за начало следующего субтитра
    let result = set_field_to_playback_time(&entries, 2, EntryField::StartTime, 3200);
    assert_eq!(result[1].end_ms, 3500);
    assert_eq!(result[1].start_ms, 3200);

    // Если даже укороченная длительность не помещается,
    // начало схлопывается к концу
    let result = set_field_to_playback_time(&entries, 2, EntryField::StartTime, 3600);
    assert_eq!(result[1].end_ms, 3500);
    assert_eq!(result[1].start_ms, 3500);
}

#[test]
fn test_set_end_to_playback_time_clamps_into_range() {
    let entries = vec![entry(1, 1000, 2000, "a"), entry(2, 3000, 4000, "b")];

    let result = set_field_to_playback_time(&entries, 1, EntryField::EndTime, 3500);
    assert_eq!(result[0].end_ms, 3000);

    let result = set_field_to_playback_time(&entries, 1, EntryField::EndTime, 500);
    assert_eq!(result[0].end_ms, 1000);
}

// --- Тесты сеанса -----------------------------------------------------

fn session_with(entries: Vec<SubtitleEntry>) -> EditorSession {
    let mut session = EditorSession::new();
    session.adopt_source(Some("test.srt".to_string()), entries);
    session
}

#[test]
fn test_undo_redo_restores_exact_state() {
    let initial = vec![entry(1, 1000, 2000, "a")];
    let mut session = session_with(initial.clone());

    assert!(session.insert_after(1));
    assert_eq!(session.entries().len(), 2);

    assert!(session.undo());
    assert_eq!(session.entries(), initial.as_slice());

    assert!(session.redo());
    assert_eq!(session.entries().len(), 2);
}

#[test]
fn test_noop_edit_not_recorded_in_history() {
    let mut session = session_with(vec![entry(1, 0, 1000, "a")]);

    // Слияние на последнем субтитре ничего не меняет
    assert!(!session.merge_with_next(1));
    assert!(!session.can_undo());
}

#[test]
fn test_global_offset_idempotent_and_reversible() {
    let initial = vec![entry(1, 1000, 2000, "a"), entry(2, 3000, 4000, "b")];
    let mut session = session_with(initial.clone());

    assert!(session.apply_global_offset(500));
    assert_eq!(session.entries()[0].start_ms, 1500);
    assert_eq!(session.entries()[1].end_ms, 4500);

    // Повторный вызов с тем же значением - дельта ноль
    assert!(!session.apply_global_offset(500));

    // Возврат слайдера в ноль точно отменяет вклад сдвига
    assert!(session.apply_global_offset(0));
    for (current, original) in session.entries().iter().zip(initial.iter()) {
        assert_eq!(current.start_ms, original.start_ms);
        assert_eq!(current.end_ms, original.end_ms);
    }
}

#[test]
fn test_negative_offset_roundtrip_is_exact() {
    let mut session = session_with(vec![entry(1, 200, 1200, "a")]);

    session.apply_global_offset(-500);
    assert_eq!(session.entries()[0].start_ms, -300);

    session.apply_global_offset(0);
    assert_eq!(session.entries()[0].start_ms, 200);

    // Транзиентное отрицательное время обрезается только при сериализации
    session.apply_global_offset(-500);
    assert!(session.export_srt().starts_with("1\r\n00:00:00,000 --> "));
}

#[test]
fn test_end_padding_clamps() {
    let mut session = session_with(vec![
        entry(1, 0, 1000, "a"),
        entry(2, 1200, 2000, "b"),
    ]);

    // Увеличение: конец первого упирается в начало второго
    session.apply_end_padding(500);
    assert_eq!(session.entries()[0].end_ms, 1200);
    assert_eq!(session.entries()[1].end_ms, 2500);

    // Уменьшение не ограничено началом следующего, но конец
    // не опускается ниже собственного начала
    session.apply_end_padding(-5000);
    for current in session.entries() {
        assert!(current.end_ms >= current.start_ms);
    }
}

#[test]
fn test_end_padding_never_inverts_entries() {
    let mut session = session_with(vec![entry(1, 1000, 1500, "a")]);

    for padding in [300, -2000, 700, -100, 0] {
        session.apply_end_padding(padding);
        for current in session.entries() {
            assert!(current.end_ms >= current.start_ms);
        }
    }
}

#[test]
fn test_adopt_generated_rejects_empty_result() {
    let mut session = session_with(vec![entry(1, 0, 1000, "a")]);
    let ticket = session.begin_ai_request();

    let result = session.adopt_generated(&ticket, Vec::new(), None);

    assert!(matches!(result, Err(crate::error::SubnovaError::AiEmptyResult(_))));
    // Прежнее состояние не тронуто
    assert_eq!(session.entries().len(), 1);
    assert_eq!(session.source_name(), Some("test.srt"));
}

#[test]
fn test_apply_refined_rejects_count_mismatch() {
    let mut session = session_with(vec![
        entry(1, 0, 1000, "a"),
        entry(2, 1000, 2000, "b"),
        entry(3, 2000, 3000, "c"),
    ]);
    let ticket = session.begin_ai_request();

    let result = session.apply_refined(
        &ticket,
        vec![raw(1, "0", "1", "x"), raw(2, "1", "2", "y")],
    );

    assert!(matches!(
        result,
        Err(crate::error::SubnovaError::AiEntryCountMismatch {
            expected: 3,
            actual: 2
        })
    ));
    assert_eq!(session.entries().len(), 3);
    assert_eq!(session.entries()[0].text, "a");
}

#[test]
fn test_apply_refined_keeps_original_text() {
    let mut session = session_with(vec![entry(1, 0, 1000, "оригинал")]);
    let ticket = session.begin_ai_request();

    session
        .apply_refined(&ticket, vec![raw(1, "0:00.2", "0:01.4", "эхо сервиса")])
        .unwrap();

    // Берутся только тайминги; текст ответа не считается достоверным
    assert_eq!(session.entries()[0].start_ms, 200);
    assert_eq!(session.entries()[0].end_ms, 1400);
    assert_eq!(session.entries()[0].text, "оригинал");

    // Уточнение - обычная правка, её можно отменить
    assert!(session.undo());
    assert_eq!(session.entries()[0].start_ms, 0);
}

#[test]
fn test_stale_ticket_is_rejected() {
    let mut session = session_with(vec![entry(1, 0, 1000, "a")]);
    let ticket = session.begin_ai_request();

    // Пользователь успел внести правку, пока запрос был в полёте
    session.update_field(1, EntryField::Text, "правка");

    let result = session.apply_refined(&ticket, vec![raw(1, "0", "1", "a")]);

    assert!(matches!(result, Err(crate::error::SubnovaError::AiStaleResponse(_))));
    assert_eq!(session.entries()[0].text, "правка");
}

// --- Интеграция с провайдером -----------------------------------------

struct FixedProvider {
    generated: Vec<RawTranscriptEntry>,
    refined: Vec<RawTranscriptEntry>,
}

#[async_trait]
impl TimingProvider for FixedProvider {
    async fn generate_from_media(
        &self,
        _media: Bytes,
        _mime_type: &str,
        _source_text: Option<&str>,
    ) -> crate::error::Result<Vec<RawTranscriptEntry>> {
        Ok(self.generated.clone())
    }

    async fn refine_timings(
        &self,
        _media: Bytes,
        _mime_type: &str,
        _entries: &[SubtitleEntry],
    ) -> crate::error::Result<Vec<RawTranscriptEntry>> {
        Ok(self.refined.clone())
    }
}

#[tokio::test]
async fn test_generate_with_adopts_normalized_entries() {
    let provider = FixedProvider {
        generated: vec![
            raw(1, "0:01.5", "0:03", "первая"),
            raw(2, "0:03", "0:04.25", "вторая"),
        ],
        refined: Vec::new(),
    };

    let mut session = EditorSession::new();
    let count = session
        .generate_with(
            &provider,
            Bytes::from_static(b"fake media"),
            "audio/mpeg",
            Some("текст песни"),
            Some("song.mp3".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(session.entries()[0].start_ms, 1500);
    assert_eq!(session.entries()[1].end_ms, 4250);
    assert_eq!(session.source_name(), Some("song.mp3"));
    // Принятие источника - граница нового документа
    assert!(!session.can_undo());
}

#[tokio::test]
async fn test_refine_with_applies_timings_only() {
    let provider = FixedProvider {
        generated: Vec::new(),
        refined: vec![raw(1, "00:00:00,500", "00:00:01,500", "другое")],
    };

    let mut session = session_with(vec![entry(1, 0, 1000, "текст")]);
    session
        .refine_with(&provider, Bytes::from_static(b"fake media"), "audio/mpeg")
        .await
        .unwrap();

    assert_eq!(session.entries()[0].start_ms, 500);
    assert_eq!(session.entries()[0].end_ms, 1500);
    assert_eq!(session.entries()[0].text, "текст");
}

// --- Черновик ----------------------------------------------------------

#[tokio::test]
async fn test_draft_roundtrip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draft.json");

    let mut session = session_with(vec![entry(1, 1000, 2000, "a")]);
    session.apply_global_offset(250);
    session.apply_end_padding(100);
    session.save_draft(&path).await.unwrap();

    let draft = EditorSession::load_draft(&path).await.unwrap();
    let mut restored = EditorSession::new();
    restored.restore_draft(draft);

    assert_eq!(restored.entries(), session.entries());
    assert_eq!(restored.offset_ms(), 250);
    assert_eq!(restored.end_padding_ms(), 100);
    assert_eq!(restored.source_name(), Some("test.srt"));
}
