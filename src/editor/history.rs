//! История правок: линейная последовательность полных снимков списка
//! субтитров с курсором для отмены и повтора.

use crate::subtitle::SubtitleEntry;

/// История снимков с курсором.
///
/// Создаётся с одним снимком (возможно пустым) при принятии нового
/// источника. Каждая принятая правка добавляет снимок после курсора,
/// отбрасывая хвост повтора. Отмена и повтор двигают только курсор.
#[derive(Debug, Clone)]
pub struct EditHistory {
    snapshots: Vec<Vec<SubtitleEntry>>,
    cursor: usize,
}

impl EditHistory {
    /// Создаёт историю с одним начальным снимком
    pub fn new(initial: Vec<SubtitleEntry>) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// Текущий снимок
    pub fn current(&self) -> &[SubtitleEntry] {
        &self.snapshots[self.cursor]
    }

    /// Добавляет снимок после курсора, отбрасывая хвост повтора.
    ///
    /// Снимок, совпадающий с текущим, не записывается: операция,
    /// ничего не изменившая, не должна попадать в историю.
    /// Возвращает `true`, если снимок был записан.
    pub fn push(&mut self, snapshot: Vec<SubtitleEntry>) -> bool {
        if snapshot == self.snapshots[self.cursor] {
            return false;
        }

        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor += 1;
        true
    }

    /// Возможна ли отмена
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Возможен ли повтор
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Отмена: сдвигает курсор назад. Возвращает `true` при успехе.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Повтор: сдвигает курсор вперёд. Возвращает `true` при успехе.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Сбрасывает историю к одному новому снимку.
    /// Это явная граница "нового документа": прежняя история отбрасывается.
    pub fn reset(&mut self, initial: Vec<SubtitleEntry>) {
        self.snapshots = vec![initial];
        self.cursor = 0;
    }
}
