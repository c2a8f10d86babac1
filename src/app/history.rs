use super::actions::{ActionKind, EditAction};
use crate::core::{FileKey, LoadedMarkerPack};
use crate::shared::options::HISTORY_DEPTH;

/// Undo/Redo-Manager über umkehrbare Edit-Actions.
///
/// Eine Action landet nur auf dem Undo-Stack, wenn ihr `execute` erfolgreich war.
/// Jede neue Action leert den Redo-Stack.
pub struct EditHistory {
    undo_stack: Vec<Box<dyn EditAction>>,
    redo_stack: Vec<Box<dyn EditAction>>,
    max_depth: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new_with_capacity(HISTORY_DEPTH)
    }
}

impl std::fmt::Debug for EditHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditHistory")
            .field("undo", &self.undo_stack.len())
            .field("redo", &self.redo_stack.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl EditHistory {
    /// Erstellt einen neuen History-Manager mit maximaler Tiefe.
    pub fn new_with_capacity(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            undo_stack: Vec::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Führt eine Action aus und merkt sie bei Erfolg für Undo vor.
    ///
    /// Gibt zurück, ob die Action etwas verändert hat.
    pub fn apply(&mut self, mut action: Box<dyn EditAction>, pack: &mut LoadedMarkerPack) -> bool {
        if !action.execute(pack) {
            log::debug!("Action ohne Wirkung verworfen: {:?}", action.kind());
            return false;
        }
        Self::push_bounded(&mut self.undo_stack, action, self.max_depth);
        self.redo_stack.clear();
        true
    }

    /// Macht die zuletzt ausgeführte Action rückgängig. Leerer Stack = No-op.
    pub fn undo(&mut self, pack: &mut LoadedMarkerPack) -> bool {
        let Some(mut action) = self.undo_stack.pop() else {
            return false;
        };
        // Eine fehlgeschlagene Action wird verworfen, sie hätte auch später keine Wirkung
        if !action.undo(pack) {
            log::warn!("Undo fehlgeschlagen, Action verworfen: {:?}", action);
            return false;
        }
        Self::push_bounded(&mut self.redo_stack, action, self.max_depth);
        true
    }

    /// Führt die zuletzt rückgängig gemachte Action erneut aus. Leerer Stack = No-op.
    pub fn redo(&mut self, pack: &mut LoadedMarkerPack) -> bool {
        let Some(mut action) = self.redo_stack.pop() else {
            return false;
        };
        if !action.execute(pack) {
            log::warn!("Redo fehlgeschlagen, Action verworfen: {:?}", action);
            return false;
        }
        Self::push_bounded(&mut self.undo_stack, action, self.max_depth);
        true
    }

    /// Art der obersten Undo-Action (für "letztes Hinzufügen rückgängig").
    pub fn peek_last_kind(&self) -> Option<ActionKind> {
        self.undo_stack.last().map(|action| action.kind())
    }

    /// Zieht alle gemerkten Actions auf einen umbenannten Dateischlüssel nach.
    pub fn rename_file(&mut self, old: &FileKey, new: &FileKey) {
        for action in self.undo_stack.iter_mut().chain(self.redo_stack.iter_mut()) {
            action.rename_file(old, new);
        }
    }

    /// Verwirft beide Stacks (Workspace-Wechsel, Revert).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Prüft ob Undo möglich ist.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Prüft ob Redo möglich ist.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Ändert die maximale Tiefe; überzählige älteste Einträge fallen sofort heraus.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth.max(1);
        for stack in [&mut self.undo_stack, &mut self.redo_stack] {
            let excess = stack.len().saturating_sub(self.max_depth);
            stack.drain(..excess);
        }
    }

    fn push_bounded(stack: &mut Vec<Box<dyn EditAction>>, action: Box<dyn EditAction>, max_depth: usize) {
        if stack.len() >= max_depth {
            stack.remove(0);
        }
        stack.push(action);
    }
}
