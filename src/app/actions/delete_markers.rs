use super::{rekey_file, ActionKind, EditAction};
use crate::core::{CategoryId, FileKey, LoadedMarkerPack, MarkerId};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy)]
struct RemovedMarker {
    marker: MarkerId,
    index: usize,
    category: Option<CategoryId>,
    was_added: bool,
}

/// Entfernt Marker aus der Liste einer Datei.
///
/// Alle Indizes werden vor der ersten Änderung erfasst. Entfernt wird absteigend,
/// wieder eingefügt aufsteigend, dadurch landet jeder Marker beim Undo exakt an
/// seinem alten Index.
#[derive(Debug)]
pub struct DeleteMarkersAction {
    file: FileKey,
    targets: Vec<MarkerId>,
    removed: Vec<RemovedMarker>,
}

impl DeleteMarkersAction {
    pub fn new(file: FileKey, targets: Vec<MarkerId>) -> Self {
        Self {
            file,
            targets,
            removed: Vec::new(),
        }
    }
}

impl EditAction for DeleteMarkersAction {
    fn execute(&mut self, pack: &mut LoadedMarkerPack) -> bool {
        let targets: HashSet<MarkerId> = self.targets.iter().copied().collect();
        let list = pack.markers_in(&self.file);
        let mut removed: Vec<RemovedMarker> = list
            .iter()
            .enumerate()
            .filter(|(_, id)| targets.contains(*id))
            .map(|(index, id)| RemovedMarker {
                marker: *id,
                index,
                category: None,
                was_added: false,
            })
            .collect();
        if removed.is_empty() {
            return false;
        }

        removed.sort_by(|a, b| b.index.cmp(&a.index));
        for entry in &mut removed {
            if let Some(list) = pack.marker_list_mut(&self.file) {
                list.remove(entry.index);
            }
            entry.category = pack.categories().category_of(entry.marker);
            if let Some(category) = entry.category {
                pack.categories_mut().unfile_marker(category, entry.marker);
            }
            entry.was_added = pack.added_mut().shift_remove(&entry.marker);
            if !entry.was_added {
                pack.deleted_mut().insert(entry.marker);
            }
        }

        self.removed = removed;
        true
    }

    fn undo(&mut self, pack: &mut LoadedMarkerPack) -> bool {
        if self.removed.is_empty() {
            return false;
        }

        self.removed.sort_by_key(|entry| entry.index);
        for entry in &self.removed {
            if let Some(list) = pack.marker_list_mut(&self.file) {
                let at = entry.index.min(list.len());
                list.insert(at, entry.marker);
            }

            let category = entry
                .category
                .filter(|c| pack.categories().get(*c).is_some());
            match category {
                Some(category) => {
                    pack.categories_mut().file_marker(category, entry.marker);
                }
                None => {
                    pack.file_marker_by_type(entry.marker);
                }
            }

            // Wurde das Löschen inzwischen gespeichert, ist das Wiederherstellen ein neues Add
            if entry.was_added || !pack.deleted_mut().shift_remove(&entry.marker) {
                pack.added_mut().insert(entry.marker);
            }
        }
        true
    }

    fn kind(&self) -> ActionKind {
        ActionKind::DeleteMarkers
    }

    fn rename_file(&mut self, old: &FileKey, new: &FileKey) {
        rekey_file(&mut self.file, old, new);
    }
}
