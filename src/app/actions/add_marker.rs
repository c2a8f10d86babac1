use super::{rekey_file, ActionKind, EditAction};
use crate::core::{CategoryId, FileKey, LoadedMarkerPack, MarkerId};

/// Fügt einen (bereits in der Arena angelegten) Marker in eine Dateiliste ein.
///
/// Ein Index außerhalb der Liste (oder `None`) hängt ans Ende an. Beim Undo werden
/// auch die dabei automatisch angelegten Kategorien wieder entfernt.
#[derive(Debug)]
pub struct AddMarkerAction {
    file: FileKey,
    marker: MarkerId,
    index: Option<usize>,
    category: Option<CategoryId>,
    created_categories: Vec<CategoryId>,
    restored_from_deleted: bool,
}

impl AddMarkerAction {
    pub fn new(file: FileKey, marker: MarkerId, index: Option<usize>) -> Self {
        Self {
            file,
            marker,
            index,
            category: None,
            created_categories: Vec::new(),
            restored_from_deleted: false,
        }
    }

    pub fn marker(&self) -> MarkerId {
        self.marker
    }
}

impl EditAction for AddMarkerAction {
    fn execute(&mut self, pack: &mut LoadedMarkerPack) -> bool {
        if pack.marker(self.marker).is_none() {
            log::warn!("AddMarker: Marker {} nicht in der Arena", self.marker.raw());
            return false;
        }
        let Some(list) = pack.marker_list_mut(&self.file) else {
            log::warn!("AddMarker: Datei {} nicht geladen", self.file);
            return false;
        };
        if list.contains(&self.marker) {
            return false;
        }

        let at = match self.index {
            Some(index) if index <= list.len() => index,
            _ => list.len(),
        };
        list.insert(at, self.marker);

        if let Some((category, created)) = pack.file_marker_by_type(self.marker) {
            self.category = Some(category);
            self.created_categories = created;
        }

        // Redo eines zuvor gelöschten Markers: Deleted-Eintrag aufheben statt doppelt zu führen
        self.restored_from_deleted = pack.deleted_mut().shift_remove(&self.marker);
        if !self.restored_from_deleted {
            pack.added_mut().insert(self.marker);
        }
        true
    }

    fn undo(&mut self, pack: &mut LoadedMarkerPack) -> bool {
        let Some(list) = pack.marker_list_mut(&self.file) else {
            return false;
        };
        let Some(position) = list.iter().position(|m| *m == self.marker) else {
            return false;
        };
        list.remove(position);

        if let Some(category) = self.category.take() {
            pack.categories_mut().unfile_marker(category, self.marker);
        }
        for category in self.created_categories.drain(..).rev() {
            pack.categories_mut().remove_if_unused(category);
        }

        // Ein bereits gespeichertes Add wird beim Undo zum Löschen
        if self.restored_from_deleted || !pack.added_mut().shift_remove(&self.marker) {
            pack.deleted_mut().insert(self.marker);
        }
        true
    }

    fn kind(&self) -> ActionKind {
        ActionKind::AddMarker
    }

    fn rename_file(&mut self, old: &FileKey, new: &FileKey) {
        rekey_file(&mut self.file, old, new);
    }
}
