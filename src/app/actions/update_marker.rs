use super::{ActionKind, EditAction};
use crate::core::{CategoryId, LoadedMarkerPack, MarkerFields, MarkerId};

#[derive(Debug)]
struct Refiling {
    from: CategoryId,
    to: CategoryId,
    created: Vec<CategoryId>,
}

/// Ändert die editierbaren Felder eines Markers (Map-ID, Position, Typ).
///
/// Ein geänderter Typ sortiert den Marker in die passende Kategorie um. Undo stellt
/// Felder, Kategorie und das vorherige Dirty-Flag wieder her.
#[derive(Debug)]
pub struct UpdateMarkerAction {
    marker: MarkerId,
    after: MarkerFields,
    before: Option<MarkerFields>,
    was_dirty: bool,
    refiling: Option<Refiling>,
}

impl UpdateMarkerAction {
    pub fn new(marker: MarkerId, fields: MarkerFields) -> Self {
        Self {
            marker,
            after: fields,
            before: None,
            was_dirty: false,
            refiling: None,
        }
    }
}

impl EditAction for UpdateMarkerAction {
    fn execute(&mut self, pack: &mut LoadedMarkerPack) -> bool {
        let Some(marker) = pack.marker_mut(self.marker) else {
            return false;
        };
        let before = marker.fields();
        if before == self.after {
            return false;
        }

        self.was_dirty = marker.is_dirty();
        marker.apply_fields(&self.after);
        let type_changed = before.marker_type != self.after.marker_type;
        self.before = Some(before);

        self.refiling = None;
        if type_changed {
            if let Some(from) = pack.categories().category_of(self.marker) {
                pack.categories_mut().unfile_marker(from, self.marker);
                if let Some((to, created)) = pack.file_marker_by_type(self.marker) {
                    self.refiling = Some(Refiling {
                        from,
                        to,
                        created,
                    });
                }
            }
        }
        true
    }

    fn undo(&mut self, pack: &mut LoadedMarkerPack) -> bool {
        let Some(before) = self.before.take() else {
            return false;
        };
        let Some(marker) = pack.marker_mut(self.marker) else {
            return false;
        };
        // Ohne Dirty-Flag wurde der geänderte Stand inzwischen gespeichert
        let saved_since = marker.is_tracking_changes() && !marker.is_dirty();
        marker.apply_fields(&before);
        marker.restore_dirty(self.was_dirty || saved_since);

        if let Some(refiling) = self.refiling.take() {
            let categories = pack.categories_mut();
            categories.unfile_marker(refiling.to, self.marker);
            for category in refiling.created.into_iter().rev() {
                categories.remove_if_unused(category);
            }
            if categories.get(refiling.from).is_some() {
                categories.file_marker(refiling.from, self.marker);
            } else {
                pack.file_marker_by_type(self.marker);
            }
        }
        true
    }

    fn kind(&self) -> ActionKind {
        ActionKind::ChangeProperties
    }
}
