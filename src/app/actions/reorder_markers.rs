use super::{rekey_file, ActionKind, EditAction};
use crate::core::{FileKey, LoadedMarkerPack, MarkerId};
use std::collections::HashSet;

/// Richtung einer Verschiebung in der Dateiliste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Richtung Index 0
    Up,
    /// Richtung Listenende
    Down,
}

impl MoveDirection {
    pub fn opposite(self) -> Self {
        match self {
            MoveDirection::Up => MoveDirection::Down,
            MoveDirection::Down => MoveDirection::Up,
        }
    }
}

/// Verschiebt jeden selektierten Marker um eine Position.
///
/// Die Selektion wird nach aktuellem Index verarbeitet (aufsteigend für `Up`,
/// absteigend für `Down`). Ein Marker, der an der Listengrenze oder an einem
/// blockierten selektierten Nachbarn steht, bleibt stehen. Gibt die tatsächlich
/// bewegten Marker zurück.
pub(crate) fn shift_markers(
    list: &mut [MarkerId],
    selection: &[MarkerId],
    direction: MoveDirection,
) -> Vec<MarkerId> {
    let selection: HashSet<MarkerId> = selection.iter().copied().collect();
    let mut indices: Vec<usize> = list
        .iter()
        .enumerate()
        .filter(|(_, id)| selection.contains(*id))
        .map(|(index, _)| index)
        .collect();
    let mut moved = Vec::new();

    match direction {
        MoveDirection::Up => {
            let mut floor = 0;
            for index in indices {
                if index > floor {
                    list.swap(index - 1, index);
                    moved.push(list[index - 1]);
                    floor = index;
                } else {
                    floor = index + 1;
                }
            }
        }
        MoveDirection::Down => {
            indices.reverse();
            let Some(mut ceiling) = list.len().checked_sub(1) else {
                return moved;
            };
            for index in indices {
                if index < ceiling {
                    list.swap(index, index + 1);
                    moved.push(list[index + 1]);
                    ceiling = index;
                } else {
                    ceiling = index.saturating_sub(1);
                }
            }
        }
    }

    moved
}

/// Ob mindestens ein selektierter Marker in `direction` bewegt werden könnte.
pub(crate) fn can_shift(list: &[MarkerId], selection: &[MarkerId], direction: MoveDirection) -> bool {
    let mut probe = list.to_vec();
    !shift_markers(&mut probe, selection, direction).is_empty()
}

/// Verschiebt Marker innerhalb einer Dateiliste um eine Position.
///
/// Undo bewegt genau die Marker zurück, die sich beim Ausführen bewegt haben.
/// Ein Schritt an der Listengrenze ist kein Fehler, sondern ein No-op.
#[derive(Debug)]
pub struct ReorderMarkersAction {
    file: FileKey,
    targets: Vec<MarkerId>,
    direction: MoveDirection,
    moved: Vec<MarkerId>,
}

impl ReorderMarkersAction {
    pub fn new(file: FileKey, targets: Vec<MarkerId>, direction: MoveDirection) -> Self {
        Self {
            file,
            targets,
            direction,
            moved: Vec::new(),
        }
    }
}

impl EditAction for ReorderMarkersAction {
    fn execute(&mut self, pack: &mut LoadedMarkerPack) -> bool {
        let Some(list) = pack.marker_list_mut(&self.file) else {
            return false;
        };
        self.moved = shift_markers(list, &self.targets, self.direction);
        true
    }

    fn undo(&mut self, pack: &mut LoadedMarkerPack) -> bool {
        let Some(list) = pack.marker_list_mut(&self.file) else {
            return false;
        };
        shift_markers(list, &self.moved, self.direction.opposite());
        true
    }

    fn kind(&self) -> ActionKind {
        ActionKind::ReorderMarkers
    }

    fn rename_file(&mut self, old: &FileKey, new: &FileKey) {
        rekey_file(&mut self.file, old, new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<MarkerId> {
        raw.iter().map(|r| MarkerId::new(*r)).collect()
    }

    #[test]
    fn up_moves_block_past_unselected_neighbour() {
        let mut list = ids(&[0, 1, 2, 3]);
        let moved = shift_markers(&mut list, &ids(&[1, 2]), MoveDirection::Up);
        assert_eq!(list, ids(&[1, 2, 0, 3]));
        assert_eq!(moved, ids(&[1, 2]));
    }

    #[test]
    fn blocked_block_at_top_stays() {
        let mut list = ids(&[0, 1, 2, 3]);
        let moved = shift_markers(&mut list, &ids(&[0, 1, 3]), MoveDirection::Up);
        assert_eq!(list, ids(&[0, 1, 3, 2]));
        assert_eq!(moved, ids(&[3]));
    }

    #[test]
    fn down_is_symmetric() {
        let mut list = ids(&[0, 1, 2, 3]);
        let moved = shift_markers(&mut list, &ids(&[0, 2, 3]), MoveDirection::Down);
        assert_eq!(list, ids(&[1, 0, 2, 3]));
        assert_eq!(moved, ids(&[0]));
    }

    #[test]
    fn moving_back_the_moved_markers_restores_order() {
        let original = ids(&[0, 1, 2, 3, 4, 5]);
        let mut list = original.clone();
        let moved = shift_markers(&mut list, &ids(&[0, 2, 3, 5]), MoveDirection::Up);
        shift_markers(&mut list, &moved, MoveDirection::Down);
        assert_eq!(list, original);
    }

    #[test]
    fn can_shift_reports_boundaries() {
        let list = ids(&[0, 1, 2]);
        assert!(!can_shift(&list, &ids(&[0]), MoveDirection::Up));
        assert!(can_shift(&list, &ids(&[0]), MoveDirection::Down));
        assert!(!can_shift(&list, &ids(&[1, 2]), MoveDirection::Down));
        assert!(!can_shift(&list, &[], MoveDirection::Up));
        assert!(!can_shift(&[], &ids(&[0]), MoveDirection::Down));
    }
}
