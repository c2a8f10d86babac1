use crate::core::{FileKey, LoadedMarkerPack, PackSourceKind};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Wohin ein Dokument beim einfachen "Speichern" geschrieben wird.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    /// Bekannter Speicherort
    Path(PathBuf),
    /// Kein Speicherort (Archiv oder neues Dokument) → "Speichern unter" nötig
    NeedsSaveAs { suggested_name: String },
}

/// Ein geöffneter Workspace: das Pack plus das aktuell bearbeitete Dokument.
#[derive(Debug)]
pub struct Workspace {
    /// Alle Dokumente, Marker und Kategorien
    pub pack: LoadedMarkerPack,
    active_document: Option<FileKey>,
    /// Per "Speichern unter" gesetzte Speicherorte (überschreiben die Herkunft)
    save_locations: HashMap<FileKey, PathBuf>,
}

impl Workspace {
    /// Übernimmt ein geladenes Pack. Aktiv ist das alphabetisch erste Dokument.
    pub fn new(pack: LoadedMarkerPack) -> Self {
        let active_document = pack.document_keys().into_iter().next();
        Self {
            pack,
            active_document,
            save_locations: HashMap::new(),
        }
    }

    pub fn active_document(&self) -> Option<&FileKey> {
        self.active_document.as_ref()
    }

    /// Setzt das aktive Dokument. Gibt `false` zurück, wenn es nicht geladen ist.
    pub fn set_active_document(&mut self, key: &FileKey) -> bool {
        if !self.pack.has_document(key) {
            return false;
        }
        self.active_document = Some(key.clone());
        true
    }

    pub fn save_location(&self, key: &FileKey) -> Option<&Path> {
        self.save_locations.get(key).map(PathBuf::as_path)
    }

    pub fn set_save_location(&mut self, key: FileKey, path: PathBuf) {
        self.save_locations.insert(key, path);
    }

    pub(crate) fn forget_save_location(&mut self, key: &FileKey) {
        self.save_locations.remove(key);
    }

    /// Ermittelt das Ziel für "Speichern" eines Dokuments.
    pub fn resolve_save_target(&self, key: &FileKey) -> SaveTarget {
        if let Some(path) = self.save_locations.get(key) {
            return SaveTarget::Path(path.clone());
        }

        match (self.pack.source_kind(), self.pack.workspace_path()) {
            (PackSourceKind::Directory, Some(root)) => SaveTarget::Path(root.join(key.as_str())),
            (PackSourceKind::SingleFile, Some(file)) => SaveTarget::Path(file.to_path_buf()),
            _ => SaveTarget::NeedsSaveAs {
                suggested_name: key.file_name().to_string(),
            },
        }
    }

    /// Leitet den Dateischlüssel für einen neuen Speicherort ab.
    ///
    /// Liegt der Pfad innerhalb eines Ordner-Workspaces, bleibt der relative Pfad
    /// erhalten, sonst zählt nur der Dateiname.
    pub fn key_for_path(&self, path: &Path) -> Option<FileKey> {
        if self.pack.source_kind() == PackSourceKind::Directory {
            if let Some(relative) = self
                .pack
                .workspace_path()
                .and_then(|root| path.strip_prefix(root).ok())
            {
                let relative = relative.to_string_lossy();
                if !relative.is_empty() {
                    return Some(FileKey::new(relative));
                }
            }
        }
        path.file_name()
            .map(|name| FileKey::new(name.to_string_lossy()))
    }

    /// Alle Dokumente mit ungespeicherten Änderungen.
    pub fn unsaved_documents(&self) -> Vec<FileKey> {
        self.pack.unsaved_documents()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlDocument;

    fn workspace(path: Option<&str>, kind: PackSourceKind, keys: &[&str]) -> Workspace {
        let mut pack = LoadedMarkerPack::new(path.map(PathBuf::from), kind);
        for key in keys {
            pack.insert_document(FileKey::new(key), XmlDocument::new_overlay_document(), Vec::new());
        }
        Workspace::new(pack)
    }

    #[test]
    fn first_document_becomes_active() {
        let ws = workspace(Some("/packs/dir"), PackSourceKind::Directory, &["b.xml", "A.xml"]);
        assert_eq!(ws.active_document(), Some(&FileKey::new("a.xml")));
    }

    #[test]
    fn save_target_follows_source_kind() {
        let dir = workspace(Some("/packs/dir"), PackSourceKind::Directory, &["sub/a.xml"]);
        assert_eq!(
            dir.resolve_save_target(&FileKey::new("sub/a.xml")),
            SaveTarget::Path(PathBuf::from("/packs/dir").join("sub/a.xml"))
        );

        let single = workspace(Some("/packs/one.xml"), PackSourceKind::SingleFile, &["one.xml"]);
        assert_eq!(
            single.resolve_save_target(&FileKey::new("one.xml")),
            SaveTarget::Path(PathBuf::from("/packs/one.xml"))
        );

        let archive = workspace(Some("/packs/p.taco"), PackSourceKind::Archive, &["x/pois.xml"]);
        assert_eq!(
            archive.resolve_save_target(&FileKey::new("x/pois.xml")),
            SaveTarget::NeedsSaveAs {
                suggested_name: "pois.xml".to_string()
            }
        );
    }

    #[test]
    fn save_location_overrides_source() {
        let mut ws = workspace(Some("/packs/p.taco"), PackSourceKind::Archive, &["pois.xml"]);
        let key = FileKey::new("pois.xml");
        ws.set_save_location(key.clone(), PathBuf::from("/out/pois.xml"));
        assert_eq!(
            ws.resolve_save_target(&key),
            SaveTarget::Path(PathBuf::from("/out/pois.xml"))
        );
    }

    #[test]
    fn key_for_path_keeps_relative_path_inside_directory() {
        let ws = workspace(Some("/packs/dir"), PackSourceKind::Directory, &["a.xml"]);
        assert_eq!(
            ws.key_for_path(Path::new("/packs/dir/sub/b.xml")),
            Some(FileKey::new("sub/b.xml"))
        );
        assert_eq!(
            ws.key_for_path(Path::new("/elsewhere/c.xml")),
            Some(FileKey::new("c.xml"))
        );
    }

    #[test]
    fn unknown_document_cannot_become_active() {
        let mut ws = workspace(None, PackSourceKind::InMemory, &["a.xml"]);
        assert!(!ws.set_active_document(&FileKey::new("b.xml")));
        assert_eq!(ws.active_document(), Some(&FileKey::new("a.xml")));
    }
}
