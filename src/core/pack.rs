//! Der geöffnete Workspace: alle Marker, Kategorien und Dokumente eines Packs.

use super::{CategoryId, CategoryTree, FileKey, Marker, MarkerId};
use crate::xml::{XmlDocument, XmlNode};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Herkunft eines Workspaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackSourceKind {
    /// Einzelne XML-Datei
    SingleFile,
    /// Ordner mit XML-Dateien (rekursiv)
    Directory,
    /// `.taco`/`.zip`-Archiv (nur lesbar, Speichern nur per "Speichern unter")
    Archive,
    /// Neu angelegtes Dokument ohne Speicherort
    #[default]
    InMemory,
}

/// Container für ein geöffnetes Marker-Pack.
///
/// Die Marker liegen in einer Arena (`MarkerId` → `Marker`). Die Listen pro Datei
/// sind die maßgebliche Reihenfolge für das Speichern, der Kategorie-Baum ist eine
/// zweite, ungeordnete Sicht auf dieselben Marker. Gelöschte Marker bleiben in der
/// Arena, damit Undo sie wieder einhängen kann.
#[derive(Debug, Clone)]
pub struct LoadedMarkerPack {
    workspace_path: Option<PathBuf>,
    source_kind: PackSourceKind,
    categories: CategoryTree,
    original_content: IndexMap<FileKey, Vec<u8>>,
    documents: IndexMap<FileKey, XmlDocument>,
    markers: HashMap<MarkerId, Marker>,
    next_marker_id: u64,
    markers_by_file: IndexMap<FileKey, Vec<MarkerId>>,
    unmanaged: IndexMap<FileKey, Vec<XmlNode>>,
    added: IndexSet<MarkerId>,
    deleted: IndexSet<MarkerId>,
}

impl LoadedMarkerPack {
    /// Erstellt ein leeres Pack. Die Root-Kategorie wird nach dem Pfad benannt.
    pub fn new(workspace_path: Option<PathBuf>, source_kind: PackSourceKind) -> Self {
        let root_name = workspace_path
            .as_deref()
            .and_then(Path::file_stem)
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "root".to_string());

        Self {
            workspace_path,
            source_kind,
            categories: CategoryTree::new(&root_name),
            original_content: IndexMap::new(),
            documents: IndexMap::new(),
            markers: HashMap::new(),
            next_marker_id: 1,
            markers_by_file: IndexMap::new(),
            unmanaged: IndexMap::new(),
            added: IndexSet::new(),
            deleted: IndexSet::new(),
        }
    }

    pub fn workspace_path(&self) -> Option<&Path> {
        self.workspace_path.as_deref()
    }

    pub fn source_kind(&self) -> PackSourceKind {
        self.source_kind
    }

    pub fn is_archive(&self) -> bool {
        self.source_kind == PackSourceKind::Archive
    }

    pub fn categories(&self) -> &CategoryTree {
        &self.categories
    }

    pub fn categories_mut(&mut self) -> &mut CategoryTree {
        &mut self.categories
    }

    // ── Dokumente ───────────────────────────────────────────────────

    /// Alle erfolgreich geparsten Dokumente, alphabetisch sortiert.
    pub fn document_keys(&self) -> Vec<FileKey> {
        let mut keys: Vec<FileKey> = self.documents.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn has_document(&self, key: &FileKey) -> bool {
        self.documents.contains_key(key)
    }

    pub fn document(&self, key: &FileKey) -> Option<&XmlDocument> {
        self.documents.get(key)
    }

    pub fn document_mut(&mut self, key: &FileKey) -> Option<&mut XmlDocument> {
        self.documents.get_mut(key)
    }

    /// Registriert ein geparstes Dokument samt nicht verwalteter POI-Knoten.
    ///
    /// Die Markerliste der Datei wird angelegt (leer), falls sie noch fehlt.
    pub fn insert_document(&mut self, key: FileKey, document: XmlDocument, unmanaged: Vec<XmlNode>) {
        self.markers_by_file.entry(key.clone()).or_default();
        self.unmanaged.insert(key.clone(), unmanaged);
        self.documents.insert(key, document);
    }

    /// Nicht verwaltete Knoten aus dem POI-Container einer Datei.
    pub fn unmanaged_nodes(&self, key: &FileKey) -> &[XmlNode] {
        self.unmanaged.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Original-Bytes einer Datei (Stand des letzten Ladens/Speicherns).
    pub fn original_content(&self, key: &FileKey) -> Option<&[u8]> {
        self.original_content.get(key).map(Vec::as_slice)
    }

    pub fn set_original_content(&mut self, key: FileKey, bytes: Vec<u8>) {
        self.original_content.insert(key, bytes);
    }

    /// Anzahl aller Rohdateien (auch Nicht-XML, z.B. Icons aus Archiven).
    pub fn raw_file_count(&self) -> usize {
        self.original_content.len()
    }

    // ── Marker ──────────────────────────────────────────────────────

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(&id)
    }

    pub fn marker_mut(&mut self, id: MarkerId) -> Option<&mut Marker> {
        self.markers.get_mut(&id)
    }

    /// Legt einen Marker in der Arena an, ohne ihn in Listen oder Baum einzuhängen.
    pub fn allocate_marker(&mut self, marker: Marker) -> MarkerId {
        let id = MarkerId::new(self.next_marker_id);
        self.next_marker_id += 1;
        self.markers.insert(id, marker);
        id
    }

    /// Gibt einen Arena-Eintrag wieder frei, den keine Dateiliste und keine Tracking-Menge kennt.
    pub fn release_marker(&mut self, id: MarkerId) -> Option<Marker> {
        let referenced = self.added.contains(&id)
            || self.deleted.contains(&id)
            || self.markers_by_file.values().any(|list| list.contains(&id));
        if referenced {
            return None;
        }
        self.markers.remove(&id)
    }

    /// Maßgebliche Marker-Reihenfolge einer Datei.
    pub fn markers_in(&self, key: &FileKey) -> &[MarkerId] {
        self.markers_by_file.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iteriert die Marker einer Datei in Speicher-Reihenfolge.
    pub fn iter_markers_in<'a>(&'a self, key: &FileKey) -> impl Iterator<Item = &'a Marker> + 'a {
        let ids = self.markers_in(key);
        ids.iter().filter_map(move |id| self.markers.get(id))
    }

    pub(crate) fn marker_list_mut(&mut self, key: &FileKey) -> Option<&mut Vec<MarkerId>> {
        self.markers_by_file.get_mut(key)
    }

    /// Index eines Markers in der Liste seiner Datei.
    pub fn index_of(&self, key: &FileKey, id: MarkerId) -> Option<usize> {
        self.markers_in(key).iter().position(|m| *m == id)
    }

    /// Gesamtzahl der aktuell in Dateilisten stehenden Marker.
    pub fn marker_count(&self) -> usize {
        self.markers_by_file.values().map(Vec::len).sum()
    }

    /// Sortiert einen Marker gemäß seinem `type` in den Baum ein.
    ///
    /// Gibt die Zielkategorie und alle dabei neu angelegten Kategorien zurück.
    pub(crate) fn file_marker_by_type(&mut self, id: MarkerId) -> Option<(CategoryId, Vec<CategoryId>)> {
        let marker_type = self.markers.get(&id)?.marker_type().to_string();
        let (category, created) = self.categories.find_or_create_by_path(&marker_type);
        self.categories.file_marker(category, id);
        Some((category, created))
    }

    // ── Änderungs-Tracking ──────────────────────────────────────────

    /// Seit dem letzten Speichern hinzugefügte Marker.
    pub fn added_markers(&self) -> &IndexSet<MarkerId> {
        &self.added
    }

    /// Seit dem letzten Speichern gelöschte Marker.
    pub fn deleted_markers(&self) -> &IndexSet<MarkerId> {
        &self.deleted
    }

    pub(crate) fn added_mut(&mut self) -> &mut IndexSet<MarkerId> {
        &mut self.added
    }

    pub(crate) fn deleted_mut(&mut self) -> &mut IndexSet<MarkerId> {
        &mut self.deleted
    }

    fn belongs_to(&self, id: &MarkerId, key: &FileKey) -> bool {
        self.markers
            .get(id)
            .is_some_and(|m| m.source_file() == key)
    }

    /// Ob eine Datei ungespeicherte Änderungen hat.
    ///
    /// Wahr, wenn ein Marker der Datei in der Added- oder Deleted-Menge steht oder
    /// ein Marker ihrer Liste das Dirty-Flag trägt.
    pub fn has_unsaved_changes(&self, key: &FileKey) -> bool {
        self.added.iter().any(|id| self.belongs_to(id, key))
            || self.deleted.iter().any(|id| self.belongs_to(id, key))
            || self.iter_markers_in(key).any(Marker::is_dirty)
    }

    /// Alle Dokumente mit ungespeicherten Änderungen (sortiert).
    pub fn unsaved_documents(&self) -> Vec<FileKey> {
        let mut keys: Vec<FileKey> = self
            .markers_by_file
            .keys()
            .filter(|key| self.has_unsaved_changes(key))
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Setzt den Änderungszustand einer Datei zurück (nach Speichern oder Verwerfen).
    pub fn clear_unsaved_state(&mut self, key: &FileKey) {
        let markers = &self.markers;
        let belongs = |id: &MarkerId| markers.get(id).is_some_and(|m| m.source_file() == key);
        self.added.retain(|id| !belongs(id));
        self.deleted.retain(|id| !belongs(id));

        if let Some(ids) = self.markers_by_file.get(key) {
            for id in ids {
                if let Some(marker) = self.markers.get_mut(id) {
                    marker.clear_dirty();
                }
            }
        }
    }

    /// Entfernt alle Marker einer Datei aus Liste, Baum, Tracking-Mengen und Arena.
    ///
    /// Dokument, Original-Bytes und Kategorien bleiben bestehen (Revert spleißt danach
    /// die neu geparste Liste ein).
    pub fn discard_file_markers(&mut self, key: &FileKey) {
        let mut doomed: Vec<MarkerId> = self.markers_in(key).to_vec();
        doomed.extend(
            self.added
                .iter()
                .chain(self.deleted.iter())
                .filter(|id| self.belongs_to(id, key))
                .copied(),
        );

        for id in &doomed {
            if let Some(category) = self.categories.category_of(*id) {
                self.categories.unfile_marker(category, *id);
            }
            self.added.shift_remove(id);
            self.deleted.shift_remove(id);
            self.markers.remove(id);
        }

        if let Some(list) = self.markers_by_file.get_mut(key) {
            list.clear();
        }
    }

    /// Benennt ein Dokument um (Save-As) und hängt alle seine Marker um.
    ///
    /// Schlägt fehl, wenn `old` fehlt oder `new` bereits von einem anderen Dokument belegt ist.
    pub fn rename_document(&mut self, old: &FileKey, new: FileKey) -> bool {
        if !self.documents.contains_key(old) {
            return false;
        }
        if old != &new && self.documents.contains_key(&new) {
            return false;
        }

        fn rekey<V>(map: &mut IndexMap<FileKey, V>, old: &FileKey, new: &FileKey) {
            if let Some(index) = map.get_index_of(old) {
                if let Some((_, value)) = map.shift_remove_index(index) {
                    map.shift_insert(index, new.clone(), value);
                }
            }
        }

        rekey(&mut self.documents, old, &new);
        rekey(&mut self.markers_by_file, old, &new);
        rekey(&mut self.unmanaged, old, &new);
        rekey(&mut self.original_content, old, &new);

        for marker in self.markers.values_mut() {
            if marker.source_file() == old {
                marker.set_source_file(new.clone());
            }
        }
        for category in self.categories.descendants(self.categories.root()) {
            if let Some(c) = self.categories.get_mut(category) {
                if c.source_file.as_ref() == Some(old) {
                    c.source_file = Some(new.clone());
                }
            }
        }
        true
    }
}
