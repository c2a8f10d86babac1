//! Kategorie-Baum eines Workspaces.
//!
//! Der Baum entsteht aus `<MarkerCategory>`-Deklarationen aller Dateien und aus
//! den punktierten `type`-Pfaden der Marker. Knoten liegen in einer Arena und
//! werden über `CategoryId` referenziert; Marker-Zugehörigkeit ist ungeordnet.

use super::file_key::fold_case;
use super::{FileKey, MarkerId};
use indexmap::IndexSet;

/// Handle eines Knotens im `CategoryTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(usize);

/// Eine Kategorie-Deklaration, wie sie aus einer Datei gelesen wurde.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryDeclaration {
    /// Interner Name (`name`-Attribut)
    pub name: String,
    /// `DisplayName`-Attribut, falls vorhanden
    pub display_name: Option<String>,
    /// `IsSeparator="1"`
    pub is_separator: bool,
    /// Alle Attribute in Original-Reihenfolge (Durchreichen)
    pub attributes: Vec<(String, String)>,
    /// Verschachtelte Deklarationen
    pub children: Vec<CategoryDeclaration>,
}

/// Ein Knoten im Kategorie-Baum.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// Stabiler interner Name (Vergleich case-insensitiv)
    pub internal_name: String,
    /// Anzeigename
    pub display_name: String,
    /// Trenner-Eintrag im Menü
    pub is_separator: bool,
    /// Explizit per `<MarkerCategory>` deklariert (nicht nur aus `type` abgeleitet)
    pub is_definition: bool,
    /// Attribute der letzten Deklaration
    pub attributes: Vec<(String, String)>,
    /// Datei der letzten Deklaration
    pub source_file: Option<FileKey>,
    parent: Option<CategoryId>,
    children: Vec<CategoryId>,
    markers: IndexSet<MarkerId>,
}

impl Category {
    fn new(internal_name: &str, display_name: &str, parent: Option<CategoryId>) -> Self {
        Self {
            internal_name: internal_name.to_string(),
            display_name: display_name.to_string(),
            is_separator: false,
            is_definition: false,
            attributes: Vec::new(),
            source_file: None,
            parent,
            children: Vec::new(),
            markers: IndexSet::new(),
        }
    }

    pub fn parent(&self) -> Option<CategoryId> {
        self.parent
    }

    /// Direkte Unterkategorien in Einfüge-Reihenfolge.
    pub fn children(&self) -> &[CategoryId] {
        &self.children
    }

    /// Direkt einsortierte Marker (ohne Nachfahren).
    pub fn markers(&self) -> impl Iterator<Item = MarkerId> + '_ {
        self.markers.iter().copied()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn contains_marker(&self, marker: MarkerId) -> bool {
        self.markers.contains(&marker)
    }
}

/// Arena-basierter Kategorie-Baum mit synthetischer Root.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTree {
    nodes: Vec<Option<Category>>,
}

impl CategoryTree {
    const ROOT: CategoryId = CategoryId(0);

    /// Erstellt einen Baum, der nur die synthetische Root enthält.
    pub fn new(root_display_name: &str) -> Self {
        Self {
            nodes: vec![Some(Category::new("root", root_display_name, None))],
        }
    }

    pub fn root(&self) -> CategoryId {
        Self::ROOT
    }

    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: CategoryId) -> Option<&mut Category> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Anzahl lebender Knoten inkl. Root.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Sucht eine direkte Unterkategorie per case-insensitivem Namen.
    pub fn find_child(&self, parent: CategoryId, name: &str) -> Option<CategoryId> {
        let parent = self.get(parent)?;
        let name = fold_case(name);
        parent.children.iter().copied().find(|child| {
            self.get(*child)
                .is_some_and(|c| fold_case(&c.internal_name) == name)
        })
    }

    /// Vollständiger punktierter Name ohne die synthetische Root.
    pub fn full_name(&self, id: CategoryId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(cid) = current {
            let Some(category) = self.get(cid) else {
                break;
            };
            if category.parent.is_none() {
                break;
            }
            segments.push(category.internal_name.as_str());
            current = category.parent;
        }
        segments.reverse();
        segments.join(".")
    }

    /// Führt eine Deklaration rekursiv unter `parent` ein.
    ///
    /// Existiert der Name bereits (case-insensitiv), bleibt der Knoten erhalten
    /// und nur Anzeigename, Trenner-Flag, Attribute und Quelldatei werden
    /// überschrieben. Namenlose Deklarationen werden samt Kindern ignoriert.
    pub fn merge_declaration(
        &mut self,
        parent: CategoryId,
        declaration: &CategoryDeclaration,
        source_file: &FileKey,
    ) -> Option<CategoryId> {
        if declaration.name.is_empty() {
            return None;
        }

        let id = match self.find_child(parent, &declaration.name) {
            Some(existing) => existing,
            None => self.insert_child(parent, &declaration.name, &declaration.name)?,
        };

        if let Some(category) = self.get_mut(id) {
            category.is_definition = true;
            category.source_file = Some(source_file.clone());
            category.display_name = declaration
                .display_name
                .clone()
                .unwrap_or_else(|| declaration.name.clone());
            category.is_separator = declaration.is_separator;
            category.attributes = declaration.attributes.clone();
        }

        for child in &declaration.children {
            self.merge_declaration(id, child, source_file);
        }

        Some(id)
    }

    /// Sucht eine Kategorie über ihren punktierten Pfad. Leer = Root.
    pub fn find_by_path(&self, path: &str) -> Option<CategoryId> {
        let mut current = self.root();
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            current = self.find_child(current, segment)?;
        }
        Some(current)
    }

    /// Sucht oder erzeugt die Kategorie zu einem punktierten Pfad.
    ///
    /// Fehlende Segmente werden als einfache (nicht-Trenner) Kategorien angelegt.
    /// Zurückgegeben werden Ziel und die neu erzeugten Knoten (in Anlege-Reihenfolge).
    pub fn find_or_create_by_path(&mut self, path: &str) -> (CategoryId, Vec<CategoryId>) {
        let mut created = Vec::new();
        let mut current = self.root();
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            current = match self.find_child(current, segment) {
                Some(next) => next,
                None => match self.insert_child(current, segment, segment) {
                    Some(next) => {
                        created.push(next);
                        next
                    }
                    None => break,
                },
            };
        }
        (current, created)
    }

    /// Sortiert einen Marker direkt in eine Kategorie ein.
    pub fn file_marker(&mut self, category: CategoryId, marker: MarkerId) -> bool {
        match self.get_mut(category) {
            Some(c) => c.markers.insert(marker),
            None => false,
        }
    }

    /// Entfernt einen Marker aus einer Kategorie.
    pub fn unfile_marker(&mut self, category: CategoryId, marker: MarkerId) -> bool {
        match self.get_mut(category) {
            Some(c) => c.markers.shift_remove(&marker),
            None => false,
        }
    }

    /// Findet die Kategorie, in der ein Marker direkt einsortiert ist.
    pub fn category_of(&self, marker: MarkerId) -> Option<CategoryId> {
        self.nodes
            .iter()
            .enumerate()
            .find(|(_, node)| node.as_ref().is_some_and(|c| c.markers.contains(&marker)))
            .map(|(index, _)| CategoryId(index))
    }

    /// Alle Knoten ab `start` in Tiefensuche (inkl. `start`).
    pub fn descendants(&self, start: CategoryId) -> Vec<CategoryId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(category) = self.get(id) else {
                continue;
            };
            result.push(id);
            stack.extend(category.children.iter().rev().copied());
        }
        result
    }

    /// Alle Marker in `start` und allen Nachfahren.
    pub fn markers_recursive(&self, start: CategoryId) -> Vec<MarkerId> {
        self.descendants(start)
            .into_iter()
            .filter_map(|id| self.get(id))
            .flat_map(|c| c.markers.iter().copied())
            .collect()
    }

    /// Entfernt einen leeren Blatt-Knoten wieder (Undo einer Auto-Anlage).
    ///
    /// Knoten mit Markern oder Kindern sowie die Root bleiben stehen.
    pub(crate) fn remove_if_unused(&mut self, id: CategoryId) -> bool {
        let parent = match self.get(id) {
            Some(c) if c.markers.is_empty() && c.children.is_empty() => c.parent,
            _ => return false,
        };
        let Some(parent) = parent else {
            return false;
        };

        if let Some(parent) = self.get_mut(parent) {
            parent.children.retain(|child| *child != id);
        }

        if id.0 + 1 == self.nodes.len() {
            self.nodes.pop();
        } else {
            self.nodes[id.0] = None;
        }
        true
    }

    fn insert_child(
        &mut self,
        parent: CategoryId,
        internal_name: &str,
        display_name: &str,
    ) -> Option<CategoryId> {
        self.get(parent)?;
        let id = CategoryId(self.nodes.len());
        self.nodes
            .push(Some(Category::new(internal_name, display_name, Some(parent))));
        if let Some(parent) = self.get_mut(parent) {
            parent.children.push(id);
        }
        Some(id)
    }
}
