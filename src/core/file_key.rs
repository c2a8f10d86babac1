//! Logischer Dateischlüssel innerhalb eines Workspaces.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Relativer Pfad eines Dokuments im Workspace (z.B. `"routes/farm.xml"`).
///
/// Backslashes werden beim Erzeugen zu `/` normalisiert. Gleichheit und Hash
/// sind case-insensitiv, die Original-Schreibweise bleibt für Anzeige und
/// Speichern erhalten.
#[derive(Debug, Clone)]
pub struct FileKey {
    display: String,
    folded: String,
}

/// Case-Faltung für Dateischlüssel und Kategorienamen.
pub(crate) fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

impl FileKey {
    /// Erzeugt einen Schlüssel aus einem (ggf. Windows-)Pfad.
    pub fn new(path: impl AsRef<str>) -> Self {
        let display = path.as_ref().replace('\\', "/");
        let folded = fold_case(&display);
        Self { display, folded }
    }

    /// Schreibweise wie beim Laden angegeben.
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Letztes Pfadsegment (Dateiname).
    pub fn file_name(&self) -> &str {
        self.display.rsplit('/').next().unwrap_or(&self.display)
    }

    /// Prüft die Dateiendung case-insensitiv (ohne Punkt, z.B. `"xml"`).
    pub fn has_extension(&self, extension: &str) -> bool {
        match self.folded.rsplit_once('.') {
            Some((stem, ext)) => !stem.is_empty() && ext.eq_ignore_ascii_case(extension),
            None => false,
        }
    }
}

impl PartialEq for FileKey {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for FileKey {}

impl Hash for FileKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded.hash(state);
    }
}

impl PartialOrd for FileKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FileKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.folded.cmp(&other.folded)
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl From<&str> for FileKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FileKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_compare_case_insensitive_and_keep_display() {
        let a = FileKey::new("Routes\\Farm.XML");
        let b = FileKey::new("routes/farm.xml");

        assert_eq!(a, b);
        assert_eq!(a.as_str(), "Routes/Farm.XML");

        let set: HashSet<FileKey> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn file_name_and_extension() {
        let key = FileKey::new("packs/tyria/Hearts.Xml");
        assert_eq!(key.file_name(), "Hearts.Xml");
        assert!(key.has_extension("xml"));
        assert!(!key.has_extension("taco"));
        assert!(!FileKey::new(".xml").has_extension("xml"));
        assert!(!FileKey::new("README").has_extension("xml"));
    }
}
