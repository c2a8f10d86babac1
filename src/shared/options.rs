//! Zentrale Konfiguration für den Marker-Pack-Editor.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── History ─────────────────────────────────────────────────────────

/// Maximale Anzahl an Undo-Schritten.
pub const HISTORY_DEPTH: usize = 500;

// ── Dateien ─────────────────────────────────────────────────────────

/// Dateiendung der Pack-Dokumente (ohne Punkt).
pub const DOCUMENT_EXTENSION: &str = "xml";
/// Archiv-Endungen: nur lesbar, als Speicherziel abgelehnt.
pub const ARCHIVE_EXTENSIONS: [&str; 2] = ["taco", "zip"];
/// Namenspräfix neuer, noch ungespeicherter Dokumente.
pub const UNTITLED_PREFIX: &str = "Untitled";

// ── Writer ──────────────────────────────────────────────────────────

/// Einrückungsstufe, wenn aus dem Dokument keine ableitbar ist.
pub const INDENT_UNIT: &str = "  ";

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `marker_pack_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorOptions {
    /// Maximale Undo-Tiefe (älteste Einträge fallen heraus)
    pub history_depth: usize,
    /// Erkannte Dokument-Endung
    pub document_extension: String,
    /// Als Archiv behandelte Endungen
    pub archive_extensions: Vec<String>,
    /// Präfix für neue Dokumente (`Untitled-1.xml`, ...)
    pub untitled_prefix: String,
    /// Fallback-Einrückung für den Writer
    pub indent_unit: String,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            history_depth: HISTORY_DEPTH,
            document_extension: DOCUMENT_EXTENSION.to_string(),
            archive_extensions: ARCHIVE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            untitled_prefix: UNTITLED_PREFIX.to_string(),
            indent_unit: INDENT_UNIT.to_string(),
        }
    }
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler werden Standardwerte verwendet.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("marker_pack_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("marker_pack_editor.toml")
    }

    /// Prüft einen Pfad auf eine Archiv-Endung (case-insensitiv).
    pub fn is_archive_path(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.archive_extensions
                    .iter()
                    .any(|a| a.eq_ignore_ascii_case(ext))
            })
    }

    /// Prüft einen Pfad auf die Dokument-Endung (case-insensitiv).
    pub fn is_document_path(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.document_extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn defaults_match_constants() {
        let options = EditorOptions::default();
        assert_eq!(options.history_depth, 500);
        assert_eq!(options.archive_extensions, vec!["taco", "zip"]);
        assert_eq!(options.indent_unit, "  ");
    }

    #[test]
    fn partial_toml_falls_back_per_field() {
        let options: EditorOptions = toml::from_str("history_depth = 20\n").unwrap();
        assert_eq!(options.history_depth, 20);
        assert_eq!(options.document_extension, "xml");
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.toml");
        let options = EditorOptions {
            untitled_prefix: "Neu".to_string(),
            ..EditorOptions::default()
        };

        options.save_to_file(&path).unwrap();
        assert_eq!(EditorOptions::load_from_file(&path), options);
        assert_eq!(
            EditorOptions::load_from_file(&dir.path().join("missing.toml")),
            EditorOptions::default()
        );
    }

    #[test]
    fn path_classification_is_case_insensitive() {
        let options = EditorOptions::default();
        assert!(options.is_archive_path(Path::new("/packs/Tyria.TACO")));
        assert!(options.is_archive_path(Path::new("pack.zip")));
        assert!(!options.is_archive_path(Path::new("pack.xml")));
        assert!(options.is_document_path(Path::new("a/b/Route.XML")));
        assert!(!options.is_document_path(Path::new("folder")));
    }
}
