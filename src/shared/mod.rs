//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Laufzeit-Optionen, die von `storage`, `xml`-Aufrufern und `app`
//! gemeinsam genutzt werden.

pub mod options;

pub use options::EditorOptions;
pub use options::{ARCHIVE_EXTENSIONS, DOCUMENT_EXTENSION, HISTORY_DEPTH, INDENT_UNIT};
