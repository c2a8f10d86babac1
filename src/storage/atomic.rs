//! Atomares Schreiben: Temp-Datei im Zielordner, dann Rename.

use std::io::Write;
use std::path::Path;

/// Schreibt `bytes` nach `path`, ohne dass ein Abbruch eine halbe Datei hinterlässt.
///
/// Die Temp-Datei liegt im selben Ordner wie das Ziel, damit der abschließende
/// Rename auf demselben Dateisystem passiert.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    log::debug!("{} Bytes atomar geschrieben: {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.xml");
        std::fs::write(&path, "alt").unwrap();

        write_atomically(&path, b"neu").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"neu");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "Temp-Datei darf nicht liegen bleiben");
    }

    #[test]
    fn missing_directory_fails_without_creating_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/a.xml");
        assert!(write_atomically(&path, b"x").is_err());
        assert!(!path.exists());
    }
}
