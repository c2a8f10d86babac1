//! Sammelt die Rohbytes eines Packs aus Datei, Ordner oder Archiv.

use crate::core::{FileKey, PackSourceKind};
use crate::shared::EditorOptions;
use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Rohinhalt eines Packs, bereit für den Parser.
#[derive(Debug, Clone)]
pub struct RawPack {
    pub path: PathBuf,
    pub kind: PackSourceKind,
    /// Dateischlüssel → Bytes, alphabetisch nach Schlüssel
    pub files: IndexMap<FileKey, Vec<u8>>,
}

/// Bestimmt die Art einer Pack-Quelle anhand des Pfads.
pub fn classify_source(path: &Path, options: &EditorOptions) -> Result<PackSourceKind> {
    if path.is_dir() {
        Ok(PackSourceKind::Directory)
    } else if path.is_file() {
        if options.is_archive_path(path) {
            Ok(PackSourceKind::Archive)
        } else {
            Ok(PackSourceKind::SingleFile)
        }
    } else {
        bail!("Pfad nicht gefunden: {}", path.display())
    }
}

/// Liest eine Pack-Quelle komplett in den Speicher.
pub fn read_pack_source(path: &Path, options: &EditorOptions) -> Result<RawPack> {
    let kind = classify_source(path, options)?;
    let mut files = match kind {
        PackSourceKind::Archive => read_archive(path)?,
        PackSourceKind::Directory => read_directory(path, &options.document_extension)?,
        _ => read_single_file(path)?,
    };
    files.sort_keys();

    log::info!(
        "Pack-Quelle gelesen: {} ({:?}, {} Dateien)",
        path.display(),
        kind,
        files.len()
    );

    Ok(RawPack {
        path: path.to_path_buf(),
        kind,
        files,
    })
}

fn read_single_file(path: &Path) -> Result<IndexMap<FileKey, Vec<u8>>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Datei konnte nicht gelesen werden: {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Pfad ohne Dateinamen: {}", path.display()))?;

    let mut files = IndexMap::new();
    files.insert(FileKey::new(name), bytes);
    Ok(files)
}

fn read_directory(root: &Path, extension: &str) -> Result<IndexMap<FileKey, Vec<u8>>> {
    let mut files = IndexMap::new();

    for entry in WalkDir::new(root) {
        let entry = entry.with_context(|| format!("Ordner nicht lesbar: {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let matches_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if !matches_extension {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        let key = FileKey::new(relative.to_string_lossy());
        let bytes = std::fs::read(path)
            .with_context(|| format!("Datei konnte nicht gelesen werden: {}", path.display()))?;
        files.insert(key, bytes);
    }

    Ok(files)
}

/// Obergrenze für die Vorab-Reservierung eines Archiveintrags.
const MAX_PREALLOCATION: usize = 4 * 1024 * 1024;

/// Die Größe im Zip-Header ist nur ein Hinweis, größere Einträge wachsen beim Lesen.
fn initial_capacity(declared: u64) -> usize {
    usize::try_from(declared).map_or(MAX_PREALLOCATION, |size| size.min(MAX_PREALLOCATION))
}

fn read_archive(path: &Path) -> Result<IndexMap<FileKey, Vec<u8>>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Archiv nicht gefunden: {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("Ungültiges Archiv: {}", path.display()))?;

    let mut files = IndexMap::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let mut buffer = Vec::with_capacity(initial_capacity(entry.size()));
        entry
            .read_to_end(&mut buffer)
            .with_context(|| format!("Fehler beim Entpacken von '{}'", name))?;
        files.insert(FileKey::new(&name), buffer);
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn declared_entry_size_is_capped() {
        assert_eq!(initial_capacity(128), 128);
        assert_eq!(initial_capacity(u64::MAX), MAX_PREALLOCATION);
    }

    #[test]
    fn single_file_is_keyed_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Route.xml");
        std::fs::write(&path, "<OverlayData/>").unwrap();

        let raw = read_pack_source(&path, &EditorOptions::default()).unwrap();
        assert_eq!(raw.kind, PackSourceKind::SingleFile);
        assert_eq!(raw.files.len(), 1);
        assert!(raw.files.contains_key(&FileKey::new("route.xml")));
    }

    #[test]
    fn directory_scan_is_recursive_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
        std::fs::write(dir.path().join("b.xml"), "<b/>").unwrap();
        std::fs::write(dir.path().join("sub/deeper/a.XML"), "<a/>").unwrap();
        std::fs::write(dir.path().join("sub/readme.txt"), "x").unwrap();

        let raw = read_pack_source(dir.path(), &EditorOptions::default()).unwrap();
        assert_eq!(raw.kind, PackSourceKind::Directory);
        let keys: Vec<&str> = raw.files.keys().map(FileKey::as_str).collect();
        assert_eq!(keys, vec!["b.xml", "sub/deeper/a.XML"]);
    }

    #[test]
    fn archive_entries_are_read_without_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pack.taco");
        {
            let file = std::fs::File::create(&path).unwrap();
            let mut writer = zip::ZipWriter::new(file);
            let options = zip::write::SimpleFileOptions::default();
            writer.add_directory("data/", options).unwrap();
            writer.start_file("data/markers.xml", options).unwrap();
            writer.write_all(b"<OverlayData/>").unwrap();
            writer.start_file("icon.png", options).unwrap();
            writer.write_all(&[1, 2, 3]).unwrap();
            writer.finish().unwrap();
        }

        let raw = read_pack_source(&path, &EditorOptions::default()).unwrap();
        assert_eq!(raw.kind, PackSourceKind::Archive);
        assert_eq!(raw.files.len(), 2);
        assert_eq!(raw.files[&FileKey::new("data/markers.xml")], b"<OverlayData/>");
    }

    #[test]
    fn missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_pack_source(&dir.path().join("nope"), &EditorOptions::default()).is_err());
    }
}
