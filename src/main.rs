//! Marker-Pack-Editor (CLI).
//!
//! Kommandozeilen-Frontend für den Editor-Kern: Packs inspizieren und
//! Dokumente über den Writer neu schreiben.

use clap::Parser;
use marker_pack_editor::app::use_cases::file_io;
use marker_pack_editor::app::SaveOutcome;
use marker_pack_editor::{AppState, CategoryId, CategoryTree, EditorOptions, LoadedMarkerPack};
use std::path::{Path, PathBuf};

#[derive(Debug, clap::Parser)]
#[command(version, about = "Editor-Kern für TacO-Marker-Packs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Zusammenfassung, Kategorie-Baum und Ladefehler eines Packs ausgeben
    Info {
        /// XML-Datei, Ordner oder .taco/.zip-Archiv
        path: PathBuf,
    },
    /// Alle Dokumente eines Ordners oder einer Einzeldatei neu schreiben
    Resave {
        /// XML-Datei oder Ordner (Archive werden übersprungen)
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Marker-Pack-Editor v{} startet...", env!("CARGO_PKG_VERSION"));

    let config_path = EditorOptions::config_path();
    let options = EditorOptions::load_from_file(&config_path);
    let mut state = AppState::with_options(options);

    match Cli::parse().command {
        Command::Info { path } => info(&mut state, &path),
        Command::Resave { path } => resave(&mut state, &path),
    }
}

fn info(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    file_io::open_workspace(state, path)?;
    let Some(pack) = state.pack() else {
        return Ok(());
    };

    println!("Pack: {} ({:?})", path.display(), pack.source_kind());
    println!(
        "{} Dokumente, {} Rohdateien, {} Marker",
        pack.document_count(),
        pack.raw_file_count(),
        pack.marker_count()
    );
    print_documents(pack);

    println!();
    println!("Kategorien:");
    let tree = pack.categories();
    for child in tree.get(tree.root()).map(|c| c.children()).unwrap_or(&[]) {
        print_category(tree, *child, 1);
    }

    if !state.last_load_errors.is_empty() {
        println!();
        println!("{} Fehler beim Laden:", state.last_load_errors.len());
        for error in &state.last_load_errors {
            println!("  {}: {}", error.file_key, error.message);
        }
    }
    Ok(())
}

fn print_documents(pack: &LoadedMarkerPack) {
    for key in pack.document_keys() {
        println!(
            "  {} ({} Marker, {} fremde Knoten)",
            key,
            pack.markers_in(&key).len(),
            pack.unmanaged_nodes(&key).len()
        );
    }
}

fn print_category(tree: &CategoryTree, id: CategoryId, depth: usize) {
    let Some(category) = tree.get(id) else {
        return;
    };
    let marker = if category.is_separator { " [Trenner]" } else { "" };
    println!(
        "{}{} \"{}\" ({} Marker){}",
        "  ".repeat(depth),
        category.internal_name,
        category.display_name,
        tree.markers_recursive(id).len(),
        marker
    );
    for child in category.children() {
        print_category(tree, *child, depth + 1);
    }
}

fn resave(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    if state.options.is_archive_path(path) {
        log::warn!("Archive werden nicht überschrieben: {}", path.display());
        return Ok(());
    }

    file_io::open_workspace(state, path)?;
    let keys = state.pack().map(LoadedMarkerPack::document_keys).unwrap_or_default();

    let mut written = 0;
    for key in &keys {
        file_io::set_active_document(state, key);
        match file_io::save_active_document(state)? {
            SaveOutcome::Saved(target) => {
                println!("geschrieben: {}", target.display());
                written += 1;
            }
            SaveOutcome::NeedsSaveAs { suggested_name } => {
                println!("übersprungen (kein Speicherort): {}", suggested_name);
            }
        }
    }

    println!("{} von {} Dokumenten geschrieben", written, keys.len());
    Ok(())
}
