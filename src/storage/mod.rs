//! Dateisystem-Grenze: Pack-Quellen einlesen und Dokumente atomar schreiben.
//!
//! Core und XML-Schicht arbeiten nur auf Bytes im Speicher.

pub mod atomic;
pub mod loader;

pub use atomic::write_atomically;
pub use loader::{classify_source, read_pack_source, RawPack};
