//! Schnittstellen zu externen Kollaborateuren (Dateiauswahl, Live-Position).
//!
//! Der Aufrufer reicht die Implementierung explizit herein.

use glam::DVec3;
use std::path::PathBuf;

/// Dateiauswahl für "Speichern unter".
pub trait SavePathPicker {
    /// Fragt einen Zielpfad ab. `None` = abgebrochen.
    fn pick_save_path(&mut self, suggested_name: &str) -> Option<PathBuf>;
}

/// Aktuelle Spielerposition aus dem laufenden Spiel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPosition {
    pub map_id: i32,
    pub position: DVec3,
}

/// Liefert die Live-Position (z.B. über den MumbleLink-Reader).
pub trait PositionSource {
    fn current_position(&self) -> Option<PlayerPosition>;
}

/// Fester Pfad, z.B. für CLI und Tests.
impl SavePathPicker for Option<PathBuf> {
    fn pick_save_path(&mut self, _suggested_name: &str) -> Option<PathBuf> {
        self.take()
    }
}

impl PositionSource for PlayerPosition {
    fn current_position(&self) -> Option<PlayerPosition> {
        Some(*self)
    }
}
