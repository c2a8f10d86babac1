//! Handler für Laufzeit-Optionen.

use crate::app::AppState;
use crate::shared::EditorOptions;

/// Übernimmt neue Optionen und persistiert sie neben der Binary.
///
/// Eine kleinere History-Tiefe kürzt die bestehende History sofort.
pub fn apply_options(state: &mut AppState, options: EditorOptions) -> anyhow::Result<()> {
    state.history.set_max_depth(options.history_depth);
    state.options = options;
    let path = EditorOptions::config_path();
    state.options.save_to_file(&path)
}
