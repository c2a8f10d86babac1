//! Application State — zentrale Datenhaltung.

mod app_state;
mod workspace;

pub use app_state::AppState;
pub use workspace::{SaveTarget, Workspace};
