//! Model module - Application state and data types
//!
//! - `types`: tabs, navigation and UI state
//! - `playback`: transport bar data derived from session snapshots
//! - `content`: catalog state and the lesson lists shown on each tab
//! - `favorites`: persisted favorite lessons
//! - `app_model`: main application model with state management methods

mod types;
mod playback;
mod content;
mod favorites;
mod app_model;

pub use types::{SettingsRow, Tab, UiState};
pub use playback::PlaybackInfo;
pub use content::{CatalogState, ContentState};
pub use favorites::FavoritesStore;
pub use app_model::AppModel;
