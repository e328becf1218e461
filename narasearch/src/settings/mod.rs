//! Persisted credential and keyword shortcuts.

mod model;
mod store;

pub use model::{Settings, SHORTCUT_SLOTS};
pub use store::{JsonSettingsStore, MemorySettingsStore, SettingsStore};
