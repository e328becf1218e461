//! Persisted user settings.

use serde::{Deserialize, Serialize};

use crate::errors::SettingsError;
use crate::pipeline::DEFAULT_WEEKS;

/// Number of keyword shortcut slots.
pub const SHORTCUT_SLOTS: usize = 10;

fn default_true() -> bool {
    true
}

fn default_shortcuts() -> Vec<String> {
    vec![String::new(); SHORTCUT_SLOTS]
}

/// Credential and keyword shortcuts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Portal service key.
    #[serde(default)]
    pub api_key: String,
    /// Free-form note on when the key expires.
    #[serde(default)]
    pub expired_date: String,
    /// Whether searches default to the last three weeks.
    #[serde(default = "default_true")]
    pub use_three_weeks: bool,
    #[serde(default = "default_shortcuts")]
    shortcuts: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            expired_date: String::new(),
            use_three_weeks: true,
            shortcuts: default_shortcuts(),
        }
    }
}

impl Settings {
    /// Pads or truncates the shortcut list to [`SHORTCUT_SLOTS`] entries.
    #[must_use]
    pub(crate) fn normalized(mut self) -> Self {
        self.shortcuts.resize(SHORTCUT_SLOTS, String::new());
        self
    }

    fn check_slot(index: usize) -> Result<(), SettingsError> {
        if index >= SHORTCUT_SLOTS {
            return Err(SettingsError::SlotOutOfRange {
                index,
                max: SHORTCUT_SLOTS,
            });
        }
        Ok(())
    }

    /// Returns the keyword input saved in a slot (empty if unset).
    pub fn shortcut(&self, index: usize) -> Result<&str, SettingsError> {
        Self::check_slot(index)?;
        Ok(self.shortcuts.get(index).map_or("", String::as_str))
    }

    /// Saves keyword input into a slot.
    pub fn set_shortcut(&mut self, index: usize, keywords: impl Into<String>) -> Result<(), SettingsError> {
        Self::check_slot(index)?;
        if self.shortcuts.len() < SHORTCUT_SLOTS {
            self.shortcuts.resize(SHORTCUT_SLOTS, String::new());
        }
        self.shortcuts[index] = keywords.into();
        Ok(())
    }

    /// Returns every slot in order.
    #[must_use]
    pub fn shortcuts(&self) -> &[String] {
        &self.shortcuts
    }

    /// Returns `(slot, keywords)` for slots holding non-blank input.
    pub fn filled_shortcuts(&self) -> impl Iterator<Item = (usize, &str)> {
        self.shortcuts
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.trim().is_empty())
            .map(|(i, s)| (i, s.as_str()))
    }

    /// Returns the window length callers should default to, if any.
    ///
    /// `None` means the caller must ask for an explicit window.
    #[must_use]
    pub fn default_weeks(&self) -> Option<u32> {
        self.use_three_weeks.then_some(DEFAULT_WEEKS)
    }

    /// Returns true if a service key is stored.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
