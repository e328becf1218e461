//! Search run states.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::FailureKind;

/// The state of a single search run.
///
/// Runs move `Idle → Fetching → Filtering → Projecting → Succeeded`, and may
/// drop into `Failed` from any non-terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// The run has not started.
    #[default]
    Idle,
    /// Result pages are being fetched.
    Fetching,
    /// Aggregated records are being keyword-filtered.
    Filtering,
    /// Filtered records are being projected into tables.
    Projecting,
    /// Both tables were produced.
    Succeeded,
    /// The run stopped with a classified failure.
    Failed(FailureKind),
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Fetching => write!(f, "fetching"),
            Self::Filtering => write!(f, "filtering"),
            Self::Projecting => write!(f, "projecting"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed(kind) => write!(f, "failed({kind})"),
        }
    }
}

impl PipelineState {
    /// Returns true if the state is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }

    /// Returns true if moving from `self` to `next` is a legal transition.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        match (self, next) {
            (current, Self::Failed(_)) => !current.is_terminal(),
            (Self::Idle, Self::Fetching)
            | (Self::Fetching, Self::Filtering)
            | (Self::Filtering, Self::Projecting)
            | (Self::Projecting, Self::Succeeded) => true,
            _ => false,
        }
    }
}
