//! Core domain model types for narasearch.
//!
//! This module contains the fundamental types used throughout the crate:
//! - The notice category discriminator
//! - Raw record helpers
//! - Pipeline run states

mod category;
mod record;
mod status;

pub use category::Category;
pub use record::{field_text, RawRecord};
pub use status::PipelineState;
