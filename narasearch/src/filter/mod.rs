//! Client-side keyword filtering.
//!
//! The server only understands a single keyword, so every further token of the
//! user's input is applied here as an AND condition over the notice title.

mod keyword_filter;
mod keywords;

pub use keyword_filter::KeywordFilter;
pub use keywords::{normalize, KeywordSet};
