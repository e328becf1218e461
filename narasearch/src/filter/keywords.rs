//! Keyword tokenizing and normalization.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::errors::{SearchError, EMPTY_KEYWORD_MESSAGE};

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\s]+").expect("separator pattern is valid"));

/// Strips all whitespace and lower-cases.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// An ordered keyword list: one primary keyword followed by refinements.
///
/// Serialized as a plain list; blank entries are dropped when reading one back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Creates a keyword set from already separated tokens, dropping blanks.
    #[must_use]
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(Into::into)
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Splits raw input on commas and whitespace.
    #[must_use]
    pub fn tokenize(input: &str) -> Self {
        Self::new(SEPARATORS.split(input.trim()))
    }

    /// Splits raw input and rejects it if no keyword remains.
    pub fn parse(input: &str) -> Result<Self, SearchError> {
        let set = Self::tokenize(input);
        if set.is_empty() {
            return Err(SearchError::input_invalid(EMPTY_KEYWORD_MESSAGE));
        }
        Ok(set)
    }

    /// Returns the primary keyword, the one sent to the server.
    #[must_use]
    pub fn primary(&self) -> Option<&str> {
        self.keywords.first().map(String::as_str)
    }

    /// Returns the keywords after the primary one.
    #[must_use]
    pub fn refinements(&self) -> &[String] {
        self.keywords.get(1..).unwrap_or_default()
    }

    /// Returns every keyword in order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }

    /// Returns the number of keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Returns true if there are no keywords.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl From<Vec<String>> for KeywordSet {
    fn from(keywords: Vec<String>) -> Self {
        Self::new(keywords)
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("의왕 어린이\t철도 축제"), "의왕어린이철도축제");
        assert_eq!(normalize(" AI 플랫폼 "), "ai플랫폼");
    }

    #[test]
    fn test_tokenize_on_commas_and_spaces() {
        let set = KeywordSet::tokenize(" 어린이, 철도  의왕,,");
        assert_eq!(set.as_slice(), ["어린이", "철도", "의왕"]);
        assert_eq!(set.primary(), Some("어린이"));
        assert_eq!(set.refinements(), ["철도", "의왕"]);
    }

    #[test]
    fn test_single_keyword_has_no_refinements() {
        let set = KeywordSet::tokenize("축제");
        assert_eq!(set.primary(), Some("축제"));
        assert!(set.refinements().is_empty());
    }

    #[test]
    fn test_parse_rejects_blank_input() {
        let err = KeywordSet::parse(" , ").unwrap_err();
        assert_eq!(err.to_string(), EMPTY_KEYWORD_MESSAGE);
        assert!(KeywordSet::tokenize("").primary().is_none());
    }

    #[test]
    fn test_new_drops_blank_tokens() {
        let set = KeywordSet::new(["a", " ", "b "]);
        assert_eq!(set.as_slice(), ["a", "b"]);
    }

    #[test]
    fn test_deserialize_drops_blank_entries() {
        let set: KeywordSet = serde_json::from_str(r#"["", " 축제 ", "  "]"#).unwrap();
        assert_eq!(set.as_slice(), ["축제"]);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["축제"]"#);
    }
}
