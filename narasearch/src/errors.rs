//! Error types for the search pipeline and its collaborators.
//!
//! Every pipeline failure is a [`SearchError`]; [`FailureKind`] is the coarse
//! classification a caller switches on. The `Display` text of a [`SearchError`] is
//! the user-facing detail message.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Message shown when the keyword input is empty.
pub const EMPTY_KEYWORD_MESSAGE: &str = "검색어를 입력해주세요.";

/// Message shown when no credential token was supplied.
pub const MISSING_CREDENTIAL_MESSAGE: &str = "API 인증키를 입력해주세요.";

/// Message shown when the search window is reversed.
pub const REVERSED_RANGE_MESSAGE: &str = "검색 시작일시가 종료일시보다 늦습니다.";

/// The coarse classification of a failed search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The server answered with a non-success HTTP status.
    TransportFailure,
    /// The payload could not be decoded as JSON.
    ParseFailure,
    /// The server rejected the search window as too long.
    RangeExceeded,
    /// No records were returned across all pages.
    NoResults,
    /// Records were fetched but none matched every keyword.
    NoKeywordMatch,
    /// The request was rejected before any network call.
    InputInvalid,
    /// Anything else that went wrong during the run.
    Unexpected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransportFailure => write!(f, "transport_failure"),
            Self::ParseFailure => write!(f, "parse_failure"),
            Self::RangeExceeded => write!(f, "range_exceeded"),
            Self::NoResults => write!(f, "no_results"),
            Self::NoKeywordMatch => write!(f, "no_keyword_match"),
            Self::InputInvalid => write!(f, "input_invalid"),
            Self::Unexpected => write!(f, "unexpected"),
        }
    }
}

/// The main error type for search operations.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// A page request returned a non-success status.
    #[error("서버 접속 오류: {status}")]
    Transport {
        /// The HTTP status code.
        status: u16,
    },

    /// A page payload was not well-formed JSON.
    #[error("데이터 파싱 실패: {preview}")]
    Parse {
        /// The leading characters of the raw payload.
        preview: String,
    },

    /// The server rejected the search window.
    #[error("최대 검색기간을 초과하였습니다.\n31일 이내로 검색해주세요.")]
    RangeExceeded,

    /// Nothing was aggregated across all pages.
    #[error("검색 결과가 없습니다.")]
    NoResults,

    /// Every fetched record was excluded by the keyword filter.
    #[error("{}", no_match_message(.primary, .refinements, .fetched))]
    NoKeywordMatch {
        /// The primary keyword (also sent to the server).
        primary: String,
        /// The refinement keywords applied client-side.
        refinements: Vec<String>,
        /// How many records were fetched before filtering.
        fetched: usize,
    },

    /// The request was rejected before any network call.
    #[error("{0}")]
    InputInvalid(String),

    /// Any other failure.
    #[error("시스템 에러: {0}")]
    Unexpected(String),
}

fn no_match_message(primary: &str, refinements: &[String], fetched: &usize) -> String {
    let condition = if refinements.is_empty() {
        "조건이".to_string()
    } else {
        format!("상세 조건('{}')이", refinements.join(", "))
    };
    format!("'{primary}' 관련 데이터 {fetched}개를 가져왔으나,\n{condition} 포함된 공고는 없습니다.")
}

impl SearchError {
    /// Creates an input validation error.
    #[must_use]
    pub fn input_invalid(message: impl Into<String>) -> Self {
        Self::InputInvalid(message.into())
    }

    /// Creates an unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Returns the failure classification.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport { .. } => FailureKind::TransportFailure,
            Self::Parse { .. } => FailureKind::ParseFailure,
            Self::RangeExceeded => FailureKind::RangeExceeded,
            Self::NoResults => FailureKind::NoResults,
            Self::NoKeywordMatch { .. } => FailureKind::NoKeywordMatch,
            Self::InputInvalid(_) => FailureKind::InputInvalid,
            Self::Unexpected(_) => FailureKind::Unexpected,
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(value: reqwest::Error) -> Self {
        Self::Unexpected(value.to_string())
    }
}

impl From<tokio::task::JoinError> for SearchError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Unexpected(value.to_string())
    }
}

/// Errors raised by an export sink.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The table has no rows.
    #[error("저장할 데이터가 없습니다.")]
    NoData,

    /// Writing the destination failed.
    #[error("파일 저장 중 오류가 발생했습니다.\n{0}")]
    Io(#[from] std::io::Error),

    /// Encoding the table failed.
    #[error("파일 저장 중 오류가 발생했습니다.\n{0}")]
    Encode(String),
}

#[cfg(feature = "csv-export")]
impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Encode(value.to_string())
    }
}

/// Errors raised by a settings store.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The shortcut slot index is outside 0..=9.
    #[error("Shortcut slot {index} is out of range (0..{max})")]
    SlotOutOfRange {
        /// The requested slot.
        index: usize,
        /// The number of slots.
        max: usize,
    },

    /// Reading or writing the settings file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
