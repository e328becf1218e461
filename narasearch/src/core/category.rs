//! Notice category discriminator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SearchError;

/// The two notice types served by the procurement API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Bid notices (입찰공고).
    #[default]
    BidNotice,
    /// Pre-specification disclosures (사전규격).
    PreSpec,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Self; 2] = [Self::BidNotice, Self::PreSpec];

    /// Returns the user-facing label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::BidNotice => "입찰공고",
            Self::PreSpec => "사전규격",
        }
    }

    /// Returns the record field holding the notice title.
    ///
    /// The same name doubles as the server-side keyword query parameter.
    #[must_use]
    pub fn title_field(&self) -> &'static str {
        match self {
            Self::BidNotice => "bidNtceNm",
            Self::PreSpec => "prdctClsfcNoNm",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bid-notice" | "bid" | "입찰공고" => Ok(Self::BidNotice),
            "pre-spec" | "prespec" | "사전규격" => Ok(Self::PreSpec),
            other => Err(SearchError::input_invalid(format!(
                "검색 유형(입찰공고/사전규격)을 선택해주세요: '{other}'"
            ))),
        }
    }
}
