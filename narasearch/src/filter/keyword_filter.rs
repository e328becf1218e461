//! AND-matching over the notice title.

use tracing::debug;

use super::keywords::{normalize, KeywordSet};
use crate::core::{field_text, RawRecord};
use crate::errors::SearchError;

/// Keeps records whose title contains every keyword.
///
/// Both sides are normalized with [`normalize`], so matching ignores whitespace
/// and case; a keyword matches anywhere inside the title, not only whole words.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    title_field: String,
    keywords: KeywordSet,
    normalized: Vec<String>,
}

impl KeywordFilter {
    /// Creates a filter over `title_field`.
    #[must_use]
    pub fn new(title_field: impl Into<String>, keywords: KeywordSet) -> Self {
        let normalized = keywords.as_slice().iter().map(|k| normalize(k)).collect();
        Self {
            title_field: title_field.into(),
            keywords,
            normalized,
        }
    }

    /// Returns true if the record passes every keyword.
    #[must_use]
    pub fn matches(&self, record: &RawRecord) -> bool {
        let title = normalize(&field_text(record, &self.title_field));
        self.normalized.iter().all(|k| title.contains(k.as_str()))
    }

    /// Filters records, preserving order.
    ///
    /// An empty keyword set passes everything through. If a non-empty input is
    /// reduced to nothing, the error names the primary keyword and the
    /// refinements that excluded the rest.
    pub fn apply(&self, records: Vec<RawRecord>) -> Result<Vec<RawRecord>, SearchError> {
        if self.keywords.is_empty() {
            return Ok(records);
        }

        let fetched = records.len();
        let kept: Vec<RawRecord> = records.into_iter().filter(|r| self.matches(r)).collect();
        debug!(fetched, kept = kept.len(), keywords = ?self.keywords.as_slice(), "keyword filter applied");

        if kept.is_empty() && fetched > 0 {
            return Err(SearchError::NoKeywordMatch {
                primary: self.keywords.primary().unwrap_or_default().to_string(),
                refinements: self.keywords.refinements().to_vec(),
                fetched,
            });
        }
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn titled(title: &str) -> RawRecord {
        json!({"bidNtceNm": title, "bidNtceNo": "R25BK0000001"})
            .as_object()
            .cloned()
            .unwrap()
    }

    fn titles(records: &[RawRecord]) -> Vec<String> {
        records.iter().map(|r| field_text(r, "bidNtceNm")).collect()
    }

    #[test]
    fn test_every_keyword_must_match() {
        let filter = KeywordFilter::new("bidNtceNm", KeywordSet::tokenize("어린이, 철도"));
        let kept = filter
            .apply(vec![titled("의왕 어린이 철도 축제"), titled("어린이 도서관")])
            .unwrap();
        assert_eq!(titles(&kept), vec!["의왕 어린이 철도 축제"]);
    }

    #[test]
    fn test_matching_ignores_spacing_and_case() {
        let filter = KeywordFilter::new("bidNtceNm", KeywordSet::tokenize("철도축제 ai"));
        assert!(filter.matches(&titled("의왕 철도 축제 AI 안내 시스템")));
        assert!(!filter.matches(&titled("의왕 철도 축제")));
    }

    #[test]
    fn test_substring_not_whole_word() {
        let filter = KeywordFilter::new("bidNtceNm", KeywordSet::tokenize("도서"));
        assert!(filter.matches(&titled("어린이도서관 리모델링")));
    }

    #[test]
    fn test_empty_keywords_is_identity() {
        let records = vec![titled("b"), titled("a")];
        let filter = KeywordFilter::new("bidNtceNm", KeywordSet::default());
        assert_eq!(filter.apply(records.clone()).unwrap(), records);
    }

    #[test]
    fn test_order_is_preserved() {
        let filter = KeywordFilter::new("bidNtceNm", KeywordSet::tokenize("축제"));
        let kept = filter
            .apply(vec![titled("축제 3"), titled("행사"), titled("축제 1"), titled("축제 2")])
            .unwrap();
        assert_eq!(titles(&kept), vec!["축제 3", "축제 1", "축제 2"]);
    }

    #[test]
    fn test_missing_title_never_matches() {
        let filter = KeywordFilter::new("bidNtceNm", KeywordSet::tokenize("축제"));
        let record = json!({"bidNtceNo": "1"}).as_object().cloned().unwrap();
        assert!(!filter.matches(&record));
    }

    #[test]
    fn test_no_match_names_refinements() {
        let filter = KeywordFilter::new("bidNtceNm", KeywordSet::tokenize("어린이 철도 의왕"));
        let err = filter.apply(vec![titled("어린이 도서관")]).unwrap_err();
        match err {
            SearchError::NoKeywordMatch { primary, refinements, fetched } => {
                assert_eq!(primary, "어린이");
                assert_eq!(refinements, vec!["철도", "의왕"]);
                assert_eq!(fetched, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_output_is_subset_with_all_keywords() {
        let set = KeywordSet::tokenize("시스템 구축");
        let filter = KeywordFilter::new("bidNtceNm", set.clone());
        let input = vec![
            titled("통합 시스템 구축 용역"),
            titled("시스템 유지보수"),
            titled("구축 사업"),
            titled("홈페이지시스템구축"),
        ];
        let kept = filter.apply(input.clone()).unwrap();

        assert!(kept.iter().all(|r| input.contains(r)));
        for record in &kept {
            let title = normalize(&field_text(record, "bidNtceNm"));
            assert!(set.as_slice().iter().all(|k| title.contains(&normalize(k))));
        }
        assert_eq!(kept.len(), 2);
    }
}
