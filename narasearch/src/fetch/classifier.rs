//! Response envelope classification.
//!
//! The API reports errors in several structurally different envelopes. The
//! result code is located through [`RESULT_CODE_PROBES`], an ordered list of
//! paths; supporting a new envelope shape means adding one probe.

use serde_json::Value;
use tracing::{debug, warn};

use super::transport::RawResponse;
use crate::config::SearchConfig;
use crate::core::RawRecord;

/// A location at which an envelope may carry its result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultCodeProbe {
    /// Name used in logs.
    pub name: &'static str,
    /// Object keys leading to the result code.
    pub path: &'static [&'static str],
}

/// Result code locations, checked in order.
pub const RESULT_CODE_PROBES: &[ResultCodeProbe] = &[
    ResultCodeProbe {
        name: "header",
        path: &["response", "header", "resultCode"],
    },
    ResultCodeProbe {
        name: "vendor_error",
        path: &["nkoneps.com.response.ResponseError", "header", "resultCode"],
    },
    ResultCodeProbe {
        name: "bare",
        path: &["resultCode"],
    },
];

/// The classification of one page response.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// The envelope carries a body.
    Success {
        /// The result code, if the envelope had one.
        result_code: Option<String>,
        /// Records on this page, normalized to a list.
        items: Vec<RawRecord>,
        /// The total the server reports for the whole search.
        total_count: u64,
    },
    /// The server rejected the search window as too long.
    RangeExceeded,
    /// The envelope has no body; no more pages.
    EmptyEnvelope,
    /// The payload is not JSON.
    ParseFailure {
        /// The leading characters of the payload.
        preview: String,
    },
    /// The HTTP status was not 2xx.
    TransportFailure {
        /// The HTTP status code.
        status: u16,
    },
}

/// Returns the result code found by the first matching probe.
///
/// Numeric codes are returned in their decimal spelling.
#[must_use]
pub fn result_code(payload: &Value) -> Option<String> {
    RESULT_CODE_PROBES.iter().find_map(|probe| {
        let value = probe
            .path
            .iter()
            .try_fold(payload, |current, key| current.get(key))?;
        let code = match value {
            Value::Null => return None,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        debug!(probe = probe.name, code = %code, "result code located");
        Some(code)
    })
}

/// Classifies raw page responses.
#[derive(Debug, Clone)]
pub struct ResultClassifier {
    range_exceeded_code: String,
    success_code: String,
    preview_chars: usize,
}

impl Default for ResultClassifier {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl ResultClassifier {
    /// Creates a classifier from a search configuration.
    #[must_use]
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            range_exceeded_code: config.range_exceeded_code.clone(),
            success_code: config.success_code.clone(),
            preview_chars: config.preview_chars,
        }
    }

    /// Classifies a transport response.
    #[must_use]
    pub fn classify(&self, response: &RawResponse) -> Classification {
        if !response.is_success() {
            return Classification::TransportFailure {
                status: response.status,
            };
        }

        match serde_json::from_str::<Value>(&response.body) {
            Ok(payload) => self.classify_payload(payload),
            Err(e) => {
                debug!(error = %e, "page payload is not JSON");
                Classification::ParseFailure {
                    preview: response.body.chars().take(self.preview_chars).collect(),
                }
            }
        }
    }

    /// Classifies a decoded payload.
    #[must_use]
    pub fn classify_payload(&self, mut payload: Value) -> Classification {
        let code = result_code(&payload);

        if code.as_deref() == Some(self.range_exceeded_code.as_str()) {
            return Classification::RangeExceeded;
        }
        if let Some(ref code) = code {
            if *code != self.success_code {
                warn!(result_code = %code, "server reported a non-success result code");
            }
        }

        let Some(Value::Object(mut body)) = payload
            .get_mut("response")
            .and_then(|response| response.get_mut("body"))
            .map(Value::take)
        else {
            return Classification::EmptyEnvelope;
        };

        let total_count = parse_total_count(body.get("totalCount"));
        let items = normalize_items(body.remove("items"));

        Classification::Success {
            result_code: code,
            items,
            total_count,
        }
    }
}

/// Accepts a list of records, a single bare record, or nothing.
///
/// An empty object counts as nothing.
fn normalize_items(items: Option<Value>) -> Vec<RawRecord> {
    match items {
        Some(Value::Array(values)) => values
            .into_iter()
            .filter_map(|value| match value {
                Value::Object(record) => Some(record),
                other => {
                    debug!(value = %other, "skipping non-object item");
                    None
                }
            })
            .collect(),
        Some(Value::Object(record)) if record.is_empty() => Vec::new(),
        Some(Value::Object(record)) => vec![record],
        None | Some(Value::Null) => Vec::new(),
        Some(other) => {
            debug!(value = %other, "items field holds no records");
            Vec::new()
        }
    }
}

fn parse_total_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_else(|_| {
            warn!(total_count = %s, "unparseable totalCount treated as 0");
            0
        }),
        _ => 0,
    }
}
