//! Feedback types shared between the store, the server, and the eval harness.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A correction submitted after reviewing a [`ParseRecord`](crate::ParseRecord).
///
/// Correlated by stored run id, by caller-supplied `input_id`, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    #[serde(default)]
    pub parse_id: Option<i64>,
    #[serde(default)]
    pub input_id: Option<String>,
    /// Corrected field values, keyed like `ParseRecord` fields.
    pub expected: Map<String, Value>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl FeedbackSubmission {
    /// True when at least one correlation key is present.
    pub fn is_correlated(&self) -> bool {
        self.parse_id.is_some() || self.input_id.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}

/// A labelled case: `{id, text, expected}`.
///
/// Produced by feedback export and consumed by the golden-case harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalCase {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub expected: Map<String, Value>,
}
