//! Request validation and the versioned response record.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::taxonomy::{
    EventType, Jurisdiction, JurisdictionBasis, LegacyEventType, LegacyJurisdiction,
    MarketDirection, Sentiment, TimeHorizon, Topic,
};

/// Version tag of the [`ParseRecord`] contract.
pub const SCHEMA_VERSION: &str = "v1";

/// Maximum accepted text length, in characters.
pub const MAX_TEXT_LENGTH: usize = 20_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("text must be non-empty")]
    EmptyText,

    #[error("text exceeds max length {max} ({actual} characters)")]
    TextTooLong { max: usize, actual: usize },
}

/// Opaque source metadata. Stored alongside a run, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMeta {
    #[serde(default)]
    pub input_id: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub source_published_at: Option<String>,
}

/// Validated classification input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseInput {
    text: String,
    deterministic: bool,
}

impl ParseInput {
    /// Trim and validate raw text.
    pub fn new(text: &str, deterministic: bool) -> Result<Self, ValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        let actual = trimmed.chars().count();
        if actual > MAX_TEXT_LENGTH {
            return Err(ValidationError::TextTooLong {
                max: MAX_TEXT_LENGTH,
                actual,
            });
        }
        Ok(Self {
            text: trimmed.to_string(),
            deterministic,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn deterministic(&self) -> bool {
        self.deterministic
    }
}

/// Structured classification result returned to callers.
///
/// Built once per request and never mutated afterwards. Field order is the
/// serialisation order, so identical inputs serialise byte-for-byte identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseRecord {
    pub event_type: EventType,
    pub legacy_event_type: LegacyEventType,
    pub event_subtype: Option<String>,
    pub topics: Vec<Topic>,
    pub assets: Vec<String>,
    pub entities: Vec<String>,
    pub jurisdiction: Jurisdiction,
    pub jurisdiction_basis: JurisdictionBasis,
    pub jurisdiction_confidence: f64,
    pub legacy_jurisdiction: LegacyJurisdiction,
    pub sentiment: Sentiment,
    pub impact_score: f64,
    pub confidence: f64,

    // Reserved in schema v1; always null.
    pub market_direction: Option<MarketDirection>,
    pub systemic_risk: Option<bool>,
    pub retail_relevant: Option<bool>,
    pub time_horizon: Option<TimeHorizon>,

    pub schema_version: String,
    pub model_version: String,
}
