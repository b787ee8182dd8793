//! Optional refinement hook for low-confidence heuristic results.
//!
//! A [`Refiner`] may override the event type and contribute extra assets or
//! entities. It never sees high-confidence results, never changes scores, and
//! its failures are logged and discarded by the caller.

use async_trait::async_trait;
use cryptonews_core::EventType;
use ring::digest;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::candidates::CandidateEvent;

/// Version tag sent with every refinement request.
pub const PROMPT_VERSION: &str = "refine-v1-2026-01-29";

/// Heuristic results below this confidence are eligible for refinement.
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.65;

#[derive(Error, Debug)]
pub enum RefineError {
    #[error("refinement timed out after {0} ms")]
    Timeout(u64),
    #[error("provider error: {0}")]
    Provider(String),
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[cfg(feature = "http")]
    #[error("provider returned {status}: {body}")]
    Server { status: u16, body: String },
}

/// What a provider is told about the heuristic result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefinementRequest {
    pub text: String,
    pub heuristic_event_type: EventType,
    pub heuristic_confidence: f64,
    pub heuristic_assets: Vec<String>,
    pub heuristic_entities: Vec<String>,
    pub prompt_version: String,
    pub deterministic: bool,
    /// Present only for deterministic requests.
    pub seed: Option<u32>,
}

impl RefinementRequest {
    pub fn new(
        text: &str,
        primary: &CandidateEvent,
        assets: &[String],
        entities: &[String],
        deterministic: bool,
    ) -> Self {
        Self {
            text: text.to_string(),
            heuristic_event_type: primary.event_type,
            heuristic_confidence: primary.confidence,
            heuristic_assets: assets.to_vec(),
            heuristic_entities: entities.to_vec(),
            prompt_version: PROMPT_VERSION.to_string(),
            deterministic,
            seed: deterministic.then(|| stable_seed(PROMPT_VERSION, text)),
        }
    }
}

/// A provider's optional overrides. Absent fields leave the heuristic value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Refinement {
    #[serde(default)]
    pub event_type: Option<EventType>,
    #[serde(default)]
    pub assets: Option<Vec<String>>,
    #[serde(default)]
    pub entities: Option<Vec<String>>,
}

/// Pluggable refinement provider.
#[async_trait]
pub trait Refiner: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the provider honours `deterministic` requests.
    fn supports_determinism(&self) -> bool;

    async fn refine(&self, request: &RefinementRequest) -> Result<Refinement, RefineError>;
}

/// Provider that never overrides anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRefiner;

#[async_trait]
impl Refiner for NoopRefiner {
    fn name(&self) -> &str {
        "noop"
    }

    fn supports_determinism(&self) -> bool {
        true
    }

    async fn refine(&self, _request: &RefinementRequest) -> Result<Refinement, RefineError> {
        Ok(Refinement::default())
    }
}

/// Only fallback or low-confidence primaries go to the provider.
pub fn needs_refinement(primary: &CandidateEvent, threshold: f64) -> bool {
    primary.event_type.is_fallback() || primary.confidence < threshold
}

/// Seed derived from the prompt version and text, stable across processes.
pub fn stable_seed(prompt_version: &str, text: &str) -> u32 {
    let mut ctx = digest::Context::new(&digest::SHA256);
    ctx.update(prompt_version.as_bytes());
    ctx.update(b"\n");
    ctx.update(text.as_bytes());
    let hash = ctx.finish();
    let bytes = hash.as_ref();
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Union of `base` and trimmed, non-empty `extra` values, `base` first.
pub fn merge_unique(base: &[String], extra: Option<&[String]>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(base.len());
    let extra = extra.unwrap_or_default().iter().map(|s| s.trim());
    for value in base.iter().map(String::as_str).chain(extra) {
        if !value.is_empty() && !merged.iter().any(|m| m == value) {
            merged.push(value.to_string());
        }
    }
    merged
}
