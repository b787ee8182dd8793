//! The classification pipeline.
//!
//! Extract features, generate and select a primary candidate, optionally
//! refine, then build the record. Every validated input yields a record.

use std::sync::Arc;
use std::time::Duration;

use cryptonews_core::{EventType, ParseInput, ParseRecord, SCHEMA_VERSION, Sentiment};
use tracing::{debug, warn};

use crate::assets::extract_assets;
use crate::candidates::{CandidateEvent, generate_candidates};
use crate::entities::extract_entities;
use crate::jurisdiction::{JurisdictionResolution, resolve_jurisdiction_detail};
use crate::legacy::map_to_legacy;
use crate::refine::{
    LOW_CONFIDENCE_THRESHOLD, RefineError, RefinementRequest, Refiner, merge_unique,
    needs_refinement,
};
use crate::select::select_primary;
use crate::sentiment::infer_sentiment;
use crate::subtype::infer_event_subtype;

pub const DEFAULT_MODEL_VERSION: &str = "news-parser-0.1";
pub const DEFAULT_REFINE_TIMEOUT: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub model_version: String,
    pub refine_timeout: Duration,
    pub low_confidence_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_version: DEFAULT_MODEL_VERSION.to_string(),
            refine_timeout: DEFAULT_REFINE_TIMEOUT,
            low_confidence_threshold: LOW_CONFIDENCE_THRESHOLD,
        }
    }
}

/// Heuristic features of one text, before any refinement.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub primary: CandidateEvent,
    pub candidate_count: usize,
    pub assets: Vec<String>,
    pub entities: Vec<String>,
    pub jurisdiction: JurisdictionResolution,
    pub sentiment: Sentiment,
}

/// Run the heuristic stage only.
pub fn analyze(text: &str) -> Analysis {
    let candidates = generate_candidates(text);
    Analysis {
        primary: select_primary(text, &candidates),
        candidate_count: candidates.len(),
        assets: extract_assets(text),
        entities: extract_entities(text),
        jurisdiction: resolve_jurisdiction_detail(text),
        sentiment: infer_sentiment(text),
    }
}

pub struct Classifier {
    config: ClassifierConfig,
    refiner: Option<Arc<dyn Refiner>>,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            refiner: None,
        }
    }

    pub fn with_refiner(mut self, refiner: Arc<dyn Refiner>) -> Self {
        self.refiner = Some(refiner);
        self
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify with heuristics only. Used for evaluation and whenever no
    /// provider may be consulted.
    pub fn classify_heuristic(&self, input: &ParseInput) -> ParseRecord {
        let analysis = analyze(input.text());
        log_analysis(&analysis);
        self.build_record(input.text(), analysis)
    }

    /// Classify, consulting the refinement provider when one is configured
    /// and the heuristic result is weak.
    pub async fn classify(&self, input: &ParseInput) -> ParseRecord {
        let mut analysis = analyze(input.text());
        log_analysis(&analysis);

        if let Some(refiner) = self.refiner_for(input, &analysis.primary) {
            self.apply_refinement(refiner, input, &mut analysis).await;
        }

        self.build_record(input.text(), analysis)
    }

    fn refiner_for(&self, input: &ParseInput, primary: &CandidateEvent) -> Option<&dyn Refiner> {
        let refiner = self.refiner.as_deref()?;
        if input.deterministic() && !refiner.supports_determinism() {
            debug!(provider = refiner.name(), "deterministic request, skipping refinement");
            return None;
        }
        if !needs_refinement(primary, self.config.low_confidence_threshold) {
            return None;
        }
        Some(refiner)
    }

    async fn apply_refinement(
        &self,
        refiner: &dyn Refiner,
        input: &ParseInput,
        analysis: &mut Analysis,
    ) {
        let request = RefinementRequest::new(
            input.text(),
            &analysis.primary,
            &analysis.assets,
            &analysis.entities,
            input.deterministic(),
        );

        let timeout = self.config.refine_timeout;
        let outcome = match tokio::time::timeout(timeout, refiner.refine(&request)).await {
            Ok(result) => result,
            Err(_) => Err(RefineError::Timeout(timeout.as_millis() as u64)),
        };
        let refinement = match outcome {
            Ok(refinement) => refinement,
            Err(e) => {
                warn!(
                    provider = refiner.name(),
                    error = %e,
                    "refinement failed, keeping heuristics"
                );
                return;
            }
        };

        if let Some(event_type) = refinement.event_type
            && event_type != analysis.primary.event_type
        {
            debug!(
                from = %analysis.primary.event_type,
                to = %event_type,
                "refinement overrode event type"
            );
            // Scores stay heuristic.
            analysis.primary = CandidateEvent::new(
                event_type,
                analysis.primary.confidence,
                analysis.primary.impact_score,
            );
        }
        analysis.assets = merge_unique(&analysis.assets, refinement.assets.as_deref());
        analysis.entities = merge_unique(&analysis.entities, refinement.entities.as_deref());
    }

    fn build_record(&self, text: &str, analysis: Analysis) -> ParseRecord {
        let event_type: EventType = analysis.primary.event_type;
        let event_subtype = infer_event_subtype(text, event_type);
        let (legacy_event_type, legacy_jurisdiction) = map_to_legacy(
            event_type,
            event_subtype.as_deref(),
            analysis.jurisdiction.jurisdiction,
            text,
        );

        ParseRecord {
            event_type,
            legacy_event_type,
            event_subtype,
            topics: event_type.topics().to_vec(),
            assets: analysis.assets,
            entities: analysis.entities,
            jurisdiction: analysis.jurisdiction.jurisdiction,
            jurisdiction_basis: analysis.jurisdiction.basis,
            jurisdiction_confidence: analysis.jurisdiction.confidence,
            legacy_jurisdiction,
            sentiment: analysis.sentiment,
            impact_score: analysis.primary.impact_score,
            confidence: analysis.primary.confidence,
            market_direction: None,
            systemic_risk: None,
            retail_relevant: None,
            time_horizon: None,
            schema_version: SCHEMA_VERSION.to_string(),
            model_version: self.config.model_version.clone(),
        }
    }
}

fn log_analysis(analysis: &Analysis) {
    debug!(
        event_type = %analysis.primary.event_type,
        confidence = analysis.primary.confidence,
        impact = analysis.primary.impact_score,
        candidates = analysis.candidate_count,
        "classified"
    );
}
