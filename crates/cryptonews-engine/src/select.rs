//! Primary-event selection.
//!
//! The winner maximises, in order: impact score, confidence, then the
//! precedence rank (lower rank wins). Impact dominates, so a high-impact
//! security mention outranks a more confident but lower-impact rule. Full ties
//! fall to the earliest candidate in rule order.

use std::cmp::Ordering;

use cryptonews_core::precedence;

use crate::candidates::{CandidateEvent, fallback_candidate};

fn rank(a: &CandidateEvent, b: &CandidateEvent) -> Ordering {
    a.impact_score
        .total_cmp(&b.impact_score)
        .then(a.confidence.total_cmp(&b.confidence))
        .then(precedence(b.event_type).cmp(&precedence(a.event_type)))
}

/// Pick the primary event. An empty candidate list yields the fallback.
pub fn select_primary(text: &str, candidates: &[CandidateEvent]) -> CandidateEvent {
    let mut best: Option<&CandidateEvent> = None;
    for candidate in candidates {
        match best {
            Some(current) if rank(candidate, current) != Ordering::Greater => {}
            _ => best = Some(candidate),
        }
    }
    best.copied().unwrap_or_else(|| fallback_candidate(text))
}
