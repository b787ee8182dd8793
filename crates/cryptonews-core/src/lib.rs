pub mod feedback;
pub mod record;
pub mod taxonomy;

pub use feedback::{EvalCase, FeedbackSubmission};
pub use record::{
    MAX_TEXT_LENGTH, ParseInput, ParseRecord, SCHEMA_VERSION, SourceMeta, ValidationError,
};
pub use taxonomy::{
    EventFamily, EventType, Jurisdiction, JurisdictionBasis, LegacyEventType, LegacyJurisdiction,
    MarketDirection, Sentiment, TimeHorizon, Topic, precedence,
};
