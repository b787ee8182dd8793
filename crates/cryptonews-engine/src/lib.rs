pub mod assets;
pub mod candidates;
pub mod classifier;
pub mod cues;
pub mod entities;
pub mod eval;
#[cfg(feature = "http")]
pub mod http;
pub mod jurisdiction;
pub mod legacy;
pub mod refine;
pub mod select;
pub mod sentiment;
pub mod subtype;

pub use assets::{extract_assets, is_crypto_related};
pub use candidates::{CandidateEvent, generate_candidates};
pub use classifier::{Analysis, Classifier, ClassifierConfig, DEFAULT_MODEL_VERSION, analyze};
pub use entities::extract_entities;
pub use eval::{EvalError, EvalReport, load_cases, parse_cases, run_cases};
#[cfg(feature = "http")]
pub use http::HttpRefiner;
pub use jurisdiction::{JurisdictionResolution, resolve_jurisdiction, resolve_jurisdiction_detail};
pub use legacy::map_to_legacy;
pub use refine::{NoopRefiner, RefineError, Refinement, RefinementRequest, Refiner};
pub use select::select_primary;
pub use sentiment::infer_sentiment;
pub use subtype::infer_event_subtype;
