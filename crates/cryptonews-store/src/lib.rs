//! Storage layer: parse runs and reviewer feedback.
//!
//! The [`ParseStore`] trait is the seam the server and CLI program against;
//! [`DuckStore`] (feature `duckdb`) is the embedded implementation.

mod error;
pub use error::StoreError;

#[cfg(feature = "duckdb")]
mod duck;
#[cfg(feature = "duckdb")]
pub use duck::DuckStore;

use cryptonews_core::{EvalCase, FeedbackSubmission, ParseRecord, SourceMeta};

/// One classification to persist: input text, source metadata, and the
/// record returned to the caller.
#[derive(Debug, Clone, Copy)]
pub struct ParseRun<'a> {
    pub text: &'a str,
    pub meta: &'a SourceMeta,
    pub record: &'a ParseRecord,
}

/// Persistence for parse runs and feedback.
///
/// Implementations are synchronous; async callers run them on a blocking
/// thread.
pub trait ParseStore: Send {
    /// Store a run and return its id.
    fn store_parse(&self, run: ParseRun<'_>) -> Result<i64, StoreError>;

    /// Input text of a stored run, if the run exists.
    fn load_text(&self, parse_id: i64) -> Result<Option<String>, StoreError>;

    /// Store feedback and return its id.
    ///
    /// An explicit `parse_id` must name an existing run. With only an
    /// `input_id`, the latest run carrying that id supplies the text.
    fn store_feedback(&self, submission: &FeedbackSubmission) -> Result<i64, StoreError>;

    /// Feedback with recoverable text, as eval cases, oldest first.
    fn export_feedback(&self) -> Result<Vec<EvalCase>, StoreError>;
}
