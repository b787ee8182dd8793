use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("parse run {0} not found")]
    ParseNotFound(i64),

    #[error("feedback needs a parse_id or input_id")]
    Uncorrelated,

    #[error("no results for query")]
    NoResults,

    #[cfg(feature = "duckdb")]
    #[error("duckdb error: {0}")]
    DuckDb(#[from] ::duckdb::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
