//! `POST /parse`: classify one text.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, HeaderValue};
use cryptonews_core::{ParseInput, ParseRecord, SourceMeta};
use cryptonews_store::ParseRun;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ApiResult;
use crate::state::{AppState, run_store};

pub const PARSE_ID_HEADER: &str = "x-parse-id";

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
    #[serde(default)]
    pub deterministic: bool,
    #[serde(flatten)]
    pub meta: SourceMeta,
}

/// Classify, then persist when enabled. A persistence failure is logged and
/// the record is still returned, only without the `X-Parse-Id` header.
pub async fn parse(
    State(state): State<AppState>,
    payload: Result<Json<ParseRequest>, JsonRejection>,
) -> ApiResult<(HeaderMap, Json<ParseRecord>)> {
    let Json(req) = payload?;
    let input = ParseInput::new(&req.text, req.deterministic)?;
    let record = state.classifier.classify(&input).await;

    let mut headers = HeaderMap::new();
    if let Some(store) = state.store.clone() {
        let text = input.text().to_string();
        let meta = req.meta;
        let stored = record.clone();
        let result = run_store(store, move |s| {
            s.store_parse(ParseRun {
                text: &text,
                meta: &meta,
                record: &stored,
            })
        })
        .await;
        match result {
            Ok(id) => {
                debug!(parse_id = id, "persisted parse run");
                headers.insert(PARSE_ID_HEADER, HeaderValue::from(id));
            }
            Err(e) => warn!(error = %e, "failed to persist parse run"),
        }
    }

    Ok((headers, Json(record)))
}
