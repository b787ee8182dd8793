//! `POST /feedback`: record a reviewer correction.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use cryptonews_core::FeedbackSubmission;
use serde::Serialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, run_store};

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub status: &'static str,
    pub feedback_id: i64,
}

pub async fn feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackSubmission>, JsonRejection>,
) -> ApiResult<Json<FeedbackResponse>> {
    let store = state.store.clone().ok_or(ApiError::PersistenceDisabled)?;
    let Json(submission) = payload?;
    if !submission.is_correlated() {
        return Err(ApiError::InvalidRequest(
            "feedback needs a parse_id or input_id".into(),
        ));
    }

    let feedback_id = run_store(store, move |s| s.store_feedback(&submission)).await?;
    info!(feedback_id, "stored feedback");
    Ok(Json(FeedbackResponse {
        status: "stored",
        feedback_id,
    }))
}
