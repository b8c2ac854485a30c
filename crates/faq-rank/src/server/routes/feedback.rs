//! Feedback endpoint

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{FeedbackRequest, MessageResponse};

/// POST /feedback - Store the chosen answer and reset the question's ranking
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<MessageResponse>> {
    state
        .manager()
        .record_feedback(&request.question, &request.chosen_answer)
        .await?;

    Ok(Json(MessageResponse::new("feedback saved")))
}
