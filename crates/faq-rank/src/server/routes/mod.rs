//! API routes for the ranking server

pub mod ask;
pub mod feedback;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;
use crate::types::MessageResponse;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/ping", get(ping))
        // Ranking
        .route("/ask", post(ask::ask))
        .route("/ask/next", post(ask::ask_next))
        // Feedback
        .route("/feedback", post(feedback::submit_feedback))
        // Info
        .route("/info", get(info))
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("FAQ ranking service is running"))
}

async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse::new("pong"))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let manager = state.manager();
    Json(serde_json::json!({
        "name": "faq-rank",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Ranks FAQ answers for a question with an extractive QA model",
        "corpus_size": manager.corpus().len(),
        "active_sessions": manager.session_count(),
        "scorer": manager.scorer_name(),
        "endpoints": {
            "POST /ask": "Rank answers for a question (first page)",
            "POST /ask/next": "Next page of answers",
            "POST /feedback": "Save the chosen answer for a question",
            "GET /ping": "Liveness"
        }
    }))
}
