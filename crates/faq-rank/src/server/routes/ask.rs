//! Ask endpoints: first page and subsequent pages

use axum::{extract::State, Json};

use crate::error::Result;
use crate::ranking::NextPage;
use crate::server::state::AppState;
use crate::types::{AskRequest, AskResponse, MessageResponse, NextPageResponse};

/// POST /ask - Rank the corpus for a question and return the top page
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    tracing::info!("Ask: \"{}\"", request.question);

    let page = state.manager().rank(&request.question).await?;
    Ok(Json(AskResponse::from_page(request.question, page)))
}

/// POST /ask/next - Next page of an existing ranking
pub async fn ask_next(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<NextPageResponse>> {
    let response = match state.manager().next_page(&request.question).await? {
        NextPage::Page(page) => NextPageResponse::Page(AskResponse::from_page(request.question, page)),
        NextPage::Exhausted => NextPageResponse::Exhausted(MessageResponse::new("no more answers")),
    };
    Ok(Json(response))
}
