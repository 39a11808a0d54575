//! Question page handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;

use super::{AppState, RequestSession};
use crate::services::SubmitError;

pub fn router() -> Router<AppState> {
    Router::new().route("/q/{question_id}", get(show_question).post(answer_question))
}

/// Answer form body
#[derive(Debug, Deserialize)]
pub struct AnswerForm {
    #[serde(default)]
    pub content: String,
}

/// Load and render a question
///
/// A missing question renders an empty page with the answer form. A failing
/// API call renders the same page with `502 Bad Gateway`.
async fn show_question(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> Response {
    let mut view = state.view(question_id);
    let status = match view.load().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::BAD_GATEWAY,
    };

    (status, Html(state.renderer.render_view_or_error(&view))).into_response()
}

/// Submit an answer and render the resulting page
///
/// The page reflects the submit policy: after success the draft is empty and
/// the new answer comes from the reload.
async fn answer_question(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    RequestSession(session): RequestSession,
    Form(form): Form<AnswerForm>,
) -> Response {
    let mut view = state.view(question_id);
    if let Err(e) = view.load().await {
        tracing::warn!("Answering a question that failed to load: {}", e);
    }
    view.set_draft(form.content);

    let status = match view.submit(&session).await {
        Ok(()) => StatusCode::OK,
        Err(SubmitError::EmptyDraft) => StatusCode::UNPROCESSABLE_ENTITY,
        Err(SubmitError::Api(_)) => StatusCode::BAD_GATEWAY,
    };

    (status, Html(state.renderer.render_view_or_error(&view))).into_response()
}
