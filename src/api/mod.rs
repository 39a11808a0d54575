//! API layer - HTTP handlers and routing
//!
//! Serves the question page:
//! - `GET /q/{question_id}` - load and render the question
//! - `POST /q/{question_id}` - submit an answer, then render the reloaded page
//! - `GET /health` - liveness probe

pub mod pages;
pub mod session;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::client::QuestionApi;
use crate::config::SubmitPolicy;
use crate::services::QuestionView;
use crate::theme::PageRenderer;

pub use session::RequestSession;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn QuestionApi>,
    pub renderer: Arc<PageRenderer>,
    pub policy: SubmitPolicy,
    /// Cookie carrying the signed-in user's id
    pub session_cookie: String,
}

impl AppState {
    pub fn new(
        api: Arc<dyn QuestionApi>,
        renderer: Arc<PageRenderer>,
        policy: SubmitPolicy,
        session_cookie: impl Into<String>,
    ) -> Self {
        Self {
            api,
            renderer,
            policy,
            session_cookie: session_cookie.into(),
        }
    }

    /// Fresh view for one request
    pub fn view(&self, question_id: impl Into<String>) -> QuestionView {
        QuestionView::new(self.api.clone(), question_id).with_policy(self.policy)
    }
}

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(pages::router())
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
