//! Question view
//!
//! Owns the state behind the question page and drives its cycle:
//! - `load` fetches the question with its relations
//! - `submit_answer` posts the draft and reports the outcome
//! - `submit` applies the configured policy to that outcome (clear + reload,
//!   or keep the draft and show the error)
//!
//! The view never inserts an answer locally. A new answer only shows up
//! through the reload that follows a submit.

use std::sync::Arc;

use crate::client::{ClientError, QuestionApi};
use crate::config::SubmitPolicy;
use crate::models::{NewAnswer, QuestionDetail};
use crate::services::session::SessionProvider;

/// Why an answer was not accepted
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Draft was empty or whitespace; nothing was sent
    #[error("Answer cannot be empty")]
    EmptyDraft,

    /// The API call failed or was refused
    #[error(transparent)]
    Api(#[from] ClientError),
}

/// Render state of the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// A load is pending; only placeholders are shown
    Loading,
    /// The last load finished, successfully or not
    Loaded,
}

/// State and operations of one question page
pub struct QuestionView {
    api: Arc<dyn QuestionApi>,
    question_id: String,
    policy: SubmitPolicy,
    loading: bool,
    question: Option<QuestionDetail>,
    content: String,
    submit_error: Option<String>,
}

impl std::fmt::Debug for QuestionView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionView")
            .field("question_id", &self.question_id)
            .field("policy", &self.policy)
            .field("loading", &self.loading)
            .field("has_question", &self.question.is_some())
            .field("draft_len", &self.content.len())
            .finish()
    }
}

impl QuestionView {
    /// Create a view for the question identified by the route parameter
    pub fn new(api: Arc<dyn QuestionApi>, question_id: impl Into<String>) -> Self {
        Self {
            api,
            question_id: question_id.into(),
            policy: SubmitPolicy::default(),
            loading: true,
            question: None,
            content: String::new(),
            submit_error: None,
        }
    }

    /// Set the draft policy for failed submits
    pub fn with_policy(mut self, policy: SubmitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn question_id(&self) -> &str {
        &self.question_id
    }

    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn state(&self) -> ViewState {
        if self.loading {
            ViewState::Loading
        } else {
            ViewState::Loaded
        }
    }

    /// Loaded question, `None` before the first load or after a failed one
    pub fn question(&self) -> Option<&QuestionDetail> {
        self.question.as_ref()
    }

    /// Current answer draft
    pub fn draft(&self) -> &str {
        &self.content
    }

    /// Replace the answer draft
    pub fn set_draft(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Message from the last failed submit, cleared by the next attempt
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Fetch the question and replace whatever was shown before
    ///
    /// On failure the view ends up loaded but empty, and the error is
    /// returned to the caller.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.loading = true;
        tracing::debug!("Loading question {}", self.question_id);

        let result = self.api.fetch_question(&self.question_id).await;
        self.loading = false;

        match result {
            Ok(question) => {
                if question.is_none() {
                    tracing::info!("Question {} not found", self.question_id);
                }
                self.question = question;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load question {}: {}", self.question_id, e);
                self.question = None;
                Err(e)
            }
        }
    }

    /// Post the draft as a new answer, leaving view state untouched
    pub async fn submit_answer(&self, session: &dyn SessionProvider) -> Result<(), SubmitError> {
        if self.content.trim().is_empty() {
            return Err(SubmitError::EmptyDraft);
        }

        let answer = NewAnswer::new(
            self.content.clone(),
            session.current_user_id(),
            self.question_id.clone(),
        );
        self.api.post_answer(&answer).await?;

        tracing::info!("Answer posted to question {}", self.question_id);
        Ok(())
    }

    /// Submit the draft, then clear and reload according to the policy
    ///
    /// - success: draft cleared, question reloaded
    /// - empty draft: nothing sent, nothing reloaded
    /// - API failure with `PreserveDraft`: draft kept, error recorded
    /// - API failure with `AlwaysClear`: draft cleared, question reloaded
    ///
    /// The submit outcome is returned either way. A failing reload is logged
    /// and leaves the view empty.
    pub async fn submit(&mut self, session: &dyn SessionProvider) -> Result<(), SubmitError> {
        self.submit_error = None;
        let outcome = self.submit_answer(session).await;

        let reload = match (&outcome, self.policy) {
            (Ok(()), _) => true,
            (Err(SubmitError::EmptyDraft), _) => {
                self.submit_error = Some(SubmitError::EmptyDraft.to_string());
                false
            }
            (Err(e), SubmitPolicy::PreserveDraft) => {
                tracing::warn!("Answer to question {} failed: {}", self.question_id, e);
                self.submit_error = Some(e.to_string());
                false
            }
            (Err(e), SubmitPolicy::AlwaysClear) => {
                tracing::warn!("Answer to question {} failed, reloading anyway: {}", self.question_id, e);
                true
            }
        };

        if reload {
            self.content.clear();
            // load already logged the failure and emptied the view.
            let _ = self.load().await;
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ApiRequest, MemoryQuestionApi};
    use crate::models::{Question, Tag, User};
    use crate::services::session::StaticSession;
    use async_trait::async_trait;

    fn sample_question() -> QuestionDetail {
        QuestionDetail::new(
            Question {
                id: "q1".to_string(),
                title: "T".to_string(),
                content: "C".to_string(),
                created_at: None,
                author_id: Some("u1".to_string()),
            },
            User::new("u1", "A", "B"),
        )
        .with_tags(vec![Tag::new("x")])
    }

    fn setup() -> (Arc<MemoryQuestionApi>, QuestionView) {
        let api = Arc::new(MemoryQuestionApi::new());
        api.insert_question(sample_question());
        let view = QuestionView::new(api.clone(), "q1");
        (api, view)
    }

    /// Backend whose every call fails
    struct BrokenApi;

    #[async_trait]
    impl QuestionApi for BrokenApi {
        async fn fetch_question(&self, _question_id: &str) -> Result<Option<QuestionDetail>, ClientError> {
            let err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
            Err(ClientError::Decode(err))
        }

        async fn post_answer(&self, _answer: &NewAnswer) -> Result<(), ClientError> {
            Err(ClientError::Status { status: 500 })
        }
    }

    #[test]
    fn test_initial_state() {
        let (_api, view) = setup();

        assert!(view.is_loading());
        assert_eq!(view.state(), ViewState::Loading);
        assert!(view.question().is_none());
        assert_eq!(view.draft(), "");
        assert!(view.submit_error().is_none());
        assert_eq!(view.policy(), SubmitPolicy::PreserveDraft);
    }

    #[tokio::test]
    async fn test_mount_issues_single_get() {
        let (api, mut view) = setup();

        view.load().await.unwrap();

        assert_eq!(api.requests(), vec![ApiRequest::FetchQuestion("q1".to_string())]);
        assert_eq!(view.state(), ViewState::Loaded);
        assert_eq!(view.question().unwrap().question.title, "T");
    }

    #[tokio::test]
    async fn test_load_missing_question() {
        let (_api, view) = setup();
        let mut view = QuestionView::new(view.api.clone(), "nope");

        view.load().await.unwrap();

        assert!(!view.is_loading());
        assert!(view.question().is_none());
    }

    #[tokio::test]
    async fn test_load_failure_leaves_view_loaded_and_empty() {
        let mut view = QuestionView::new(Arc::new(BrokenApi), "q1");

        let result = view.load().await;

        assert!(matches!(result, Err(ClientError::Decode(_))));
        assert_eq!(view.state(), ViewState::Loaded);
        assert!(view.question().is_none());
    }

    #[tokio::test]
    async fn test_submit_posts_then_reloads() {
        let (api, mut view) = setup();
        view.load().await.unwrap();
        view.set_draft("hello");

        view.submit(&StaticSession::signed_in("u1")).await.unwrap();

        assert_eq!(
            api.requests(),
            vec![
                ApiRequest::FetchQuestion("q1".to_string()),
                ApiRequest::PostAnswer(NewAnswer::new("hello", Some("u1".to_string()), "q1")),
                ApiRequest::FetchQuestion("q1".to_string()),
            ]
        );
        assert_eq!(view.draft(), "");
        let answers = &view.question().unwrap().answers;
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].answer.content, "hello");
    }

    #[tokio::test]
    async fn test_submit_answer_does_not_touch_state() {
        let (api, mut view) = setup();
        view.load().await.unwrap();
        view.set_draft("hello");

        view.submit_answer(&StaticSession::signed_in("u1")).await.unwrap();

        // Posted, but neither cleared nor reloaded: no optimistic insert.
        assert_eq!(view.draft(), "hello");
        assert!(view.question().unwrap().answers.is_empty());
        assert_eq!(api.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_draft_is_not_sent() {
        let (api, mut view) = setup();
        view.load().await.unwrap();
        view.set_draft("   ");

        let result = view.submit(&StaticSession::signed_in("u1")).await;

        assert!(matches!(result, Err(SubmitError::EmptyDraft)));
        assert_eq!(api.requests().len(), 1);
        assert_eq!(view.draft(), "   ");
        assert_eq!(view.submit_error(), Some("Answer cannot be empty"));
    }

    #[tokio::test]
    async fn test_anonymous_submit_passes_through_and_preserves_draft() {
        let (api, mut view) = setup();
        view.load().await.unwrap();
        view.set_draft("hello");

        let result = view.submit(&StaticSession::anonymous()).await;

        assert!(matches!(result, Err(SubmitError::Api(ClientError::Rejected(_)))));
        // The anonymous post still reached the backend, without an author.
        assert_eq!(
            api.requests()[1],
            ApiRequest::PostAnswer(NewAnswer::new("hello", None, "q1"))
        );
        assert_eq!(api.requests().len(), 2);
        assert_eq!(view.draft(), "hello");
        assert!(view.submit_error().unwrap().contains("authentication required"));
    }

    #[tokio::test]
    async fn test_always_clear_reloads_after_failure() {
        let (api, view) = setup();
        let mut view = QuestionView::new(view.api.clone(), "q1").with_policy(SubmitPolicy::AlwaysClear);
        view.load().await.unwrap();
        view.set_draft("hello");
        api.refuse_answers(Some("maintenance"));

        let result = view.submit(&StaticSession::signed_in("u1")).await;

        assert!(result.is_err());
        assert_eq!(view.draft(), "");
        assert!(view.submit_error().is_none());
        assert_eq!(api.requests().len(), 3);
        assert_eq!(api.requests()[2], ApiRequest::FetchQuestion("q1".to_string()));
    }

    #[tokio::test]
    async fn test_next_submit_clears_previous_error() {
        let (api, mut view) = setup();
        view.load().await.unwrap();
        view.set_draft("hello");
        api.refuse_answers(Some("maintenance"));
        assert!(view.submit(&StaticSession::signed_in("u1")).await.is_err());
        assert!(view.submit_error().is_some());

        api.refuse_answers(None);
        view.submit(&StaticSession::signed_in("u1")).await.unwrap();

        assert!(view.submit_error().is_none());
        assert_eq!(view.question().unwrap().answers.len(), 1);
    }

    #[tokio::test]
    async fn test_reload_failure_after_submit_empties_view() {
        let mut view = QuestionView::new(Arc::new(BrokenApi), "q1").with_policy(SubmitPolicy::AlwaysClear);
        view.set_draft("hello");

        let result = view.submit(&StaticSession::signed_in("u1")).await;

        assert!(matches!(result, Err(SubmitError::Api(ClientError::Status { status: 500 }))));
        assert!(view.question().is_none());
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn test_repeated_loads_are_stable() {
        let (_api, mut view) = setup();

        view.load().await.unwrap();
        let first = view.question().cloned();
        view.load().await.unwrap();

        assert_eq!(view.question().cloned(), first);
    }
}
