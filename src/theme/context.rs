//! Template context for the question page
//!
//! Flattens a `QuestionView` into the values the templates print: names are
//! joined, timestamps are already phrased relative to "now".

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Locale;
use crate::models::{AnswerWithAuthor, QuestionDetail};
use crate::services::{QuestionView, RelativeTimeFormatter};

/// Fixed page strings per locale
#[derive(Debug, Clone, Serialize)]
pub struct Labels {
    pub page_title: &'static str,
    pub heading: &'static str,
    pub submit: &'static str,
    pub submit_failed: &'static str,
}

impl Labels {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::PtBr => Self {
                page_title: "Pergunta",
                heading: "Responder",
                submit: "Enviar Resposta",
                submit_failed: "Não foi possível enviar a resposta",
            },
            Locale::EnUs => Self {
                page_title: "Question",
                heading: "Your Answer",
                submit: "Post Answer",
                submit_failed: "Could not post your answer",
            },
        }
    }
}

/// Question header, body and answers as rendered
#[derive(Debug, Clone, Serialize)]
pub struct QuestionPanel {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub author_name: String,
    pub created: Option<String>,
    pub answers: Vec<AnswerPanel>,
}

/// One answer as rendered
#[derive(Debug, Clone, Serialize)]
pub struct AnswerPanel {
    pub id: String,
    pub content: String,
    pub author_name: String,
    pub created: Option<String>,
}

/// Everything `question.html` needs
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub lang: &'static str,
    pub page_title: String,
    pub loading: bool,
    pub question: Option<QuestionPanel>,
    pub draft: String,
    pub notice: Option<String>,
    pub form_action: String,
    pub skeleton_rows: Vec<usize>,
    pub labels: Labels,
}

impl PageContext {
    /// Build the context for `view`, phrasing timestamps relative to `now`
    pub fn from_view(
        view: &QuestionView,
        formatter: &RelativeTimeFormatter,
        skeleton_rows: usize,
        now: DateTime<Utc>,
    ) -> Self {
        let labels = Labels::for_locale(formatter.locale());
        let loading = view.is_loading();

        // Nothing from a previous load leaks into the placeholder state.
        let question = if loading {
            None
        } else {
            view.question().map(|q| question_panel(q, formatter, now))
        };

        let page_title = question
            .as_ref()
            .map(|q| q.title.clone())
            .unwrap_or_else(|| labels.page_title.to_string());

        Self {
            lang: formatter.locale().tag(),
            page_title,
            loading,
            question,
            draft: view.draft().to_string(),
            notice: view.submit_error().map(str::to_string),
            form_action: format!("/q/{}", urlencoding::encode(view.question_id())),
            skeleton_rows: (1..=skeleton_rows).collect(),
            labels,
        }
    }
}

fn question_panel(
    detail: &QuestionDetail,
    formatter: &RelativeTimeFormatter,
    now: DateTime<Utc>,
) -> QuestionPanel {
    QuestionPanel {
        id: detail.question.id.clone(),
        title: detail.question.title.clone(),
        content: detail.question.content.clone(),
        tags: detail.tags.iter().map(|t| t.label().to_string()).collect(),
        author_name: detail.author.full_name(),
        created: detail.question.created_at.map(|at| formatter.format(at, now)),
        answers: detail
            .answers
            .iter()
            .map(|a| answer_panel(a, formatter, now))
            .collect(),
    }
}

fn answer_panel(
    answer: &AnswerWithAuthor,
    formatter: &RelativeTimeFormatter,
    now: DateTime<Utc>,
) -> AnswerPanel {
    AnswerPanel {
        id: answer.answer.id.clone(),
        content: answer.answer.content.clone(),
        author_name: answer.author.full_name(),
        created: answer.answer.created_at.map(|at| formatter.format(at, now)),
    }
}
