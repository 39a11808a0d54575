//! Page renderer
//!
//! This module renders the question page using Tera.
//! Features:
//! - Built-in templates embedded in the binary
//! - Per-template overrides from a directory on disk
//! - Fallback to an error template, then to plain HTML

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_embed::RustEmbed;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fs;
use std::path::Path;
use tera::{Context as TeraContext, Tera};

use crate::config::Config;
use crate::services::{QuestionView, RelativeTimeFormatter};

mod context;
mod error;

pub use context::{AnswerPanel, Labels, PageContext, QuestionPanel};
pub use error::ThemeError;

/// Template rendered for a question page
pub const QUESTION_TEMPLATE: &str = "question.html";

/// Template tried when another one fails
const ERROR_TEMPLATE: &str = "error.html";

/// Templates shipped with the binary
#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.html"]
struct BuiltinTemplates;

/// Renders question views to HTML
pub struct PageRenderer {
    /// Tera template engine instance
    tera: Tera,
    /// Timestamp phrasing for the configured locale
    formatter: RelativeTimeFormatter,
    /// Answer placeholders shown while loading
    skeleton_rows: usize,
}

impl PageRenderer {
    /// Create a renderer with the built-in templates only
    pub fn new(formatter: RelativeTimeFormatter, skeleton_rows: usize) -> Result<Self> {
        Self::build(formatter, skeleton_rows, None)
    }

    /// Create a renderer whose templates may be replaced from `dir`
    ///
    /// Any `.html` file under `dir` replaces the built-in template with the
    /// same relative name; new names are added alongside.
    pub fn with_overrides(
        formatter: RelativeTimeFormatter,
        skeleton_rows: usize,
        dir: &Path,
    ) -> Result<Self> {
        Self::build(formatter, skeleton_rows, Some(dir))
    }

    /// Create a renderer from the locale, view and theme sections
    pub fn from_config(config: &Config) -> Result<Self> {
        let formatter = RelativeTimeFormatter::from_config(&config.locale);
        let rows = config.view.skeleton_rows;
        match &config.theme.path {
            Some(dir) => Self::with_overrides(formatter, rows, dir),
            None => Self::new(formatter, rows),
        }
    }

    fn build(
        formatter: RelativeTimeFormatter,
        skeleton_rows: usize,
        overrides: Option<&Path>,
    ) -> Result<Self> {
        let mut templates: BTreeMap<String, String> = BTreeMap::new();

        for name in BuiltinTemplates::iter() {
            let file = BuiltinTemplates::get(&name)
                .ok_or_else(|| ThemeError::TemplateError(format!("Missing embedded template {}", name)))?;
            let content = std::str::from_utf8(&file.data)
                .map_err(|e| ThemeError::TemplateError(format!("Template {} is not UTF-8: {}", name, e)))?;
            templates.insert(name.to_string(), content.to_string());
        }

        if let Some(dir) = overrides {
            if !dir.is_dir() {
                return Err(ThemeError::NotFound(dir.display().to_string()).into());
            }
            let before = templates.len();
            collect_templates_from_dir(dir, dir, &mut templates)?;
            tracing::info!(
                "Template overrides loaded from {:?} ({} new)",
                dir,
                templates.len() - before
            );
        }

        // Adding them together lets Tera resolve `extends` regardless of order.
        let mut tera = Tera::default();
        tera.add_raw_templates(templates.into_iter().collect::<Vec<_>>())
            .map_err(|e| ThemeError::TemplateError(format!("Failed to load templates: {}", error_chain(&e))))?;

        if !tera.get_template_names().any(|n| n == QUESTION_TEMPLATE) {
            return Err(ThemeError::TemplateError(format!("{} is missing", QUESTION_TEMPLATE)).into());
        }

        Ok(Self {
            tera,
            formatter,
            skeleton_rows,
        })
    }

    /// Render a template with context
    pub fn render(&self, template: &str, context: &TeraContext) -> Result<String> {
        self.tera.render(template, context).map_err(|e| {
            ThemeError::TemplateError(format!("Failed to render '{}': {}", template, error_chain(&e))).into()
        })
    }

    /// Template context for `view` at instant `now`
    pub fn page_context(&self, view: &QuestionView, now: DateTime<Utc>) -> PageContext {
        PageContext::from_view(view, &self.formatter, self.skeleton_rows, now)
    }

    /// Render the question page for `view`
    pub fn render_view(&self, view: &QuestionView) -> Result<String> {
        self.render_view_at(view, Utc::now())
    }

    /// Render the question page with timestamps relative to `now`
    pub fn render_view_at(&self, view: &QuestionView, now: DateTime<Utc>) -> Result<String> {
        let context = TeraContext::from_serialize(self.page_context(view, now))
            .map_err(|e| ThemeError::TemplateError(format!("Invalid page context: {}", e)))?;
        self.render(QUESTION_TEMPLATE, &context)
    }

    /// Render the question page, degrading to an error page on failure
    pub fn render_view_or_error(&self, view: &QuestionView) -> String {
        match TeraContext::from_serialize(self.page_context(view, Utc::now())) {
            Ok(context) => self.render_with_fallback(QUESTION_TEMPLATE, &context),
            Err(e) => Self::simple_error_page(QUESTION_TEMPLATE, &e.to_string()),
        }
    }

    /// Render a template with fallback to the error template or simple HTML
    pub fn render_with_fallback(&self, template: &str, context: &TeraContext) -> String {
        match self.render(template, context) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(
                    "Failed to render template '{}': {}, trying error template",
                    template,
                    e
                );

                let mut error_context = context.clone();
                error_context.insert("error_message", &e.to_string());
                error_context.insert("requested_template", template);

                match self.render(ERROR_TEMPLATE, &error_context) {
                    Ok(html) => html,
                    Err(error_template_err) => {
                        tracing::warn!(
                            "Failed to render error template: {}, returning simple HTML error page",
                            error_template_err
                        );
                        Self::simple_error_page(template, &e.to_string())
                    }
                }
            }
        }
    }

    /// Names of all loaded templates, sorted
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }

    /// Last-resort page when no template can be rendered
    fn simple_error_page(template: &str, error: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Template Error</title>
</head>
<body>
    <h1>Template Error</h1>
    <p>Failed to render template: <code>{}</code></p>
    <p><strong>Error:</strong> {}</p>
</body>
</html>"#,
            tera::escape_html(template),
            tera::escape_html(error)
        )
    }
}

/// Collect `.html` files under `current_path`, named relative to `base_path`
fn collect_templates_from_dir(
    base_path: &Path,
    current_path: &Path,
    templates: &mut BTreeMap<String, String>,
) -> Result<()> {
    for entry in fs::read_dir(current_path).map_err(ThemeError::from)? {
        let path = entry.map_err(ThemeError::from)?.path();

        if path.is_dir() {
            collect_templates_from_dir(base_path, &path, templates)?;
        } else if path.extension().map_or(false, |ext| ext == "html") {
            let relative_path = path
                .strip_prefix(base_path)
                .map_err(|_| ThemeError::TemplateError("Failed to get relative path".to_string()))?;

            // Forward slashes on every platform
            let template_name = relative_path.to_string_lossy().replace('\\', "/");

            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read template: {:?}", path))?;

            templates.insert(template_name, content);
        }
    }

    Ok(())
}

/// Tera hides the useful part of an error in its source chain
fn error_chain(e: &tera::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(s) = source {
        message.push_str(&format!("\n  Caused by: {}", s));
        source = s.source();
    }
    message
}
