//! qa-page - Question detail page for a Q&A site

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qa_page::{
    api::{self, AppState},
    client::create_client,
    config::Config,
    theme::PageRenderer,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qa_page=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting qa-page...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!(
        "Configuration loaded (locale {}, submit policy {:?})",
        config.locale.name,
        config.view.submit_policy
    );

    // Question API client
    let api = create_client(&config.api)?;

    // Page renderer
    let renderer = PageRenderer::from_config(&config)?;
    tracing::info!("Page renderer initialized: {} templates", renderer.template_names().len());

    let state = AppState::new(
        api,
        Arc::new(renderer),
        config.view.submit_policy,
        config.server.session_cookie.clone(),
    );

    // Build router
    let app = api::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
