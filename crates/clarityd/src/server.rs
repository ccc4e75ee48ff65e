//! HTTP server for clarityd

use crate::generator::Generator;
use crate::routes;
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 256 * 1024;

/// Application state shared across handlers
pub struct AppState {
    /// None when no credential was configured; plan requests then fail with 503
    pub generator: Option<Arc<dyn Generator>>,
    /// Where the credential was expected (for the 503 message)
    pub credential_source: String,
    pub max_raw_text_chars: usize,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(generator: Arc<dyn Generator>, max_raw_text_chars: usize) -> Self {
        Self {
            generator: Some(generator),
            credential_source: String::new(),
            max_raw_text_chars,
            start_time: Instant::now(),
        }
    }

    /// State for a server that starts without a model credential
    pub fn without_generator(credential_source: &str, max_raw_text_chars: usize) -> Self {
        Self {
            generator: None,
            credential_source: credential_source.to_string(),
            max_raw_text_chars,
            start_time: Instant::now(),
        }
    }
}

/// Build the router (also used directly by tests)
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::plan_routes())
        .merge(routes::health_routes())
        .with_state(Arc::new(state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server
pub async fn run(state: AppState, bind: &str) -> Result<()> {
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("  Listening on http://{}", bind);

    axum::serve(listener, app).await?;
    Ok(())
}
