//! CLI command implementations

use crate::config::Config;
use crate::generator::OpenAiGenerator;
use crate::server::{self, AppState};
use anyhow::{Context, Result};
use clarity_shared::{normalize, parse_model_response, NormalizedResult, TrustedInputs};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Start the HTTP server. A missing credential is not fatal: the server
/// still answers health checks and reports 503 for plan requests.
pub async fn serve(config: &Config) -> Result<()> {
    let llm = &config.llm;
    let state = match llm.resolve_api_key() {
        Ok(api_key) => {
            let generator = OpenAiGenerator::new(
                &llm.base_url,
                &llm.model,
                api_key,
                Duration::from_secs(llm.timeout_secs),
            )?;
            info!("  Generator: {} at {}", llm.model, llm.base_url);
            AppState::new(Arc::new(generator), llm.max_raw_text_chars)
        }
        Err(e) => {
            warn!("  {} - plan requests will fail until configured", e);
            AppState::without_generator(&llm.api_key_env, llm.max_raw_text_chars)
        }
    };

    server::run(state, &config.server.bind).await
}

/// Normalize a captured model reply from disk
pub fn normalize_file(path: &Path, trusted: &TrustedInputs) -> Result<NormalizedResult> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let raw = parse_model_response(&text)
        .with_context(|| format!("{} does not contain model JSON", path.display()))?;
    Ok(normalize(&raw, trusted))
}
