//! API routes for clarityd

use crate::errors::ApiError;
use crate::server::AppState;
use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use clarity_shared::prompt::build_user_prompt;
use clarity_shared::{normalize, ClarityError, NormalizedResult, TrustedInputs, VERSION};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

type AppStateArc = Arc<AppState>;

// ============================================================================
// Plan Routes
// ============================================================================

/// Request body; salary/essentials count only when they are JSON numbers
#[derive(Debug, Default)]
pub struct GeneratePlanRequest {
    pub raw_text: Option<String>,
    pub salary: Option<Value>,
    pub essentials: Option<Value>,
}

impl GeneratePlanRequest {
    /// Parse the raw body. An empty body reads as `{}` and a non-object body
    /// carries no fields; only text that is not JSON at all is rejected here.
    pub fn from_body(body: &[u8]) -> Result<Self, ClarityError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ClarityError::InvalidRequest(format!("body is not valid JSON: {}", e)))?;
        let field = |name: &str| value.get(name).cloned();
        Ok(Self {
            raw_text: value.get("rawText").and_then(Value::as_str).map(str::to_string),
            salary: field("salary"),
            essentials: field("essentials"),
        })
    }
}

pub fn plan_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/generate-plan", post(generate_plan))
}

async fn generate_plan(
    State(state): State<AppStateArc>,
    body: Bytes,
) -> Result<Json<NormalizedResult>, ApiError> {
    let req = GeneratePlanRequest::from_body(&body)?;
    let raw_text = req
        .raw_text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ClarityError::MissingInput("rawText".to_string()))?;
    if raw_text.chars().count() > state.max_raw_text_chars {
        return Err(ApiError::TooLong("rawText", state.max_raw_text_chars));
    }

    let generator = state
        .generator
        .as_ref()
        .ok_or_else(|| ClarityError::MissingCredential(state.credential_source.clone()))?;

    let trusted = TrustedInputs::from_request(req.salary.as_ref(), req.essentials.as_ref());
    let prompt = build_user_prompt(raw_text, &trusted);

    info!("  Generating plan with {} ({} chars)", generator.model(), raw_text.len());
    let raw = generator.generate(&prompt).await?;
    let result = normalize(&raw, &trusted);

    info!(
        "  Plan ready: {} debts, {} plan steps, stability {}",
        result.extracted.debts.len(),
        result.next_7_days_plan.len(),
        result.risk_assessment.stability_score_0_to_100
    );
    Ok(Json(result))
}

// ============================================================================
// Health Routes
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub generator_configured: bool,
    pub uptime_seconds: u64,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health))
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
        generator_configured: state.generator.is_some(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
