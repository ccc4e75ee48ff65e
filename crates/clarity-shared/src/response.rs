//! Model response text -> JSON value.
//!
//! Robust extraction that handles common LLM output variations:
//! - markdown fences (```json ... ``` or ``` ... ```)
//! - prose before or after the object
//!
//! A parse failure here is an error: it happens before normalization.

use crate::error::ClarityError;
use serde_json::Value;

/// Extract the JSON object text from a model reply
pub fn extract_json(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut inner = trimmed;
    if inner.starts_with("```") {
        // Drop the opening fence line (with optional language tag)
        inner = inner.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
        if let Some(end) = inner.rfind("```") {
            inner = &inner[..end];
        }
    }

    let start = inner.find('{')?;
    let end = inner.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(inner[start..=end].trim())
}

/// Parse a model reply into a JSON value for the normalizer
pub fn parse_model_response(text: &str) -> Result<Value, ClarityError> {
    // First try direct parse
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }

    let json_text = extract_json(text)
        .ok_or_else(|| ClarityError::MalformedResponse("no JSON object in model reply".to_string()))?;
    serde_json::from_str(json_text).map_err(|e| ClarityError::MalformedResponse(e.to_string()))
}
