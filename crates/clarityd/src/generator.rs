//! Generator - the single I/O point: prompt in, untrusted JSON out.
//!
//! The credential is passed in at construction; nothing here reads the
//! environment. There is no retry policy: one request, one response.

use async_trait::async_trait;
use clarity_shared::prompt::SYSTEM_PROMPT;
use clarity_shared::{parse_model_response, ClarityError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Produces a JSON value (or fails) for a user prompt
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, user_prompt: &str) -> Result<Value, ClarityError>;

    /// Model identifier for logs
    fn model(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Client for OpenAI-compatible chat completion APIs in JSON mode
pub struct OpenAiGenerator {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiGenerator {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, ClarityError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClarityError::Generator(e.to_string()))?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }

    async fn call_chat(&self, user_prompt: &str) -> Result<String, ClarityError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            response_format: ResponseFormat { kind: "json_object" },
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        info!("[>]  LLM CALL [{}] ({} chars)", self.model, user_prompt.len());

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClarityError::Generator(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("[-]  Model API error {}: {}", status, error_text);
            return Err(ClarityError::Generator(format!(
                "model API returned {}",
                status
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClarityError::Generator(format!("unreadable response: {}", e)))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ClarityError::MalformedResponse("empty completion".to_string()))
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(&self, user_prompt: &str) -> Result<Value, ClarityError> {
        let start = Instant::now();
        let content = self.call_chat(user_prompt).await?;
        info!(
            "[<]  LLM RESPONSE ({} chars) in {:.2}s",
            content.len(),
            start.elapsed().as_secs_f64()
        );
        parse_model_response(&content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
