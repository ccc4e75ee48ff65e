//! Error types for Clarity.
//!
//! The normalizer itself never fails; these cover the boundary around it
//! (request validation, credentials, the generator call, response parsing).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClarityError {
    #[error("{0} is required")]
    MissingInput(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Model credential is not configured ({0})")]
    MissingCredential(String),

    #[error("Generator error: {0}")]
    Generator(String),

    #[error("Model returned malformed JSON: {0}")]
    MalformedResponse(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl ClarityError {
    /// Failures caused by the caller rather than by a dependency.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ClarityError::MissingInput(_) | ClarityError::InvalidRequest(_)
        )
    }
}
