//! Shared types and the normalization engine for Clarity.
//!
//! The generative model is treated as an untrusted producer: its JSON goes
//! through [`normalize`] and comes out schema-conformant, with the stability
//! score recomputed and day 1 / scripts repaired.

pub mod coerce;
pub mod error;
pub mod normalizer;
pub mod plan;
pub mod prompt;
pub mod repair;
pub mod response;
pub mod schema;
pub mod scripts;
pub mod stability;
pub mod threats;

pub use error::ClarityError;
pub use normalizer::{normalize, TrustedInputs};
pub use response::parse_model_response;
pub use schema::{
    CalmSummary, CollectionMessage, Debt, DebtType, Extracted, Intimidation, NegotiationScript,
    NormalizedResult, PlanStep, RiskAssessment, RiskLevel, RiskTag, ScriptBook, ThreatClass,
    DEFAULT_SCRIPT_KEY,
};

/// Crate version, reported by the health endpoint
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
