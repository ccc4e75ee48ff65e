//! Normalizer - repairs untrusted model output into a [`NormalizedResult`].
//!
//! Pure, total, and deterministic: no I/O, no shared state, never fails.
//! Stages run in dependency order:
//! 1. field coercion (leaf kinds, see `coerce`)
//! 2. collection repair (debts, messages, intimidation)
//! 3. derived numbers (disposable income, threat pre-pass, stability score)
//! 4. plan synthesis
//! 5. script completion

use crate::coerce::{coerce, FieldKind, Fields, PROSE_MAX_CHARS, SUMMARY_MAX_CHARS};
use crate::plan::synthesize_plan;
use crate::repair::{debt_rule, intimidation_rule, message_rule, repair_list};
use crate::schema::{CalmSummary, Extracted, NormalizedResult, RiskAssessment};
use crate::scripts::complete_scripts;
use crate::stability::{compute_stability, disposable_income, StabilityInput};
use crate::threats::detect_threats;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Shown when the model gave no usable reassurance
pub const FALLBACK_REASSURANCE: &str =
    "You are taking the right step by looking at everything in one place. Take it one day at a time.";

/// Caller-supplied numbers that outrank anything the model reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrustedInputs {
    pub salary: Option<f64>,
    pub essentials: Option<f64>,
}

impl TrustedInputs {
    /// Non-finite numbers are treated as absent
    pub fn new(salary: Option<f64>, essentials: Option<f64>) -> Self {
        Self {
            salary: salary.filter(|n| n.is_finite()),
            essentials: essentials.filter(|n| n.is_finite()),
        }
    }

    /// Read trusted numbers from a request body; only JSON numbers count.
    pub fn from_request(salary: Option<&Value>, essentials: Option<&Value>) -> Self {
        Self::new(
            salary.and_then(Value::as_f64),
            essentials.and_then(Value::as_f64),
        )
    }
}

fn calm_summary(raw: Option<&Value>) -> CalmSummary {
    // Models sometimes return the summary as a bare string
    if let Some(Value::String(_)) = raw {
        let summary = coerce(raw, FieldKind::Text(SUMMARY_MAX_CHARS))
            .into_text()
            .unwrap_or_default();
        return CalmSummary {
            summary,
            reassurance: FALLBACK_REASSURANCE.to_string(),
        };
    }
    let f = Fields::of(raw);
    CalmSummary {
        summary: f
            .text("summary", SUMMARY_MAX_CHARS)
            .unwrap_or_default(),
        reassurance: f
            .text("reassurance", PROSE_MAX_CHARS)
            .unwrap_or_else(|| FALLBACK_REASSURANCE.to_string()),
    }
}

/// Normalize one model response. Total for any JSON value.
pub fn normalize(raw: &Value, trusted: &TrustedInputs) -> NormalizedResult {
    let root = Fields::of(Some(raw));
    let extracted_raw = root.child("extracted");
    let risk_raw = root.child("risk_assessment");

    // Collection repair
    let debts = repair_list(extracted_raw.raw("debts"), debt_rule);
    let messages = repair_list(extracted_raw.raw("collection_messages"), message_rule);
    let mut intimidation = repair_list(risk_raw.raw("detected_intimidation"), intimidation_rule);

    // Derived numbers
    let salary = trusted.salary.or_else(|| extracted_raw.number("salary"));
    let essentials = trusted.essentials.or_else(|| extracted_raw.number("essentials"));
    let disposable = disposable_income(salary, essentials, extracted_raw.number("disposable_income"));

    let derived = detect_threats(&messages, &intimidation);
    intimidation.extend(derived);

    let stability = compute_stability(&StabilityInput::from_parts(disposable, &intimidation, &debts));
    debug!("{}", stability.summary());

    let next_7_days_plan = synthesize_plan(root.raw("next_7_days_plan"), &debts, disposable);
    let negotiation_scripts = complete_scripts(&debts, root.raw("negotiation_scripts"));

    NormalizedResult {
        calm_summary: calm_summary(root.raw("calm_summary")),
        extracted: Extracted {
            currency: extracted_raw.text("currency", PROSE_MAX_CHARS),
            salary,
            essentials,
            disposable_income: disposable,
            debts,
            collection_messages: messages,
        },
        risk_assessment: RiskAssessment {
            risk_level: risk_raw.choice("risk_level"),
            stability_score_0_to_100: stability.score,
            detected_intimidation: intimidation,
            notes: risk_raw.text("notes", PROSE_MAX_CHARS),
        },
        next_7_days_plan,
        negotiation_scripts,
    }
}
