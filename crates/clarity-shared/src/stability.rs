//! Derived numbers: disposable income and the stability score.
//!
//! Pure function scoring with test-locked behavior.
//! The score is owned by the engine; any score present in model output is ignored.

use crate::schema::{Debt, Intimidation, ThreatClass};
use serde::{Deserialize, Serialize};

/// Base score when disposable income is known and non-negative
pub const BASE_STABLE: i16 = 70;

/// Base score when disposable income is negative or unknown
pub const BASE_STRAINED: i16 = 45;

/// Layered trust: caller numbers > model-reported derived value > unknown.
///
/// `salary` and `essentials` must already have trusted inputs applied.
pub fn disposable_income(
    salary: Option<f64>,
    essentials: Option<f64>,
    reported: Option<f64>,
) -> Option<f64> {
    match (salary, essentials) {
        (Some(s), Some(e)) => Some(s - e).filter(|d| d.is_finite()).or(reported),
        _ => reported,
    }
}

/// Reason codes for score adjustments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilityReason {
    /// Disposable income is negative or unknown
    IncomeStrained,
    /// A home visit was threatened
    HouseVisitThreat,
    /// Police, court, or legal action was threatened
    PoliceThreat,
    /// Disposable income does not cover the combined minimum dues
    MinimumsUnaffordable,
}

impl StabilityReason {
    /// User-facing explanation (single line, lowercase start)
    pub fn explanation(&self) -> &'static str {
        match self {
            Self::IncomeStrained => "income after essentials is negative or unknown",
            Self::HouseVisitThreat => "collectors threatened a home visit",
            Self::PoliceThreat => "collectors threatened police or legal action",
            Self::MinimumsUnaffordable => "minimum payments exceed income after essentials",
        }
    }
}

/// Input to the stability computation
#[derive(Debug, Clone, Default)]
pub struct StabilityInput {
    pub disposable_income: Option<f64>,
    pub house_visit_threat: bool,
    pub police_threat: bool,
    /// Sum of all known minimum dues
    pub minimum_due_sum: f64,
}

impl StabilityInput {
    pub fn from_parts(
        disposable_income: Option<f64>,
        intimidation: &[Intimidation],
        debts: &[Debt],
    ) -> Self {
        let has = |class: ThreatClass| intimidation.iter().any(|e| e.classification == class);
        Self {
            disposable_income,
            house_visit_threat: has(ThreatClass::HouseVisitThreat),
            police_threat: has(ThreatClass::PoliceThreat),
            minimum_due_sum: debts.iter().filter_map(|d| d.minimum_due).sum(),
        }
    }
}

/// Breakdown item for logs and debug output
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreComponent {
    pub name: &'static str,
    pub delta: i16,
    pub reason: Option<StabilityReason>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StabilityOutput {
    /// Final score 0-100
    pub score: u8,
    pub breakdown: Vec<ScoreComponent>,
}

impl StabilityOutput {
    pub fn reasons(&self) -> Vec<StabilityReason> {
        self.breakdown.iter().filter_map(|c| c.reason).collect()
    }

    /// One-line summary, e.g. "stability 55: minimum payments exceed income after essentials"
    pub fn summary(&self) -> String {
        let reasons: Vec<&str> = self.reasons().iter().map(|r| r.explanation()).collect();
        if reasons.is_empty() {
            format!("stability {}", self.score)
        } else {
            format!("stability {}: {}", self.score, reasons.join("; "))
        }
    }
}

/// Pure function: compute the stability score. Order of steps matters.
/// Test-locked behavior - changes here require golden test updates.
pub fn compute_stability(input: &StabilityInput) -> StabilityOutput {
    let mut breakdown = Vec::new();

    // Unknown income shares the strained base
    let stable = matches!(input.disposable_income, Some(d) if d >= 0.0);
    let mut score = if stable { BASE_STABLE } else { BASE_STRAINED };
    breakdown.push(ScoreComponent {
        name: "base",
        delta: score,
        reason: (!stable).then_some(StabilityReason::IncomeStrained),
    });

    if input.house_visit_threat {
        let delta = -10;
        score += delta;
        breakdown.push(ScoreComponent {
            name: "house_visit_threat",
            delta,
            reason: Some(StabilityReason::HouseVisitThreat),
        });
    }

    if input.police_threat {
        let delta = -20;
        score += delta;
        breakdown.push(ScoreComponent {
            name: "police_threat",
            delta,
            reason: Some(StabilityReason::PoliceThreat),
        });
    }

    if input.minimum_due_sum > 0.0 {
        if let Some(income) = input.disposable_income {
            if income < input.minimum_due_sum {
                let delta = -15;
                score += delta;
                breakdown.push(ScoreComponent {
                    name: "minimums_unaffordable",
                    delta,
                    reason: Some(StabilityReason::MinimumsUnaffordable),
                });
            }
        }
    }

    StabilityOutput {
        score: score.clamp(0, 100) as u8,
        breakdown,
    }
}

// Golden tests are in tests/stability_tests.rs
