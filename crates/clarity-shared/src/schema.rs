//! Normalized result schema.
//!
//! These types are the external contract: once a value of
//! [`NormalizedResult`] exists it is schema-conformant by construction.
//! Nullable fields always serialize (as `null`), so every key is present.

use crate::coerce::ClosedEnum;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Key of the script that is always present in `negotiation_scripts`
pub const DEFAULT_SCRIPT_KEY: &str = "default";

/// Kind of debt account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtType {
    CreditCard,
    Loan,
    Unknown,
}

impl ClosedEnum for DebtType {
    const ALL: &'static [Self] = &[Self::CreditCard, Self::Loan, Self::Unknown];
    const FALLBACK: Self = Self::Unknown;

    fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::Loan => "loan",
            Self::Unknown => "unknown",
        }
    }
}

/// Tone of a collection message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTag {
    Info,
    Pressure,
    Intimidation,
    LegalClaim,
}

impl ClosedEnum for RiskTag {
    const ALL: &'static [Self] = &[Self::Info, Self::Pressure, Self::Intimidation, Self::LegalClaim];
    // Unrecognized tone is treated as pressure, never as harmless info
    const FALLBACK: Self = Self::Pressure;

    fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Pressure => "pressure",
            Self::Intimidation => "intimidation",
            Self::LegalClaim => "legal_claim",
        }
    }
}

/// Classification of a detected intimidation tactic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatClass {
    PsychologicalPressure,
    HouseVisitThreat,
    PoliceThreat,
    EmployerThreat,
    Unknown,
}

impl ClosedEnum for ThreatClass {
    const ALL: &'static [Self] = &[
        Self::PsychologicalPressure,
        Self::HouseVisitThreat,
        Self::PoliceThreat,
        Self::EmployerThreat,
        Self::Unknown,
    ];
    const FALLBACK: Self = Self::Unknown;

    fn as_str(&self) -> &'static str {
        match self {
            Self::PsychologicalPressure => "psychological_pressure",
            Self::HouseVisitThreat => "house_visit_threat",
            Self::PoliceThreat => "police_threat",
            Self::EmployerThreat => "employer_threat",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ThreatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Overall collections risk level as reported by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Severe,
}

impl ClosedEnum for RiskLevel {
    const ALL: &'static [Self] = &[Self::Low, Self::Medium, Self::High, Self::Severe];
    const FALLBACK: Self = Self::Medium;

    fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Severe => "severe",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalmSummary {
    pub summary: String,
    pub reassurance: String,
}

/// One debt account. `account_name` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub account_name: String,
    #[serde(rename = "type")]
    pub debt_type: DebtType,
    pub outstanding_balance: Option<f64>,
    pub minimum_due: Option<f64>,
    pub overdue_amount: Option<f64>,
    pub late_fees: Option<f64>,
    pub due_date: Option<String>,
    pub days_overdue: Option<f64>,
}

/// One collection message. `text` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionMessage {
    pub text: String,
    pub sender: Option<String>,
    pub risk_tag: RiskTag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extracted {
    pub currency: Option<String>,
    pub salary: Option<f64>,
    pub essentials: Option<f64>,
    pub disposable_income: Option<f64>,
    pub debts: Vec<Debt>,
    pub collection_messages: Vec<CollectionMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intimidation {
    pub classification: ThreatClass,
    pub evidence: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub stability_score_0_to_100: u8,
    pub detected_intimidation: Vec<Intimidation>,
    pub notes: Option<String>,
}

/// One day of the 7-day plan. `action` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub day: u32,
    pub action: String,
    pub reason: Option<String>,
    pub estimated_cost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationScript {
    pub goal: String,
    pub opening_script: String,
    pub what_not_to_say: Vec<String>,
    pub follow_up_window_days: u32,
}

/// Scripts keyed by counterparty, in insertion order, `default` first.
///
/// Serializes as a JSON object; keys are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptBook {
    entries: Vec<(String, NegotiationScript)>,
}

impl ScriptBook {
    pub fn new(default_script: NegotiationScript) -> Self {
        Self {
            entries: vec![(DEFAULT_SCRIPT_KEY.to_string(), default_script)],
        }
    }

    /// Insert a script unless the key already exists. Returns whether it was added.
    pub fn insert(&mut self, key: &str, script: NegotiationScript) -> bool {
        if self.contains(key) {
            return false;
        }
        self.entries.push((key.to_string(), script));
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&NegotiationScript> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    pub fn default_script(&self) -> &NegotiationScript {
        // entries[0] is always the default script
        &self.entries[0].1
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for ScriptBook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, script) in &self.entries {
            map.serialize_entry(key, script)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScriptBook {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BookVisitor;

        impl<'de> Visitor<'de> for BookVisitor {
            type Value = ScriptBook;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of negotiation scripts with a \"default\" key")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ScriptBook, A::Error> {
                let mut entries: Vec<(String, NegotiationScript)> = Vec::new();
                while let Some((key, script)) = access.next_entry::<String, NegotiationScript>()? {
                    if !entries.iter().any(|(k, _)| *k == key) {
                        entries.push((key, script));
                    }
                }
                let Some(pos) = entries.iter().position(|(k, _)| k == DEFAULT_SCRIPT_KEY) else {
                    return Err(serde::de::Error::missing_field(DEFAULT_SCRIPT_KEY));
                };
                let default_entry = entries.remove(pos);
                entries.insert(0, default_entry);
                Ok(ScriptBook { entries })
            }
        }

        deserializer.deserialize_map(BookVisitor)
    }
}

/// The repaired, internally consistent result handed to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub calm_summary: CalmSummary,
    pub extracted: Extracted,
    pub risk_assessment: RiskAssessment,
    pub next_7_days_plan: Vec<PlanStep>,
    pub negotiation_scripts: ScriptBook,
}
