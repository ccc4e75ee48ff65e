//! Collection repair - per-element coercion over untrusted arrays.
//!
//! Elements that are not objects, or that fail their identity check
//! (empty `account_name`, empty message `text`), are dropped rather than
//! kept with an empty key. Survivors keep source order.

use crate::coerce::{Fields, NAME_MAX_CHARS, PROSE_MAX_CHARS, SUMMARY_MAX_CHARS};
use crate::schema::{CollectionMessage, Debt, Intimidation};
use serde_json::Value;
use tracing::debug;

/// Apply `rule` to every element of `raw`. Non-array input yields an empty list.
pub fn repair_list<T, F>(raw: Option<&Value>, rule: F) -> Vec<T>
where
    F: Fn(Fields<'_>) -> Option<T>,
{
    let Some(items) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut repaired = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let fields = Fields::of(Some(item));
        if !fields.is_object() {
            debug!("Dropping non-object element at index {}", idx);
            continue;
        }
        match rule(fields) {
            Some(value) => repaired.push(value),
            None => debug!("Dropping element at index {}: identity missing", idx),
        }
    }
    repaired
}

pub fn debt_rule(f: Fields<'_>) -> Option<Debt> {
    let account_name = f.text("account_name", NAME_MAX_CHARS)?;
    Some(Debt {
        account_name,
        debt_type: f.choice("type"),
        outstanding_balance: f.number("outstanding_balance"),
        minimum_due: f.number("minimum_due"),
        overdue_amount: f.number("overdue_amount"),
        late_fees: f.number("late_fees"),
        due_date: f.text("due_date", PROSE_MAX_CHARS),
        days_overdue: f.number("days_overdue"),
    })
}

pub fn message_rule(f: Fields<'_>) -> Option<CollectionMessage> {
    let text = f.text("text", SUMMARY_MAX_CHARS)?;
    Some(CollectionMessage {
        text,
        sender: f.text("sender", PROSE_MAX_CHARS),
        risk_tag: f.choice("risk_tag"),
    })
}

/// Intimidation entries carry no identity key; any object is kept.
pub fn intimidation_rule(f: Fields<'_>) -> Option<Intimidation> {
    Some(Intimidation {
        classification: f.choice("classification"),
        evidence: f.text("evidence", PROSE_MAX_CHARS),
        explanation: f.text("explanation", PROSE_MAX_CHARS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DebtType, RiskTag, ThreatClass};
    use serde_json::json;

    #[test]
    fn test_non_array_yields_empty() {
        assert!(repair_list(Some(&json!({"a": 1})), debt_rule).is_empty());
        assert!(repair_list(Some(&json!("debts")), debt_rule).is_empty());
        assert!(repair_list(None, debt_rule).is_empty());
    }

    #[test]
    fn test_debts_without_name_are_dropped_in_order() {
        let raw = json!([
            {"account_name": "Card A", "type": "Credit Card", "minimum_due": "300"},
            {"account_name": "   ", "minimum_due": 100},
            "not an object",
            {"minimum_due": 50},
            {"account_name": "Loan B", "type": "mortgage"}
        ]);
        let debts = repair_list(Some(&raw), debt_rule);
        assert_eq!(debts.len(), 2);
        assert_eq!(debts[0].account_name, "Card A");
        assert_eq!(debts[0].debt_type, DebtType::CreditCard);
        assert_eq!(debts[0].minimum_due, Some(300.0));
        assert_eq!(debts[1].account_name, "Loan B");
        assert_eq!(debts[1].debt_type, DebtType::Unknown);
    }

    #[test]
    fn test_message_risk_tag_defaults_to_pressure() {
        let raw = json!([
            {"text": "Pay now", "risk_tag": "scary"},
            {"text": "Reminder", "risk_tag": "INFO"},
            {"text": "", "risk_tag": "info"}
        ]);
        let messages = repair_list(Some(&raw), message_rule);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].risk_tag, RiskTag::Pressure);
        assert_eq!(messages[1].risk_tag, RiskTag::Info);
    }

    #[test]
    fn test_intimidation_unknown_classification() {
        let raw = json!([{"classification": "ghosts"}, {"classification": "police threat"}]);
        let entries = repair_list(Some(&raw), intimidation_rule);
        assert_eq!(entries[0].classification, ThreatClass::Unknown);
        assert_eq!(entries[1].classification, ThreatClass::PoliceThreat);
    }
}
