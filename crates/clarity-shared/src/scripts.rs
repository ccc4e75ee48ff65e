//! Script completion - negotiation scripts for every counterparty.
//!
//! # Design
//! - `default` is always present and always first
//! - one script per distinct debt account name, in repaired debt order
//! - a model-supplied script is coerced field by field, each empty field
//!   falling back to the default script's value
//! - a missing script is synthesized from the account name and whether its
//!   minimum due is known
//! - keys the model invented for unknown counterparties are dropped

use crate::coerce::{truncate_chars, Fields, PROSE_MAX_CHARS};
use crate::schema::{Debt, NegotiationScript, ScriptBook, DEFAULT_SCRIPT_KEY};
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_GOAL: &str =
    "Keep the conversation calm and agree on a payment arrangement you can actually sustain.";

pub const DEFAULT_OPENING_SCRIPT: &str = "Hello, I am contacting you about my account and I want to resolve it.\n\
I intend to keep paying, but I can only commit to an amount that leaves my essential expenses covered.\n\
Please send any proposal or agreement to me in writing.";

pub const DEFAULT_WHAT_NOT_TO_SAY: &[&str] = &[
    "Do not confirm a balance or amount you have not verified yourself.",
    "Do not promise a payment date or amount you cannot afford.",
    "Do not agree to take a new loan or borrow to pay this debt.",
    "Do not share passwords, PINs, or full card numbers.",
    "Do not admit to wrongdoing or sign anything during the call.",
];

pub const DEFAULT_FOLLOW_UP_WINDOW_DAYS: u32 = 7;

/// Build the default script, filling each empty field with its fallback literal
pub fn default_script(raw: Fields<'_>) -> NegotiationScript {
    let fallback = NegotiationScript {
        goal: DEFAULT_GOAL.to_string(),
        opening_script: DEFAULT_OPENING_SCRIPT.to_string(),
        what_not_to_say: DEFAULT_WHAT_NOT_TO_SAY.iter().map(|s| s.to_string()).collect(),
        follow_up_window_days: DEFAULT_FOLLOW_UP_WINDOW_DAYS,
    };
    coerce_script(raw, &fallback)
}

/// Coerce a script object, falling back per field (never wholesale)
pub fn coerce_script(raw: Fields<'_>, fallback: &NegotiationScript) -> NegotiationScript {
    let what_not_to_say = raw.text_list("what_not_to_say", PROSE_MAX_CHARS);
    NegotiationScript {
        goal: raw
            .text("goal", PROSE_MAX_CHARS)
            .unwrap_or_else(|| fallback.goal.clone()),
        opening_script: raw
            .text("opening_script", PROSE_MAX_CHARS)
            .unwrap_or_else(|| fallback.opening_script.clone()),
        what_not_to_say: if what_not_to_say.is_empty() {
            fallback.what_not_to_say.clone()
        } else {
            what_not_to_say
        },
        follow_up_window_days: raw
            .positive_int("follow_up_window_days")
            .unwrap_or(fallback.follow_up_window_days),
    }
}

/// Format an amount without trailing zeros for whole numbers
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

/// Minimal safe script naming the account, held to the same caps as coerced prose
pub fn synthesize_script(debt: &Debt, default: &NegotiationScript) -> NegotiationScript {
    let name = &debt.account_name;
    let opening_script = match debt.minimum_due {
        Some(minimum) => format!(
            "Hello, I am contacting you about my {name} account.\n\
             I understand the minimum due is {} and I intend to keep paying what I can afford.\n\
             Please confirm any arrangement for this account in writing.",
            format_amount(minimum)
        ),
        None => format!(
            "Hello, I am contacting you about my {name} account.\n\
             Please confirm in writing the current balance and the minimum due.\n\
             Once I have that, I will propose a payment that fits my essential expenses."
        ),
    };
    let goal = format!("Agree on a sustainable arrangement for {name} without new borrowing.");
    NegotiationScript {
        goal: truncate_chars(&goal, PROSE_MAX_CHARS),
        opening_script: truncate_chars(&opening_script, PROSE_MAX_CHARS),
        what_not_to_say: default.what_not_to_say.clone(),
        follow_up_window_days: default.follow_up_window_days,
    }
}

/// Complete the script map from repaired debts and the model's raw scripts object
pub fn complete_scripts(debts: &[Debt], raw: Option<&Value>) -> ScriptBook {
    let raw = Fields::of(raw);
    let mut book = ScriptBook::new(default_script(raw.child(DEFAULT_SCRIPT_KEY)));

    for debt in debts {
        let key = debt.account_name.as_str();
        if book.contains(key) {
            continue;
        }
        let supplied = raw.child(key);
        let script = if supplied.is_object() {
            coerce_script(supplied, book.default_script())
        } else {
            debug!("Synthesizing negotiation script for {}", key);
            synthesize_script(debt, book.default_script())
        };
        book.insert(key, script);
    }

    book
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DebtType;
    use serde_json::json;

    fn debt(name: &str, minimum_due: Option<f64>) -> Debt {
        Debt {
            account_name: name.to_string(),
            debt_type: DebtType::CreditCard,
            outstanding_balance: None,
            minimum_due,
            overdue_amount: None,
            late_fees: None,
            due_date: None,
            days_overdue: None,
        }
    }

    #[test]
    fn test_default_opening_is_three_lines() {
        assert_eq!(DEFAULT_OPENING_SCRIPT.lines().count(), 3);
    }

    #[test]
    fn test_default_fields_fall_back_independently() {
        let raw = json!({"goal": "Stay calm", "follow_up_window_days": "x"});
        let script = default_script(Fields::of(Some(&raw)));
        assert_eq!(script.goal, "Stay calm");
        assert_eq!(script.opening_script, DEFAULT_OPENING_SCRIPT);
        assert_eq!(script.what_not_to_say.len(), DEFAULT_WHAT_NOT_TO_SAY.len());
        assert_eq!(script.follow_up_window_days, 7);
    }

    #[test]
    fn test_synthesized_script_mentions_minimum() {
        let default = default_script(Fields::of(None));
        let known = synthesize_script(&debt("Card A", Some(300.0)), &default);
        assert!(known.opening_script.contains("Card A"));
        assert!(known.opening_script.contains("minimum due is 300"));

        let unknown = synthesize_script(&debt("Loan B", None), &default);
        assert!(unknown.opening_script.contains("Loan B"));
        assert!(unknown.opening_script.contains("current balance and the minimum due"));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(300.0), "300");
        assert_eq!(format_amount(312.5), "312.50");
    }
}
