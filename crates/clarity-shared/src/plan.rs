//! Plan synthesis - the fixed 7-day action window.
//!
//! When the first debt with a known minimum due is affordable, day 1 is
//! always the canonical minimum payment, displacing whatever the model put
//! there. Other days are kept as the model wrote them.

use crate::coerce::{Fields, PROSE_MAX_CHARS};
use crate::repair::repair_list;
use crate::schema::{Debt, PlanStep};
use serde_json::Value;
use tracing::debug;

/// The plan never covers more than this many entries
pub const PLAN_WINDOW_DAYS: usize = 7;

/// Fixed reason attached to the canonical day-1 payment
pub const MINIMUM_PAYMENT_REASON: &str =
    "Paying the minimum due keeps this account from falling further behind, and your income after essentials covers it.";

/// Plan entry as repaired from the model, before day backfill
#[derive(Debug, Clone, PartialEq)]
struct DraftStep {
    day: Option<u32>,
    action: String,
    reason: Option<String>,
    estimated_cost: Option<f64>,
}

fn draft_rule(f: Fields<'_>) -> Option<DraftStep> {
    let action = f.text("action", PROSE_MAX_CHARS)?;
    Some(DraftStep {
        day: f.positive_int("day"),
        action,
        reason: f.text("reason", PROSE_MAX_CHARS),
        estimated_cost: f.number("estimated_cost"),
    })
}

/// Canonical action text for paying an account's minimum
pub fn minimum_payment_action(account_name: &str) -> String {
    format!("Pay the minimum due on {}", account_name)
}

/// The canonical day-1 entry for `debt`, costing `minimum_due`
pub fn minimum_payment_step(debt: &Debt, minimum_due: f64) -> PlanStep {
    PlanStep {
        day: 1,
        action: minimum_payment_action(&debt.account_name),
        reason: Some(MINIMUM_PAYMENT_REASON.to_string()),
        estimated_cost: Some(minimum_due),
    }
}

/// First debt (source order) with a known minimum due, if income covers it
pub fn affordable_minimum<'a>(debts: &'a [Debt], disposable_income: Option<f64>) -> Option<(&'a Debt, f64)> {
    let (debt, minimum) = debts
        .iter()
        .find_map(|d| d.minimum_due.map(|m| (d, m)))?;
    let income = disposable_income?;
    (income >= minimum).then_some((debt, minimum))
}

/// Build the plan from the model's raw list, the repaired debts, and derived income.
pub fn synthesize_plan(raw: Option<&Value>, debts: &[Debt], disposable_income: Option<f64>) -> Vec<PlanStep> {
    let mut plan: Vec<PlanStep> = repair_list(raw, draft_rule)
        .into_iter()
        .enumerate()
        .map(|(idx, draft)| PlanStep {
            day: draft.day.unwrap_or(idx as u32 + 1),
            action: draft.action,
            reason: draft.reason,
            estimated_cost: draft.estimated_cost,
        })
        .collect();

    if let Some((debt, minimum)) = affordable_minimum(debts, disposable_income) {
        debug!(
            "Day 1 set to minimum payment of {} on {}",
            minimum, debt.account_name
        );
        plan.retain(|step| step.day != 1);
        plan.insert(0, minimum_payment_step(debt, minimum));
    }

    plan.truncate(PLAN_WINDOW_DAYS);
    plan
}
