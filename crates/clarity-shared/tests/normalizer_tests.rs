//! End-to-end tests for the normalizer.
//!
//! Model output here is deliberately hostile: wrong types, missing keys,
//! extra keys, and made-up scores.

use clarity_shared::plan::{minimum_payment_action, MINIMUM_PAYMENT_REASON};
use clarity_shared::scripts::{DEFAULT_FOLLOW_UP_WINDOW_DAYS, DEFAULT_OPENING_SCRIPT};
use clarity_shared::{normalize, NormalizedResult, ThreatClass, TrustedInputs};
use serde_json::{json, Value};

fn no_trust() -> TrustedInputs {
    TrustedInputs::default()
}

fn keys(result: &NormalizedResult) -> Vec<String> {
    result.negotiation_scripts.keys().map(str::to_string).collect()
}

fn full_response() -> Value {
    json!({
        "calm_summary": {
            "summary": "You have two accounts and one collector is pushing hard.",
            "reassurance": "This is manageable."
        },
        "extracted": {
            "currency": "AED",
            "salary": 5000,
            "essentials": "3,000",
            "disposable_income": 99999,
            "debts": [
                {"account_name": "Emirates Card", "type": "credit_card", "minimum_due": 300, "outstanding_balance": "12,400"},
                {"account_name": "", "type": "loan", "minimum_due": 50},
                {"account_name": "Personal Loan", "type": "LOAN", "minimum_due": null}
            ],
            "collection_messages": [
                {"text": "Pay today or our team will do a home visit.", "risk_tag": "threat"},
                {"text": "Your statement is ready.", "risk_tag": "info"}
            ],
            "hallucinated_field": true
        },
        "risk_assessment": {
            "risk_level": "HIGH",
            "stability_score_0_to_100": 99,
            "detected_intimidation": [
                {"classification": "psychological_pressure", "evidence": "Pay today"}
            ]
        },
        "next_7_days_plan": [
            {"day": 1, "action": "Buy a lottery ticket", "estimated_cost": 50},
            {"day": 2, "action": "List all accounts"},
            {"day": 3, "action": "Call Emirates Card", "reason": "Ask for a plan"}
        ],
        "negotiation_scripts": {
            "default": {"goal": "Stay calm"},
            "Emirates Card": {"opening_script": "Hello, about my card.", "follow_up_window_days": 3},
            "Invented Bank": {"goal": "should vanish"}
        },
        "extra_top_level": "ignored"
    })
}

// === Totality ===

#[test]
fn test_totality_on_arbitrary_values() {
    let inputs = vec![
        Value::Null,
        json!(42),
        json!("just text"),
        json!([1, {"extracted": {}}]),
        json!({}),
        json!({"extracted": "nope", "risk_assessment": [], "next_7_days_plan": {"day": 1}}),
        json!({"extracted": {"debts": [null, 7, [], {"account_name": {"nested": true}}]}}),
        json!({"negotiation_scripts": ["default"]}),
    ];

    for raw in inputs {
        let result = normalize(&raw, &no_trust());
        assert_eq!(keys(&result), vec!["default".to_string()], "input: {raw}");
        assert!(result.extracted.debts.is_empty());
        assert!(result.next_7_days_plan.is_empty());
        assert_eq!(result.risk_assessment.stability_score_0_to_100, 45);

        // Serialized result always carries every section
        let out = serde_json::to_value(&result).unwrap();
        for section in [
            "calm_summary",
            "extracted",
            "risk_assessment",
            "next_7_days_plan",
            "negotiation_scripts",
        ] {
            assert!(out.get(section).is_some(), "missing {section}");
        }
        assert!(out["extracted"]["disposable_income"].is_null());
    }
}

#[test]
fn test_unknown_keys_never_appear() {
    let out = serde_json::to_value(normalize(&full_response(), &no_trust())).unwrap();
    assert!(out.get("extra_top_level").is_none());
    assert!(out["extracted"].get("hallucinated_field").is_none());
    assert_eq!(out.as_object().unwrap().len(), 5);
}

// === Score ownership ===

#[test]
fn test_score_never_taken_from_model() {
    let result = normalize(&full_response(), &no_trust());
    // income 2000 >= 0: 70; home visit derived: -10; minimums 300 affordable
    assert_eq!(result.risk_assessment.stability_score_0_to_100, 60);

    let mut tampered = full_response();
    tampered["risk_assessment"]["stability_score_0_to_100"] = json!(3);
    let again = normalize(&tampered, &no_trust());
    assert_eq!(again.risk_assessment.stability_score_0_to_100, 60);
}

// === Trust precedence ===

#[test]
fn test_trusted_inputs_override_model_numbers() {
    let raw = json!({"extracted": {"salary": 5000, "essentials": 7000, "disposable_income": -2000}});
    let trusted = TrustedInputs::new(Some(10000.0), Some(7000.0));
    let result = normalize(&raw, &trusted);
    assert_eq!(result.extracted.salary, Some(10000.0));
    assert_eq!(result.extracted.disposable_income, Some(3000.0));
}

#[test]
fn test_partial_trust_combines_with_model_number() {
    let raw = json!({"extracted": {"salary": 8000}});
    let result = normalize(&raw, &TrustedInputs::new(None, Some(6000.0)));
    assert_eq!(result.extracted.disposable_income, Some(2000.0));
}

// === Day-1 override ===

#[test]
fn test_day_one_becomes_minimum_payment() {
    let raw = json!({
        "extracted": {"debts": [{"account_name": "Card", "minimum_due": 300}]},
        "next_7_days_plan": [
            {"day": 1, "action": "Something arbitrary"},
            {"day": 2, "action": "Keep receipts", "estimated_cost": 0},
            {"day": 3, "action": "Call the bank", "reason": "ask for a plan"}
        ]
    });
    let result = normalize(&raw, &TrustedInputs::new(Some(2500.0), Some(2000.0)));
    let plan = &result.next_7_days_plan;

    assert_eq!(plan.len(), 3);
    assert_eq!(plan[0].day, 1);
    assert_eq!(plan[0].action, minimum_payment_action("Card"));
    assert_eq!(plan[0].reason.as_deref(), Some(MINIMUM_PAYMENT_REASON));
    assert_eq!(plan[0].estimated_cost, Some(300.0));

    assert_eq!(plan[1].day, 2);
    assert_eq!(plan[1].action, "Keep receipts");
    assert_eq!(plan[1].estimated_cost, Some(0.0));
    assert_eq!(plan[2].day, 3);
    assert_eq!(plan[2].reason.as_deref(), Some("ask for a plan"));
}

#[test]
fn test_day_one_inserted_when_model_gave_none() {
    let raw = json!({
        "extracted": {"debts": [{"account_name": "Card", "minimum_due": 300}]},
        "next_7_days_plan": (2..=8).map(|d| json!({"day": d, "action": format!("Day {d}")})).collect::<Vec<_>>()
    });
    let result = normalize(&raw, &TrustedInputs::new(Some(1000.0), Some(500.0)));
    let days: Vec<u32> = result.next_7_days_plan.iter().map(|s| s.day).collect();
    assert_eq!(days, vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn test_no_override_when_income_unknown() {
    let raw = json!({
        "extracted": {"debts": [{"account_name": "Card", "minimum_due": 300}]},
        "next_7_days_plan": [{"action": "Rest"}]
    });
    let result = normalize(&raw, &no_trust());
    assert_eq!(result.next_7_days_plan.len(), 1);
    assert_eq!(result.next_7_days_plan[0].action, "Rest");
    assert_eq!(result.next_7_days_plan[0].day, 1);
}

// === Identity dropping ===

#[test]
fn test_nameless_debt_dropped_and_unscripted() {
    let result = normalize(&full_response(), &no_trust());
    let names: Vec<&str> = result
        .extracted
        .debts
        .iter()
        .map(|d| d.account_name.as_str())
        .collect();
    assert_eq!(names, vec!["Emirates Card", "Personal Loan"]);
    assert!(!result.negotiation_scripts.contains(""));
}

// === Script completeness ===

#[test]
fn test_scripts_exactly_default_plus_accounts() {
    let result = normalize(&full_response(), &no_trust());
    assert_eq!(keys(&result), vec!["default", "Emirates Card", "Personal Loan"]);

    let default = result.negotiation_scripts.default_script();
    assert_eq!(default.goal, "Stay calm");
    assert_eq!(default.opening_script, DEFAULT_OPENING_SCRIPT);
    assert_eq!(default.follow_up_window_days, DEFAULT_FOLLOW_UP_WINDOW_DAYS);

    // Supplied script falls back per field to the default script
    let card = result.negotiation_scripts.get("Emirates Card").unwrap();
    assert_eq!(card.opening_script, "Hello, about my card.");
    assert_eq!(card.follow_up_window_days, 3);
    assert_eq!(card.goal, "Stay calm");
    assert_eq!(card.what_not_to_say, default.what_not_to_say);

    // Missing script is synthesized for the account
    let loan = result.negotiation_scripts.get("Personal Loan").unwrap();
    assert!(loan.opening_script.contains("Personal Loan"));
}

#[test]
fn test_duplicate_account_names_get_one_script() {
    let raw = json!({"extracted": {"debts": [
        {"account_name": "Card", "minimum_due": 100},
        {"account_name": "Card", "minimum_due": 200},
        {"account_name": "default"}
    ]}});
    let result = normalize(&raw, &no_trust());
    assert_eq!(result.extracted.debts.len(), 3);
    assert_eq!(keys(&result), vec!["default", "Card"]);
}

// === Threat pre-pass ===

#[test]
fn test_threats_appended_not_replaced() {
    let result = normalize(&full_response(), &no_trust());
    let classes: Vec<ThreatClass> = result
        .risk_assessment
        .detected_intimidation
        .iter()
        .map(|e| e.classification)
        .collect();
    assert_eq!(
        classes,
        vec![ThreatClass::PsychologicalPressure, ThreatClass::HouseVisitThreat]
    );
    assert_eq!(
        result.risk_assessment.detected_intimidation[0].evidence.as_deref(),
        Some("Pay today")
    );
}

#[test]
fn test_court_message_costs_police_penalty() {
    let raw = json!({"extracted": {
        "collection_messages": [{"text": "Legal action will be taken in court."}]
    }});
    let result = normalize(&raw, &TrustedInputs::new(Some(100.0), Some(0.0)));
    assert_eq!(result.risk_assessment.stability_score_0_to_100, 50);
}

// === Idempotence ===

#[test]
fn test_normalized_result_is_a_fixed_point() {
    let trusted = TrustedInputs::new(Some(10000.0), Some(7000.0));
    let inputs = vec![
        full_response(),
        Value::Null,
        json!({
            "extracted": {"debts": [{"account_name": "Card", "minimum_due": 300}]},
            "next_7_days_plan": [{"action": "One"}, {"action": "Two"}, {"day": 1, "action": "Three"}],
            "calm_summary": "Just a string"
        }),
    ];

    for raw in inputs {
        for trust in [trusted, no_trust()] {
            let first = normalize(&raw, &trust);
            let replay = serde_json::to_value(&first).unwrap();
            let second = normalize(&replay, &trust);
            assert_eq!(first, second);
        }
    }
}

#[test]
fn test_synthesized_script_with_huge_amount_is_capped_and_stable() {
    let name = "A".repeat(200);
    let raw = json!({"extracted": {"debts": [{"account_name": name, "minimum_due": 1e300}]}});

    let first = normalize(&raw, &no_trust());
    let script = first.negotiation_scripts.get(&name).unwrap();
    assert!(script.opening_script.chars().count() <= 600);
    assert!(script.goal.chars().count() <= 600);

    let replay = serde_json::to_value(&first).unwrap();
    let second = normalize(&replay, &no_trust());
    assert_eq!(first, second);
}

#[test]
fn test_result_round_trips_through_serde() {
    let result = normalize(&full_response(), &no_trust());
    let text = serde_json::to_string(&result).unwrap();
    let back: NormalizedResult = serde_json::from_str(&text).unwrap();
    assert_eq!(back, result);
}
