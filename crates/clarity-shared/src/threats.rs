//! Threat lexicon - derives intimidation entries from collection message text.
//!
//! Detection only ever appends: an entry is added for a classification that
//! some message matches and that the source did not already report.
//! Explicit legal or court language counts as a police threat.

use crate::coerce::{truncate_chars, PROSE_MAX_CHARS};
use crate::schema::{CollectionMessage, Intimidation, ThreatClass};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Patterns per classification, checked in this order
static THREAT_LEXICON: LazyLock<Vec<(ThreatClass, Regex)>> = LazyLock::new(|| {
    vec![
        (
            ThreatClass::PoliceThreat,
            Regex::new(
                r"(?i)\b(police|arrest(ed)?|jail|prison|criminal (case|complaint)|court|legal action|lawsuit|travel ban|case (will be |has been )?(filed|registered)|prosecut\w*)\b",
            )
            .unwrap(),
        ),
        (
            ThreatClass::HouseVisitThreat,
            Regex::new(
                r"(?i)\b(house visit|home visit|field visit|visit (to )?your (home|house|residence|family)|come to your (home|house|door)|at your (door|doorstep|residence))\b",
            )
            .unwrap(),
        ),
        (
            ThreatClass::EmployerThreat,
            Regex::new(
                r"(?i)\b(employer|your (company|office|workplace|manager|hr)|hr department|contact your work|inform your (boss|work))\b",
            )
            .unwrap(),
        ),
        (
            ThreatClass::PsychologicalPressure,
            Regex::new(
                r"(?i)\b(final warning|last chance|last warning|shame|embarrass\w*|your family will know|consequences|blacklist\w*)\b",
            )
            .unwrap(),
        ),
    ]
});

/// Fixed explanation attached to derived entries
pub fn derived_explanation(class: ThreatClass) -> &'static str {
    match class {
        ThreatClass::PoliceThreat => {
            "Message mentions police, court, or legal action; keep a copy and do not respond under pressure."
        }
        ThreatClass::HouseVisitThreat => {
            "Message threatens a visit to your home; you can ask for all contact to be in writing."
        }
        ThreatClass::EmployerThreat => {
            "Message threatens to involve your employer; you can ask collectors to contact only you."
        }
        ThreatClass::PsychologicalPressure => {
            "Message uses urgency or shame to pressure you; this is a tactic, not a new legal fact."
        }
        ThreatClass::Unknown => "Message contains threatening language.",
    }
}

/// Classifications whose lexicon matches the given text
pub fn classify_text(text: &str) -> Vec<ThreatClass> {
    THREAT_LEXICON
        .iter()
        .filter(|(_, pattern)| pattern.is_match(text))
        .map(|(class, _)| *class)
        .collect()
}

/// Entries to append to `existing`, one per newly detected classification.
/// Evidence is the text of the first message that matched.
pub fn detect_threats(messages: &[CollectionMessage], existing: &[Intimidation]) -> Vec<Intimidation> {
    let mut derived: Vec<Intimidation> = Vec::new();

    for message in messages {
        for class in classify_text(&message.text) {
            let reported = existing.iter().any(|e| e.classification == class)
                || derived.iter().any(|e| e.classification == class);
            if reported {
                continue;
            }
            debug!("Derived {} from collection message", class);
            derived.push(Intimidation {
                classification: class,
                evidence: Some(truncate_chars(&message.text, PROSE_MAX_CHARS)),
                explanation: Some(derived_explanation(class).to_string()),
            });
        }
    }

    derived
}
