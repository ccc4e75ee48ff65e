//! Field coercion - total, exception-free narrowing of untrusted JSON leaves.
//!
//! Every field of the normalized schema has a declared [`FieldKind`] and is
//! decoded through [`coerce`]. Coercion never fails: anything that cannot be
//! narrowed becomes [`Coerced::Null`] and the caller substitutes the field's
//! documented default.
//!
//! # Rules
//! - `null` / missing -> null
//! - numbers: finite JSON numbers pass; strings get a best-effort parse
//!   (`"AED 1,200.50"` -> 1200.5); everything else -> null
//! - text: trimmed, scalars stringified, capped by characters; empty -> null
//! - enums: case-insensitive, `-`/space tolerant, unknown -> field fallback

use serde_json::{Map, Value};

/// Cap for long prose (calm summary, collection message text)
pub const SUMMARY_MAX_CHARS: usize = 1000;

/// Cap for short prose (reassurance, reasons, scripts, evidence)
pub const PROSE_MAX_CHARS: usize = 600;

/// Cap for identity keys (debt account names)
pub const NAME_MAX_CHARS: usize = 200;

/// Declared kind of a leaf field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Nullable finite number
    Number,
    /// Nullable integer >= 1 (day indices, windows in days)
    PositiveInt,
    /// Nullable string capped at the given number of characters
    Text(usize),
    /// List of non-empty strings, each capped
    TextList(usize),
}

/// Result of a leaf coercion
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Null,
    Number(f64),
    PositiveInt(u32),
    Text(String),
    TextList(Vec<String>),
}

impl Coerced {
    pub fn into_number(self) -> Option<f64> {
        match self {
            Coerced::Number(n) => Some(n),
            Coerced::PositiveInt(n) => Some(f64::from(n)),
            _ => None,
        }
    }

    pub fn into_positive_int(self) -> Option<u32> {
        match self {
            Coerced::PositiveInt(n) => Some(n),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Coerced::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_text_list(self) -> Vec<String> {
        match self {
            Coerced::TextList(items) => items,
            Coerced::Text(s) => vec![s],
            _ => Vec::new(),
        }
    }
}

/// Coerce a raw value into the declared kind. Total for every input.
pub fn coerce(value: Option<&Value>, kind: FieldKind) -> Coerced {
    let Some(value) = value else {
        return match kind {
            FieldKind::TextList(_) => Coerced::TextList(Vec::new()),
            _ => Coerced::Null,
        };
    };

    match kind {
        FieldKind::Number => number(value).map_or(Coerced::Null, Coerced::Number),
        FieldKind::PositiveInt => positive_int(value).map_or(Coerced::Null, Coerced::PositiveInt),
        FieldKind::Text(cap) => text(value, cap).map_or(Coerced::Null, Coerced::Text),
        FieldKind::TextList(cap) => Coerced::TextList(text_list(value, cap)),
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => parse_number_text(s),
        _ => None,
    }
}

/// Best-effort numeric parse of model-written amounts.
/// Strips thousands separators and currency words/symbols at either end.
pub fn parse_number_text(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    let cleaned = cleaned.trim_matches(|c: char| {
        c.is_alphabetic() || c.is_whitespace() || matches!(c, '$' | '€' | '£' | ':')
    });
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn positive_int(value: &Value) -> Option<u32> {
    let n = number(value)?.trunc();
    if n >= 1.0 && n <= f64::from(u32::MAX) {
        Some(n as u32)
    } else {
        None
    }
}

fn text(value: &Value, cap: usize) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(truncate_chars(trimmed, cap))
}

fn text_list(value: &Value, cap: usize) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(|item| text(item, cap)).collect(),
        _ => Vec::new(),
    }
}

/// Truncate to at most `cap` characters without splitting a code point.
/// Trailing whitespace exposed by the cut is removed so the result is stable
/// under re-coercion.
pub fn truncate_chars(s: &str, cap: usize) -> String {
    match s.char_indices().nth(cap) {
        Some((idx, _)) => s[..idx].trim_end().to_string(),
        None => s.to_string(),
    }
}

/// Closed set of string values with a documented fallback
pub trait ClosedEnum: Copy + Sized + 'static {
    /// Every member of the set
    const ALL: &'static [Self];
    /// Value used when the input is missing or unrecognized
    const FALLBACK: Self;

    fn as_str(&self) -> &'static str;
}

/// Match a raw value against a closed set. Unknown input yields `E::FALLBACK`.
pub fn coerce_enum<E: ClosedEnum>(value: Option<&Value>) -> E {
    let Some(raw) = value.and_then(Value::as_str) else {
        return E::FALLBACK;
    };
    let key: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect();
    E::ALL
        .iter()
        .copied()
        .find(|candidate| candidate.as_str() == key)
        .unwrap_or(E::FALLBACK)
}

/// Typed view over one untrusted JSON object.
/// Missing keys and non-object inputs read as null.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Fields<'a> {
    pub fn of(value: Option<&'a Value>) -> Self {
        Self {
            map: value.and_then(Value::as_object),
        }
    }

    pub fn is_object(&self) -> bool {
        self.map.is_some()
    }

    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        self.map.and_then(|m| m.get(key))
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        coerce(self.raw(key), FieldKind::Number).into_number()
    }

    pub fn positive_int(&self, key: &str) -> Option<u32> {
        coerce(self.raw(key), FieldKind::PositiveInt).into_positive_int()
    }

    pub fn text(&self, key: &str, cap: usize) -> Option<String> {
        coerce(self.raw(key), FieldKind::Text(cap)).into_text()
    }

    pub fn text_list(&self, key: &str, cap: usize) -> Vec<String> {
        coerce(self.raw(key), FieldKind::TextList(cap)).into_text_list()
    }

    pub fn choice<E: ClosedEnum>(&self, key: &str) -> E {
        coerce_enum(self.raw(key))
    }

    pub fn child(&self, key: &str) -> Fields<'a> {
        Fields::of(self.raw(key))
    }
}
