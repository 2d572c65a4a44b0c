//! Reply parser: turns loosely structured model output into an `AnalysisResult`.
//!
//! Two stages:
//! 1. `classify_reply` decides whether the reply carries a usable JSON fragment
//!    (`ParsedReply::Structured`) or must be read as free text (`ParsedReply::Unstructured`).
//! 2. `resolve` applies the defaulting rules for whichever tier was selected.
//!
//! Parsing never fails: an imperfect reply degrades to the text tier.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::models::{AnalysisResult, Badge};
use crate::analysis::truncate_chars;

pub const DEFAULT_TRUST_SCORE: i64 = 75;
pub const DEFAULT_REASONING: &str = "Analysis completed";
pub const DEFAULT_BADGE: Badge = Badge::Verified;
/// Text-tier reasoning is the head of the raw reply.
pub const FALLBACK_REASONING_CHARS: usize = 500;
pub const MAX_TRUST_SCORE: u32 = 100;

/// A flat `{...}` object mentioning `trust_score`. Nested braces are not supported.
static JSON_FRAGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{[^{}]*"trust_score"[^{}]*\}"#).unwrap());

/// `trust_score` followed by quotes, whitespace or colons, then an ASCII digit run.
/// Other scripts' digits are not read as a score.
static SCORE_MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"trust_score["\s:]+([0-9]+)"#).unwrap());

/// Fields pulled from the JSON fragment. `None` means the key was absent or null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredFields {
    pub trust_score: Option<i64>,
    pub reasoning: Option<String>,
    pub badge: Option<String>,
}

/// Outcome of the first parsing stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedReply<'a> {
    Structured(StructuredFields),
    Unstructured(&'a str),
}

#[derive(Debug, Error)]
enum FragmentError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fragment is not a JSON object")]
    NotAnObject,

    #[error("trust_score is not an integer: {0}")]
    InvalidScore(Value),
}

/// Parses a full model reply into a result, choosing the tier automatically.
pub fn parse_reply(text: &str) -> AnalysisResult {
    resolve(classify_reply(text))
}

/// Stage one: locate and decode the JSON fragment, or fall back to the raw text.
pub fn classify_reply(text: &str) -> ParsedReply<'_> {
    let Some(fragment) = JSON_FRAGMENT_RE.find(text) else {
        debug!("No JSON fragment in model reply, using text tier");
        return ParsedReply::Unstructured(text);
    };

    match parse_fragment(fragment.as_str()) {
        Ok(fields) => ParsedReply::Structured(fields),
        Err(e) => {
            warn!("Error parsing model reply, using text tier: {e}");
            ParsedReply::Unstructured(text)
        }
    }
}

/// Stage two: apply the defaulting rules for the selected tier.
pub fn resolve(reply: ParsedReply<'_>) -> AnalysisResult {
    match reply {
        ParsedReply::Structured(fields) => resolve_structured(fields),
        ParsedReply::Unstructured(raw) => resolve_unstructured(raw),
    }
}

fn parse_fragment(fragment: &str) -> Result<StructuredFields, FragmentError> {
    let value: Value = serde_json::from_str(fragment)?;
    let object = value.as_object().ok_or(FragmentError::NotAnObject)?;

    let trust_score = match object.get("trust_score") {
        None => None,
        Some(raw) => {
            Some(coerce_score(raw).ok_or_else(|| FragmentError::InvalidScore(raw.clone()))?)
        }
    };

    Ok(StructuredFields {
        trust_score,
        reasoning: text_field(object, "reasoning"),
        badge: text_field(object, "badge"),
    })
}

/// Integers pass through, floats truncate toward zero, numeric strings are parsed.
/// `null`, booleans, arrays and objects are rejected.
fn coerce_score(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn resolve_structured(fields: StructuredFields) -> AnalysisResult {
    let trust_score = clamp_score(fields.trust_score.unwrap_or(DEFAULT_TRUST_SCORE));

    let badge = match fields.badge {
        None => DEFAULT_BADGE,
        Some(label) => Badge::from_label(&label).unwrap_or_else(|| {
            warn!("Unrecognized badge {label:?} in model reply, deriving from score");
            Badge::for_score(trust_score)
        }),
    };

    AnalysisResult {
        trust_score,
        reasoning: fields
            .reasoning
            .unwrap_or_else(|| DEFAULT_REASONING.to_string()),
        badge,
    }
}

fn resolve_unstructured(raw: &str) -> AnalysisResult {
    let score = SCORE_MENTION_RE
        .captures(raw)
        .map(|caps| caps[1].parse::<i64>().unwrap_or(i64::MAX))
        .unwrap_or(DEFAULT_TRUST_SCORE);
    let trust_score = clamp_score(score);

    let reasoning = if raw.is_empty() {
        DEFAULT_REASONING.to_string()
    } else {
        truncate_chars(raw, FALLBACK_REASONING_CHARS).to_string()
    };

    AnalysisResult {
        trust_score,
        reasoning,
        badge: Badge::for_score(trust_score),
    }
}

/// Pins a model-supplied score into 0..=100.
fn clamp_score(score: i64) -> u32 {
    let clamped = score.clamp(0, MAX_TRUST_SCORE as i64);
    if clamped != score {
        warn!("Model returned out-of-range trust_score {score}, clamped to {clamped}");
    }
    clamped as u32
}
