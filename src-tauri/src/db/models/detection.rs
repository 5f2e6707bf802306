//! Detection history data models.
//!
//! A `DetectionEvent` owns the `ConfidenceScore` rows produced by the same
//! classifier run. Both are immutable once recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Characters of the original text kept for the history table.
pub const DISPLAY_TEXT_CHARS: usize = 50;
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionEvent {
    /// Assigned by the history store on insert.
    pub id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    /// Display text: the first 50 characters, with `...` appended when cut.
    pub text: String,
    pub full_text: String,
    pub detected_language: String,
    pub confidence: f64,
}

impl DetectionEvent {
    pub fn new(
        full_text: &str,
        detected_language: Option<&str>,
        confidence: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            timestamp,
            text: truncate_for_display(full_text),
            full_text: full_text.to_string(),
            detected_language: detected_language.unwrap_or(UNKNOWN_LANGUAGE).to_string(),
            confidence,
        }
    }
}

pub fn truncate_for_display(text: &str) -> String {
    match text.char_indices().nth(DISPLAY_TEXT_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceScore {
    pub history_id: Option<i64>,
    pub language: String,
    pub confidence: f64,
}

impl ConfidenceScore {
    pub fn new(language: impl Into<String>, confidence: f64) -> Self {
        Self {
            history_id: None,
            language: language.into(),
            confidence,
        }
    }
}
