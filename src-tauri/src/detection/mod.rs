//! Detector adapter around the statistical language classifier.
//!
//! `detect` never fails: an undecided classifier and a faulting classifier
//! both come back as a `Detection` without a language, the latter carrying a
//! user-facing error message.

mod classifier;

use anyhow::{bail, Result};
use lingua::{Language, LanguageDetectorBuilder};
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::{log_error, log_info};

pub use classifier::LanguageClassifier;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConfidence {
    pub language: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    pub language: Option<String>,
    /// Sorted by confidence, highest first.
    pub confidences: Vec<LanguageConfidence>,
    pub error: Option<String>,
}

impl Detection {
    fn failed(message: String) -> Self {
        Self {
            language: None,
            confidences: Vec::new(),
            error: Some(message),
        }
    }

    /// Confidence assigned to the detected language, 0.0 when it is missing
    /// from the ranked list.
    pub fn top_confidence(&self) -> Option<f64> {
        let language = self.language.as_deref()?;
        Some(
            self.confidences
                .iter()
                .find(|entry| entry.language == language)
                .map_or(0.0, |entry| entry.confidence),
        )
    }
}

pub struct Detector {
    classifier: Box<dyn LanguageClassifier>,
}

impl Detector {
    pub fn build(languages: &[Language]) -> Result<Self> {
        if languages.is_empty() {
            bail!("at least one language must be enabled for detection");
        }

        let detector = LanguageDetectorBuilder::from_languages(languages).build();
        log_info!("Language detector built with {} languages", languages.len());

        Ok(Self::with_classifier(Box::new(detector)))
    }

    pub fn from_catalog() -> Result<Self> {
        Self::build(&catalog::language_ids())
    }

    pub fn with_classifier(classifier: Box<dyn LanguageClassifier>) -> Self {
        Self { classifier }
    }

    pub fn detect(&self, text: &str) -> Detection {
        match self.try_detect(text) {
            Ok(detection) => detection,
            Err(err) => {
                log_error!("Language detection failed: {err:#}");
                Detection::failed(format!("Error in language detection: {err}"))
            }
        }
    }

    fn try_detect(&self, text: &str) -> Result<Detection> {
        let Some(best) = self.classifier.best_language(text)? else {
            return Ok(Detection::default());
        };

        let mut values = self.classifier.confidence_values(text)?;
        // Stable sort keeps the library's order for equal confidences.
        values.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(Detection {
            language: Some(language_name(best)),
            confidences: values
                .into_iter()
                .map(|(language, confidence)| LanguageConfidence {
                    language: language_name(language),
                    confidence,
                })
                .collect(),
            error: None,
        })
    }
}

fn language_name(language: Language) -> String {
    catalog::display_name(language)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("{language:?}"))
}
