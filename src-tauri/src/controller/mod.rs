//! Detection flow: gate the input, classify it, record the result and shape
//! it for display.

pub mod commands;
pub mod state;

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use serde::Serialize;

use crate::{
    db::{ConfidenceScore, DetectionEvent},
    detection::{Detection, Detector},
    history::HistoryStore,
};
use crate::{log_error, log_info};

pub use state::{check_input, ControllerState, InputCheck};

const ENABLE_LOGS: bool = true;

/// Ranked matches shown under the headline result.
pub const TOP_MATCHES: usize = 5;
pub const NO_RESULT_MESSAGE: &str = "Could not detect the language. Please try with different text.";

/// Two-decimal percentage, `0.97314` -> `97.31%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchRow {
    pub language: String,
    pub confidence: f64,
    pub confidence_display: String,
    pub is_detected: bool,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub language: Option<String>,
    pub confidence: Option<f64>,
    pub confidence_display: Option<String>,
    pub top_matches: Vec<MatchRow>,
    /// Set when the detection made it into history.
    pub history_id: Option<i64>,
    /// Inline messages for the page; a report can carry a result and an
    /// error at the same time when saving failed.
    pub errors: Vec<String>,
}

impl DetectionReport {
    fn no_result(mut errors: Vec<String>) -> Self {
        errors.push(NO_RESULT_MESSAGE.to_string());
        Self {
            errors,
            ..Self::default()
        }
    }
}

/// Holds the controller in `Detecting`; dropping it returns to `Idle`, so a
/// cancelled or failed detection never leaves the controller busy.
struct DetectingGuard<'a> {
    state: &'a Mutex<ControllerState>,
}

impl<'a> DetectingGuard<'a> {
    fn acquire(state: &'a Mutex<ControllerState>) -> Result<Self> {
        let mut current = state.lock().unwrap_or_else(PoisonError::into_inner);
        if !current.is_idle() {
            bail!("A detection is already in progress");
        }
        current.begin();
        Ok(Self { state })
    }
}

impl Drop for DetectingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .finish();
    }
}

#[derive(Clone)]
pub struct DetectionController {
    state: Arc<Mutex<ControllerState>>,
    detector: Arc<Detector>,
    history: HistoryStore,
}

impl DetectionController {
    pub fn new(detector: Detector, history: HistoryStore) -> Self {
        Self {
            state: Arc::new(Mutex::new(ControllerState::new())),
            detector: Arc::new(detector),
            history,
        }
    }

    #[cfg(test)]
    fn is_idle(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_idle()
    }

    /// Run one detection. Errors only for gated input or a detection already
    /// in flight; every other failure is reported inside the returned report.
    pub async fn detect(&self, text: &str) -> Result<DetectionReport> {
        let check = check_input(text);
        if !check.can_detect {
            bail!(check
                .message
                .unwrap_or_else(|| "text is too short for detection".to_string()));
        }

        let _detecting = DetectingGuard::acquire(&self.state)?;
        self.run_detection(text).await
    }

    async fn run_detection(&self, text: &str) -> Result<DetectionReport> {
        let detector = Arc::clone(&self.detector);
        let input = text.to_string();
        let detection = tokio::task::spawn_blocking(move || detector.detect(&input))
            .await
            .map_err(|err| anyhow!("detection task failed: {err}"))?;

        let mut errors: Vec<String> = detection.error.iter().cloned().collect();

        let language = match detection.language.as_deref() {
            Some(language) if !detection.confidences.is_empty() => language.to_string(),
            _ => {
                log_info!("No language detected for {} chars of input", text.chars().count());
                return Ok(DetectionReport::no_result(errors));
            }
        };

        let confidence = detection.top_confidence().unwrap_or(0.0);
        let history_id = self
            .save(text, &language, confidence, &detection, &mut errors)
            .await;

        let top_matches = detection
            .confidences
            .iter()
            .take(TOP_MATCHES)
            .map(|entry| MatchRow {
                language: entry.language.clone(),
                confidence: entry.confidence,
                confidence_display: format_percent(entry.confidence),
                is_detected: entry.language == language,
            })
            .collect();

        log_info!("Detected {language} ({})", format_percent(confidence));

        Ok(DetectionReport {
            language: Some(language),
            confidence: Some(confidence),
            confidence_display: Some(format_percent(confidence)),
            top_matches,
            history_id,
            errors,
        })
    }

    /// Store failures are pushed onto `errors`; the detection is still shown.
    async fn save(
        &self,
        text: &str,
        language: &str,
        confidence: f64,
        detection: &Detection,
        errors: &mut Vec<String>,
    ) -> Option<i64> {
        let event = DetectionEvent::new(text, Some(language), confidence, Utc::now());
        let scores: Vec<ConfidenceScore> = detection
            .confidences
            .iter()
            .map(|entry| ConfidenceScore::new(entry.language.clone(), entry.confidence))
            .collect();

        match self.history.record(&event, &scores).await {
            Ok(id) => Some(id),
            Err(err) => {
                log_error!("Failed to save detection history: {err:#}");
                errors.push(format!("Failed to save detection history: {err:#}"));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lingua::Language;

    use super::*;
    use crate::detection::LanguageClassifier;
    use crate::db::Database;
    use crate::detection::tests::scripted;
    use crate::history::MemoryHistory;

    fn memory_store() -> (MemoryHistory, HistoryStore) {
        let memory = MemoryHistory::new(100);
        (memory.clone(), HistoryStore::Memory(memory))
    }

    fn english_detector() -> Detector {
        scripted(
            Some(Language::English),
            vec![
                (Language::German, 0.01),
                (Language::English, 0.80),
                (Language::Dutch, 0.07),
                (Language::French, 0.05),
                (Language::Swedish, 0.04),
                (Language::Danish, 0.03),
            ],
        )
    }

    #[test]
    fn formats_percentages_with_two_decimals() {
        assert_eq!(format_percent(0.97314), "97.31%");
        assert_eq!(format_percent(1.0), "100.00%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[tokio::test]
    async fn english_greeting_is_detected_and_recorded() {
        let (memory, store) = memory_store();
        let controller = DetectionController::new(Detector::from_catalog().unwrap(), store);

        let report = controller
            .detect("Hello! How are you doing today?")
            .await
            .unwrap();

        assert_eq!(report.language.as_deref(), Some("English"));
        assert!(report.errors.is_empty());
        assert!(!report.top_matches.is_empty());
        assert!(report.top_matches.len() <= TOP_MATCHES);
        assert_eq!(report.top_matches[0].language, "English");
        assert!(report.top_matches[0].is_detected);

        let listed = memory.list_recent(1).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].detected_language, "English");
        assert_eq!(Some(listed[0].confidence), report.confidence);
        assert_eq!(listed[0].id, report.history_id);
        assert!(controller.is_idle());
    }

    #[tokio::test]
    async fn short_text_is_refused_without_touching_history() {
        let (memory, store) = memory_store();
        let controller = DetectionController::new(english_detector(), store);

        let err = controller.detect("short").await.unwrap_err();
        assert!(err.to_string().contains("at least 20 characters"));
        assert_eq!(memory.len().await, 0);
        assert!(controller.is_idle());
    }

    #[tokio::test]
    async fn report_shows_top_five_and_records_every_score() {
        let (memory, store) = memory_store();
        let controller = DetectionController::new(english_detector(), store);

        let report = controller
            .detect("This text is long enough to pass the gate.")
            .await
            .unwrap();

        let names: Vec<_> = report.top_matches.iter().map(|m| m.language.as_str()).collect();
        assert_eq!(names, ["English", "Dutch", "French", "Swedish", "Danish"]);
        assert_eq!(report.confidence_display.as_deref(), Some("80.00%"));
        assert_eq!(report.top_matches.iter().filter(|m| m.is_detected).count(), 1);

        let id = report.history_id.unwrap();
        assert_eq!(memory.scores_for(id).await.len(), 6);
    }

    #[tokio::test]
    async fn undecided_detection_reports_error_and_skips_history() {
        let (memory, store) = memory_store();
        let controller = DetectionController::new(scripted(None, Vec::new()), store);

        let report = controller
            .detect("zzzz qqqq xxxx vvvv kkkk wwww")
            .await
            .unwrap();

        assert!(report.language.is_none());
        assert!(report.top_matches.is_empty());
        assert_eq!(report.errors, [NO_RESULT_MESSAGE]);
        assert_eq!(memory.len().await, 0);
        assert!(controller.is_idle());
    }

    #[tokio::test]
    async fn store_failure_still_returns_the_detection() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("history.sqlite3")).unwrap();
        let controller = DetectionController::new(english_detector(), HistoryStore::Database(db));
        drop(dir);

        let report = controller
            .detect("This text is long enough to pass the gate.")
            .await
            .unwrap();

        assert_eq!(report.language.as_deref(), Some("English"));
        assert!(report.history_id.is_none());
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("Failed to save detection history"));
    }

    #[tokio::test]
    async fn concurrent_detection_is_rejected() {
        let (memory, store) = memory_store();
        let controller = DetectionController::new(english_detector(), store);
        let _busy = DetectingGuard::acquire(&controller.state).unwrap();

        let err = controller
            .detect("This text is long enough to pass the gate.")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already in progress"));
        assert_eq!(memory.len().await, 0);
    }

    #[tokio::test]
    async fn hundred_and_one_detections_keep_the_newest_hundred() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("history.sqlite3")).unwrap();
        let store = HistoryStore::Database(db);
        let controller = DetectionController::new(english_detector(), store.clone());

        for i in 0..101 {
            let report = controller
                .detect(&format!("Detection request number {i:03}"))
                .await
                .unwrap();
            assert!(report.errors.is_empty());
        }

        let listed = store.list_recent(100).await.unwrap();
        assert_eq!(listed.len(), 100);
        assert!(listed[0].full_text.ends_with("100"));
        assert!(listed[99].full_text.ends_with("001"));
        assert!(listed.iter().all(|e| !e.full_text.ends_with("000")));
        assert!(controller.is_idle());
    }

    struct SlowClassifier;

    impl LanguageClassifier for SlowClassifier {
        fn best_language(&self, _text: &str) -> Result<Option<Language>> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(Some(Language::English))
        }

        fn confidence_values(&self, _text: &str) -> Result<Vec<(Language, f64)>> {
            Ok(vec![(Language::English, 1.0)])
        }
    }

    #[tokio::test]
    async fn cancelled_detection_returns_to_idle() {
        let (_memory, store) = memory_store();
        let controller =
            DetectionController::new(Detector::with_classifier(Box::new(SlowClassifier)), store);

        let cancelled = tokio::time::timeout(
            Duration::from_millis(20),
            controller.detect("This text is long enough to pass the gate."),
        )
        .await;
        assert!(cancelled.is_err());
        assert!(controller.is_idle());

        let report = controller
            .detect("This text is long enough to pass the gate.")
            .await
            .unwrap();
        assert_eq!(report.language.as_deref(), Some("English"));
    }
}
