use std::{
    any::Any,
    panic::{catch_unwind, AssertUnwindSafe},
};

use anyhow::{anyhow, Result};
use lingua::{Language, LanguageDetector};

/// The two questions the detector asks of a statistical classifier.
///
/// Implementations report failures as errors; a classifier that simply
/// cannot decide returns `Ok(None)` from `best_language`.
pub trait LanguageClassifier: Send + Sync {
    fn best_language(&self, text: &str) -> Result<Option<Language>>;

    fn confidence_values(&self, text: &str) -> Result<Vec<(Language, f64)>>;
}

impl LanguageClassifier for LanguageDetector {
    fn best_language(&self, text: &str) -> Result<Option<Language>> {
        guarded(|| self.detect_language_of(text))
    }

    fn confidence_values(&self, text: &str) -> Result<Vec<(Language, f64)>> {
        guarded(|| self.compute_language_confidence_values(text))
    }
}

/// Runs a classifier call, turning a panic inside the library into an error.
pub(crate) fn guarded<T>(call: impl FnOnce() -> T) -> Result<T> {
    catch_unwind(AssertUnwindSafe(call))
        .map_err(|payload| anyhow!("classifier panicked: {}", panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
