pub mod detection;

pub use detection::{ConfidenceScore, DetectionEvent};
