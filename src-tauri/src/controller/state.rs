use serde::Serialize;

/// Trimmed character count required before detection is offered.
pub const MIN_TEXT_LENGTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerStatus {
    #[default]
    Idle,
    Detecting,
}

#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    pub status: ControllerStatus,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.status == ControllerStatus::Idle
    }

    pub fn begin(&mut self) {
        self.status = ControllerStatus::Detecting;
    }

    pub fn finish(&mut self) {
        self.status = ControllerStatus::Idle;
    }
}

/// Whether the detect action should be available for `text`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InputCheck {
    pub trimmed_length: usize,
    pub can_detect: bool,
    pub message: Option<String>,
}

pub fn check_input(text: &str) -> InputCheck {
    let trimmed_length = text.trim().chars().count();
    let can_detect = trimmed_length >= MIN_TEXT_LENGTH;

    InputCheck {
        trimmed_length,
        can_detect,
        message: (!can_detect).then(|| {
            format!("Please enter at least {MIN_TEXT_LENGTH} characters for accurate detection")
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_is_gated() {
        let check = check_input("short");
        assert!(!check.can_detect);
        assert_eq!(check.trimmed_length, 5);
        assert!(check.message.unwrap().contains("at least 20 characters"));
    }

    #[test]
    fn whitespace_does_not_count_towards_threshold() {
        let padded = format!("   {}   \n\t", "x".repeat(MIN_TEXT_LENGTH - 1));
        assert!(!check_input(&padded).can_detect);
        assert!(!check_input("                              ").can_detect);
    }

    #[test]
    fn threshold_is_inclusive_and_counts_characters() {
        assert!(check_input(&"x".repeat(MIN_TEXT_LENGTH)).can_detect);
        // 20 multi-byte characters, 60 bytes.
        let check = check_input(&"語".repeat(MIN_TEXT_LENGTH));
        assert!(check.can_detect);
        assert_eq!(check.trimmed_length, MIN_TEXT_LENGTH);
        assert!(check.message.is_none());
    }

    #[test]
    fn every_short_input_is_gated() {
        for len in 0..MIN_TEXT_LENGTH {
            assert!(!check_input(&"a".repeat(len)).can_detect, "length {len}");
        }
    }

    #[test]
    fn finish_returns_to_idle() {
        let mut state = ControllerState::new();
        state.begin();
        assert!(!state.is_idle());

        state.finish();
        assert!(state.is_idle());
    }
}
