/// Lifecycle state of a recorder session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecorderState {
    /// No capture in progress, device released
    #[default]
    Inactive,

    /// Actively capturing audio from the microphone
    Recording,

    /// Capture stream held open, chunk forwarding halted
    Paused,
}

impl RecorderState {
    /// Check if inactive
    pub fn is_inactive(&self) -> bool {
        matches!(self, RecorderState::Inactive)
    }

    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        matches!(self, RecorderState::Recording)
    }

    /// Check if paused
    pub fn is_paused(&self) -> bool {
        matches!(self, RecorderState::Paused)
    }

    /// Check if a capture session is live (recording or paused)
    pub fn is_active(&self) -> bool {
        !self.is_inactive()
    }
}

impl std::fmt::Display for RecorderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecorderState::Inactive => write!(f, "Inactive"),
            RecorderState::Recording => write!(f, "Recording"),
            RecorderState::Paused => write!(f, "Paused"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_inactive() {
        assert_eq!(RecorderState::default(), RecorderState::Inactive);
    }

    #[test]
    fn test_predicates() {
        assert!(RecorderState::Inactive.is_inactive());
        assert!(!RecorderState::Inactive.is_active());

        assert!(RecorderState::Recording.is_recording());
        assert!(RecorderState::Recording.is_active());

        assert!(RecorderState::Paused.is_paused());
        assert!(RecorderState::Paused.is_active());
        assert!(!RecorderState::Paused.is_recording());
    }

    #[test]
    fn test_display() {
        assert_eq!(RecorderState::Recording.to_string(), "Recording");
        assert_eq!(RecorderState::Paused.to_string(), "Paused");
    }
}
