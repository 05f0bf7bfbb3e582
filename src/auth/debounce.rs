//! Delays validation feedback until the player stops typing.

use std::time::{Duration, Instant};

/// Quiet period before sign-in feedback appears.
pub const SIGN_IN_FEEDBACK_DELAY: Duration = Duration::from_millis(500);

/// Quiet period before sign-up feedback appears.
pub const SIGN_UP_FEEDBACK_DELAY: Duration = Duration::from_millis(800);

/// Tracks the last edit of one field and reports when feedback may show.
///
/// Callers pass the current instant so the TUI tick loop and tests share
/// one clock source.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackDebounce {
    delay: Duration,
    last_edit: Option<Instant>,
}

impl FeedbackDebounce {
    /// Creates a debounce with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_edit: None,
        }
    }

    /// Debounce for sign-in form fields.
    pub fn sign_in() -> Self {
        Self::new(SIGN_IN_FEEDBACK_DELAY)
    }

    /// Debounce for sign-up form fields.
    pub fn sign_up() -> Self {
        Self::new(SIGN_UP_FEEDBACK_DELAY)
    }

    /// Records an edit at `now`, hiding feedback until the delay elapses again.
    pub fn touch(&mut self, now: Instant) {
        self.last_edit = Some(now);
    }

    /// Whether feedback should be visible at `now`.
    pub fn visible(&self, now: Instant) -> bool {
        match self.last_edit {
            Some(edited) => now.saturating_duration_since(edited) >= self.delay,
            None => false,
        }
    }

    /// Forgets the last edit.
    pub fn reset(&mut self) {
        self.last_edit = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_until_delay_elapses() {
        let start = Instant::now();
        let mut debounce = FeedbackDebounce::sign_in();
        assert!(!debounce.visible(start));

        debounce.touch(start);
        assert!(!debounce.visible(start + Duration::from_millis(499)));
        assert!(debounce.visible(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_new_edit_restarts_delay() {
        let start = Instant::now();
        let mut debounce = FeedbackDebounce::sign_up();
        debounce.touch(start);
        debounce.touch(start + Duration::from_millis(700));
        assert!(!debounce.visible(start + Duration::from_millis(900)));
        assert!(debounce.visible(start + Duration::from_millis(1500)));

        debounce.reset();
        assert!(!debounce.visible(start + Duration::from_secs(10)));
    }
}
