use std::time::{Duration, Instant};

pub const DEFAULT_AUTO_SAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Debounced save deadline. Owns no timer: the host passes the current time
/// in and persists whatever the session hands back once the deadline passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoSave {
    interval: Duration,
    deadline: Option<Instant>,
}

impl AutoSave {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Arm or push back the deadline to `now + interval`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// True once per armed deadline: disarms when due.
    pub fn take_due(&mut self, now: Instant) -> bool {
        let due = self.is_due(now);
        if due {
            self.deadline = None;
        }
        due
    }
}

impl Default for AutoSave {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_SAVE_INTERVAL)
    }
}
