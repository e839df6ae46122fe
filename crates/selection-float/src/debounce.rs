//! Deadline-based debounce timer

use std::time::{Duration, Instant};

/// Fires once after `delay` of quiet. Every [`Debouncer::call`] restarts the wait.
///
/// The debouncer never spawns anything: the owner drives it by calling
/// [`Debouncer::poll`] from its event loop, which keeps it deterministic under test.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)start the quiet window at `now`
    pub fn call(&mut self, now: Instant) -> Instant {
        let deadline = now + self.delay;
        self.deadline = Some(deadline);
        deadline
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True exactly once when the quiet window has elapsed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(50);

    #[test]
    fn test_fires_once_after_quiet_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.call(start);

        assert!(!debouncer.poll(start + Duration::from_millis(49)));
        assert!(debouncer.poll(start + Duration::from_millis(50)));
        assert!(!debouncer.poll(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_call_resets_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.call(start);
        debouncer.call(start + Duration::from_millis(40));

        assert!(!debouncer.poll(start + Duration::from_millis(60)));
        assert!(debouncer.poll(start + Duration::from_millis(90)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.call(start);
        debouncer.cancel();

        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(start + Duration::from_secs(1)));
    }
}
