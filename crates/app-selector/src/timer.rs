//! Single-shot timers driven by the host loop.

use std::time::Duration;

use web_time::Instant;

/// Fires once, the first time it is polled at or after its deadline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OneShotTimer {
    deadline: Option<Instant>,
}

impl OneShotTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer to fire `after` from `now`, replacing any pending
    /// deadline.
    pub fn arm(&mut self, now: Instant, after: Duration) {
        self.deadline = Some(now + after);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true exactly once, when `now` reached the deadline.
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

    #[test]
    fn test_fires_once_at_deadline() {
        let start = Instant::now();
        let mut timer = OneShotTimer::new();
        timer.arm(start, Duration::from_secs(5));

        assert!(!timer.poll(start + Duration::from_secs(4)));
        assert!(timer.poll(start + Duration::from_secs(5)));
        assert!(!timer.poll(start + Duration::from_secs(6)));
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let start = Instant::now();
        let mut timer = OneShotTimer::new();
        timer.arm(start, Duration::from_secs(2));
        timer.cancel();

        assert!(!timer.poll(start + Duration::from_secs(10)));
    }
}
