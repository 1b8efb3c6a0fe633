use std::time::Duration;

use tracing::trace;

/// Trailing-edge debounce timer driven by an external clock.
///
/// Scheduling again before the deadline replaces the pending deadline, so a
/// burst of triggers fires once, `delay` after the last one. A zero delay
/// fires on the next [`Debounce::fire`] call, which collapses everything
/// scheduled within the same frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Duration>,
}

impl Debounce {
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn schedule(&mut self, now: Duration) {
        self.deadline = Some(now + self.delay);
    }

    /// Schedule with zero delay, ignoring the configured one.
    pub fn schedule_now(&mut self, now: Duration) {
        self.deadline = Some(now);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Returns `true` exactly once when the deadline has passed.
    pub fn fire(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                trace!(?deadline, ?now, "debounce fired");
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

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn fires_once_after_delay() {
        let mut debounce = Debounce::new(ms(100));
        debounce.schedule(ms(0));
        assert!(!debounce.fire(ms(99)));
        assert!(debounce.fire(ms(100)));
        assert!(!debounce.fire(ms(200)));
    }

    #[test]
    fn rescheduling_pushes_the_deadline_back() {
        let mut debounce = Debounce::new(ms(100));
        debounce.schedule(ms(0));
        debounce.schedule(ms(60));
        debounce.schedule(ms(90));
        assert!(!debounce.fire(ms(150)));
        assert_eq!(debounce.deadline(), Some(ms(190)));
        assert!(debounce.fire(ms(190)));
    }

    #[test]
    fn zero_delay_coalesces_a_burst() {
        let mut debounce = Debounce::new(Duration::ZERO);
        for _ in 0..3 {
            debounce.schedule(ms(5));
        }
        assert!(debounce.fire(ms(5)));
        assert!(!debounce.fire(ms(5)));
    }

    #[test]
    fn schedule_now_overrides_a_pending_delay() {
        let mut debounce = Debounce::new(ms(100));
        debounce.schedule(ms(0));
        debounce.schedule_now(ms(10));
        assert!(debounce.fire(ms(10)));
    }

    #[test]
    fn cancel_drops_the_pending_call() {
        let mut debounce = Debounce::new(ms(100));
        debounce.schedule(ms(0));
        debounce.cancel();
        assert!(!debounce.is_pending());
        assert!(!debounce.fire(ms(500)));
    }
}
