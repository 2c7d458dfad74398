use std::thread;
use std::time::Duration;

/// Default attempt ceiling: 60 probes at 2 s apart, a hard
/// two-minute deadline.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

/// Terminal outcome of a readiness poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The probe succeeded; `attempts` is the number of probes
    /// issued, including the successful one.
    Ready { attempts: u32 },
    /// The attempt ceiling was reached without a success. Not a
    /// fatal error; callers report a remediation hint instead.
    TimedOut { attempts: u32 },
}

impl PollOutcome {
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// Bounded fixed-interval readiness gate.
///
/// Every readiness check in the crate goes through this one
/// primitive: a boolean probe run at most `max_attempts` times,
/// `interval` apart, no backoff. No sleep happens after the final
/// attempt.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use photodock::poll::Poller;
///
/// let mut left = 3;
/// let outcome = Poller::new(10, Duration::ZERO).wait(|| {
///     left -= 1;
///     left == 0
/// });
/// assert!(outcome.is_ready());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    max_attempts: u32,
    interval: Duration,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_INTERVAL)
    }
}

impl Poller {
    #[must_use]
    pub const fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Run `probe` until it returns true or the ceiling is hit.
    pub fn wait<F: FnMut() -> bool>(self, mut probe: F) -> PollOutcome {
        for attempt in 1..=self.max_attempts {
            if probe() {
                return PollOutcome::Ready { attempts: attempt };
            }
            if attempt < self.max_attempts {
                thread::sleep(self.interval);
            }
        }
        PollOutcome::TimedOut {
            attempts: self.max_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_on_first_success() {
        let mut calls = 0;
        let outcome = Poller::new(60, Duration::ZERO).wait(|| {
            calls += 1;
            true
        });

        assert_eq!(outcome, PollOutcome::Ready { attempts: 1 });
        assert_eq!(calls, 1);
    }

    #[test]
    fn stops_probing_after_success() {
        let mut calls = 0;
        let outcome = Poller::new(10, Duration::ZERO).wait(|| {
            calls += 1;
            calls == 4
        });

        assert_eq!(outcome, PollOutcome::Ready { attempts: 4 });
        assert_eq!(calls, 4);
    }

    #[test]
    fn times_out_after_exactly_the_ceiling() {
        let mut calls = 0;
        let outcome = Poller::new(7, Duration::ZERO).wait(|| {
            calls += 1;
            false
        });

        assert_eq!(outcome, PollOutcome::TimedOut { attempts: 7 });
        assert_eq!(calls, 7);
    }

    #[test]
    fn defaults_give_two_minute_deadline() {
        let poller = Poller::default();
        assert_eq!(poller.max_attempts, 60);
        assert_eq!(poller.interval, Duration::from_secs(2));
    }

    #[test]
    fn outcome_is_ready() {
        assert!(PollOutcome::Ready { attempts: 1 }.is_ready());
        assert!(!PollOutcome::TimedOut { attempts: 60 }.is_ready());
    }
}
