//! Poll-with-deadline.
//!
//! Waiting is expressed as repeated non-blocking polls against a wall-clock
//! deadline, with a short sleep between empty polls so the loop does not
//! spin. Nothing here knows about frames.

use std::task::Poll;
use std::thread;
use std::time::{Duration, Instant};

/// A point in time after which waiting stops.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    /// Deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Deadline {
            start: Instant::now(),
            budget,
        }
    }

    /// Time since the deadline was armed.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// The full budget.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left, zero once expired.
    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.elapsed())
    }

    /// Whether the whole budget has been used.
    pub fn expired(&self) -> bool {
        self.elapsed() >= self.budget
    }
}

/// Call `poll` until it is ready or `deadline` expires.
///
/// `poll` runs at least once. Returns `Ok(None)` on expiry, which never
/// happens before the full budget has elapsed. Errors from `poll` end the
/// wait immediately.
pub fn poll_until<T, E, F>(deadline: Deadline, interval: Duration, mut poll: F) -> Result<Option<T>, E>
where
    F: FnMut() -> Result<Poll<T>, E>,
{
    loop {
        if let Poll::Ready(value) = poll()? {
            return Ok(Some(value));
        }
        if deadline.expired() {
            return Ok(None);
        }
        let nap = interval.min(deadline.remaining());
        if nap.is_zero() {
            thread::yield_now();
        } else {
            thread::sleep(nap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_on_third_poll() {
        let mut calls = 0;
        let got: Result<Option<u32>, ()> = poll_until(
            Deadline::after(Duration::from_secs(5)),
            Duration::from_millis(1),
            || {
                calls += 1;
                Ok(if calls == 3 { Poll::Ready(42) } else { Poll::Pending })
            },
        );
        assert_eq!(got, Ok(Some(42)));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_expires_after_budget() {
        let budget = Duration::from_millis(30);
        let deadline = Deadline::after(budget);
        let got: Result<Option<()>, ()> =
            poll_until(deadline, Duration::from_millis(5), || Ok(Poll::Pending));
        assert_eq!(got, Ok(None));
        assert!(deadline.elapsed() >= budget);
        assert!(deadline.expired());
        assert_eq!(deadline.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_zero_budget_still_polls_once() {
        let mut calls = 0;
        let got: Result<Option<()>, ()> =
            poll_until(Deadline::after(Duration::ZERO), Duration::from_millis(1), || {
                calls += 1;
                Ok(Poll::Pending)
            });
        assert_eq!(got, Ok(None));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_error_stops_polling() {
        let got: Result<Option<()>, &str> = poll_until(
            Deadline::after(Duration::from_secs(5)),
            Duration::from_millis(1),
            || Err("boom"),
        );
        assert_eq!(got, Err("boom"));
    }
}
