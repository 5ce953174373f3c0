#![forbid(unsafe_code)]

//! Host-driven debounce and throttle wrappers.
//!
//! Both types are clock-agnostic: the host passes the current monotonic time
//! with every call and polls when its own timer fires. Nothing here spawns a
//! timer.
//!
//! - [`Debounce`] is trailing-edge: a burst of pushes yields one value, `wait`
//!   after the last push. Latest value wins.
//! - [`Throttle`] is leading-edge: the first call in a window passes, the
//!   rest of the window is dropped.

use core::time::Duration;

/// Trailing-edge debouncer holding the latest pending value.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    wait: Duration,
    pending: Option<(T, Duration)>,
}

impl<T> Debounce<T> {
    #[must_use]
    pub const fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: None,
        }
    }

    /// Record a call at `now`, replacing any pending value and restarting the wait.
    pub fn push(&mut self, value: T, now: Duration) {
        self.pending = Some((value, now));
    }

    /// Time at which the pending value becomes due.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, at)| at.saturating_add(self.wait))
    }

    /// Take the pending value if its wait has elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        let due = self.deadline()?;
        if now < due {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }
}

/// Leading-edge throttle.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    interval: Duration,
    last_admitted: Option<Duration>,
}

impl Throttle {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_admitted: None,
        }
    }

    /// Whether a call at `now` should run.
    pub fn admit(&mut self, now: Duration) -> bool {
        let open = match self.last_admitted {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.interval || now < last,
        };
        if open {
            self.last_admitted = Some(now);
        }
        open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn debounce_delivers_latest_after_quiet_period() {
        let mut d = Debounce::new(ms(100));
        d.push(1, ms(0));
        d.push(2, ms(50));
        d.push(3, ms(90));
        assert_eq!(d.deadline(), Some(ms(190)));
        assert_eq!(d.poll(ms(150)), None);
        assert_eq!(d.poll(ms(190)), Some(3));
        assert_eq!(d.poll(ms(500)), None);
        assert_eq!(d.deadline(), None);
    }

    #[test]
    fn zero_wait_debounce_is_due_immediately() {
        let mut d = Debounce::new(Duration::ZERO);
        d.push((), ms(7));
        assert_eq!(d.poll(ms(7)), Some(()));
    }

    #[test]
    fn throttle_admits_leading_edge_once_per_interval() {
        let mut t = Throttle::new(ms(100));
        assert!(t.admit(ms(0)));
        assert!(!t.admit(ms(20)));
        assert!(!t.admit(ms(99)));
        assert!(t.admit(ms(100)));
        assert!(!t.admit(ms(150)));
        assert!(t.admit(ms(200)));
    }

    #[test]
    fn throttle_recovers_from_clock_reset() {
        let mut t = Throttle::new(ms(100));
        assert!(t.admit(ms(1000)));
        assert!(t.admit(ms(10)));
    }
}
