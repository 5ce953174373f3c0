#![forbid(unsafe_code)]

//! Cyclic image swap for the featured-project glitch effect.

use core::time::Duration;

/// Delay between start and the first swap.
pub const ROTATOR_START_DELAY: Duration = Duration::from_millis(1000);
/// Interval between swaps.
pub const ROTATOR_INTERVAL: Duration = Duration::from_millis(2000);

/// Advances an active index over `len` images on a fixed schedule.
///
/// Ticks are lazy: `tick(now)` performs every swap that fell due since the
/// previous call, so a throttled background tab catches up in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRotator {
    len: usize,
    current: usize,
    next_swap: Duration,
    interval: Duration,
}

impl ImageRotator {
    /// Rotator started at `now`; index 0 is active.
    #[must_use]
    pub fn new(len: usize, now: Duration, start_delay: Duration, interval: Duration) -> Self {
        Self {
            len,
            current: 0,
            next_swap: now.saturating_add(start_delay).saturating_add(interval),
            interval,
        }
    }

    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Apply due swaps. Returns `(previous, current)` when the index moved.
    pub fn tick(&mut self, now: Duration) -> Option<(usize, usize)> {
        if self.len == 0 || self.interval.is_zero() || now < self.next_swap {
            return None;
        }
        let overdue = now.saturating_sub(self.next_swap).as_nanos() / self.interval.as_nanos();
        let steps = (overdue + 1) as usize;
        let advance = u32::try_from(overdue + 1).unwrap_or(u32::MAX);
        self.next_swap = self
            .next_swap
            .saturating_add(self.interval.saturating_mul(advance));
        if self.len == 1 {
            return None;
        }
        let previous = self.current;
        self.current = (self.current + steps % self.len) % self.len;
        (previous != self.current).then_some((previous, self.current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn rotator(len: usize) -> ImageRotator {
        ImageRotator::new(len, ms(0), ROTATOR_START_DELAY, ROTATOR_INTERVAL)
    }

    #[test]
    fn first_swap_after_delay_plus_interval() {
        let mut r = rotator(3);
        assert_eq!(r.tick(ms(2999)), None);
        assert_eq!(r.tick(ms(3000)), Some((0, 1)));
        assert_eq!(r.tick(ms(4000)), None);
        assert_eq!(r.tick(ms(5000)), Some((1, 2)));
        assert_eq!(r.tick(ms(7000)), Some((2, 0)));
    }

    #[test]
    fn catches_up_after_long_gap() {
        let mut r = rotator(3);
        // Three swaps fell due (3s, 5s, 7s): a full cycle lands back on 0.
        assert_eq!(r.tick(ms(7000)), None);
        assert_eq!(r.current(), 0);
        assert_eq!(r.tick(ms(9000)), Some((0, 1)));
    }

    #[test]
    fn degenerate_rotators_do_not_move() {
        let mut empty = rotator(0);
        assert!(empty.is_empty());
        assert_eq!(empty.tick(ms(10_000)), None);

        let mut single = rotator(1);
        assert_eq!(single.tick(ms(10_000)), None);
    }
}
