#![forbid(unsafe_code)]

//! Deterministic smooth-scroll driver.
//!
//! [`ScrollDriver`] holds at most one [`ScrollTween`]. Starting a new tween
//! replaces the in-flight one, so repeated navigation never stacks scrolls.
//! The host samples the driver once per animation frame and writes the
//! returned position to the viewport.
//!
//! # Invariants
//!
//! 1. `sample(now)` is clamped to `[from, to]` for any `now`.
//! 2. A zero-duration tween lands on `to` at its first sample.
//! 3. The driver clears itself after delivering the final position.

use core::time::Duration;

/// Vertical scroll position that puts an element `offset_px` below the viewport top.
///
/// `element_top` is the element's top edge relative to the viewport (as
/// reported by `getBoundingClientRect`), `scroll_y` the current document
/// scroll position. The result never goes above the document top.
#[must_use]
pub fn target_scroll_y(element_top: f64, scroll_y: f64, offset_px: f64) -> f64 {
    (element_top + scroll_y - offset_px).max(0.0)
}

/// `power1.out`: quadratic ease-out.
#[must_use]
fn ease_out_quad(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv
}

/// One eased, time-bounded scroll from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTween {
    pub from: f64,
    pub to: f64,
    pub started_at: Duration,
    pub duration: Duration,
}

impl ScrollTween {
    /// Linear progress in `[0, 1]` at `now`.
    #[must_use]
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Eased scroll position at `now`.
    #[must_use]
    pub fn position(&self, now: Duration) -> f64 {
        let p = self.progress(now);
        if p >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * ease_out_quad(p)
    }

    #[must_use]
    pub fn is_finished(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Holds the in-flight scroll tween, if any.
#[derive(Debug, Clone, Default)]
pub struct ScrollDriver {
    current: Option<ScrollTween>,
}

impl ScrollDriver {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Start scrolling from `from` to `to`, superseding any in-flight tween.
    pub fn start(&mut self, from: f64, to: f64, now: Duration, duration: Duration) {
        if let Some(previous) = self.current.take() {
            tracing::trace!(
                previous_to = previous.to,
                next_to = to,
                "in-flight scroll superseded"
            );
        }
        self.current = Some(ScrollTween {
            from,
            to,
            started_at: now,
            duration,
        });
    }

    /// Whether a tween is in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn current(&self) -> Option<&ScrollTween> {
        self.current.as_ref()
    }

    /// Position to apply at `now`; clears the tween once it has finished.
    pub fn sample(&mut self, now: Duration) -> Option<f64> {
        let tween = self.current?;
        let y = tween.position(now);
        if tween.is_finished(now) {
            self.current = None;
        }
        Some(y)
    }

    /// Drop the in-flight tween; no further positions are produced.
    pub fn cancel(&mut self) {
        self.current = None;
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
    fn target_accounts_for_offset_and_document_top() {
        assert_eq!(target_scroll_y(400.0, 100.0, 20.0), 480.0);
        assert_eq!(target_scroll_y(-50.0, 40.0, 20.0), 0.0);
    }

    #[test]
    fn tween_eases_out_and_lands_on_target() {
        let tween = ScrollTween {
            from: 0.0,
            to: 100.0,
            started_at: ms(0),
            duration: ms(300),
        };
        assert_eq!(tween.position(ms(0)), 0.0);
        let mid = tween.position(ms(150));
        assert!(mid > 50.0 && mid < 100.0, "ease-out should lead linear: {mid}");
        assert_eq!(tween.position(ms(300)), 100.0);
        assert_eq!(tween.position(ms(900)), 100.0);
    }

    #[test]
    fn driver_supersedes_and_clears() {
        let mut driver = ScrollDriver::new();
        driver.start(0.0, 500.0, ms(0), ms(300));
        driver.start(120.0, 900.0, ms(100), ms(300));
        assert_eq!(driver.current().map(|t| t.to), Some(900.0));

        assert_eq!(driver.sample(ms(100)), Some(120.0));
        assert!(driver.is_active());
        assert_eq!(driver.sample(ms(400)), Some(900.0));
        assert!(!driver.is_active());
        assert_eq!(driver.sample(ms(500)), None);
    }

    #[test]
    fn zero_duration_jumps() {
        let mut driver = ScrollDriver::new();
        driver.start(10.0, 20.0, ms(5), Duration::ZERO);
        assert_eq!(driver.sample(ms(5)), Some(20.0));
        assert!(!driver.is_active());
    }

    #[test]
    fn upward_scroll_stays_within_bounds() {
        let tween = ScrollTween {
            from: 800.0,
            to: 200.0,
            started_at: ms(0),
            duration: ms(100),
        };
        for t in 0..=100 {
            let y = tween.position(ms(t));
            assert!((200.0..=800.0).contains(&y), "{y} out of range at {t}ms");
        }
    }
}
