#![forbid(unsafe_code)]

//! Startup hold for the default active section.
//!
//! The visibility observer can deliver a spurious batch while the page is
//! still settling. [`BootstrapGuard`] keeps the default section active through
//! a schedule of checkpoints measured from initialization. Each checkpoint
//! reasserts the default; the guard releases exactly once, either when the
//! final checkpoint has passed or when the user navigates explicitly, and
//! never re-arms.

use core::time::Duration;

/// Default checkpoint schedule, in milliseconds after initialization.
pub const DEFAULT_BOOTSTRAP_CHECKPOINTS_MS: [u64; 4] = [0, 100, 500, 1000];

/// Lifecycle of the bootstrap hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapPhase {
    /// `arm()` has not been called yet.
    Uninitialized,
    /// The default section is being held.
    Holding,
    /// The hold ended; visibility drives the active section.
    Released,
}

/// Monotonic "reassert default until first real signal" gate.
#[derive(Debug, Clone)]
pub struct BootstrapGuard {
    checkpoints: Vec<Duration>,
    phase: BootstrapPhase,
    armed_at: Duration,
}

impl BootstrapGuard {
    /// Create a guard for the given checkpoint offsets (sorted and deduplicated).
    #[must_use]
    pub fn new(mut checkpoints: Vec<Duration>) -> Self {
        checkpoints.sort_unstable();
        checkpoints.dedup();
        Self {
            checkpoints,
            phase: BootstrapPhase::Uninitialized,
            armed_at: Duration::ZERO,
        }
    }

    /// Checkpoint offsets relative to initialization.
    #[must_use]
    pub fn checkpoints(&self) -> &[Duration] {
        &self.checkpoints
    }

    #[must_use]
    pub const fn phase(&self) -> BootstrapPhase {
        self.phase
    }

    /// Start holding at `now`. Only the first call has any effect.
    pub fn arm(&mut self, now: Duration) {
        if self.phase != BootstrapPhase::Uninitialized {
            return;
        }
        self.armed_at = now;
        self.phase = if self.checkpoints.last().is_some_and(|last| !last.is_zero()) {
            BootstrapPhase::Holding
        } else {
            BootstrapPhase::Released
        };
    }

    /// End the hold for good.
    pub fn release(&mut self) {
        self.phase = BootstrapPhase::Released;
    }

    /// Absolute time of the final checkpoint, if armed.
    #[must_use]
    pub fn hold_until(&self) -> Option<Duration> {
        if self.phase == BootstrapPhase::Uninitialized {
            return None;
        }
        let last = self.checkpoints.last().copied().unwrap_or(Duration::ZERO);
        Some(self.armed_at.saturating_add(last))
    }

    /// Whether visibility updates must be suppressed at `now`.
    ///
    /// Releases the guard lazily once `now` reaches the final checkpoint.
    pub fn is_holding(&mut self, now: Duration) -> bool {
        if self.phase != BootstrapPhase::Holding {
            return false;
        }
        match self.hold_until() {
            Some(until) if now < until => true,
            _ => {
                self.release();
                false
            }
        }
    }

    /// Evaluate a checkpoint at `now`.
    ///
    /// Returns `true` when the default should be reasserted. The final
    /// checkpoint reasserts and then releases the guard.
    pub fn checkpoint(&mut self, now: Duration) -> bool {
        if self.phase != BootstrapPhase::Holding {
            return false;
        }
        let Some(until) = self.hold_until() else {
            return false;
        };
        if now > until {
            self.release();
            return false;
        }
        if now == until {
            self.release();
        }
        true
    }
}

impl Default for BootstrapGuard {
    fn default() -> Self {
        Self::new(
            DEFAULT_BOOTSTRAP_CHECKPOINTS_MS
                .iter()
                .map(|&ms| Duration::from_millis(ms))
                .collect(),
        )
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
    fn holds_until_final_checkpoint() {
        let mut guard = BootstrapGuard::default();
        assert_eq!(guard.phase(), BootstrapPhase::Uninitialized);
        assert!(!guard.is_holding(ms(0)));

        guard.arm(ms(50));
        assert_eq!(guard.hold_until(), Some(ms(1050)));
        assert!(guard.is_holding(ms(300)));
        assert!(guard.is_holding(ms(1049)));
        assert!(!guard.is_holding(ms(1050)));
        assert_eq!(guard.phase(), BootstrapPhase::Released);
    }

    #[test]
    fn checkpoints_reassert_until_last_then_release() {
        let mut guard = BootstrapGuard::default();
        guard.arm(ms(0));
        assert!(guard.checkpoint(ms(0)));
        assert!(guard.checkpoint(ms(100)));
        assert!(guard.checkpoint(ms(500)));
        assert!(guard.checkpoint(ms(1000)));
        assert_eq!(guard.phase(), BootstrapPhase::Released);
        assert!(!guard.checkpoint(ms(1000)));
    }

    #[test]
    fn late_checkpoint_releases_without_reasserting() {
        let mut guard = BootstrapGuard::default();
        guard.arm(ms(0));
        assert!(!guard.checkpoint(ms(1500)));
        assert_eq!(guard.phase(), BootstrapPhase::Released);
    }

    #[test]
    fn release_is_monotonic() {
        let mut guard = BootstrapGuard::default();
        guard.arm(ms(0));
        guard.release();
        guard.arm(ms(10));
        assert_eq!(guard.phase(), BootstrapPhase::Released);
        assert!(!guard.is_holding(ms(20)));
        assert!(!guard.checkpoint(ms(100)));
    }

    #[test]
    fn schedule_is_sorted_and_deduplicated() {
        let guard = BootstrapGuard::new(vec![ms(500), ms(100), ms(500), ms(0)]);
        assert_eq!(guard.checkpoints(), &[ms(0), ms(100), ms(500)]);
    }

    #[test]
    fn empty_or_zero_schedule_never_holds() {
        let mut guard = BootstrapGuard::new(Vec::new());
        guard.arm(ms(0));
        assert_eq!(guard.phase(), BootstrapPhase::Released);

        let mut guard = BootstrapGuard::new(vec![Duration::ZERO]);
        guard.arm(ms(0));
        assert!(!guard.is_holding(ms(0)));
    }
}
