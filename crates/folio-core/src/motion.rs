#![forbid(unsafe_code)]

//! Global motion switch driven by user and document preferences.
//!
//! Reduced-motion slows every timeline to half speed; a hidden document
//! pauses them. The policy never affects which section is active.

use core::time::Duration;

/// Time scale applied when the user prefers reduced motion.
pub const REDUCED_MOTION_TIME_SCALE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionPolicy {
    reduced_motion: bool,
    document_hidden: bool,
}

impl MotionPolicy {
    #[must_use]
    pub const fn new(reduced_motion: bool) -> Self {
        Self {
            reduced_motion,
            document_hidden: false,
        }
    }

    #[must_use]
    pub const fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Record a document visibility change.
    pub fn set_document_hidden(&mut self, hidden: bool) {
        if hidden != self.document_hidden {
            tracing::debug!(hidden, "timelines {}", if hidden { "paused" } else { "resumed" });
        }
        self.document_hidden = hidden;
    }

    /// Whether all timelines are paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.document_hidden
    }

    /// Global playback rate.
    #[must_use]
    pub fn time_scale(&self) -> f64 {
        if self.reduced_motion {
            REDUCED_MOTION_TIME_SCALE
        } else {
            1.0
        }
    }

    /// Wall-clock length of an animation authored as `authored`.
    #[must_use]
    pub fn scale_duration(&self, authored: Duration) -> Duration {
        scale_nanos(authored, 1.0 / self.time_scale())
    }
}

fn scale_nanos(d: Duration, factor: f64) -> Duration {
    let nanos = (d.as_nanos() as f64 * factor).round();
    if nanos >= u64::MAX as f64 {
        Duration::from_nanos(u64::MAX)
    } else {
        Duration::from_nanos(nanos as u64)
    }
}
