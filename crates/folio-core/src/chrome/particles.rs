#![forbid(unsafe_code)]

//! Ambient particle background.
//!
//! A particle is spawned on a fixed interval at a random horizontal
//! position. It rises from just below the viewport to above it while
//! drifting sideways, and fades out over the end of its flight. The spawner
//! only decides when and what to spawn; the host animates the element and
//! removes it once the flight is over.

use core::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Time between spawns.
pub const PARTICLE_INTERVAL: Duration = Duration::from_millis(500);
/// Maximum sideways drift in either direction.
pub const PARTICLE_DRIFT_PX: f64 = 100.0;
/// Shortest flight.
pub const PARTICLE_MIN_LIFETIME: Duration = Duration::from_secs(8);
/// Flights are drawn from `[MIN, MAX)`.
pub const PARTICLE_MAX_LIFETIME: Duration = Duration::from_secs(12);
/// Length of the closing fade.
pub const PARTICLE_FADE_OUT: Duration = Duration::from_secs(1);
/// Start offset below the bottom edge of the viewport.
pub const PARTICLE_START_BELOW_PX: f64 = 10.0;
/// Vertical position at which a flight ends.
pub const PARTICLE_END_Y: f64 = -100.0;

/// One particle flight, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub start_x: f64,
    pub end_x: f64,
    /// Flight time from spawn to removal.
    pub duration: Duration,
    /// Closing fade, never longer than `duration`.
    pub fade_out: Duration,
}

impl Particle {
    /// Offset into the flight at which the fade-out begins.
    #[must_use]
    pub fn fade_out_at(&self) -> Duration {
        self.duration.saturating_sub(self.fade_out)
    }

    /// Opacity reached when the fade-out begins.
    ///
    /// Opacity climbs linearly toward 1 across the whole flight, so this is
    /// the share of the flight elapsed at [`Self::fade_out_at`].
    #[must_use]
    pub fn peak_opacity(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        self.fade_out_at().as_secs_f64() / self.duration.as_secs_f64()
    }

    /// The same flight with both timings passed through `scale`.
    #[must_use]
    pub fn scaled(self, scale: impl Fn(Duration) -> Duration) -> Self {
        let duration = scale(self.duration);
        Self {
            duration,
            fade_out: scale(self.fade_out).min(duration),
            ..self
        }
    }
}

/// Spawns particles on a host-driven clock.
#[derive(Debug, Clone)]
pub struct ParticleSpawner {
    rng: SmallRng,
    interval: Duration,
    next_spawn: Duration,
    paused: bool,
}

impl ParticleSpawner {
    /// Spawner started at `now`; the first particle is due one interval later.
    #[must_use]
    pub fn new(seed: u64, now: Duration, interval: Duration) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            interval,
            next_spawn: now.saturating_add(interval),
            paused: false,
        }
    }

    /// Suspend spawning; slots that fall due while paused are skipped.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Spawn at most one particle if a slot is due at `now`.
    ///
    /// Overdue slots collapse into one, so a long gap between ticks never
    /// releases a burst.
    pub fn tick(&mut self, now: Duration, viewport_width: f64) -> Option<Particle> {
        if self.interval.is_zero() || now < self.next_spawn {
            return None;
        }
        let overdue = now.saturating_sub(self.next_spawn).as_nanos() / self.interval.as_nanos();
        let advance = u32::try_from(overdue + 1).unwrap_or(u32::MAX);
        self.next_spawn = self
            .next_spawn
            .saturating_add(self.interval.saturating_mul(advance));
        if self.paused {
            return None;
        }
        Some(self.spawn(viewport_width))
    }

    fn spawn(&mut self, viewport_width: f64) -> Particle {
        let width = if viewport_width.is_finite() {
            viewport_width.max(0.0)
        } else {
            0.0
        };
        let start_x = width * self.rng.random::<f64>();
        let end_x = start_x + self.rng.random_range(-PARTICLE_DRIFT_PX..PARTICLE_DRIFT_PX);
        let spread = (PARTICLE_MAX_LIFETIME - PARTICLE_MIN_LIFETIME).as_millis() as u64;
        let extra = Duration::from_millis(self.rng.random_range(0..spread));
        let duration = PARTICLE_MIN_LIFETIME.saturating_add(extra);
        tracing::trace!(start_x, end_x, ?duration, "particle spawned");
        Particle {
            start_x,
            end_x,
            duration,
            fade_out: PARTICLE_FADE_OUT,
        }
    }
}
