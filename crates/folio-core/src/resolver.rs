#![forbid(unsafe_code)]

//! Active-section resolution.
//!
//! [`ActiveSectionResolver`] owns the single active section id. Three event
//! sources feed it, all on the host event loop:
//! - visibility batches from the observer,
//! - explicit navigation (a click on a `#<id>` link),
//! - bootstrap checkpoints scheduled after initialization.
//!
//! Each entry point returns a [`ResolverDispatch`] describing what happened,
//! so the host can forward the new active id to the renderer and the scroll
//! request to the animator. The resolver itself performs no I/O.
//!
//! # Invariants
//!
//! 1. After `init`, exactly one registered section is active.
//! 2. While an override window is live (`now < expires_at`), visibility
//!    batches change nothing.
//! 3. Navigation always reports the target as activated before it reports
//!    the scroll request, and always installs a fresh override.
//! 4. Override expiry is checked lazily on the next event.
//! 5. Equal ratios resolve to the sample earliest in the batch (document order).

use core::time::Duration;

use crate::bootstrap::{BootstrapGuard, BootstrapPhase};
use crate::host::ScrollRequest;
use crate::section::{SectionId, SectionRegistry, VisibilitySample, clamp_ratio};

/// Minimum ratio a candidate must exceed to become active.
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.3;
/// Override window installed after an explicit navigation.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(350);
/// Gap kept between the viewport top and the target section.
pub const DEFAULT_SCROLL_OFFSET_PX: f64 = 20.0;
/// Duration requested from the scroll animator.
pub const DEFAULT_SCROLL_DURATION: Duration = Duration::from_millis(300);

/// Resolver tuning parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    /// Candidate ratio must be strictly greater than this.
    pub visibility_threshold: f64,
    /// Should cover the scroll duration plus margin.
    pub grace_period: Duration,
    pub scroll_offset_px: f64,
    pub scroll_duration: Duration,
    /// Section active before the first real signal. `None` uses the first
    /// registered section.
    pub default_section: Option<SectionId>,
    /// Checkpoint offsets after `init` at which the default is reasserted.
    pub bootstrap_checkpoints: Vec<Duration>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            grace_period: DEFAULT_GRACE_PERIOD,
            scroll_offset_px: DEFAULT_SCROLL_OFFSET_PX,
            scroll_duration: DEFAULT_SCROLL_DURATION,
            default_section: None,
            bootstrap_checkpoints: BootstrapGuard::default().checkpoints().to_vec(),
        }
    }
}

/// Error raised when constructing a resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolverError {
    /// The registry holds no sections, so no default can be chosen.
    NoSections,
    /// The configured default section is not registered.
    UnknownDefault(SectionId),
    /// Threshold outside `[0, 1]` or not a number.
    InvalidThreshold(f64),
}

impl core::fmt::Display for ResolverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoSections => write!(f, "no sections registered"),
            Self::UnknownDefault(id) => write!(f, "default section {id} is not registered"),
            Self::InvalidThreshold(t) => write!(f, "visibility threshold {t} is outside [0, 1]"),
        }
    }
}

impl std::error::Error for ResolverError {}

/// Transient lock installed by an explicit navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideWindow {
    pub id: SectionId,
    pub expires_at: Duration,
}

impl OverrideWindow {
    /// Whether the window still suppresses visibility updates at `now`.
    #[must_use]
    pub fn is_live(&self, now: Duration) -> bool {
        now < self.expires_at
    }
}

/// Which entry point produced a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverPhase {
    Init,
    Checkpoint,
    VisibilityBatch,
    Navigate,
}

/// Deterministic reason why an event left the active section unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverIgnoredReason {
    /// `init` has not run yet.
    NotInitialized,
    /// `init` already ran.
    AlreadyInitialized,
    /// An override window from a recent navigation is live.
    OverrideLive,
    /// The bootstrap guard is holding the default section.
    BootstrapHold,
    /// The bootstrap guard has already released.
    BootstrapReleased,
    /// No intersecting, registered sample in the batch.
    NoCandidate,
    /// Best candidate did not exceed the visibility threshold.
    BelowThreshold,
    /// The winning section is already active.
    AlreadyActive,
    /// Navigation targeted an id that is not registered.
    UnknownSection,
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverOutcome {
    Activated,
    Ignored(ResolverIgnoredReason),
}

/// Result of one resolver event.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverDispatch {
    pub phase: ResolverPhase,
    pub now: Duration,
    /// Section the renderer must mark active, if any.
    pub activated: Option<SectionId>,
    /// Scroll the host must start after updating the renderer.
    pub scroll: Option<ScrollRequest>,
    /// Best visibility candidate considered, with its ratio.
    pub candidate: Option<(SectionId, f64)>,
    pub outcome: ResolverOutcome,
}

impl ResolverDispatch {
    fn ignored(phase: ResolverPhase, now: Duration, reason: ResolverIgnoredReason) -> Self {
        Self {
            phase,
            now,
            activated: None,
            scroll: None,
            candidate: None,
            outcome: ResolverOutcome::Ignored(reason),
        }
    }

    fn activated(phase: ResolverPhase, now: Duration, id: SectionId) -> Self {
        Self {
            phase,
            now,
            activated: Some(id),
            scroll: None,
            candidate: None,
            outcome: ResolverOutcome::Activated,
        }
    }

    fn with_candidate(mut self, candidate: Option<(SectionId, f64)>) -> Self {
        self.candidate = candidate;
        self
    }

    /// Whether the active section changed or was (re)applied.
    #[must_use]
    pub fn is_activated(&self) -> bool {
        matches!(self.outcome, ResolverOutcome::Activated)
    }

    /// Reason for ignoring the event, if it was ignored.
    #[must_use]
    pub fn ignored_reason(&self) -> Option<ResolverIgnoredReason> {
        match self.outcome {
            ResolverOutcome::Ignored(reason) => Some(reason),
            ResolverOutcome::Activated => None,
        }
    }
}

/// Pick the intersecting sample with the highest ratio; the earliest wins ties.
///
/// Samples whose id `accept` rejects are skipped.
#[must_use]
pub fn select_candidate<'a>(
    samples: &'a [VisibilitySample],
    mut accept: impl FnMut(&SectionId) -> bool,
) -> Option<(&'a SectionId, f64)> {
    let mut best: Option<(&SectionId, f64)> = None;
    for sample in samples {
        if !sample.intersecting || !accept(&sample.id) {
            continue;
        }
        let ratio = clamp_ratio(sample.ratio);
        if best.is_none_or(|(_, top)| ratio > top) {
            best = Some((&sample.id, ratio));
        }
    }
    best
}

/// Single owner of the active section id.
#[derive(Debug, Clone)]
pub struct ActiveSectionResolver {
    registry: SectionRegistry,
    config: ResolverConfig,
    default_id: SectionId,
    active: Option<SectionId>,
    override_window: Option<OverrideWindow>,
    bootstrap: BootstrapGuard,
}

impl ActiveSectionResolver {
    /// Build a resolver over `registry` with validated configuration.
    pub fn new(registry: SectionRegistry, config: ResolverConfig) -> Result<Self, ResolverError> {
        let threshold = config.visibility_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ResolverError::InvalidThreshold(threshold));
        }
        let default_id = match &config.default_section {
            Some(id) if registry.contains(id) => id.clone(),
            Some(id) => return Err(ResolverError::UnknownDefault(id.clone())),
            None => registry.first().cloned().ok_or(ResolverError::NoSections)?,
        };
        let bootstrap = BootstrapGuard::new(config.bootstrap_checkpoints.clone());
        Ok(Self {
            registry,
            config,
            default_id,
            active: None,
            override_window: None,
            bootstrap,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    /// Section active before the first real signal.
    #[must_use]
    pub fn default_section(&self) -> &SectionId {
        &self.default_id
    }

    /// Currently active section, `None` before `init`.
    #[must_use]
    pub fn active(&self) -> Option<&SectionId> {
        self.active.as_ref()
    }

    /// Installed override window, live or not yet lazily cleared.
    #[must_use]
    pub fn override_window(&self) -> Option<&OverrideWindow> {
        self.override_window.as_ref()
    }

    #[must_use]
    pub const fn bootstrap_phase(&self) -> BootstrapPhase {
        self.bootstrap.phase()
    }

    /// Checkpoint offsets relative to `init`.
    #[must_use]
    pub fn bootstrap_checkpoints(&self) -> &[Duration] {
        self.bootstrap.checkpoints()
    }

    /// Activate the default section and arm the bootstrap hold.
    pub fn init(&mut self, now: Duration) -> ResolverDispatch {
        if self.bootstrap.phase() != BootstrapPhase::Uninitialized {
            return self.log(ResolverDispatch::ignored(
                ResolverPhase::Init,
                now,
                ResolverIgnoredReason::AlreadyInitialized,
            ));
        }
        self.bootstrap.arm(now);
        self.active = Some(self.default_id.clone());
        self.log(ResolverDispatch::activated(
            ResolverPhase::Init,
            now,
            self.default_id.clone(),
        ))
    }

    /// Reassert the default section at a bootstrap checkpoint.
    pub fn checkpoint(&mut self, now: Duration) -> ResolverDispatch {
        let reason = match self.bootstrap.phase() {
            BootstrapPhase::Uninitialized => Some(ResolverIgnoredReason::NotInitialized),
            BootstrapPhase::Released => Some(ResolverIgnoredReason::BootstrapReleased),
            BootstrapPhase::Holding if !self.bootstrap.checkpoint(now) => {
                Some(ResolverIgnoredReason::BootstrapReleased)
            }
            BootstrapPhase::Holding if self.active.as_ref() == Some(&self.default_id) => {
                Some(ResolverIgnoredReason::AlreadyActive)
            }
            BootstrapPhase::Holding => None,
        };
        if let Some(reason) = reason {
            return self.log(ResolverDispatch::ignored(
                ResolverPhase::Checkpoint,
                now,
                reason,
            ));
        }
        self.active = Some(self.default_id.clone());
        self.log(ResolverDispatch::activated(
            ResolverPhase::Checkpoint,
            now,
            self.default_id.clone(),
        ))
    }

    /// Resolve a visibility batch produced in document order.
    pub fn on_visibility_batch(
        &mut self,
        samples: &[VisibilitySample],
        now: Duration,
    ) -> ResolverDispatch {
        let phase = ResolverPhase::VisibilityBatch;
        if self.bootstrap.phase() == BootstrapPhase::Uninitialized {
            return self.log(ResolverDispatch::ignored(
                phase,
                now,
                ResolverIgnoredReason::NotInitialized,
            ));
        }
        if let Some(window) = &self.override_window {
            if window.is_live(now) {
                return self.log(ResolverDispatch::ignored(
                    phase,
                    now,
                    ResolverIgnoredReason::OverrideLive,
                ));
            }
            tracing::trace!(
                section = %window.id,
                expired_at = ?window.expires_at,
                "override window expired"
            );
            self.override_window = None;
        }
        if self.bootstrap.is_holding(now) {
            return self.log(ResolverDispatch::ignored(
                phase,
                now,
                ResolverIgnoredReason::BootstrapHold,
            ));
        }

        let registry = &self.registry;
        let candidate = select_candidate(samples, |id| registry.contains(id))
            .map(|(id, ratio)| (id.clone(), ratio));
        let Some((id, ratio)) = candidate.clone() else {
            return self.log(ResolverDispatch::ignored(
                phase,
                now,
                ResolverIgnoredReason::NoCandidate,
            ));
        };
        if ratio <= self.config.visibility_threshold {
            return self.log(
                ResolverDispatch::ignored(phase, now, ResolverIgnoredReason::BelowThreshold)
                    .with_candidate(candidate),
            );
        }
        if self.active.as_ref() == Some(&id) {
            return self.log(
                ResolverDispatch::ignored(phase, now, ResolverIgnoredReason::AlreadyActive)
                    .with_candidate(candidate),
            );
        }
        self.active = Some(id.clone());
        self.log(ResolverDispatch::activated(phase, now, id).with_candidate(candidate))
    }

    /// Handle an explicit navigation to `id`.
    ///
    /// Ignored before `init`, so the default section is always the first
    /// one rendered.
    pub fn on_navigate(&mut self, id: &SectionId, now: Duration) -> ResolverDispatch {
        let reason = if self.bootstrap.phase() == BootstrapPhase::Uninitialized {
            Some(ResolverIgnoredReason::NotInitialized)
        } else if !self.registry.contains(id) {
            Some(ResolverIgnoredReason::UnknownSection)
        } else {
            None
        };
        if let Some(reason) = reason {
            return self.log(ResolverDispatch::ignored(ResolverPhase::Navigate, now, reason));
        }
        self.bootstrap.release();
        self.active = Some(id.clone());
        self.override_window = Some(OverrideWindow {
            id: id.clone(),
            expires_at: now.saturating_add(self.config.grace_period),
        });
        let mut dispatch = ResolverDispatch::activated(ResolverPhase::Navigate, now, id.clone());
        dispatch.scroll = Some(ScrollRequest {
            target: id.clone(),
            offset_px: self.config.scroll_offset_px,
            duration: self.config.scroll_duration,
        });
        self.log(dispatch)
    }

    fn log(&self, dispatch: ResolverDispatch) -> ResolverDispatch {
        match (&dispatch.outcome, &dispatch.activated) {
            (ResolverOutcome::Activated, Some(id)) => tracing::debug!(
                phase = ?dispatch.phase,
                now = ?dispatch.now,
                section = %id,
                "active section updated"
            ),
            (outcome, _) => tracing::trace!(
                phase = ?dispatch.phase,
                now = ?dispatch.now,
                outcome = ?outcome,
                candidate = ?dispatch.candidate,
                "resolver event ignored"
            ),
        }
        dispatch
    }
}
