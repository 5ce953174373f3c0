#![forbid(unsafe_code)]

//! Platform-independent runner core for the portfolio page.
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and the native test harness. No JS/WASM types here: the host feeds in
//! measurements and browser signals, then drains [`HostCommand`]s.

use core::time::Duration;

use folio_core::chrome::{
    CursorFollower, ImageRotator, MenuToggle, NavAutoHide, ParticleSpawner, ScrollTopButton,
    VH_PROPERTY, viewport_unit,
};
use folio_core::{
    ActiveSectionResolver, Debounce, FolioConfig, MotionPolicy, ObserverOptions, ResolverConfig,
    ResolverDispatch, ResolverIgnoredReason, ResolverOutcome, ResolverPhase, ScrollDriver,
    ScrollRequest, SectionId, SectionRegistry, SectionTracker, Throttle, VisibilitySample,
    order_batch, target_scroll_y,
};

use crate::commands::{CommandQueue, DeterministicClock, HostCommand};

/// Minimum spacing between scroll-driven chrome updates.
pub const SCROLL_THROTTLE: Duration = Duration::from_millis(16);
/// Length of the scroll-to-top animation.
pub const SCROLL_TO_TOP_DURATION: Duration = Duration::from_millis(500);

type Tracker = SectionTracker<CommandQueue, CommandQueue>;

/// Platform-independent page runner.
pub struct RunnerCore {
    config: FolioConfig,
    clock: DeterministicClock,
    queue: CommandQueue,
    /// `None` when the page declares no sections; navigation is then inert.
    tracker: Option<Tracker>,
    init_at: Option<Duration>,
    /// Index of the next bootstrap checkpoint to fire.
    next_checkpoint: usize,
    observer_started: bool,
    scroll: ScrollDriver,
    scroll_y: f64,
    /// Scroll position seen but not yet applied to the nav chrome.
    scroll_dirty: bool,
    scroll_throttle: Throttle,
    motion: MotionPolicy,
    cursor: Option<CursorFollower>,
    nav: NavAutoHide,
    scroll_top: ScrollTopButton,
    menu: MenuToggle,
    rotator: Option<ImageRotator>,
    particles: Option<ParticleSpawner>,
    viewport_width: f64,
    resize: Debounce<f64>,
    logs: Vec<String>,
}

impl RunnerCore {
    /// Build a runner for the sections found on the page, in document order.
    ///
    /// Invalid configuration falls back to defaults; duplicate or empty ids
    /// are dropped. Both are reported through [`Self::take_logs`].
    #[must_use]
    pub fn new<I, S>(section_ids: I, config: FolioConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut logs = Vec::new();
        let errors = config.validate();
        let config = if errors.is_empty() {
            config
        } else {
            tracing::warn!(errors = ?errors, "invalid page config, using defaults");
            logs.push(format!("config_error: {}; using defaults", errors.join("; ")));
            FolioConfig::default()
        };
        logs.push(config.to_jsonl());

        let queue = CommandQueue::new();
        let ids: Vec<String> = section_ids.into_iter().map(Into::into).collect();
        let (registry, registry_note) = registry_with_fallback(ids);
        logs.extend(registry_note);
        let tracker = match resolver_with_fallback(registry, config.to_resolver_config()) {
            Ok((resolver, note)) => {
                logs.extend(note);
                Some(SectionTracker::new(resolver, queue.clone(), queue.clone()))
            }
            Err(err) => {
                tracing::debug!(%err, "section tracking disabled");
                logs.push(format!("section_tracking_disabled: {err}"));
                None
            }
        };

        let chrome = &config.chrome;
        Self {
            clock: DeterministicClock::new(),
            tracker,
            init_at: None,
            next_checkpoint: 0,
            observer_started: false,
            scroll: ScrollDriver::new(),
            scroll_y: 0.0,
            scroll_dirty: false,
            scroll_throttle: Throttle::new(SCROLL_THROTTLE),
            motion: MotionPolicy::default(),
            cursor: Some(CursorFollower::new(chrome.cursor_follow_ratio)),
            nav: NavAutoHide::new(chrome.nav_hide_after_px, 0.0),
            scroll_top: ScrollTopButton::new(
                chrome.scroll_top_visible_after_px,
                chrome.scroll_top_min_width_px,
            ),
            menu: MenuToggle::default(),
            rotator: None,
            particles: None,
            viewport_width: 0.0,
            resize: Debounce::new(Duration::from_millis(chrome.resize_debounce_ms)),
            queue,
            logs,
            config,
        }
    }

    // ---- clock ----------------------------------------------------------

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Advance the deterministic clock by `dt_ms` milliseconds.
    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        // Host timestamps can be noisy (NaN/inf/negative spikes).
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        let max_secs = Duration::MAX.as_secs_f64();
        let secs = (dt_ms / 1000.0).min(max_secs);
        let duration = Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX);
        self.clock.advance(duration);
    }

    /// Set the clock to an absolute host timestamp in milliseconds.
    ///
    /// Non-finite or negative values are ignored; time never moves backwards.
    pub fn set_time_ms(&mut self, ts_ms: f64) {
        if !ts_ms.is_finite() || ts_ms < 0.0 {
            return;
        }
        let secs = (ts_ms / 1000.0).min(Duration::MAX.as_secs_f64());
        let duration = Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX);
        self.clock.set(duration);
    }

    // ---- section tracking ----------------------------------------------

    #[must_use]
    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    /// Currently active section, if tracking is enabled and initialized.
    #[must_use]
    pub fn active(&self) -> Option<&SectionId> {
        self.tracker.as_ref().and_then(Tracker::active)
    }

    /// Whether the page declared at least one trackable section.
    #[must_use]
    pub fn tracking_enabled(&self) -> bool {
        self.tracker.is_some()
    }

    /// Activate the default section and start the bootstrap schedule.
    pub fn init(&mut self) {
        if self.init_at.is_some() {
            return;
        }
        let now = self.now();
        self.init_at = Some(now);
        let dispatch = self.tracker.as_mut().map(|tracker| tracker.init(now));
        self.record(dispatch);
        self.fire_due_checkpoints();
    }

    /// Checkpoint offsets relative to `init`, for the host to schedule wakeups.
    #[must_use]
    pub fn checkpoint_delays(&self) -> Vec<Duration> {
        self.tracker
            .as_ref()
            .map(|tracker| tracker.resolver().bootstrap_checkpoints().to_vec())
            .unwrap_or_default()
    }

    /// Delay after `init` before the host should start observing.
    #[must_use]
    pub fn observe_delay(&self) -> Duration {
        Duration::from_millis(self.config.observer.observe_delay_ms)
    }

    /// Observer options, returned once the observe delay has elapsed.
    ///
    /// Later calls return `None`, as does a runner without sections.
    pub fn observer_ready(&mut self) -> Option<ObserverOptions> {
        let init_at = self.init_at?;
        if self.observer_started || self.tracker.is_none() {
            return None;
        }
        if self.now() < init_at.saturating_add(self.observe_delay()) {
            return None;
        }
        self.observer_started = true;
        tracing::debug!(now = ?self.now(), "visibility observation started");
        Some(self.config.to_observer_options())
    }

    /// Ids the host should observe, in document order.
    #[must_use]
    pub fn observed_sections(&self) -> Vec<SectionId> {
        self.tracker
            .as_ref()
            .map(|tracker| folio_core::observer::observed_sections(tracker.resolver().registry()))
            .unwrap_or_default()
    }

    /// Feed raw observer entries in any order.
    pub fn on_visibility_entries(
        &mut self,
        entries: impl IntoIterator<Item = VisibilitySample>,
    ) -> Option<ResolverDispatch> {
        let now = self.now();
        let tracker = self.tracker.as_mut()?;
        let batch = order_batch(tracker.resolver().registry(), entries);
        let dispatch = tracker.on_visibility_batch(&batch, now);
        self.record(Some(dispatch.clone()));
        Some(dispatch)
    }

    /// Handle a click on a `#<id>` link. Returns whether the click was
    /// consumed (the host should then prevent the default jump).
    pub fn navigate_href(&mut self, href: &str) -> bool {
        let Some(id) = SectionId::from_href(href) else {
            return false;
        };
        let now = self.now();
        let Some(tracker) = self.tracker.as_mut() else {
            return false;
        };
        let dispatch = tracker.on_navigate(&id, now);
        let consumed = !matches!(
            dispatch.ignored_reason(),
            Some(ResolverIgnoredReason::UnknownSection | ResolverIgnoredReason::NotInitialized)
        );
        self.record(Some(dispatch));
        consumed
    }

    /// Start the eased scroll for a [`HostCommand::ScrollToSection`].
    ///
    /// `element_top` is the section's viewport-relative top edge measured by
    /// the host at the time the command is applied.
    pub fn begin_scroll(&mut self, request: &ScrollRequest, element_top: f64) {
        let to = target_scroll_y(element_top, self.scroll_y, request.offset_px);
        self.start_tween(to, request.duration);
    }

    /// Jump to the top without animation, dropping any tween in flight.
    ///
    /// Used on load and before unload so the page always opens at the top.
    pub fn reset_scroll_position(&mut self) {
        self.scroll.cancel();
        self.scroll_y = 0.0;
        self.scroll_dirty = true;
        self.queue.push(HostCommand::ScrollWindow { y: 0.0 });
    }

    /// Animate back to the top of the page.
    pub fn scroll_to_top(&mut self) {
        self.start_tween(0.0, SCROLL_TO_TOP_DURATION);
    }

    fn start_tween(&mut self, to: f64, authored: Duration) {
        let duration = self.motion.scale_duration(authored);
        let now = self.now();
        self.scroll.start(self.scroll_y, to, now, duration);
        if duration.is_zero() {
            self.sample_scroll(now);
        }
    }

    // ---- browser signals ------------------------------------------------

    /// Record a window scroll position.
    pub fn on_scroll(&mut self, y: f64) {
        if !y.is_finite() {
            return;
        }
        self.scroll_y = y;
        self.scroll_dirty = true;
        if self.scroll_throttle.admit(self.now()) {
            self.apply_scroll_chrome();
        }
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.pointer_moved(x, y);
        }
    }

    pub fn set_hovering(&mut self, hovering: bool) {
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.set_hovering(hovering);
        }
    }

    /// Disable the cursor blob on devices without hover.
    pub fn disable_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn toggle_menu(&mut self) {
        let open = self.menu.toggle();
        self.queue.push(HostCommand::SetMenuOpen(open));
    }

    /// A link inside the mobile menu was followed.
    pub fn menu_link_followed(&mut self) {
        if self.menu.close() {
            self.queue.push(HostCommand::SetMenuOpen(false));
        }
    }

    /// Start the image rotator over `len` images at the current time.
    pub fn start_rotator(&mut self, len: usize) {
        let chrome = &self.config.chrome;
        self.rotator = Some(ImageRotator::new(
            len,
            self.clock.now(),
            Duration::from_millis(chrome.rotator_start_delay_ms),
            Duration::from_millis(chrome.rotator_interval_ms),
        ));
    }

    /// Start the particle background; `seed` drives the spawn positions.
    pub fn start_particles(&mut self, seed: u64) {
        let interval = Duration::from_millis(self.config.chrome.particle_interval_ms);
        let mut particles = ParticleSpawner::new(seed, self.now(), interval);
        particles.set_paused(self.motion.is_paused());
        self.particles = Some(particles);
    }

    /// Record the window inner width (load, resize, settled orientation
    /// change). Creates or removes the scroll-to-top button as the width
    /// crosses its minimum.
    pub fn set_viewport_width(&mut self, width: f64) {
        if !width.is_finite() || width < 0.0 {
            return;
        }
        self.viewport_width = width;
        if let Some(present) = self.scroll_top.on_viewport_width(width) {
            self.queue.push(HostCommand::SetScrollTopPresent(present));
            if let Some(visible) = self.scroll_top.on_scroll(self.scroll_y) {
                self.queue.push(HostCommand::SetScrollTopVisible(visible));
            }
        }
    }

    /// Window resized; the viewport unit is re-applied after the quiet period.
    pub fn on_resize(&mut self, inner_height: f64) {
        let now = self.now();
        self.resize.push(inner_height, now);
    }

    /// Apply the viewport unit immediately (load, settled orientation change).
    pub fn apply_viewport(&mut self, inner_height: f64) {
        if let Some(value) = viewport_unit(inner_height) {
            self.queue.push(HostCommand::SetCssVar {
                name: VH_PROPERTY,
                value,
            });
        }
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.motion.set_reduced_motion(reduced);
    }

    /// Pause animations while the document is hidden. The image rotator
    /// runs on its own timer and keeps going.
    pub fn set_document_hidden(&mut self, hidden: bool) {
        self.motion.set_document_hidden(hidden);
        if let Some(particles) = self.particles.as_mut() {
            particles.set_paused(hidden);
        }
    }

    #[must_use]
    pub fn motion(&self) -> MotionPolicy {
        self.motion
    }

    // ---- frame loop -----------------------------------------------------

    /// Run timer-driven work that is due at the current time.
    pub fn tick(&mut self) {
        let now = self.now();
        self.fire_due_checkpoints();
        if let Some(height) = self.resize.poll(now) {
            self.apply_viewport(height);
        }
        if let Some((previous, current)) = self.rotator.as_mut().and_then(|r| r.tick(now)) {
            self.queue.push(HostCommand::SwapImage { previous, current });
        }
        let width = self.viewport_width;
        if let Some(particle) = self.particles.as_mut().and_then(|p| p.tick(now, width)) {
            let motion = self.motion;
            let particle = particle.scaled(|d| motion.scale_duration(d));
            self.queue.push(HostCommand::SpawnParticle(particle));
        }
    }

    /// One animation frame: timers, scroll tween, cursor, pending chrome.
    pub fn frame(&mut self) {
        self.tick();
        if self.motion.is_paused() {
            return;
        }
        let now = self.now();
        self.sample_scroll(now);
        if let Some(cursor) = self.cursor.as_mut() {
            let (x, y) = cursor.step();
            let opacity = cursor.opacity();
            self.queue.push(HostCommand::PlaceCursor { x, y, opacity });
        }
        if self.scroll_dirty {
            self.apply_scroll_chrome();
        }
    }

    /// Whether a scroll tween is in flight.
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_active()
    }

    // ---- output ---------------------------------------------------------

    /// Drain pending DOM commands in submission order.
    pub fn take_commands(&mut self) -> Vec<HostCommand> {
        self.queue.drain()
    }

    /// Drain structured log lines.
    pub fn take_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs)
    }

    // ---- internals ------------------------------------------------------

    fn fire_due_checkpoints(&mut self) {
        let Some(init_at) = self.init_at else {
            return;
        };
        let now = self.now();
        let delays = self.checkpoint_delays();
        while let Some(&offset) = delays.get(self.next_checkpoint) {
            let due = init_at.saturating_add(offset);
            if due > now {
                break;
            }
            self.next_checkpoint += 1;
            // Each checkpoint is evaluated at its scheduled time so a late
            // wakeup still lands inside the hold.
            let dispatch = self.tracker.as_mut().map(|tracker| tracker.checkpoint(due));
            self.record(dispatch);
        }
    }

    fn sample_scroll(&mut self, now: Duration) {
        if let Some(y) = self.scroll.sample(now) {
            self.scroll_y = y;
            self.scroll_dirty = true;
            self.queue.push(HostCommand::ScrollWindow { y });
        }
    }

    fn apply_scroll_chrome(&mut self) {
        self.scroll_dirty = false;
        let was_hidden = self.nav.is_hidden();
        let hidden = self.nav.on_scroll(self.scroll_y);
        if hidden != was_hidden {
            self.queue.push(HostCommand::SetNavHidden(hidden));
        }
        if let Some(visible) = self.scroll_top.on_scroll(self.scroll_y) {
            self.queue.push(HostCommand::SetScrollTopVisible(visible));
        }
    }

    fn record(&mut self, dispatch: Option<ResolverDispatch>) {
        if let Some(dispatch) = dispatch {
            self.logs.push(format_dispatch_log_entry(&dispatch));
        }
    }
}

fn registry_with_fallback(ids: Vec<String>) -> (SectionRegistry, Option<String>) {
    match SectionRegistry::new(ids.iter().cloned()) {
        Ok(registry) => (registry, None),
        Err(err) => {
            let mut seen = Vec::with_capacity(ids.len());
            for id in ids {
                if !id.is_empty() && !seen.contains(&id) {
                    seen.push(id);
                }
            }
            let note = format!("section_registry_error: {err}; dropped invalid ids");
            tracing::warn!(%err, kept = seen.len(), "section registry rebuilt");
            (SectionRegistry::new(seen).unwrap_or_default(), Some(note))
        }
    }
}

fn resolver_with_fallback(
    registry: SectionRegistry,
    config: ResolverConfig,
) -> Result<(ActiveSectionResolver, Option<String>), folio_core::ResolverError> {
    match ActiveSectionResolver::new(registry.clone(), config) {
        Ok(resolver) => Ok((resolver, None)),
        Err(folio_core::ResolverError::NoSections) => Err(folio_core::ResolverError::NoSections),
        Err(err) => {
            let resolver = ActiveSectionResolver::new(registry, ResolverConfig::default())?;
            Ok((
                resolver,
                Some(format!("resolver_config_error: {err}; using default resolver config")),
            ))
        }
    }
}

fn format_phase(phase: ResolverPhase) -> &'static str {
    match phase {
        ResolverPhase::Init => "init",
        ResolverPhase::Checkpoint => "checkpoint",
        ResolverPhase::VisibilityBatch => "visibility_batch",
        ResolverPhase::Navigate => "navigate",
    }
}

fn format_ignored_reason(reason: ResolverIgnoredReason) -> &'static str {
    match reason {
        ResolverIgnoredReason::NotInitialized => "not_initialized",
        ResolverIgnoredReason::AlreadyInitialized => "already_initialized",
        ResolverIgnoredReason::OverrideLive => "override_live",
        ResolverIgnoredReason::BootstrapHold => "bootstrap_hold",
        ResolverIgnoredReason::BootstrapReleased => "bootstrap_released",
        ResolverIgnoredReason::NoCandidate => "no_candidate",
        ResolverIgnoredReason::BelowThreshold => "below_threshold",
        ResolverIgnoredReason::AlreadyActive => "already_active",
        ResolverIgnoredReason::UnknownSection => "unknown_section",
    }
}

fn format_dispatch_log_entry(dispatch: &ResolverDispatch) -> String {
    let phase = format_phase(dispatch.phase);
    let now_ms = dispatch.now.as_millis();
    let section = dispatch
        .activated
        .as_ref()
        .map_or_else(|| "-".to_owned(), ToString::to_string);
    let candidate = dispatch
        .candidate
        .as_ref()
        .map_or_else(|| "-".to_owned(), |(id, ratio)| format!("{id}@{ratio:.3}"));
    let outcome = match dispatch.outcome {
        ResolverOutcome::Activated => "activated".to_owned(),
        ResolverOutcome::Ignored(reason) => format!("ignored:{}", format_ignored_reason(reason)),
    };
    format!(
        "section_dispatch phase={phase} now_ms={now_ms} section={section} candidate={candidate} outcome={outcome}"
    )
}
