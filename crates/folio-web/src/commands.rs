#![forbid(unsafe_code)]

//! Host commands and the deterministic clock.
//!
//! The runner never touches the DOM. It appends [`HostCommand`] values to a
//! [`CommandQueue`] and the wasm layer (or a native test) drains and applies
//! them in order.

use core::time::Duration;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use folio_core::chrome::Particle;
use folio_core::{NavigationRenderer, ScrollAnimator, ScrollRequest, SectionId};

/// Deterministic monotonic clock for host-driven runs.
///
/// Time only moves when the host says so.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Going backwards is ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// One DOM mutation requested by the runner.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    /// Move the `active` class to the nav link for this section.
    SetActiveLink(SectionId),
    /// Measure the section and start an eased scroll toward it.
    ScrollToSection(ScrollRequest),
    /// Set the window scroll position (one tween frame).
    ScrollWindow { y: f64 },
    /// Place the cursor blob; `opacity` is `None` until the pointer moved.
    PlaceCursor { x: f64, y: f64, opacity: Option<f64> },
    SetNavHidden(bool),
    /// Create (`true`) or remove (`false`) the scroll-to-top button.
    SetScrollTopPresent(bool),
    SetScrollTopVisible(bool),
    SetMenuOpen(bool),
    /// Move the `active` class between rotator images.
    SwapImage { previous: usize, current: usize },
    /// Set a custom property on the document element.
    SetCssVar { name: &'static str, value: String },
    /// Add one background particle and animate it along its flight.
    SpawnParticle(Particle),
}

/// Shared FIFO of pending host commands.
///
/// Cloning yields another handle to the same queue, so the tracker's
/// renderer and animator slots can share it with the runner.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue(Rc<RefCell<VecDeque<HostCommand>>>);

impl CommandQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: HostCommand) {
        self.0.borrow_mut().push_back(command);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Remove and return every pending command in submission order.
    pub fn drain(&self) -> Vec<HostCommand> {
        self.0.borrow_mut().drain(..).collect()
    }
}

impl NavigationRenderer for CommandQueue {
    fn set_active(&mut self, id: &SectionId) {
        self.push(HostCommand::SetActiveLink(id.clone()));
    }
}

impl ScrollAnimator for CommandQueue {
    fn scroll_to(&mut self, request: ScrollRequest) {
        self.push(HostCommand::ScrollToSection(request));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clock_is_monotonic() {
        let mut clock = DeterministicClock::new();
        clock.advance(Duration::from_millis(40));
        clock.set(Duration::from_millis(10));
        assert_eq!(clock.now(), Duration::from_millis(40));
        clock.set(Duration::from_millis(100));
        assert_eq!(clock.now(), Duration::from_millis(100));
    }

    #[test]
    fn queue_handles_share_storage() {
        let queue = CommandQueue::new();
        let mut renderer = queue.clone();
        renderer.set_active(&SectionId::new("about"));
        queue.push(HostCommand::SetMenuOpen(false));
        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.drain(),
            vec![
                HostCommand::SetActiveLink(SectionId::new("about")),
                HostCommand::SetMenuOpen(false),
            ]
        );
        assert!(renderer.is_empty());
    }
}
