#![forbid(unsafe_code)]

//! Collaborator traits implemented by the embedding host.
//!
//! The resolver never touches the document directly. It pushes the active
//! section into a [`NavigationRenderer`] and asks a [`ScrollAnimator`] to move
//! the viewport; a [`VisibilityObserver`] feeds it visibility batches.

use core::time::Duration;

use crate::section::SectionId;

/// Marks exactly one navigation affordance as active.
pub trait NavigationRenderer {
    /// Clear the active marker from every link and apply it to the link for `id`.
    ///
    /// A missing link for `id` is a silent no-op.
    fn set_active(&mut self, id: &SectionId);
}

/// A request to scroll the viewport to a section.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollRequest {
    pub target: SectionId,
    /// Distance kept between the viewport top and the section top, in CSS px.
    pub offset_px: f64,
    pub duration: Duration,
}

/// Performs an eased, time-bounded scroll.
///
/// Fire-and-forget: a new request supersedes any in-flight one.
pub trait ScrollAnimator {
    fn scroll_to(&mut self, request: ScrollRequest);
}

/// Watches section elements and reports visibility batches asynchronously.
pub trait VisibilityObserver {
    /// Begin observing `sections`, given in document order.
    fn observe(&mut self, sections: &[SectionId]);
}

impl<T: NavigationRenderer + ?Sized> NavigationRenderer for &mut T {
    fn set_active(&mut self, id: &SectionId) {
        (**self).set_active(id);
    }
}

impl<T: ScrollAnimator + ?Sized> ScrollAnimator for &mut T {
    fn scroll_to(&mut self, request: ScrollRequest) {
        (**self).scroll_to(request);
    }
}
