#![forbid(unsafe_code)]

//! Wiring between the resolver and its host collaborators.

use core::time::Duration;

use crate::host::{NavigationRenderer, ScrollAnimator};
use crate::resolver::{ActiveSectionResolver, ResolverDispatch};
use crate::section::{SectionId, VisibilitySample};

/// Drives an [`ActiveSectionResolver`] and forwards its decisions.
///
/// Renderer notification always happens before a scroll request is issued.
#[derive(Debug)]
pub struct SectionTracker<N, A> {
    resolver: ActiveSectionResolver,
    renderer: N,
    animator: A,
}

impl<N: NavigationRenderer, A: ScrollAnimator> SectionTracker<N, A> {
    #[must_use]
    pub fn new(resolver: ActiveSectionResolver, renderer: N, animator: A) -> Self {
        Self {
            resolver,
            renderer,
            animator,
        }
    }

    #[must_use]
    pub fn resolver(&self) -> &ActiveSectionResolver {
        &self.resolver
    }

    /// Currently active section.
    #[must_use]
    pub fn active(&self) -> Option<&SectionId> {
        self.resolver.active()
    }

    pub fn init(&mut self, now: Duration) -> ResolverDispatch {
        let dispatch = self.resolver.init(now);
        self.apply(dispatch)
    }

    pub fn checkpoint(&mut self, now: Duration) -> ResolverDispatch {
        let dispatch = self.resolver.checkpoint(now);
        self.apply(dispatch)
    }

    pub fn on_visibility_batch(
        &mut self,
        samples: &[VisibilitySample],
        now: Duration,
    ) -> ResolverDispatch {
        let dispatch = self.resolver.on_visibility_batch(samples, now);
        self.apply(dispatch)
    }

    pub fn on_navigate(&mut self, id: &SectionId, now: Duration) -> ResolverDispatch {
        let dispatch = self.resolver.on_navigate(id, now);
        self.apply(dispatch)
    }

    fn apply(&mut self, dispatch: ResolverDispatch) -> ResolverDispatch {
        if let Some(id) = &dispatch.activated {
            self.renderer.set_active(id);
        }
        if let Some(request) = &dispatch.scroll {
            self.animator.scroll_to(request.clone());
        }
        dispatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ScrollRequest;
    use crate::resolver::ResolverConfig;
    use crate::section::SectionRegistry;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        SetActive(String),
        Scroll(ScrollRequest),
    }

    #[derive(Debug, Clone, Default)]
    struct Journal(Rc<RefCell<Vec<Call>>>);

    impl NavigationRenderer for Journal {
        fn set_active(&mut self, id: &SectionId) {
            self.0.borrow_mut().push(Call::SetActive(id.to_string()));
        }
    }

    impl ScrollAnimator for Journal {
        fn scroll_to(&mut self, request: ScrollRequest) {
            self.0.borrow_mut().push(Call::Scroll(request));
        }
    }

    fn tracker(journal: &Journal) -> SectionTracker<Journal, Journal> {
        let registry = SectionRegistry::new(["about", "experience", "projects"]).unwrap();
        let resolver = ActiveSectionResolver::new(
            registry,
            ResolverConfig {
                bootstrap_checkpoints: Vec::new(),
                ..ResolverConfig::default()
            },
        )
        .unwrap();
        SectionTracker::new(resolver, journal.clone(), journal.clone())
    }

    #[test]
    fn navigate_renders_before_scrolling() {
        let journal = Journal::default();
        let mut t = tracker(&journal);
        t.init(Duration::ZERO);
        t.on_navigate(&SectionId::new("projects"), Duration::from_millis(10));

        let calls = journal.0.borrow().clone();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], Call::SetActive("about".into()));
        assert_eq!(calls[1], Call::SetActive("projects".into()));
        assert!(matches!(&calls[2], Call::Scroll(req) if req.target.as_str() == "projects"));
    }

    #[test]
    fn ignored_events_do_not_touch_collaborators() {
        let journal = Journal::default();
        let mut t = tracker(&journal);
        t.init(Duration::ZERO);
        journal.0.borrow_mut().clear();

        t.on_visibility_batch(
            &[VisibilitySample::new("projects", 0.2, true)],
            Duration::from_millis(5),
        );
        t.on_navigate(&SectionId::new("missing"), Duration::from_millis(6));
        assert!(journal.0.borrow().is_empty());
        assert_eq!(t.active(), Some(&SectionId::new("about")));
    }
}
