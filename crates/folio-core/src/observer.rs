#![forbid(unsafe_code)]

//! Visibility observer options and batch ordering.
//!
//! Browser intersection callbacks report entries in no guaranteed order and
//! may mention the same element twice. [`order_batch`] turns raw entries into
//! the document-ordered batch the resolver expects.

use core::time::Duration;

use crate::section::{SectionId, SectionRegistry, VisibilitySample};

/// Delay between initialization and wiring up the observer.
pub const DEFAULT_OBSERVE_DELAY: Duration = Duration::from_millis(200);

/// Viewport margin inset, in percent of the viewport, per edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top_pct: f64,
    pub right_pct: f64,
    pub bottom_pct: f64,
    pub left_pct: f64,
}

impl RootMargin {
    /// Shrink the viewport by `pct` percent at the top and bottom edges.
    #[must_use]
    pub const fn vertical_inset(pct: f64) -> Self {
        Self {
            top_pct: -pct,
            right_pct: 0.0,
            bottom_pct: -pct,
            left_pct: 0.0,
        }
    }

    /// CSS margin string in `top right bottom left` order.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            "{}% {}% {}% {}%",
            self.top_pct, self.right_pct, self.bottom_pct, self.left_pct
        )
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::vertical_inset(10.0)
    }
}

/// Intersection observer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    /// Ratios at which the observer reports, ascending within `[0, 1]`.
    pub thresholds: Vec<f64>,
    pub root_margin: RootMargin,
    /// Delay after initialization before observation starts.
    pub observe_delay: Duration,
}

impl ObserverOptions {
    /// Evenly spaced thresholds `from, from + step, ..., to` (inclusive).
    #[must_use]
    pub fn stepped_thresholds(from: f64, to: f64, step: f64) -> Vec<f64> {
        if !(step > 0.0) || from > to {
            return Vec::new();
        }
        let count = ((to - from) / step + 1e-9).floor() as usize;
        (0..=count)
            .map(|i| {
                let t = from + step * i as f64;
                (t * 1000.0).round() / 1000.0
            })
            .filter(|t| (0.0..=1.0).contains(t))
            .collect()
    }
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            thresholds: Self::stepped_thresholds(0.1, 0.7, 0.1),
            root_margin: RootMargin::default(),
            observe_delay: DEFAULT_OBSERVE_DELAY,
        }
    }
}

/// Order raw observer entries by document position.
///
/// Unknown ids are dropped; when an id appears more than once the last entry
/// wins, matching the browser's "latest state" semantics.
#[must_use]
pub fn order_batch<I>(registry: &SectionRegistry, entries: I) -> Vec<VisibilitySample>
where
    I: IntoIterator<Item = VisibilitySample>,
{
    let mut slots: Vec<Option<VisibilitySample>> = vec![None; registry.len()];
    let mut dropped = 0usize;
    for entry in entries {
        match registry.position(&entry.id) {
            Some(index) => slots[index] = Some(entry),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        tracing::trace!(dropped, "observer entries for unknown sections dropped");
    }
    slots.into_iter().flatten().collect()
}

/// Ids to hand to [`crate::host::VisibilityObserver::observe`], in document order.
#[must_use]
pub fn observed_sections(registry: &SectionRegistry) -> Vec<SectionId> {
    registry.iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_thresholds_step_by_tenths() {
        let options = ObserverOptions::default();
        assert_eq!(
            options.thresholds,
            vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]
        );
        assert_eq!(options.observe_delay, Duration::from_millis(200));
    }

    #[test]
    fn default_root_margin_css() {
        assert_eq!(RootMargin::default().to_css(), "-10% 0% -10% 0%");
    }

    #[test]
    fn stepped_thresholds_rejects_bad_steps() {
        assert!(ObserverOptions::stepped_thresholds(0.1, 0.7, 0.0).is_empty());
        assert!(ObserverOptions::stepped_thresholds(0.8, 0.2, 0.1).is_empty());
        assert!(ObserverOptions::stepped_thresholds(0.1, 0.7, f64::NAN).is_empty());
        assert_eq!(ObserverOptions::stepped_thresholds(0.5, 0.5, 0.1), vec![0.5]);
    }

    #[test]
    fn order_batch_sorts_and_filters() {
        let registry = SectionRegistry::new(["about", "experience", "projects"]).unwrap();
        let batch = order_batch(
            &registry,
            [
                VisibilitySample::new("projects", 0.2, true),
                VisibilitySample::new("ghost", 0.9, true),
                VisibilitySample::new("about", 0.1, true),
                VisibilitySample::new("projects", 0.4, true),
            ],
        );
        let ids: Vec<_> = batch.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["about", "projects"]);
        assert_eq!(batch[1].ratio, 0.4);
    }

    #[test]
    fn observed_sections_follow_registry() {
        use crate::host::VisibilityObserver;

        #[derive(Default)]
        struct Recorder(Vec<SectionId>);

        impl VisibilityObserver for Recorder {
            fn observe(&mut self, sections: &[SectionId]) {
                self.0.extend_from_slice(sections);
            }
        }

        let registry = SectionRegistry::new(["a", "b"]).unwrap();
        let mut recorder = Recorder::default();
        recorder.observe(&observed_sections(&registry));
        assert_eq!(recorder.0, vec![SectionId::new("a"), SectionId::new("b")]);
    }
}
