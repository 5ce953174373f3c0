//! Property-based invariant tests for the active-section resolver.
//!
//! ## Invariants
//!
//! 1. Batches without an intersecting sample above threshold change nothing
//! 2. While an override window is live, batches change nothing
//! 3. Navigation activates the target and installs `now + grace`
//! 4. After the window expires, a qualifying batch selects by visibility
//! 5. Equal ratios resolve to the earliest sample in document order
//! 6. The active section is always a registered section

use std::time::Duration;

use folio_core::{
    ActiveSectionResolver, ResolverConfig, ResolverIgnoredReason, SectionId, SectionRegistry,
    VisibilitySample,
};
use proptest::prelude::*;

const SECTIONS: [&str; 5] = ["about", "experience", "projects", "writing", "contact"];

// ── Strategies ────────────────────────────────────────────────────────────

fn arb_index() -> impl Strategy<Value = usize> {
    0..SECTIONS.len()
}

fn arb_ratio() -> impl Strategy<Value = f64> {
    (0u32..=1000).prop_map(|x| f64::from(x) / 1000.0)
}

fn arb_low_ratio() -> impl Strategy<Value = f64> {
    (0u32..=300).prop_map(|x| f64::from(x) / 1000.0)
}

fn arb_sample(ratio: impl Strategy<Value = f64>) -> impl Strategy<Value = VisibilitySample> {
    (arb_index(), ratio, any::<bool>())
        .prop_map(|(i, ratio, intersecting)| VisibilitySample::new(SECTIONS[i], ratio, intersecting))
}

fn arb_batch() -> impl Strategy<Value = Vec<VisibilitySample>> {
    prop::collection::vec(arb_sample(arb_ratio()), 0..8)
}

fn arb_low_batch() -> impl Strategy<Value = Vec<VisibilitySample>> {
    prop::collection::vec(arb_sample(arb_low_ratio()), 0..8)
}

fn resolver() -> ActiveSectionResolver {
    let registry = SectionRegistry::new(SECTIONS).expect("sections are unique");
    let config = ResolverConfig {
        bootstrap_checkpoints: Vec::new(),
        ..ResolverConfig::default()
    };
    let mut resolver = ActiveSectionResolver::new(registry, config).expect("valid config");
    resolver.init(Duration::ZERO);
    resolver
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

// ── 1. Low visibility is inert ────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn low_visibility_batches_change_nothing(
        start in arb_index(),
        batch in arb_low_batch(),
        at in 0u64..10_000,
    ) {
        let mut r = resolver();
        r.on_navigate(&SectionId::new(SECTIONS[start]), ms(0));
        let before = r.active().cloned();

        let dispatch = r.on_visibility_batch(&batch, ms(400 + at));
        prop_assert!(!dispatch.is_activated());
        prop_assert_eq!(r.active().cloned(), before);
    }
}

// ── 2. Live override shields the active section ───────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn live_override_ignores_any_batch(
        target in arb_index(),
        clicked_at in 0u64..5_000,
        elapsed in 0u64..350,
        batch in arb_batch(),
    ) {
        let mut r = resolver();
        let id = SectionId::new(SECTIONS[target]);
        r.on_navigate(&id, ms(clicked_at));

        let dispatch = r.on_visibility_batch(&batch, ms(clicked_at + elapsed));
        prop_assert_eq!(dispatch.ignored_reason(), Some(ResolverIgnoredReason::OverrideLive));
        prop_assert_eq!(r.active(), Some(&id));
    }
}

// ── 3. Navigation activates and installs a fresh window ───────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn navigation_installs_fresh_window(
        clicks in prop::collection::vec((arb_index(), 0u64..2_000), 1..6),
    ) {
        let mut r = resolver();
        let mut now = 0;
        for (index, gap) in clicks {
            now += gap;
            let id = SectionId::new(SECTIONS[index]);
            let dispatch = r.on_navigate(&id, ms(now));
            prop_assert_eq!(dispatch.activated.as_ref(), Some(&id));
            let scroll = dispatch.scroll.expect("navigation always scrolls");
            prop_assert_eq!(&scroll.target, &id);

            let window = r.override_window().expect("window installed");
            prop_assert_eq!(&window.id, &id);
            prop_assert_eq!(window.expires_at, ms(now + 350));
        }
    }
}

// ── 4. Expiry returns control to visibility ───────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn expired_override_yields_to_visibility(
        clicked in arb_index(),
        winner in arb_index(),
        ratio in 301u32..=1000,
        late in 0u64..5_000,
    ) {
        prop_assume!(clicked != winner);
        let mut r = resolver();
        r.on_navigate(&SectionId::new(SECTIONS[clicked]), ms(0));

        let batch = [VisibilitySample::new(SECTIONS[winner], f64::from(ratio) / 1000.0, true)];
        let dispatch = r.on_visibility_batch(&batch, ms(350 + late));
        prop_assert!(dispatch.is_activated());
        prop_assert_eq!(r.active(), Some(&SectionId::new(SECTIONS[winner])));
        prop_assert!(r.override_window().is_none());
    }
}

// ── 5. Ties go to document order ──────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn equal_ratios_pick_earliest_section(
        a in arb_index(),
        b in arb_index(),
        ratio in 301u32..=1000,
    ) {
        prop_assume!(a != b);
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        let ratio = f64::from(ratio) / 1000.0;
        let batch = [
            VisibilitySample::new(SECTIONS[first], ratio, true),
            VisibilitySample::new(SECTIONS[second], ratio, true),
        ];

        let mut r = resolver();
        let dispatch = r.on_visibility_batch(&batch, ms(10));
        prop_assert_eq!(r.active(), Some(&SectionId::new(SECTIONS[first])));
        let (winner, _) = dispatch.candidate.expect("qualifying batch has a candidate");
        prop_assert_eq!(winner, SectionId::new(SECTIONS[first]));
    }
}

// ── 6. Active stays registered across arbitrary event streams ─────────────

#[derive(Debug, Clone)]
enum Event {
    Batch(Vec<VisibilitySample>),
    Navigate(String),
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_batch().prop_map(Event::Batch),
        arb_index().prop_map(|i| Event::Navigate(SECTIONS[i].to_string())),
        "[a-z]{1,6}".prop_map(Event::Navigate),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn active_is_always_registered(
        events in prop::collection::vec((arb_event(), 0u64..500), 1..40),
    ) {
        let mut r = resolver();
        let mut now = 0;
        for (event, gap) in events {
            now += gap;
            match event {
                Event::Batch(batch) => {
                    r.on_visibility_batch(&batch, ms(now));
                }
                Event::Navigate(id) => {
                    r.on_navigate(&SectionId::new(id), ms(now));
                }
            }
            let active = r.active().expect("initialized resolver has an active section");
            prop_assert!(r.registry().contains(active));
        }
    }
}
