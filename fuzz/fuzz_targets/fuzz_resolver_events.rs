#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use folio_core::{
    ActiveSectionResolver, ResolverConfig, ResolverIgnoredReason, SectionId, SectionRegistry,
    VisibilitySample, order_batch,
};
use libfuzzer_sys::fuzz_target;

const SECTIONS: [&str; 4] = ["about", "experience", "projects", "contact"];

#[derive(Debug, Arbitrary)]
enum Op {
    Checkpoint,
    Navigate { section: u8 },
    NavigateUnknown,
    Batch { entries: Vec<(u8, f64, bool)> },
}

#[derive(Debug, Arbitrary)]
struct Input {
    grace_ms: u16,
    steps: Vec<(u16, Op)>,
}

fuzz_target!(|input: Input| {
    let registry = SectionRegistry::new(SECTIONS).expect("static sections are valid");
    let config = ResolverConfig {
        grace_period: Duration::from_millis(u64::from(input.grace_ms)),
        ..ResolverConfig::default()
    };
    let mut resolver =
        ActiveSectionResolver::new(registry.clone(), config).expect("default threshold is valid");
    resolver.init(Duration::ZERO);

    let mut now = Duration::ZERO;
    for (gap, op) in input.steps.into_iter().take(256) {
        now += Duration::from_millis(u64::from(gap));
        let before = resolver.active().cloned();
        let dispatch = match op {
            Op::Checkpoint => resolver.checkpoint(now),
            Op::Navigate { section } => {
                let id = SectionId::new(SECTIONS[usize::from(section) % SECTIONS.len()]);
                let dispatch = resolver.on_navigate(&id, now);
                assert_eq!(resolver.active(), Some(&id));
                dispatch
            }
            Op::NavigateUnknown => resolver.on_navigate(&SectionId::new("missing"), now),
            Op::Batch { entries } => {
                let samples = entries.into_iter().take(16).map(|(i, ratio, hit)| {
                    VisibilitySample::new(SECTIONS[usize::from(i) % SECTIONS.len()], ratio, hit)
                });
                let batch = order_batch(&registry, samples);
                resolver.on_visibility_batch(&batch, now)
            }
        };

        // Ignored events never move the active section.
        if dispatch.ignored_reason().is_some() {
            assert_eq!(resolver.active().cloned(), before);
        }
        if dispatch.ignored_reason() == Some(ResolverIgnoredReason::OverrideLive) {
            let window = resolver.override_window().expect("live override is installed");
            assert!(now < window.expires_at);
        }
        let active = resolver.active().expect("initialized resolver has an active section");
        assert!(registry.contains(active));
    }
});
