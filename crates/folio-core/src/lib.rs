#![forbid(unsafe_code)]

//! Folio core
//!
//! Deterministic presentation state for the folio portfolio page. Every
//! type here is driven by the host: it passes in the current time and the
//! browser signals, and applies the returned decisions to the document.
//! Nothing in this crate reads a clock or touches the DOM, so the whole
//! behaviour is testable natively.
//!
//! # Key Components
//!
//! - [`ActiveSectionResolver`] - single owner of the active section id
//! - [`SectionTracker`] - resolver wired to a [`NavigationRenderer`] and a [`ScrollAnimator`]
//! - [`BootstrapGuard`] - holds the default section through early layout shifts
//! - [`ScrollDriver`] - eased scroll tween sampled per animation frame
//! - [`Debounce`] / [`Throttle`] - host-clocked rate limiting
//! - [`MotionPolicy`] - reduced-motion and hidden-document time scaling
//! - [`chrome`] - cursor follower, nav auto-hide, menu toggle, image rotator
//! - [`FolioConfig`] - every tunable as data, loadable from TOML/JSON with the `config` feature

pub mod bootstrap;
pub mod chrome;
pub mod config;
pub mod host;
pub mod motion;
pub mod observer;
pub mod resolver;
pub mod scroll;
pub mod section;
pub mod timing;
pub mod tracker;

pub use bootstrap::{BootstrapGuard, BootstrapPhase};
pub use config::{ConfigError, FolioConfig};
pub use host::{NavigationRenderer, ScrollAnimator, ScrollRequest, VisibilityObserver};
pub use motion::MotionPolicy;
pub use observer::{ObserverOptions, RootMargin, order_batch};
pub use resolver::{
    ActiveSectionResolver, OverrideWindow, ResolverConfig, ResolverDispatch, ResolverError,
    ResolverIgnoredReason, ResolverOutcome, ResolverPhase,
};
pub use scroll::{ScrollDriver, ScrollTween, target_scroll_y};
pub use section::{SectionId, SectionRegistry, SectionRegistryError, VisibilitySample};
pub use timing::{Debounce, Throttle};
pub use tracker::SectionTracker;
