#![forbid(unsafe_code)]

//! Tunable parameters for the page as data.
//!
//! [`FolioConfig`] collects every timing constant and threshold used by the
//! resolver, the visibility observer and the page chrome, so they can be
//! loaded from TOML or JSON instead of being edited in code.
//!
//! # Loading
//!
//! ```toml
//! # folio.toml
//! [resolver]
//! visibility_threshold = 0.35
//! grace_period_ms = 400
//! default_section = "about"
//!
//! [observer]
//! observe_delay_ms = 250
//! ```
//!
//! ```rust,ignore
//! let config = FolioConfig::from_toml_file("folio.toml")?.validated()?;
//! let config = FolioConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `FolioConfig::default()` reproduces the constants the page shipped with.

#[cfg(feature = "config")]
use std::path::Path;

use core::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::bootstrap::DEFAULT_BOOTSTRAP_CHECKPOINTS_MS;
use crate::chrome::{
    CURSOR_FOLLOW_RATIO, NAV_HIDE_AFTER_PX, PARTICLE_INTERVAL, RESIZE_DEBOUNCE, ROTATOR_INTERVAL,
    ROTATOR_START_DELAY, SCROLL_TOP_MIN_WIDTH_PX, SCROLL_TOP_VISIBLE_AFTER_PX,
};
use crate::observer::{DEFAULT_OBSERVE_DELAY, ObserverOptions, RootMargin};
use crate::resolver::{
    DEFAULT_GRACE_PERIOD, DEFAULT_SCROLL_DURATION, DEFAULT_SCROLL_OFFSET_PX,
    DEFAULT_VISIBILITY_THRESHOLD, ResolverConfig,
};
use crate::section::SectionId;

// ---------------------------------------------------------------------------
// Top-level FolioConfig
// ---------------------------------------------------------------------------

/// Top-level page configuration.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct FolioConfig {
    /// Active-section resolution parameters.
    pub resolver: ResolverPolicyConfig,
    /// Visibility observer parameters.
    pub observer: ObserverPolicyConfig,
    /// Cursor, nav and rotator parameters.
    pub chrome: ChromePolicyConfig,
}

impl FolioConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let threshold = self.resolver.visibility_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            errors.push(format!(
                "resolver.visibility_threshold must be in [0, 1], got {threshold}"
            ));
        }
        if self.resolver.grace_period_ms < self.resolver.scroll_duration_ms {
            errors.push(format!(
                "resolver.grace_period_ms ({}) must cover resolver.scroll_duration_ms ({})",
                self.resolver.grace_period_ms, self.resolver.scroll_duration_ms
            ));
        }
        if !self.resolver.scroll_offset_px.is_finite() {
            errors.push("resolver.scroll_offset_px must be finite".into());
        }
        if matches!(&self.resolver.default_section, Some(id) if id.is_empty()) {
            errors.push("resolver.default_section must not be empty".into());
        }

        if self.observer.thresholds.is_empty() {
            errors.push("observer.thresholds must not be empty".into());
        }
        for t in &self.observer.thresholds {
            if !(0.0..=1.0).contains(t) {
                errors.push(format!("observer.thresholds entries must be in [0, 1], got {t}"));
            }
        }
        if !(0.0..50.0).contains(&self.observer.vertical_inset_pct) {
            errors.push(format!(
                "observer.vertical_inset_pct must be in [0, 50), got {}",
                self.observer.vertical_inset_pct
            ));
        }

        let ratio = self.chrome.cursor_follow_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            errors.push(format!(
                "chrome.cursor_follow_ratio must be in (0, 1], got {ratio}"
            ));
        }
        if self.chrome.rotator_interval_ms == 0 {
            errors.push("chrome.rotator_interval_ms must be > 0".into());
        }
        if self.chrome.particle_interval_ms == 0 {
            errors.push("chrome.particle_interval_ms must be > 0".into());
        }
        if !self.chrome.scroll_top_min_width_px.is_finite() {
            errors.push("chrome.scroll_top_min_width_px must be finite".into());
        }

        errors
    }

    /// Return `self` if valid, otherwise every validation error.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Resolver configuration derived from this policy.
    #[must_use]
    pub fn to_resolver_config(&self) -> ResolverConfig {
        let r = &self.resolver;
        ResolverConfig {
            visibility_threshold: r.visibility_threshold,
            grace_period: Duration::from_millis(r.grace_period_ms),
            scroll_offset_px: r.scroll_offset_px,
            scroll_duration: Duration::from_millis(r.scroll_duration_ms),
            default_section: r.default_section.as_deref().map(SectionId::new),
            bootstrap_checkpoints: r
                .bootstrap_checkpoints_ms
                .iter()
                .map(|&ms| Duration::from_millis(ms))
                .collect(),
        }
    }

    /// Observer options derived from this policy.
    #[must_use]
    pub fn to_observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            thresholds: self.observer.thresholds.clone(),
            root_margin: RootMargin::vertical_inset(self.observer.vertical_inset_pct),
            observe_delay: Duration::from_millis(self.observer.observe_delay_ms),
        }
    }

    /// Format as a JSONL line for structured logging.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        format!(
            r#"{{"schema":"folio-config-v1","visibility_threshold":{},"grace_period_ms":{},"scroll_offset_px":{},"scroll_duration_ms":{},"bootstrap_checkpoints":{},"observe_delay_ms":{},"threshold_count":{}}}"#,
            self.resolver.visibility_threshold,
            self.resolver.grace_period_ms,
            self.resolver.scroll_offset_px,
            self.resolver.scroll_duration_ms,
            self.resolver.bootstrap_checkpoints_ms.len(),
            self.observer.observe_delay_ms,
            self.observer.thresholds.len(),
        )
    }
}

// ---------------------------------------------------------------------------
// Sub-configs (flat, serde-friendly)
// ---------------------------------------------------------------------------

/// Active-section resolver parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ResolverPolicyConfig {
    /// Ratio a candidate must exceed. Default: 0.3.
    pub visibility_threshold: f64,
    /// Override window after a click. Default: 350.
    pub grace_period_ms: u64,
    /// Gap above the target section after scrolling. Default: 20.
    pub scroll_offset_px: f64,
    /// Scroll animation length. Default: 300.
    pub scroll_duration_ms: u64,
    /// Section active at startup. Default: first section in the document.
    pub default_section: Option<String>,
    /// Offsets at which the default is reasserted. Default: 0, 100, 500, 1000.
    pub bootstrap_checkpoints_ms: Vec<u64>,
}

impl Default for ResolverPolicyConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            grace_period_ms: duration_ms(DEFAULT_GRACE_PERIOD),
            scroll_offset_px: DEFAULT_SCROLL_OFFSET_PX,
            scroll_duration_ms: duration_ms(DEFAULT_SCROLL_DURATION),
            default_section: None,
            bootstrap_checkpoints_ms: DEFAULT_BOOTSTRAP_CHECKPOINTS_MS.to_vec(),
        }
    }
}

/// Visibility observer parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ObserverPolicyConfig {
    /// Reporting thresholds. Default: 0.1 through 0.7 in steps of 0.1.
    pub thresholds: Vec<f64>,
    /// Viewport inset at top and bottom, percent. Default: 10.
    pub vertical_inset_pct: f64,
    /// Delay before observation starts. Default: 200.
    pub observe_delay_ms: u64,
}

impl Default for ObserverPolicyConfig {
    fn default() -> Self {
        let options = ObserverOptions::default();
        Self {
            thresholds: options.thresholds,
            vertical_inset_pct: -options.root_margin.top_pct,
            observe_delay_ms: duration_ms(DEFAULT_OBSERVE_DELAY),
        }
    }
}

/// Page chrome parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ChromePolicyConfig {
    /// Blob lerp factor per frame. Default: 0.65.
    pub cursor_follow_ratio: f64,
    /// Default: 100.
    pub nav_hide_after_px: f64,
    /// Default: 500.
    pub scroll_top_visible_after_px: f64,
    /// The scroll-to-top button exists only on wider viewports. Default: 1024.
    pub scroll_top_min_width_px: f64,
    /// Default: 1000.
    pub rotator_start_delay_ms: u64,
    /// Default: 2000.
    pub rotator_interval_ms: u64,
    /// Resize quiet period before re-measuring the viewport. Default: 100.
    pub resize_debounce_ms: u64,
    /// Time between background particles. Default: 500.
    pub particle_interval_ms: u64,
}

impl Default for ChromePolicyConfig {
    fn default() -> Self {
        Self {
            cursor_follow_ratio: CURSOR_FOLLOW_RATIO,
            nav_hide_after_px: NAV_HIDE_AFTER_PX,
            scroll_top_visible_after_px: SCROLL_TOP_VISIBLE_AFTER_PX,
            scroll_top_min_width_px: SCROLL_TOP_MIN_WIDTH_PX,
            rotator_start_delay_ms: duration_ms(ROTATOR_START_DELAY),
            rotator_interval_ms: duration_ms(ROTATOR_INTERVAL),
            resize_debounce_ms: duration_ms(RESIZE_DEBOUNCE),
            particle_interval_ms: duration_ms(PARTICLE_INTERVAL),
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
