#![forbid(unsafe_code)]

//! Mobile viewport-height unit.
//!
//! Mobile browsers change `innerHeight` as toolbars collapse, so `100vh`
//! overflows. The page exposes one percent of the real inner height as the
//! `--vh` custom property instead.

use core::time::Duration;

/// Custom property carrying one viewport-height percent.
pub const VH_PROPERTY: &str = "--vh";
/// Quiet period before re-measuring after a resize burst.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);
/// Wait after an orientation change before measuring.
pub const ORIENTATION_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// CSS value for [`VH_PROPERTY`] given the window inner height in px.
///
/// Non-finite or negative heights produce `None`.
#[must_use]
pub fn viewport_unit(inner_height: f64) -> Option<String> {
    if !inner_height.is_finite() || inner_height < 0.0 {
        return None;
    }
    Some(format!("{}px", inner_height / 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_percent_of_inner_height() {
        assert_eq!(viewport_unit(800.0).as_deref(), Some("8px"));
        assert_eq!(viewport_unit(0.0).as_deref(), Some("0px"));
        assert_eq!(viewport_unit(f64::NAN), None);
        assert_eq!(viewport_unit(-1.0), None);
    }
}
