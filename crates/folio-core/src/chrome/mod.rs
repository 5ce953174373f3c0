#![forbid(unsafe_code)]

//! Page chrome: small stateful helpers around the navigation core.
//!
//! Each helper is a pure state holder driven by the host (pointer moves,
//! scroll positions, timer ticks). None of them reads the document; the
//! host applies their outputs as style or class changes.

mod cursor;
mod nav;
mod particles;
mod rotator;
mod viewport;

pub use cursor::{
    CURSOR_FOLLOW_RATIO, CURSOR_HOVER_OPACITY, CURSOR_IDLE_OPACITY, CursorFollower, ElementRect,
    PARALLAX_MOVEMENT_PX, parallax_offset,
};
pub use nav::{
    MenuToggle, NAV_HIDE_AFTER_PX, NavAutoHide, SCROLL_TOP_MIN_WIDTH_PX, SCROLL_TOP_VISIBLE_AFTER_PX,
    ScrollTopButton,
};
pub use particles::{
    PARTICLE_DRIFT_PX, PARTICLE_END_Y, PARTICLE_FADE_OUT, PARTICLE_INTERVAL,
    PARTICLE_MAX_LIFETIME, PARTICLE_MIN_LIFETIME, PARTICLE_START_BELOW_PX, Particle,
    ParticleSpawner,
};
pub use rotator::{ImageRotator, ROTATOR_INTERVAL, ROTATOR_START_DELAY};
pub use viewport::{ORIENTATION_SETTLE_DELAY, RESIZE_DEBOUNCE, VH_PROPERTY, viewport_unit};
