#![forbid(unsafe_code)]

//! WASM runner for the folio portfolio page.
//!
//! [`runner_core::RunnerCore`] holds all page state on top of `folio-core`
//! and talks to the document only through [`commands::HostCommand`]s, so
//! it runs natively under test. On `wasm32` the [`FolioApp`] export binds
//! it to the live DOM: section observation, link clicks, the frame loop and
//! the page chrome.

pub mod commands;
pub mod runner_core;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{FolioApp, section_from_href};

pub use commands::{CommandQueue, DeterministicClock, HostCommand};
pub use runner_core::RunnerCore;
