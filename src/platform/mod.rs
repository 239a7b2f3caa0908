//! Platform abstraction layer
//!
//! Browser-only helpers:
//! - `requestAnimationFrame` as a [`FrameScheduler`](crate::show::FrameScheduler)
//! - DOM lookups and screen transitions (fade, show/hide)
//! - Timers and clock

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::*;
