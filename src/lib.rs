//! Ciallo Fireworks - click-to-launch text fireworks
//!
//! Core modules:
//! - `sim`: Seeded particle simulation (fireworks, text particles, pools)
//! - `show`: Start/stop lifecycle driven by a host frame scheduler
//! - `renderer`: Drawing surface abstraction and frame painter
//! - `settings`: Tuning presets for the timed and capped variants
//! - `platform`: Browser glue (wasm32 only)

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod show;
pub mod sim;

pub use settings::{ShowSettings, Variant};
pub use show::{FrameHandle, FrameScheduler, ManualScheduler, Phase, Show, ShowError};

use glam::Vec2;

/// Default tuning constants
pub mod consts {
    /// Text drawn by every explosion particle
    pub const DEFAULT_TEXT: &str = "Ciallo～(∠・ω< )⌒☆";

    /// Firework launch speed (pixels/frame)
    pub const FIREWORK_START_SPEED: f32 = 2.0;
    /// Per-frame multiplicative speed growth
    pub const FIREWORK_ACCELERATION: f32 = 1.02;
    /// Spark radius (pixels)
    pub const FIREWORK_RADIUS: f32 = 2.0;

    /// Timed variant: frames between automatic launches
    pub const TIMER_INTERVAL_FRAMES: u32 = 90;
    /// Timed variant: consumed within 5% of the launch distance
    pub const RELATIVE_TERMINATION: f32 = 0.05;
    /// Capped variant: consumed within this many pixels of the target
    pub const ABSOLUTE_TERMINATION: f32 = 20.0;

    /// Particle friction (multiplicative per frame)
    pub const PARTICLE_FRICTION: f32 = 0.95;
    /// Particle gravity (pixels/frame, added every frame)
    pub const PARTICLE_GRAVITY: f32 = 0.4;
    /// Particle fill lightness (percent)
    pub const PARTICLE_LIGHTNESS: f32 = 60.0;

    /// Capped variant limits
    pub const MAX_PARTICLES: usize = 300;
    pub const MAX_FIREWORKS: usize = 5;
    pub const CLICK_COOLDOWN_MS: f64 = 250.0;
}

/// Wrap a hue in degrees into [0, 360)
#[inline]
pub fn normalize_hue(hue: f32) -> f32 {
    let h = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negatives
    if h >= 360.0 { 0.0 } else { h }
}

/// Unit step along `angle` (radians), screen coordinates (y down)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
