//! Firework simulation module
//!
//! Pure, seeded, frame-stepped physics. This module must stay free of
//! rendering and platform dependencies:
//! - One `tick` per display frame
//! - Seeded RNG only
//! - Pools iterate oldest first

pub mod firework;
pub mod particle;
pub mod random;
pub mod state;
pub mod tick;

pub use firework::Firework;
pub use particle::Particle;
pub use random::ShowRng;
pub use state::{LaunchOutcome, SimState, Viewport};
pub use tick::{TickSummary, tick};
