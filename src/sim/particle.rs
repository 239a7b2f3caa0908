//! Explosion text particles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::random::ShowRng;
use crate::heading;
use crate::settings::ParticleTuning;

/// One fading fragment of an explosion, drawn as the show text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Degrees, parent hue plus jitter (not wrapped)
    pub hue: f32,
    /// Direction of travel (radians), fixed at creation
    angle: f32,
    pub speed: f32,
    friction: f32,
    gravity: f32,
    /// Opacity, starts at 1 and only goes down
    pub alpha: f32,
    pub decay: f32,
    pub font_size: f32,
}

impl Particle {
    pub fn new(pos: Vec2, parent_hue: f32, tuning: &ParticleTuning, rng: &mut ShowRng) -> Self {
        Self {
            pos,
            hue: rng.range(parent_hue - tuning.hue_jitter, parent_hue + tuning.hue_jitter),
            angle: rng.angle(),
            speed: rng.range(tuning.speed_min, tuning.speed_max),
            friction: tuning.friction,
            gravity: tuning.gravity,
            alpha: 1.0,
            decay: rng.range(tuning.decay_min, tuning.decay_max),
            font_size: rng.range(tuning.font_size_min, tuning.font_size_max),
        }
    }

    /// A batch of `count` particles bursting from `pos`
    pub fn burst(
        pos: Vec2,
        parent_hue: f32,
        count: usize,
        tuning: &ParticleTuning,
        rng: &mut ShowRng,
    ) -> impl Iterator<Item = Particle> {
        (0..count).map(move |_| Particle::new(pos, parent_hue, tuning, rng))
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn is_alive(&self) -> bool {
        self.alpha > 0.0
    }

    /// Advance one frame. Returns false once the particle has faded out.
    pub fn update(&mut self) -> bool {
        self.speed *= self.friction;
        // Gravity is added regardless of speed so spent fragments still fall
        self.pos += heading(self.angle) * self.speed + Vec2::new(0.0, self.gravity);
        self.alpha -= self.decay;
        self.is_alive()
    }
}
