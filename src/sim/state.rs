//! Simulation state: viewport, entity pools and launch bookkeeping

use glam::Vec2;

use super::firework::Firework;
use super::particle::Particle;
use super::random::ShowRng;
use crate::settings::ShowSettings;

/// Drawable area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Non-zero finite size
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Launch point: bottom center
    pub fn launch_origin(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height)
    }
}

/// Result of a launch request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    Launched { id: u32 },
    /// The show isn't running
    Idle,
    /// Too soon after the previous launch
    CoolingDown,
    /// Firework pool is full
    AtCapacity,
}

impl LaunchOutcome {
    pub fn is_launched(&self) -> bool {
        matches!(self, LaunchOutcome::Launched { .. })
    }
}

/// Everything the per-frame tick mutates
#[derive(Debug, Clone)]
pub struct SimState {
    pub settings: ShowSettings,
    pub viewport: Viewport,
    pub rng: ShowRng,
    /// Rising fireworks, oldest first
    pub fireworks: Vec<Firework>,
    /// Live particles, oldest first
    pub particles: Vec<Particle>,
    /// Frames since the last timed launch
    pub timer_tick: u32,
    /// Frames simulated since the last reset
    pub time_ticks: u64,
    /// Timestamp of the last accepted launch
    pub last_launch_ms: Option<f64>,
    next_id: u32,
}

impl SimState {
    pub fn new(settings: ShowSettings, viewport: Viewport, seed: u64) -> Self {
        Self {
            settings,
            viewport,
            rng: ShowRng::new(seed),
            fireworks: Vec::new(),
            particles: Vec::new(),
            timer_tick: 0,
            time_ticks: 0,
            last_launch_ms: None,
            next_id: 1,
        }
    }

    /// Allocate a new firework ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Empty both pools and restart the counters (RNG keeps its stream)
    pub fn reset(&mut self) {
        self.fireworks.clear();
        self.particles.clear();
        self.timer_tick = 0;
        self.time_ticks = 0;
        self.last_launch_ms = None;
    }

    pub fn at_firework_cap(&self) -> bool {
        self.settings
            .max_fireworks
            .is_some_and(|max| self.fireworks.len() >= max)
    }

    /// Launch from bottom center toward a pointer position, honoring the
    /// cooldown and firework cap when configured.
    pub fn request_launch(&mut self, target: Vec2, now_ms: f64) -> LaunchOutcome {
        if let (Some(cooldown), Some(last)) = (self.settings.cooldown_ms, self.last_launch_ms) {
            // A clock that stepped backwards doesn't hold launches hostage
            let elapsed = now_ms - last;
            if elapsed >= 0.0 && elapsed < cooldown {
                return LaunchOutcome::CoolingDown;
            }
        }
        if self.at_firework_cap() {
            return LaunchOutcome::AtCapacity;
        }

        let id = self.launch(target);
        self.last_launch_ms = Some(now_ms);
        LaunchOutcome::Launched { id }
    }

    /// Push a firework from the launch origin toward `target` (no checks)
    pub fn launch(&mut self, target: Vec2) -> u32 {
        let id = self.next_entity_id();
        let origin = self.viewport.launch_origin();
        let firework = Firework::new(id, origin, target, &self.settings.firework, &mut self.rng);
        log::debug!(
            "Launch #{} toward ({:.0}, {:.0}), hue {:.0}",
            id,
            target.x,
            target.y,
            firework.hue
        );
        self.fireworks.push(firework);
        id
    }

    /// Random target in the upper half of the viewport
    pub fn random_sky_target(&mut self) -> Vec2 {
        let x = self.rng.range(0.0, self.viewport.width);
        let y = self.rng.range(0.0, self.viewport.height / 2.0);
        Vec2::new(x, y)
    }

    /// Explode at `pos`: one batch of particles in the parent hue
    pub fn explode(&mut self, pos: Vec2, hue: f32) -> usize {
        let count = self.settings.particles_per_explosion;
        let batch = Particle::burst(pos, hue, count, &self.settings.particle, &mut self.rng);
        self.particles.extend(batch);
        count
    }

    /// Drop the oldest particles past the cap. Returns how many were dropped.
    pub fn trim_particles(&mut self) -> usize {
        match self.settings.max_particles {
            Some(max) if self.particles.len() > max => {
                let excess = self.particles.len() - max;
                self.particles.drain(..excess);
                excess
            }
            _ => 0,
        }
    }
}
