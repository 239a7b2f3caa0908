//! Per-frame simulation step
//!
//! Advances both pools once, removes what finished, then applies the
//! spawn policy and population caps.

use super::state::SimState;
use crate::settings::SpawnMode;

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Fireworks consumed this frame
    pub exploded: usize,
    /// Particles created by those explosions
    pub spawned_particles: usize,
    /// Particles that faded out
    pub expired_particles: usize,
    /// Particles dropped by the population cap
    pub trimmed_particles: usize,
    /// Firework launched by the timer, if any
    pub auto_launch: Option<u32>,
}

/// Advance the simulation by one frame
pub fn tick(state: &mut SimState) -> TickSummary {
    let mut summary = TickSummary::default();
    state.time_ticks += 1;

    // Fireworks: collect arrivals, compact the pool in one pass
    let termination = state.settings.termination;
    let mut arrivals = Vec::new();
    state.fireworks.retain_mut(|fw| {
        if fw.update(termination) {
            arrivals.push((fw.target, fw.hue));
            false
        } else {
            true
        }
    });
    for (pos, hue) in arrivals {
        summary.exploded += 1;
        summary.spawned_particles += state.explode(pos, hue);
        log::debug!("Explosion at ({:.0}, {:.0})", pos.x, pos.y);
    }

    // Particles (including this frame's fresh bursts)
    let before = state.particles.len();
    state.particles.retain_mut(|p| p.update());
    summary.expired_particles = before - state.particles.len();
    summary.trimmed_particles = state.trim_particles();

    if let SpawnMode::Timed { interval_frames } = state.settings.spawn {
        if state.timer_tick >= interval_frames {
            state.timer_tick = 0;
            if !state.at_firework_cap() {
                let target = state.random_sky_target();
                summary.auto_launch = Some(state.launch(target));
            }
        } else {
            state.timer_tick += 1;
        }
    }

    log::trace!(
        "Tick {}: {} fireworks, {} particles",
        state.time_ticks,
        state.fireworks.len(),
        state.particles.len()
    );
    summary
}
