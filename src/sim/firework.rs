//! Rising firework spark
//!
//! Travels in a straight line from its launch point toward a target,
//! accelerating every frame, and is consumed on arrival.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::random::ShowRng;
use crate::heading;
use crate::settings::{FireworkTuning, Termination};

/// A firework on its way up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Firework {
    pub id: u32,
    pub origin: Vec2,
    pub target: Vec2,
    pub pos: Vec2,
    /// Travel direction (radians), fixed at launch
    angle: f32,
    pub speed: f32,
    acceleration: f32,
    pub hue: f32,
    /// Fill lightness (percent)
    pub brightness: f32,
    /// Straight-line launch distance
    pub distance_to_target: f32,
    /// Distance covered so far
    pub traveled: f32,
}

impl Firework {
    pub fn new(id: u32, origin: Vec2, target: Vec2, tuning: &FireworkTuning, rng: &mut ShowRng) -> Self {
        let delta = target - origin;
        Self {
            id,
            origin,
            target,
            pos: origin,
            angle: delta.y.atan2(delta.x),
            speed: tuning.start_speed,
            acceleration: tuning.acceleration,
            hue: rng.range(0.0, 360.0),
            brightness: rng.range(tuning.brightness_min, tuning.brightness_max),
            distance_to_target: delta.length(),
            traveled: 0.0,
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn remaining(&self) -> f32 {
        self.pos.distance(self.target)
    }

    /// Advance one frame. Returns true once the firework has arrived and
    /// should explode at its target.
    pub fn update(&mut self, termination: Termination) -> bool {
        self.speed *= self.acceleration;
        self.pos += heading(self.angle) * self.speed;
        self.traveled += self.speed;

        // Overshoot also counts, so fast sparks can't skip the window
        self.remaining() < termination.threshold(self.distance_to_target)
            || self.traveled >= self.distance_to_target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn launch(origin: Vec2, target: Vec2) -> Firework {
        Firework::new(1, origin, target, &FireworkTuning::default(), &mut ShowRng::new(3))
    }

    const RELATIVE: Termination = Termination::Relative { fraction: 0.05 };

    #[test]
    fn test_new_firework() {
        let fw = launch(Vec2::new(200.0, 600.0), Vec2::new(200.0, 100.0));
        assert_eq!(fw.pos, fw.origin);
        assert_eq!(fw.distance_to_target, 500.0);
        assert!((fw.angle() + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!(fw.hue >= 0.0 && fw.hue < 360.0);
        assert!(fw.brightness >= 50.0 && fw.brightness < 70.0);
    }

    #[test]
    fn test_update_moves_toward_target() {
        let mut fw = launch(Vec2::new(200.0, 600.0), Vec2::new(200.0, 100.0));
        assert!(!fw.update(RELATIVE));
        assert!((fw.speed - 2.04).abs() < 1e-5);
        assert!((fw.pos.y - (600.0 - 2.04)).abs() < 1e-3);
        assert!((fw.pos.x - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_absolute_threshold() {
        let abs = Termination::Absolute { pixels: 20.0 };
        let mut fw = launch(Vec2::ZERO, Vec2::new(25.0, 0.0));
        // 2.04, 4.12, 6.24... first remaining < 20 after crossing x = 5
        let mut frames = 0;
        while !fw.update(abs) {
            frames += 1;
        }
        assert_eq!(frames, 2);
        assert!(fw.remaining() < 20.0);
    }

    #[test]
    fn test_zero_length_launch_is_consumed() {
        let mut fw = launch(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0));
        assert!(fw.update(RELATIVE));
    }

    #[test]
    fn test_overshoot_is_consumed() {
        // Relative window of 0.5 px is narrower than a single step
        let mut fw = launch(Vec2::ZERO, Vec2::new(10.0, 0.0));
        let mut frames = 0;
        while !fw.update(RELATIVE) {
            frames += 1;
            assert!(frames < 10);
        }
    }

    proptest! {
        #[test]
        fn speed_never_decreases(
            x0 in 0.0f32..800.0, y0 in 0.0f32..800.0,
            x1 in 0.0f32..800.0, y1 in 0.0f32..800.0,
            accel in 1.0f32..1.2,
        ) {
            let tuning = FireworkTuning { acceleration: accel, ..Default::default() };
            let mut fw = Firework::new(1, Vec2::new(x0, y0), Vec2::new(x1, y1), &tuning, &mut ShowRng::new(0));
            for _ in 0..50 {
                let before = fw.speed;
                let angle = fw.angle();
                fw.update(RELATIVE);
                prop_assert!(fw.speed >= before);
                prop_assert_eq!(fw.angle(), angle);
            }
        }

        #[test]
        fn launch_converges(
            x0 in 0.0f32..1000.0, y0 in 0.0f32..1000.0,
            x1 in 0.0f32..1000.0, y1 in 0.0f32..1000.0,
            speed in 0.1f32..10.0, accel in 1.001f32..1.1,
            relative in any::<bool>(),
        ) {
            let tuning = FireworkTuning { start_speed: speed, acceleration: accel, ..Default::default() };
            let termination = if relative {
                Termination::Relative { fraction: 0.05 }
            } else {
                Termination::Absolute { pixels: 20.0 }
            };
            let mut fw = Firework::new(1, Vec2::new(x0, y0), Vec2::new(x1, y1), &tuning, &mut ShowRng::new(0));
            let mut frames = 0u32;
            let mut last = fw.remaining();
            while !fw.update(termination) {
                let now = fw.remaining();
                prop_assert!(now <= last + 1e-2);
                last = now;
                frames += 1;
                prop_assert!(frames < 20_000);
            }
        }
    }
}
