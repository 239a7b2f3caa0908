//! Show settings and variant presets
//!
//! Both page variants (timed auto-launch, click cooldown with caps) are the
//! same simulation with different tuning. Persisted as JSON in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Named tuning presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Auto-launch every 90 frames, 20 particles per burst, no caps
    #[default]
    Timed,
    /// Pointer-only launches with cooldown and population caps
    Capped,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Timed => "timed",
            Variant::Capped => "capped",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "timed" | "auto" | "a" => Some(Variant::Timed),
            "capped" | "click" | "b" => Some(Variant::Capped),
            _ => None,
        }
    }

    pub fn settings(&self) -> ShowSettings {
        match self {
            Variant::Timed => ShowSettings::timed(),
            Variant::Capped => ShowSettings::capped(),
        }
    }
}

/// When a rising firework counts as arrived
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Termination {
    /// Remaining distance below `fraction` of the launch distance
    Relative { fraction: f32 },
    /// Remaining distance below a fixed pixel radius
    Absolute { pixels: f32 },
}

impl Termination {
    /// Threshold in pixels for a launch covering `total_distance`
    pub fn threshold(&self, total_distance: f32) -> f32 {
        match *self {
            Termination::Relative { fraction } => total_distance * fraction,
            Termination::Absolute { pixels } => pixels,
        }
    }
}

/// Where new fireworks come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SpawnMode {
    /// Launch automatically every `interval_frames`; pointer launches also accepted
    Timed { interval_frames: u32 },
    /// Launch only on pointer/tap
    Pointer,
}

/// Rising spark tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireworkTuning {
    pub start_speed: f32,
    /// Multiplicative speed growth per frame (>= 1)
    pub acceleration: f32,
    pub radius: f32,
    pub brightness_min: f32,
    pub brightness_max: f32,
}

impl Default for FireworkTuning {
    fn default() -> Self {
        Self {
            start_speed: FIREWORK_START_SPEED,
            acceleration: FIREWORK_ACCELERATION,
            radius: FIREWORK_RADIUS,
            brightness_min: 50.0,
            brightness_max: 70.0,
        }
    }
}

/// Explosion particle tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleTuning {
    pub speed_min: f32,
    pub speed_max: f32,
    pub friction: f32,
    pub gravity: f32,
    pub decay_min: f32,
    pub decay_max: f32,
    /// Hue spread around the parent firework (degrees, either side)
    pub hue_jitter: f32,
    pub font_size_min: f32,
    pub font_size_max: f32,
    pub font_family: String,
    pub lightness: f32,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            speed_min: 2.0,
            speed_max: 10.0,
            friction: PARTICLE_FRICTION,
            gravity: PARTICLE_GRAVITY,
            decay_min: 0.008,
            decay_max: 0.015,
            hue_jitter: 40.0,
            font_size_min: 12.0,
            font_size_max: 22.0,
            font_family: "Arial".to_string(),
            lightness: PARTICLE_LIGHTNESS,
        }
    }
}

/// Rejected tuning
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    EmptyText,
    NonPositive(&'static str),
    OutOfRange { field: &'static str, value: f64 },
    InvertedRange(&'static str),
    Json(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "particle text must not be empty"),
            Self::NonPositive(field) => write!(f, "{field} must be positive"),
            Self::OutOfRange { field, value } => write!(f, "{field} out of range: {value}"),
            Self::InvertedRange(field) => write!(f, "{field}: min exceeds max"),
            Self::Json(msg) => write!(f, "invalid settings JSON: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Complete show configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowSettings {
    /// Preset these settings started from (informational)
    #[serde(default)]
    pub variant: Variant,
    /// Text drawn by every particle
    pub text: String,
    pub termination: Termination,
    pub spawn: SpawnMode,
    pub particles_per_explosion: usize,
    /// Particle pool cap; oldest particles are trimmed past it
    #[serde(default)]
    pub max_particles: Option<usize>,
    /// Concurrent firework cap
    #[serde(default)]
    pub max_fireworks: Option<usize>,
    /// Minimum gap between accepted launches
    #[serde(default)]
    pub cooldown_ms: Option<f64>,
    /// Opacity of the per-frame black overpaint (trail length)
    pub trail_alpha: f32,
    #[serde(default)]
    pub firework: FireworkTuning,
    #[serde(default)]
    pub particle: ParticleTuning,
}

impl Default for ShowSettings {
    fn default() -> Self {
        Self::timed()
    }
}

impl ShowSettings {
    /// Auto-launch variant
    pub fn timed() -> Self {
        Self {
            variant: Variant::Timed,
            text: DEFAULT_TEXT.to_string(),
            termination: Termination::Relative {
                fraction: RELATIVE_TERMINATION,
            },
            spawn: SpawnMode::Timed {
                interval_frames: TIMER_INTERVAL_FRAMES,
            },
            particles_per_explosion: 20,
            max_particles: None,
            max_fireworks: None,
            cooldown_ms: None,
            trail_alpha: 0.2,
            firework: FireworkTuning::default(),
            particle: ParticleTuning::default(),
        }
    }

    /// Click-cooldown variant with population caps
    pub fn capped() -> Self {
        Self {
            variant: Variant::Capped,
            termination: Termination::Absolute {
                pixels: ABSOLUTE_TERMINATION,
            },
            spawn: SpawnMode::Pointer,
            particles_per_explosion: 12,
            max_particles: Some(MAX_PARTICLES),
            max_fireworks: Some(MAX_FIREWORKS),
            cooldown_ms: Some(CLICK_COOLDOWN_MS),
            trail_alpha: 0.25,
            particle: ParticleTuning {
                hue_jitter: 0.0,
                font_size_min: 18.0,
                font_size_max: 18.0,
                ..ParticleTuning::default()
            },
            ..Self::timed()
        }
    }

    /// Check tuning for values that would break the simulation
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.text.trim().is_empty() {
            return Err(SettingsError::EmptyText);
        }
        match self.termination {
            Termination::Relative { fraction } => {
                if !(fraction > 0.0 && fraction < 1.0) {
                    return Err(SettingsError::OutOfRange {
                        field: "termination.fraction",
                        value: fraction as f64,
                    });
                }
            }
            Termination::Absolute { pixels } => {
                if !(pixels > 0.0) {
                    return Err(SettingsError::NonPositive("termination.pixels"));
                }
            }
        }
        if let SpawnMode::Timed { interval_frames: 0 } = self.spawn {
            return Err(SettingsError::NonPositive("spawn.interval_frames"));
        }
        if self.particles_per_explosion == 0 {
            return Err(SettingsError::NonPositive("particles_per_explosion"));
        }
        if self.max_particles == Some(0) {
            return Err(SettingsError::NonPositive("max_particles"));
        }
        if self.max_fireworks == Some(0) {
            return Err(SettingsError::NonPositive("max_fireworks"));
        }
        if let Some(cooldown) = self.cooldown_ms {
            if !(cooldown >= 0.0) {
                return Err(SettingsError::OutOfRange {
                    field: "cooldown_ms",
                    value: cooldown,
                });
            }
        }
        if !(self.trail_alpha > 0.0 && self.trail_alpha <= 1.0) {
            return Err(SettingsError::OutOfRange {
                field: "trail_alpha",
                value: self.trail_alpha as f64,
            });
        }

        let fw = &self.firework;
        if !(fw.start_speed > 0.0) {
            return Err(SettingsError::NonPositive("firework.start_speed"));
        }
        if !(fw.acceleration >= 1.0) {
            return Err(SettingsError::OutOfRange {
                field: "firework.acceleration",
                value: fw.acceleration as f64,
            });
        }
        if fw.brightness_min > fw.brightness_max {
            return Err(SettingsError::InvertedRange("firework.brightness"));
        }

        let p = &self.particle;
        if !(p.friction > 0.0 && p.friction <= 1.0) {
            return Err(SettingsError::OutOfRange {
                field: "particle.friction",
                value: p.friction as f64,
            });
        }
        if !(p.decay_min > 0.0) {
            return Err(SettingsError::NonPositive("particle.decay_min"));
        }
        if p.decay_min > p.decay_max {
            return Err(SettingsError::InvertedRange("particle.decay"));
        }
        if p.speed_min > p.speed_max {
            return Err(SettingsError::InvertedRange("particle.speed"));
        }
        if p.font_size_min > p.font_size_max {
            return Err(SettingsError::InvertedRange("particle.font_size"));
        }
        if !(p.font_size_min > 0.0) {
            return Err(SettingsError::NonPositive("particle.font_size_min"));
        }
        if !(p.hue_jitter >= 0.0 && p.hue_jitter <= 180.0) {
            return Err(SettingsError::OutOfRange {
                field: "particle.hue_jitter",
                value: p.hue_jitter as f64,
            });
        }

        // Every sampled span must be finite or the RNG can't draw from it
        let spans = [
            ("firework.start_speed", fw.start_speed, fw.start_speed),
            ("firework.acceleration", fw.acceleration, fw.acceleration),
            ("firework.radius", fw.radius, fw.radius),
            ("firework.brightness", fw.brightness_min, fw.brightness_max),
            ("particle.speed", p.speed_min, p.speed_max),
            ("particle.decay", p.decay_min, p.decay_max),
            ("particle.font_size", p.font_size_min, p.font_size_max),
            ("particle.gravity", p.gravity, p.gravity),
            ("particle.lightness", p.lightness, p.lightness),
        ];
        for (field, min, max) in spans {
            if !(min.is_finite() && max.is_finite() && (max - min).is_finite()) {
                return Err(SettingsError::OutOfRange {
                    field,
                    value: (max - min) as f64,
                });
            }
        }
        if let Termination::Absolute { pixels } = self.termination {
            if !pixels.is_finite() {
                return Err(SettingsError::OutOfRange {
                    field: "termination.pixels",
                    value: pixels as f64,
                });
            }
        }
        Ok(())
    }

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| SettingsError::Json(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        serde_json::to_string_pretty(self).map_err(|e| SettingsError::Json(e.to_string()))
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "ciallo_fireworks_settings";

    /// Load settings from LocalStorage, else the `?variant=` preset (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = web_sys::window();
        let storage = window
            .as_ref()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        let query = window
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let variant = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "variant")
            .and_then(|(_, value)| Variant::from_str(value))
            .unwrap_or_default();

        log::info!("Using {} preset", variant.as_str());
        variant.settings()
    }

    /// Presets only off the web
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
