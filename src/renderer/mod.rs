//! Canvas rendering module
//!
//! The painter issues 2D-context style commands against a [`Surface`];
//! the browser build backs it with `CanvasRenderingContext2d`.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod recording;

#[cfg(target_arch = "wasm32")]
pub use canvas::{CanvasError, CanvasSurface};
pub use recording::{DrawOp, RecordingSurface};

use glam::Vec2;

use crate::normalize_hue;
use crate::sim::SimState;

/// Compositing mode for subsequent fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Normal painter's order
    SourceOver,
    /// Additive: overlapping glow brightens
    Lighter,
}

impl BlendMode {
    pub fn as_css(&self) -> &'static str {
        match self {
            BlendMode::SourceOver => "source-over",
            BlendMode::Lighter => "lighter",
        }
    }
}

/// Fill color
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    /// Hue in degrees, saturation and lightness in percent
    Hsl { h: f32, s: f32, l: f32 },
    /// 8-bit channels plus alpha in [0, 1]
    Rgba { r: u8, g: u8, b: u8, a: f32 },
}

impl Fill {
    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        Fill::Hsl { h, s, l }
    }

    /// Translucent black used for the trail fade
    pub fn shade(alpha: f32) -> Self {
        Fill::Rgba { r: 0, g: 0, b: 0, a: alpha }
    }

    /// CSS color string
    pub fn css(&self) -> String {
        match *self {
            Fill::Hsl { h, s, l } => format!("hsl({:.1},{:.0}%,{:.1}%)", normalize_hue(h), s, l),
            Fill::Rgba { r, g, b, a } => format!("rgba({},{},{},{})", r, g, b, a),
        }
    }
}

/// Bold text font
#[derive(Debug, Clone, PartialEq)]
pub struct Font<'a> {
    pub size_px: f32,
    pub family: &'a str,
}

impl Font<'_> {
    pub fn css(&self) -> String {
        format!("bold {:.1}px {}", self.size_px, self.family)
    }
}

/// The subset of a 2D drawing context the show needs
pub trait Surface {
    fn set_blend(&mut self, mode: BlendMode);
    /// Opacity multiplier for subsequent fills
    fn set_alpha(&mut self, alpha: f32);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, fill: Fill);
    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Fill);
    /// Text horizontally centered on `pos`
    fn fill_text(&mut self, text: &str, pos: Vec2, font: &Font<'_>, fill: Fill);
    /// Wipe everything (used when leaving the show)
    fn clear(&mut self);
}

/// Paint one frame: fade the previous one, then draw all live entities additively
pub fn paint_frame(state: &SimState, surface: &mut impl Surface) {
    let settings = &state.settings;
    let size = Vec2::new(state.viewport.width, state.viewport.height);

    surface.set_blend(BlendMode::SourceOver);
    surface.fill_rect(Vec2::ZERO, size, Fill::shade(settings.trail_alpha));

    surface.set_blend(BlendMode::Lighter);

    for fw in &state.fireworks {
        surface.fill_circle(fw.pos, settings.firework.radius, Fill::hsl(fw.hue, 100.0, fw.brightness));
    }

    let family = settings.particle.font_family.as_str();
    for p in &state.particles {
        surface.set_alpha(p.alpha);
        let font = Font {
            size_px: p.font_size,
            family,
        };
        surface.fill_text(&settings.text, p.pos, &font, Fill::hsl(p.hue, 100.0, settings.particle.lightness));
    }
    if !state.particles.is_empty() {
        surface.set_alpha(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ShowSettings;
    use crate::sim::Viewport;

    #[test]
    fn test_fill_css() {
        assert_eq!(Fill::shade(0.2).css(), "rgba(0,0,0,0.2)");
        assert_eq!(Fill::hsl(-20.0, 100.0, 60.0).css(), "hsl(340.0,100%,60.0%)");
        assert_eq!(
            Font { size_px: 12.0, family: "Arial" }.css(),
            "bold 12.0px Arial"
        );
    }

    #[test]
    fn test_paint_order() {
        let mut state = SimState::new(ShowSettings::timed(), Viewport::new(400.0, 600.0), 1);
        state.launch(Vec2::new(100.0, 100.0));
        state.explode(Vec2::new(50.0, 50.0), 120.0);

        let mut surface = RecordingSurface::default();
        paint_frame(&state, &mut surface);
        let ops = &surface.ops;

        assert_eq!(ops[0], DrawOp::Blend(BlendMode::SourceOver));
        assert_eq!(
            ops[1],
            DrawOp::Rect {
                origin: Vec2::ZERO,
                size: Vec2::new(400.0, 600.0),
                fill: Fill::shade(0.2),
            }
        );
        assert_eq!(ops[2], DrawOp::Blend(BlendMode::Lighter));
        assert!(matches!(ops[3], DrawOp::Circle { radius, .. } if radius == 2.0));
        assert_eq!(surface.circle_count(), 1);
        assert_eq!(surface.text_count(), 20);
        assert_eq!(ops.last(), Some(&DrawOp::Alpha(1.0)));
        assert!(surface.texts().all(|t| t == state.settings.text));
    }

    #[test]
    fn test_text_drawn_at_particle_alpha() {
        let mut state = SimState::new(ShowSettings::capped(), Viewport::new(400.0, 600.0), 1);
        state.explode(Vec2::new(50.0, 50.0), 10.0);
        state.particles.truncate(1);
        state.particles[0].alpha = 0.5;

        let mut surface = RecordingSurface::default();
        paint_frame(&state, &mut surface);
        let tail = &surface.ops[surface.ops.len() - 3..];
        assert_eq!(tail[0], DrawOp::Alpha(0.5));
        assert!(matches!(&tail[1], DrawOp::Text { fill, .. } if *fill == Fill::hsl(10.0, 100.0, 60.0)));
        assert_eq!(tail[2], DrawOp::Alpha(1.0));
    }
}
