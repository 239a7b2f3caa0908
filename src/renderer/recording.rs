//! Headless surface that records draw commands

use glam::Vec2;

use super::{BlendMode, Fill, Font, Surface};

/// One recorded draw command
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Blend(BlendMode),
    Alpha(f32),
    Rect { origin: Vec2, size: Vec2, fill: Fill },
    Circle { center: Vec2, radius: f32, fill: Fill },
    Text { text: String, pos: Vec2, font_px: f32, fill: Fill },
    Clear,
}

/// Surface for tests and the native runner
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    /// Commands issued since creation (survives `take_ops`)
    pub total_ops: u64,
}

impl RecordingSurface {
    fn record(&mut self, op: DrawOp) {
        self.total_ops += 1;
        self.ops.push(op);
    }

    /// Drain recorded commands
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn text_count(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Text { .. })).count()
    }

    pub fn circle_count(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Circle { .. })).count()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn set_blend(&mut self, mode: BlendMode) {
        self.record(DrawOp::Blend(mode));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.record(DrawOp::Alpha(alpha));
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, fill: Fill) {
        self.record(DrawOp::Rect { origin, size, fill });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Fill) {
        self.record(DrawOp::Circle { center, radius, fill });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, font: &Font<'_>, fill: Fill) {
        self.record(DrawOp::Text {
            text: text.to_string(),
            pos,
            font_px: font.size_px,
            fill,
        });
    }

    fn clear(&mut self) {
        self.record(DrawOp::Clear);
    }
}
