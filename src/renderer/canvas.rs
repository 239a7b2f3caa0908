//! Canvas2D surface for the browser build

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{BlendMode, Fill, Font, Surface};
use crate::sim::Viewport;

/// Canvas setup failure
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasError {
    ContextUnavailable(String),
    NotA2dContext,
}

impl std::fmt::Display for CanvasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContextUnavailable(msg) => write!(f, "no 2d context: {msg}"),
            Self::NotA2dContext => write!(f, "context is not a CanvasRenderingContext2d"),
        }
    }
}

impl std::error::Error for CanvasError {}

fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
}

/// `CanvasRenderingContext2d` working in CSS pixels
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, CanvasError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| CanvasError::ContextUnavailable(format!("{e:?}")))?
            .ok_or_else(|| CanvasError::ContextUnavailable("null".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| CanvasError::NotA2dContext)?;

        let mut surface = Self {
            canvas,
            ctx,
            dpr: 1.0,
        };
        surface.fit_to_device();
        Ok(surface)
    }

    /// Size the backing store to physical pixels and scale drawing to CSS
    /// pixels. Returns the logical viewport.
    pub fn fit_to_device(&mut self) -> Viewport {
        let dpr = device_pixel_ratio();
        let width = self.canvas.client_width().max(0) as f64;
        let height = self.canvas.client_height().max(0) as f64;
        self.canvas.set_width((width * dpr) as u32);
        self.canvas.set_height((height * dpr) as u32);
        // Resizing resets the transform, so set it absolutely
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).ok();
        self.dpr = dpr;

        log::info!("Canvas {}x{} @{}x", width, height, dpr);
        self.viewport()
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.canvas.client_width() as f32,
            self.canvas.client_height() as f32,
        )
    }
}

impl Surface for CanvasSurface {
    fn set_blend(&mut self, mode: BlendMode) {
        self.ctx.set_global_composite_operation(mode.as_css()).ok();
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, fill: Fill) {
        self.ctx.set_fill_style_str(&fill.css());
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Fill) {
        self.ctx.begin_path();
        self.ctx.set_fill_style_str(&fill.css());
        self.ctx
            .arc(
                center.x as f64,
                center.y as f64,
                radius as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .ok();
        self.ctx.fill();
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, font: &Font<'_>, fill: Fill) {
        self.ctx.set_font(&font.css());
        self.ctx.set_text_align("center");
        self.ctx.set_fill_style_str(&fill.css());
        self.ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
    }

    fn clear(&mut self) {
        let w = self.canvas.width() as f64 / self.dpr;
        let h = self.canvas.height() as f64 / self.dpr;
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_global_composite_operation("source-over").ok();
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }
}
