//! Canvas 2D backend (browser only)

use glam::DVec2;
use std::f64::consts::TAU;
use web_sys::CanvasRenderingContext2d;

use super::{DrawContext, Rgba, Stroke};

/// Draw context over a `CanvasRenderingContext2d`
pub struct CanvasContext {
    ctx: CanvasRenderingContext2d,
}

impl CanvasContext {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Clear the whole canvas and isolate the frame's style changes
    pub fn begin_frame(&self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
        self.ctx.save();
    }

    pub fn end_frame(&self) {
        self.ctx.restore();
    }

    fn circle_path(&self, center: DVec2, radius: f64) {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x, center.y, radius.max(0.0), 0.0, TAU)
            .ok();
    }
}

impl DrawContext for CanvasContext {
    fn stroke_circle(&mut self, center: DVec2, radius: f64, stroke: Stroke) {
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.set_line_width(stroke.width);
        self.circle_path(center, radius);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.circle_path(center, radius);
        self.ctx.fill();
    }
}
