//! Rendering seam
//!
//! Entities draw through [`DrawContext`], which only needs to stroke and fill
//! circles. [`ShapeBatch`] tessellates into vertices for a GPU backend; the
//! browser build draws straight onto a 2D canvas.

pub mod shapes;
pub mod vertex;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasContext;
pub use shapes::ShapeBatch;
pub use vertex::Vertex;

use glam::DVec2;

/// 8-bit RGB colour with a floating-point alpha in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same colour with alpha replaced (clamped to [0, 1])
    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `rgba(...)` string
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }

    /// Normalised float channels for vertex colours
    pub fn to_f32(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32,
        ]
    }
}

/// Outline style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
}

/// Colours for scene elements
pub mod colors {
    use super::Rgba;

    pub const BALL: Rgba = Rgba::rgb(255, 255, 255);
    /// #f18f01
    pub const SOUND_BALL: Rgba = Rgba::rgb(241, 143, 1);
}

/// Anything that can draw circles
pub trait DrawContext {
    /// Outline a circle
    fn stroke_circle(&mut self, center: DVec2, radius: f64, stroke: Stroke);

    /// Fill a circle
    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba);
}
