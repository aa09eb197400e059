//! Circle tessellation for 2D primitives

use glam::DVec2;
use std::f64::consts::TAU;

use super::vertex::Vertex;
use super::{DrawContext, Rgba, Stroke};

/// Segments used when tessellating a full circle
pub const CIRCLE_SEGMENTS: u32 = 48;

#[inline]
fn on_circle(center: DVec2, radius: f64, theta: f64) -> DVec2 {
    center + DVec2::new(radius * theta.cos(), radius * theta.sin())
}

#[inline]
fn vertex(p: DVec2, color: [f32; 4]) -> Vertex {
    Vertex::new(p.x as f32, p.y as f32, color)
}

/// Generate vertices for a filled circle
pub fn circle(center: DVec2, radius: f64, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f64 / segments as f64) * TAU;
        let theta2 = ((i + 1) as f64 / segments as f64) * TAU;

        // Triangle from center to edge
        vertices.push(vertex(center, color));
        vertices.push(vertex(on_circle(center, radius, theta1), color));
        vertices.push(vertex(on_circle(center, radius, theta2), color));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: DVec2,
    inner_radius: f64,
    outer_radius: f64,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    let inner_radius = inner_radius.max(0.0);

    for i in 0..segments {
        let theta1 = (i as f64 / segments as f64) * TAU;
        let theta2 = ((i + 1) as f64 / segments as f64) * TAU;

        let inner1 = on_circle(center, inner_radius, theta1);
        let outer1 = on_circle(center, outer_radius, theta1);
        let inner2 = on_circle(center, inner_radius, theta2);
        let outer2 = on_circle(center, outer_radius, theta2);

        // Two triangles per segment
        vertices.push(vertex(inner1, color));
        vertices.push(vertex(outer1, color));
        vertices.push(vertex(inner2, color));

        vertices.push(vertex(inner2, color));
        vertices.push(vertex(outer1, color));
        vertices.push(vertex(outer2, color));
    }

    vertices
}

/// Draw context that accumulates triangles for a GPU upload
///
/// Strokes are centered on the circle's edge, matching a canvas `stroke()`.
#[derive(Debug)]
pub struct ShapeBatch {
    pub vertices: Vec<Vertex>,
    segments: u32,
}

impl ShapeBatch {
    pub fn new() -> Self {
        Self::with_segments(CIRCLE_SEGMENTS)
    }

    pub fn with_segments(segments: u32) -> Self {
        Self {
            vertices: Vec::new(),
            segments: segments.max(3),
        }
    }

    /// Drop last frame's triangles, keeping the allocation
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }
}

impl Default for ShapeBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawContext for ShapeBatch {
    fn stroke_circle(&mut self, center: DVec2, radius: f64, stroke: Stroke) {
        let half = stroke.width / 2.0;
        self.vertices.extend(ring(
            center,
            radius - half,
            radius + half,
            stroke.color.to_f32(),
            self.segments,
        ));
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        if color.a <= 0.0 {
            return;
        }
        self.vertices
            .extend(circle(center, radius, color.to_f32(), self.segments));
    }
}
