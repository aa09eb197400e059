//! Stationary note: lights up and plays its sample when hit

use std::fmt;
use std::rc::Rc;

use super::entity::{Behavior, Bounds, Step};
use super::geometry::Viewport;
use crate::audio::{AudioSink, PlaybackRequest};
use crate::consts::{COLOR_STEP_MAX, HIGHLIGHT_DECAY, OUTLINE_WIDTH};
use crate::renderer::{DrawContext, Stroke, colors};

pub struct SoundBall {
    /// Semitones relative to the sample, nominally in [-24, 24]
    pub pitch: f64,
    /// Highlight level in [0, 255]; jumps to 255 on hit then fades
    pub color_step: f64,
    audio: Rc<dyn AudioSink>,
}

impl fmt::Debug for SoundBall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoundBall")
            .field("pitch", &self.pitch)
            .field("color_step", &self.color_step)
            .finish_non_exhaustive()
    }
}

impl SoundBall {
    pub fn new(pitch: f64, audio: Rc<dyn AudioSink>) -> Self {
        Self {
            pitch,
            color_step: 0.0,
            audio,
        }
    }

    /// Fill alpha for the current highlight
    pub fn highlight(&self) -> f64 {
        self.color_step / COLOR_STEP_MAX
    }
}

impl Behavior for SoundBall {
    fn draw(&self, bounds: &Bounds, ctx: &mut dyn DrawContext) {
        let (center, radius) = (bounds.current.center, bounds.current.radius);
        ctx.fill_circle(center, radius, colors::SOUND_BALL.with_alpha(self.highlight()));
        ctx.stroke_circle(
            center,
            radius,
            Stroke {
                color: colors::SOUND_BALL,
                width: OUTLINE_WIDTH,
            },
        );
    }

    fn update(&mut self, bounds: &mut Bounds, _viewport: Viewport, dt: f64) -> Step {
        // Larger balls fade slower
        if self.color_step > 0.0 {
            self.color_step =
                (self.color_step - dt / bounds.current.radius * HIGHLIGHT_DECAY).max(0.0);
        }
        Step::Stay
    }

    fn on_hit(&mut self, bounds: &Bounds, _other: Option<&Bounds>, viewport: Viewport) {
        self.color_step = COLOR_STEP_MAX;
        self.audio.play(PlaybackRequest::for_position(
            self.pitch,
            bounds.current.center,
            viewport,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSink;
    use crate::renderer::ShapeBatch;
    use crate::sim::geometry::BoundingCircle;
    use glam::DVec2;

    fn setup(pitch: f64) -> (SoundBall, Bounds, Rc<RecordingSink>) {
        let sink = Rc::new(RecordingSink::new());
        let ball = SoundBall::new(pitch, sink.clone());
        let radius = crate::sound_ball_radius(pitch);
        let bounds = Bounds::new(BoundingCircle::new(DVec2::new(200.0, 450.0), radius));
        (ball, bounds, sink)
    }

    #[test]
    fn test_hit_sets_full_highlight_and_plays() {
        let (mut ball, bounds, sink) = setup(0.0);
        ball.on_hit(&bounds, None, Viewport::new(800.0, 600.0));
        assert_eq!(ball.color_step, 255.0);

        let reqs = sink.requests();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].playback_rate, 1.0);
        assert_eq!(reqs[0].pan, -0.5);
        assert_eq!(reqs[0].gain, 0.75);
    }

    #[test]
    fn test_highlight_decays_by_radius() {
        let (mut ball, mut bounds, _) = setup(0.0);
        let view = Viewport::new(800.0, 600.0);
        ball.on_hit(&bounds, None, view);
        // radius 110: 55ms removes 55 / 110 * 20 = 10
        assert_eq!(ball.update(&mut bounds, view, 55.0), Step::Stay);
        assert!((ball.color_step - 245.0).abs() < 1e-9);
    }

    #[test]
    fn test_highlight_clamps_to_zero() {
        let (mut ball, mut bounds, _) = setup(0.0);
        let view = Viewport::new(800.0, 600.0);
        ball.on_hit(&bounds, None, view);
        // dt / r * 20 >= 255
        let dt = 255.0 * 110.0 / 20.0;
        ball.update(&mut bounds, view, dt + 100.0);
        assert_eq!(ball.color_step, 0.0);

        ball.update(&mut bounds, view, 1.0);
        assert_eq!(ball.color_step, 0.0);
    }

    #[test]
    fn test_draw_fill_alpha_follows_highlight() {
        let (mut ball, bounds, _) = setup(12.0);
        let mut batch = ShapeBatch::with_segments(8);

        // No highlight: outline only
        ball.draw(&bounds, &mut batch);
        assert_eq!(batch.len(), 48);

        ball.on_hit(&bounds, None, Viewport::new(800.0, 600.0));
        batch.clear();
        ball.draw(&bounds, &mut batch);
        assert_eq!(batch.len(), 24 + 48);
        assert_eq!(batch.vertices[0].color[3], 1.0);
    }
}
