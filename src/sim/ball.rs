//! Free-moving ball: bounces off the viewport edges, silent on contact

use glam::DVec2;

use super::entity::{Behavior, Bounds, Step};
use super::geometry::Viewport;
use crate::consts::{CULL_MARGIN_RADII, OUTLINE_WIDTH};
use crate::renderer::{DrawContext, Stroke, colors};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    /// Pixels per millisecond
    pub velocity: DVec2,
}

impl Ball {
    pub fn new(velocity: DVec2) -> Self {
        Self { velocity }
    }

    /// Negate velocity on each axis whose viewport edge was crossed this tick
    ///
    /// Edge-triggered: only the tick where the bounds first poke out flips
    /// the sign, so a ball resting against a wall does not jitter.
    fn bounce(&mut self, bounds: &Bounds, viewport: Viewport) {
        let (c, cp) = (bounds.current.center, bounds.previous.center);
        let (rad, radp) = (bounds.current.radius, bounds.previous.radius);

        for axis in 0..2 {
            let dim = viewport.dim(axis);
            let near = c[axis] - rad < 0.0 && cp[axis] - radp >= 0.0;
            let far = c[axis] + rad > dim && cp[axis] + radp <= dim;
            if near || far {
                self.velocity[axis] = -self.velocity[axis];
            }
        }
    }
}

/// True if the bounds drifted more than two radii past the viewport
pub fn out_of_viewport(bounds: &Bounds, viewport: Viewport) -> bool {
    let offset = (bounds.current.center - viewport.center()).abs();
    let margin = CULL_MARGIN_RADII * bounds.current.radius;
    offset.x > viewport.width / 2.0 + margin || offset.y > viewport.height / 2.0 + margin
}

impl Behavior for Ball {
    fn draw(&self, bounds: &Bounds, ctx: &mut dyn DrawContext) {
        ctx.stroke_circle(
            bounds.current.center,
            bounds.current.radius,
            Stroke {
                color: colors::BALL,
                width: OUTLINE_WIDTH,
            },
        );
    }

    fn update(&mut self, bounds: &mut Bounds, viewport: Viewport, dt: f64) -> Step {
        bounds.move_by(self.velocity * dt);

        if out_of_viewport(bounds, viewport) {
            log::debug!("Discarding ball outside the viewport at {}", bounds.current.center);
            return Step::Remove;
        }

        self.bounce(bounds, viewport);
        Step::Collide
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::BoundingCircle;

    const VIEW: Viewport = Viewport::new(800.0, 600.0);

    fn bounds_at(x: f64, y: f64, r: f64) -> Bounds {
        Bounds::new(BoundingCircle::new(DVec2::new(x, y), r))
    }

    fn step(ball: &mut Ball, bounds: &mut Bounds, dt: f64) -> Step {
        bounds.save();
        ball.update(bounds, VIEW, dt)
    }

    #[test]
    fn test_moves_by_velocity_times_dt() {
        let mut ball = Ball::new(DVec2::new(0.1, -0.2));
        let mut bounds = bounds_at(400.0, 300.0, 10.0);
        assert_eq!(step(&mut ball, &mut bounds, 16.0), Step::Collide);
        assert!((bounds.current.center - DVec2::new(401.6, 296.8)).length() < 1e-9);
        assert_eq!(bounds.previous.center, DVec2::new(400.0, 300.0));
    }

    #[test]
    fn test_bounce_left_wall() {
        let mut ball = Ball::new(DVec2::new(-1.0, 0.5));
        let mut bounds = bounds_at(12.0, 300.0, 10.0);
        step(&mut ball, &mut bounds, 5.0);
        assert_eq!(ball.velocity, DVec2::new(1.0, 0.5));
    }

    #[test]
    fn test_bounce_far_walls() {
        let mut ball = Ball::new(DVec2::new(1.0, 1.0));
        let mut bounds = bounds_at(788.0, 588.0, 10.0);
        step(&mut ball, &mut bounds, 5.0);
        assert_eq!(ball.velocity, DVec2::new(-1.0, -1.0));
    }

    #[test]
    fn test_no_repeat_flip_while_outside() {
        // Already poking out last tick: no second flip
        let mut ball = Ball::new(DVec2::new(-0.1, 0.0));
        let mut bounds = bounds_at(5.0, 300.0, 10.0);
        step(&mut ball, &mut bounds, 10.0);
        assert_eq!(ball.velocity, DVec2::new(-0.1, 0.0));
    }

    #[test]
    fn test_culled_past_margin() {
        let mut ball = Ball::new(DVec2::new(1.0, 0.0));
        // Center must pass 800 + 2 * 10 = 820
        let mut bounds = bounds_at(815.0, 300.0, 10.0);
        assert_eq!(step(&mut ball, &mut bounds, 4.0), Step::Collide);
        assert_eq!(step(&mut ball, &mut bounds, 4.0), Step::Remove);
    }

    #[test]
    fn test_culled_vertically() {
        let mut ball = Ball::new(DVec2::new(0.0, -1.0));
        let mut bounds = bounds_at(400.0, -15.0, 10.0);
        assert_eq!(step(&mut ball, &mut bounds, 10.0), Step::Remove);
    }

    #[test]
    fn test_out_of_viewport_margin() {
        assert!(!out_of_viewport(&bounds_at(-20.0, 300.0, 10.0), VIEW));
        assert!(out_of_viewport(&bounds_at(-20.5, 300.0, 10.0), VIEW));
        assert!(!out_of_viewport(&bounds_at(400.0, 640.0, 20.0), VIEW));
        assert!(out_of_viewport(&bounds_at(400.0, 641.0, 20.0), VIEW));
    }
}
