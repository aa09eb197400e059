//! Scene entities
//!
//! An [`Entity`] is a pair of bounding circles (this tick and last tick) plus
//! a behavior variant. Behaviors never see the scene: they receive their
//! entity's bounds explicitly and report what the scene should do next
//! through [`Step`].

use std::rc::Rc;

use glam::DVec2;

use super::ball::Ball;
use super::geometry::{BoundingCircle, Viewport};
use super::sound_ball::SoundBall;
use crate::audio::AudioSink;
use crate::renderer::DrawContext;

/// Stable handle assigned by the scene on registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Id carried by entities not yet registered
    pub const UNREGISTERED: EntityId = EntityId(0);
}

/// Current and previous bounding circles of an entity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Authoritative position and size for this tick
    pub current: BoundingCircle,
    /// Value of `current` at the end of the prior tick
    pub previous: BoundingCircle,
}

impl Bounds {
    pub fn new(circle: BoundingCircle) -> Self {
        Self {
            current: circle,
            previous: circle,
        }
    }

    /// Translate the current center
    #[inline]
    pub fn move_by(&mut self, delta: DVec2) {
        self.current.center += delta;
    }

    /// Snapshot current into previous
    #[inline]
    pub fn save(&mut self) {
        self.previous = self.current;
    }
}

/// What the scene should do with an entity after its update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing further this tick
    Stay,
    /// Check collisions against every other entity
    Collide,
    /// Remove the entity from the scene immediately
    Remove,
}

/// Per-variant capabilities
pub trait Behavior {
    /// Draw the entity
    fn draw(&self, bounds: &Bounds, ctx: &mut dyn DrawContext);

    /// Advance by `dt` milliseconds
    fn update(&mut self, bounds: &mut Bounds, viewport: Viewport, dt: f64) -> Step;

    /// React to a collision; `other` is `None` for a hit not caused by contact
    fn on_hit(&mut self, _bounds: &Bounds, _other: Option<&Bounds>, _viewport: Viewport) {}

    /// Hook run right after the bounds are saved, before `update`
    fn on_save_state(&mut self, _bounds: &Bounds) {}
}

/// Behavior variants
#[derive(Debug)]
pub enum EntityKind {
    Ball(Ball),
    SoundBall(SoundBall),
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Ball(_) => "ball",
            EntityKind::SoundBall(_) => "sound_ball",
        }
    }
}

impl Behavior for EntityKind {
    fn draw(&self, bounds: &Bounds, ctx: &mut dyn DrawContext) {
        match self {
            EntityKind::Ball(b) => b.draw(bounds, ctx),
            EntityKind::SoundBall(s) => s.draw(bounds, ctx),
        }
    }

    fn update(&mut self, bounds: &mut Bounds, viewport: Viewport, dt: f64) -> Step {
        match self {
            EntityKind::Ball(b) => b.update(bounds, viewport, dt),
            EntityKind::SoundBall(s) => s.update(bounds, viewport, dt),
        }
    }

    fn on_hit(&mut self, bounds: &Bounds, other: Option<&Bounds>, viewport: Viewport) {
        match self {
            EntityKind::Ball(b) => b.on_hit(bounds, other, viewport),
            EntityKind::SoundBall(s) => s.on_hit(bounds, other, viewport),
        }
    }

    fn on_save_state(&mut self, bounds: &Bounds) {
        match self {
            EntityKind::Ball(b) => b.on_save_state(bounds),
            EntityKind::SoundBall(s) => s.on_save_state(bounds),
        }
    }
}

/// A scene member
#[derive(Debug)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub bounds: Bounds,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(circle: BoundingCircle, kind: EntityKind) -> Self {
        Self {
            id: EntityId::UNREGISTERED,
            bounds: Bounds::new(circle),
            kind,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn current_bounds(&self) -> &BoundingCircle {
        &self.bounds.current
    }

    #[inline]
    pub fn previous_bounds(&self) -> &BoundingCircle {
        &self.bounds.previous
    }

    pub fn move_by(&mut self, delta: DVec2) {
        self.bounds.move_by(delta);
    }

    /// Save the bounds, then run the variant hook. Once per tick, before `update`.
    pub fn save_state(&mut self) {
        self.bounds.save();
        self.kind.on_save_state(&self.bounds);
    }

    pub fn draw(&self, ctx: &mut dyn DrawContext) {
        self.kind.draw(&self.bounds, ctx);
    }

    pub fn update(&mut self, viewport: Viewport, dt: f64) -> Step {
        self.kind.update(&mut self.bounds, viewport, dt)
    }

    pub fn on_hit(&mut self, other: &Entity, viewport: Viewport) {
        self.kind.on_hit(&self.bounds, Some(&other.bounds), viewport);
    }

    /// Fire the hit behavior without a collision partner
    pub fn trigger(&mut self, viewport: Viewport) {
        self.kind.on_hit(&self.bounds, None, viewport);
    }

    pub fn as_ball(&self) -> Option<&Ball> {
        match &self.kind {
            EntityKind::Ball(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_sound_ball(&self) -> Option<&SoundBall> {
        match &self.kind {
            EntityKind::SoundBall(s) => Some(s),
            _ => None,
        }
    }
}

/// Create a free-moving ball
///
/// `velocity` is in pixels per millisecond.
pub fn make_ball(center: DVec2, radius: f64, velocity: DVec2) -> Entity {
    Entity::new(
        BoundingCircle::new(center, radius.max(0.0)),
        EntityKind::Ball(Ball::new(velocity)),
    )
}

/// Create a stationary sound ball; its radius follows from `pitch`
pub fn make_sound_ball(center: DVec2, pitch: f64, audio: Rc<dyn AudioSink>) -> Entity {
    let radius = crate::sound_ball_radius(pitch);
    Entity::new(
        BoundingCircle::new(center, radius),
        EntityKind::SoundBall(SoundBall::new(pitch, audio)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSink;

    #[test]
    fn test_move_by_translates_current_only() {
        let mut e = make_ball(DVec2::new(10.0, 10.0), 5.0, DVec2::ZERO);
        e.move_by(DVec2::new(3.0, -4.0));
        assert_eq!(e.current_bounds().center, DVec2::new(13.0, 6.0));
        assert_eq!(e.previous_bounds().center, DVec2::new(10.0, 10.0));
    }

    #[test]
    fn test_save_state_copies_by_value() {
        let mut e = make_ball(DVec2::new(10.0, 10.0), 5.0, DVec2::ZERO);
        e.move_by(DVec2::new(5.0, 0.0));
        e.save_state();
        assert_eq!(e.previous_bounds(), e.current_bounds());

        // Later moves must not leak into the saved state
        e.move_by(DVec2::new(5.0, 0.0));
        assert_eq!(e.previous_bounds().center, DVec2::new(15.0, 10.0));
        assert_eq!(e.current_bounds().center, DVec2::new(20.0, 10.0));
    }

    #[test]
    fn test_factories() {
        let ball = make_ball(DVec2::new(1.0, 2.0), 12.0, DVec2::new(0.1, 0.2));
        assert_eq!(ball.id(), EntityId::UNREGISTERED);
        assert_eq!(ball.current_bounds().radius, 12.0);
        assert_eq!(ball.as_ball().map(|b| b.velocity), Some(DVec2::new(0.1, 0.2)));
        assert!(ball.as_sound_ball().is_none());

        let sink = Rc::new(RecordingSink::new());
        let sound = make_sound_ball(DVec2::new(50.0, 50.0), 0.0, sink);
        assert_eq!(sound.current_bounds().radius, 110.0);
        assert_eq!(sound.kind.name(), "sound_ball");
        assert_eq!(sound.as_sound_ball().map(|s| s.color_step), Some(0.0));
    }

    #[test]
    fn test_negative_radius_clamped() {
        let ball = make_ball(DVec2::ZERO, -3.0, DVec2::ZERO);
        assert_eq!(ball.current_bounds().radius, 0.0);
    }
}
