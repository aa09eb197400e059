//! Scene simulation module
//!
//! Everything that moves lives here. This module has no platform
//! dependencies:
//! - Time only enters through the `dt` handed to `Scene::update`
//! - Drawing and audio go through the `DrawContext` and `AudioSink` traits
//! - Iteration order is registration order

pub mod ball;
pub mod clock;
pub mod entity;
pub mod geometry;
pub mod scene;
pub mod sound_ball;

pub use ball::Ball;
pub use clock::FrameClock;
pub use entity::{Behavior, Bounds, Entity, EntityId, EntityKind, Step, make_ball, make_sound_ball};
pub use geometry::{BoundingCircle, Viewport, circles_overlap, norm};
pub use scene::{EntitySnapshot, Scene};
pub use sound_ball::SoundBall;
