//! Frame driver and input handling
//!
//! Ties the scene to its collaborators: the controls that parameterise new
//! entities, the audio sink handed to sound balls, and the frame clock.
//! Platform code forwards timestamps and input here and supplies a draw
//! context.

use std::rc::Rc;

use glam::DVec2;

use crate::audio::AudioSink;
use crate::controls::{Param, ParamSource};
use crate::renderer::DrawContext;
use crate::sim::{EntityId, FrameClock, Scene, Viewport, make_ball, make_sound_ball};

/// User commands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Launch a moving ball at a position
    SpawnBall(DVec2),
    /// Place a note ball at a position
    SpawnSoundBall(DVec2),
    /// Remove everything
    Clear,
    /// Remove whatever lies under a point
    RemoveAt(DVec2),
}

impl Action {
    /// Keyboard binding; spawn actions use the pointer position
    pub fn from_key(key: &str, pointer: DVec2) -> Option<Self> {
        match key {
            "f" => Some(Action::SpawnBall(pointer)),
            "g" => Some(Action::SpawnSoundBall(pointer)),
            "r" => Some(Action::Clear),
            _ => None,
        }
    }
}

pub struct App<P: ParamSource> {
    pub scene: Scene,
    pub controls: P,
    audio: Rc<dyn AudioSink>,
    clock: FrameClock,
    pointer: DVec2,
}

impl<P: ParamSource> App<P> {
    pub fn new(viewport: Viewport, controls: P, audio: Rc<dyn AudioSink>) -> Self {
        Self {
            scene: Scene::new(viewport),
            controls,
            audio,
            clock: FrameClock::new(),
            // Until the pointer moves, spawn in the middle
            pointer: viewport.center(),
        }
    }

    pub fn pointer(&self) -> DVec2 {
        self.pointer
    }

    pub fn pointer_moved(&mut self, pos: DVec2) {
        self.pointer = pos;
    }

    /// Track a canvas resize
    pub fn resize(&mut self, viewport: Viewport) {
        log::debug!("Viewport resized to {}x{}", viewport.width, viewport.height);
        self.scene.set_viewport(viewport);
    }

    /// Run one animation frame: update every entity, then draw
    ///
    /// Returns the elapsed milliseconds used for the update.
    pub fn frame(&mut self, timestamp: f64, viewport: Viewport, ctx: &mut dyn DrawContext) -> f64 {
        let dt = self.clock.tick(timestamp);
        self.scene.update(viewport, dt);
        self.scene.draw(ctx);
        dt
    }

    /// Restart frame timing, so a long pause does not become one huge step
    pub fn pause_clock(&mut self) {
        self.clock.reset();
    }

    /// Handle a key press; false if the key is unbound
    pub fn key(&mut self, key: &str) -> bool {
        match Action::from_key(key, self.pointer) {
            Some(action) => {
                self.apply(action);
                true
            }
            None => false,
        }
    }

    /// Perform an action; returns the id of any entity created
    pub fn apply(&mut self, action: Action) -> Option<EntityId> {
        match action {
            Action::SpawnBall(pos) => Some(self.spawn_ball(pos)),
            Action::SpawnSoundBall(pos) => Some(self.spawn_sound_ball(pos)),
            Action::Clear => {
                log::info!("Clearing {} entities", self.scene.len());
                self.scene.clear();
                None
            }
            Action::RemoveAt(pos) => {
                let removed = self.scene.remove_at(pos);
                if removed > 0 {
                    log::debug!("Removed {} entities at {}", removed, pos);
                }
                None
            }
        }
    }

    fn spawn_ball(&mut self, pos: DVec2) -> EntityId {
        let radius = self.controls.get(Param::Radius);
        let velocity = DVec2::new(
            self.controls.get(Param::VelocityX),
            self.controls.get(Param::VelocityY),
        );
        log::debug!("Creating ball r={:.1} at {} v={}", radius, pos, velocity);
        self.scene.register(make_ball(pos, radius, velocity))
    }

    fn spawn_sound_ball(&mut self, pos: DVec2) -> EntityId {
        let pitch = self.controls.get(Param::Pitch);
        log::debug!("Creating sound ball pitch={} at {}", pitch, pos);
        let id = self
            .scene
            .register(make_sound_ball(pos, pitch, self.audio.clone()));
        if self.controls.play_on_create() {
            self.scene.trigger(id);
        }
        id
    }
}
