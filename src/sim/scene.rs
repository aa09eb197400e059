//! Scene: the ordered set of live entities
//!
//! Registration order is iteration order and draw order (later entities draw
//! on top). Collisions are edge-triggered: a pair fires its hit callbacks on
//! the tick their bounds start overlapping, not on every tick they stay
//! overlapped. Fast entities that pass through each other within one tick
//! never collide.

use glam::DVec2;
use serde::Serialize;

use super::entity::{Entity, EntityId, EntityKind, Step};
use super::geometry::{BoundingCircle, Viewport, circles_overlap};
use crate::renderer::DrawContext;

/// Serializable summary of one entity
#[derive(Debug, Clone, Serialize)]
pub struct EntitySnapshot {
    pub id: u32,
    pub kind: &'static str,
    pub bounds: BoundingCircle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity: Option<DVec2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_step: Option<f64>,
}

#[derive(Debug)]
pub struct Scene {
    entities: Vec<Entity>,
    /// Viewport of the latest update, used for hit callbacks
    viewport: Viewport,
    next_id: u32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl Scene {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            entities: Vec::new(),
            viewport,
            next_id: 1,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Record a resized viewport before the next update
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    /// Append an entity and hand back its handle
    pub fn register(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        // 0 is reserved for unregistered entities
        self.next_id = self.next_id.checked_add(1).unwrap_or(1);
        entity.id = id;
        log::debug!(
            "Registered {} {:?} at {}",
            entity.kind.name(),
            id,
            entity.current_bounds().center
        );
        self.entities.push(entity);
        id
    }

    /// Remove an entity, returning it; `None` if it is not in the scene
    pub fn deregister(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        Some(self.entities.remove(index))
    }

    /// Remove every entity
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Entities whose current bounds contain `point`, in registration order
    pub fn find(&self, point: DVec2) -> Vec<EntityId> {
        let probe = BoundingCircle::point(point);
        self.entities
            .iter()
            .filter(|e| circles_overlap(&probe, e.current_bounds()))
            .map(|e| e.id)
            .collect()
    }

    /// Remove every entity found at `point`; returns how many went away
    pub fn remove_at(&mut self, point: DVec2) -> usize {
        let found = self.find(point);
        found
            .into_iter()
            .filter_map(|id| self.deregister(id))
            .count()
    }

    /// Edge-triggered collision test between two registered entities
    ///
    /// True iff the previous bounds did not overlap and the current bounds
    /// do. On a hit, `a` is notified before `b`. Unknown ids and `a == b`
    /// never collide.
    pub fn check_collision(&mut self, a: EntityId, b: EntityId) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(i), Some(j)) if i != j => self.collide_pair(i, j),
            _ => false,
        }
    }

    /// Check `id` against every other entity; returns the number of hits
    pub fn check_all_collisions(&mut self, id: EntityId) -> usize {
        match self.index_of(id) {
            Some(i) => self.collide_all(i),
            None => 0,
        }
    }

    /// Fire an entity's hit behavior without a partner
    ///
    /// Used to sound a note ball as soon as it is placed.
    pub fn trigger(&mut self, id: EntityId) -> bool {
        let viewport = self.viewport;
        match self.get_mut(id) {
            Some(entity) => {
                entity.trigger(viewport);
                true
            }
            None => false,
        }
    }

    /// Advance every entity by `dt` milliseconds
    ///
    /// Each entity saves its state, then updates. An entity that asks to be
    /// removed is dropped on the spot and the cursor stays put, so the
    /// entity that slides into its slot is still visited this tick.
    pub fn update(&mut self, viewport: Viewport, dt: f64) {
        self.viewport = viewport;

        let mut i = 0;
        while i < self.entities.len() {
            let entity = &mut self.entities[i];
            entity.save_state();
            match entity.update(viewport, dt) {
                Step::Remove => {
                    let removed = self.entities.remove(i);
                    log::debug!("Culled {} {:?}", removed.kind.name(), removed.id);
                    continue;
                }
                Step::Collide => {
                    self.collide_all(i);
                }
                Step::Stay => {}
            }
            i += 1;
        }
    }

    /// Draw every entity in registration order
    pub fn draw(&self, ctx: &mut dyn DrawContext) {
        for entity in &self.entities {
            entity.draw(ctx);
        }
    }

    /// Serializable view of the scene
    pub fn snapshot(&self) -> Vec<EntitySnapshot> {
        self.entities
            .iter()
            .map(|e| {
                let (velocity, pitch, color_step) = match &e.kind {
                    EntityKind::Ball(b) => (Some(b.velocity), None, None),
                    EntityKind::SoundBall(s) => (None, Some(s.pitch), Some(s.color_step)),
                };
                EntitySnapshot {
                    id: e.id.0,
                    kind: e.kind.name(),
                    bounds: *e.current_bounds(),
                    velocity,
                    pitch,
                    color_step,
                }
            })
            .collect()
    }

    fn collide_all(&mut self, i: usize) -> usize {
        let mut hits = 0;
        for j in 0..self.entities.len() {
            if j != i && self.collide_pair(i, j) {
                hits += 1;
            }
        }
        hits
    }

    fn collide_pair(&mut self, i: usize, j: usize) -> bool {
        let viewport = self.viewport;
        let (a, b) = pair_mut(&mut self.entities, i, j);

        let was_touching = circles_overlap(a.previous_bounds(), b.previous_bounds());
        let touching = circles_overlap(a.current_bounds(), b.current_bounds());
        if was_touching || !touching {
            return false;
        }

        a.on_hit(b, viewport);
        b.on_hit(a, viewport);
        true
    }
}

/// Two distinct mutable elements, in argument order
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = items.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}
