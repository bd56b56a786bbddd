//! Camera for the 2D playfield
//!
//! Handles follow, zoom, and the world-to-render transform of every entity
//! in the pivot set.

use ahash::AHashSet;
use glam::Vec2;

use crate::core::config::SimulationConfig;
use crate::core::types::{EntityId, Transform};
use crate::entity::Entity;
use crate::services::InputSource;

pub struct Camera {
    /// Camera position in world coordinates; `scale` is the zoom
    world: Transform,
    follow: Option<EntityId>,
    pivots: Vec<EntityId>,
    members: AHashSet<EntityId>,
    /// Height of the map used for z-ordering; 0 disables it
    pub map_height: f32,
    zoom_min: f32,
    zoom_max: f32,
}

impl Camera {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            world: Transform::default(),
            follow: None,
            pivots: Vec::new(),
            members: AHashSet::new(),
            map_height: 0.0,
            zoom_min: config.zoom_min,
            zoom_max: config.zoom_max,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.world.translation
    }

    pub fn zoom(&self) -> Vec2 {
        self.world.scale
    }

    pub fn set_follow_target(&mut self, target: Option<EntityId>) {
        self.follow = target;
    }

    pub fn follow_target(&self) -> Option<EntityId> {
        self.follow
    }

    /// Attach an entity to the camera
    ///
    /// The entity's scale magnitude is recorded when it joins without a
    /// record; zoom is applied relative to that record from then on. Pooled
    /// projectiles lose their record on reuse and are sampled again.
    pub fn add_pivot_child(&mut self, entity: &mut Entity) {
        if !self.members.insert(entity.id()) {
            return;
        }
        self.pivots.push(entity.id());
        if entity.core.initial_scale.is_none() {
            entity.core.initial_scale = Some(entity.core.transform.scale.abs());
        }
    }

    pub fn remove_pivot_child(&mut self, id: EntityId) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        self.pivots.retain(|&p| p != id);
        true
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }

    pub fn pivot_count(&self) -> usize {
        self.pivots.len()
    }

    pub fn move_camera(&mut self, delta: Vec2) {
        self.world.translation += delta;
    }

    /// Change zoom at `level` units per second, clamped to the zoom range
    pub fn zoom_camera(&mut self, level: f32, dt: f32) {
        let next = self.world.scale + Vec2::ONE * level * dt;
        self.world.scale = next.clamp(Vec2::splat(self.zoom_min), Vec2::splat(self.zoom_max));
    }

    /// Set the zoom directly, clamped to the zoom range
    pub fn set_zoom_scale(&mut self, zoom: Vec2) {
        self.world.scale = zoom.clamp(Vec2::splat(self.zoom_min), Vec2::splat(self.zoom_max));
    }

    /// `I` zooms in, `K` zooms out
    pub fn on_input_received(&mut self, input: &dyn InputSource, dt: f32) {
        if input.is_pressed('I') {
            self.zoom_camera(1.0, dt);
        }
        if input.is_pressed('K') {
            self.zoom_camera(-1.0, dt);
        }
    }

    pub fn world_to_render(&self, world: Vec2) -> Vec2 {
        (world - self.world.translation) * self.world.scale
    }

    pub fn render_to_world(&self, render: Vec2) -> Vec2 {
        render / self.world.scale + self.world.translation
    }

    /// Rewrite the render transform of every pivot child among `bodies`
    ///
    /// Members that are not in `bodies` are skipped. Callers remove finished
    /// attacks with `remove_pivot_child` so the member set stays bounded.
    pub fn update(&mut self, bodies: &mut [&mut Entity]) {
        if let Some(target) = self.follow {
            if let Some(entity) = bodies.iter().find(|e| e.id() == target) {
                self.world.translation = entity.world_coord();
            }
        }

        let zoom = self.world.scale;
        for entity in bodies.iter_mut() {
            if !self.members.contains(&entity.id()) {
                continue;
            }
            let core = &mut entity.core;
            core.transform.translation = (core.world_coord - self.world.translation) * zoom;
            if self.map_height != 0.0 {
                core.z_index = (core.world_coord.y - core.image_size.y / 2.0 + self.map_height / 2.0)
                    / self.map_height;
            }
            let initial = core.initial_scale.unwrap_or(Vec2::ONE);
            core.transform.scale = Vec2::new(
                initial.x * zoom.x.copysign(core.transform.scale.x),
                initial.y * zoom.y.copysign(core.transform.scale.y),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_clamp() {
        let mut camera = Camera::new(&SimulationConfig::default());
        camera.zoom_camera(100.0, 1.0);
        assert_eq!(camera.zoom(), Vec2::splat(2.0));
        camera.zoom_camera(-100.0, 1.0);
        assert_eq!(camera.zoom(), Vec2::splat(0.5));
    }

    #[test]
    fn test_render_world_round_trip() {
        let mut camera = Camera::new(&SimulationConfig::default());
        camera.move_camera(Vec2::new(10.0, -4.0));
        camera.set_zoom_scale(Vec2::splat(2.0));
        let render = camera.world_to_render(Vec2::new(15.0, 0.0));
        assert_eq!(render, Vec2::new(10.0, 8.0));
        assert_eq!(camera.render_to_world(render), Vec2::new(15.0, 0.0));
    }

    #[test]
    fn test_initial_scale_snapshot_once() {
        let mut camera = Camera::new(&SimulationConfig::default());
        let mut e = Entity::new("e");
        e.core.transform.scale = Vec2::new(-2.0, 1.0);
        camera.add_pivot_child(&mut e);
        e.core.transform.scale = Vec2::new(5.0, 5.0);
        camera.remove_pivot_child(e.id());
        camera.add_pivot_child(&mut e);
        assert_eq!(e.core.initial_scale, Some(Vec2::new(2.0, 1.0)));
        assert_eq!(camera.pivot_count(), 1);
    }

    #[test]
    fn test_z_index_from_map_height() {
        let mut camera = Camera::new(&SimulationConfig::default());
        camera.map_height = 100.0;
        let mut e = Entity::at("e", Vec2::new(0.0, 25.0));
        e.core.image_size = Vec2::new(10.0, 10.0);
        camera.add_pivot_child(&mut e);
        camera.update(&mut [&mut e]);
        assert!((e.core.z_index - 0.7).abs() < 1e-6);
    }
}
