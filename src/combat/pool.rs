//! Reuse-on-release storage for projectile entities

use crate::combat::attack::{build_attack_entity, reset_attack_entity, AttackInfo};
use crate::core::error::Result;
use crate::entity::Entity;

/// LIFO pool of released projectiles
///
/// Everything in the pool is inactive and hidden. Released entities are
/// moved in by value, so one projectile can never sit in the pool twice.
#[derive(Debug, Default)]
pub struct ProjectilePool {
    free: Vec<Entity>,
    created: usize,
}

impl ProjectilePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the most recently released projectile, or build a new one
    pub fn acquire(&mut self, info: &AttackInfo) -> Result<Entity> {
        match self.free.pop() {
            Some(mut projectile) => {
                reset_attack_entity(&mut projectile, info);
                projectile.set_active(true);
                projectile.core.visible = true;
                Ok(projectile)
            }
            None => {
                self.created += 1;
                tracing::debug!("created new projectile ({} total)", self.created);
                build_attack_entity(info)
            }
        }
    }

    /// Park a projectile for reuse; its fields are reset on the next acquire
    pub fn release(&mut self, mut projectile: Entity) {
        projectile.set_active(false);
        projectile.core.visible = false;
        self.free.push(projectile);
    }

    /// Drop every parked projectile
    pub fn flush(&mut self) {
        let dropped = self.free.len();
        self.free.clear();
        tracing::debug!("flushed {} pooled projectiles", dropped);
    }

    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Projectiles built from scratch so far
    pub fn created(&self) -> usize {
        self.created
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.free.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::attack::{AttackBody, AttackKind};
    use crate::core::types::{CharacterType, Transform};
    use glam::Vec2;

    fn info(damage: i32, direction: Vec2) -> AttackInfo {
        AttackInfo {
            origin: CharacterType::Player,
            transform: Transform::from_translation(Vec2::new(1.0, 2.0)),
            direction,
            size: 3.0,
            damage,
            critical: false,
            can_reflect_bullet: false,
            can_block_bullet: false,
            disappear_on_hit: true,
            kind: AttackKind::Projectile { speed: 50.0 },
        }
    }

    #[test]
    fn test_empty_pool_builds_new() {
        let mut pool = ProjectilePool::new();
        let a = pool.acquire(&info(1, Vec2::X)).unwrap();
        let b = pool.acquire(&info(1, Vec2::X)).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(pool.created(), 2);
    }

    #[test]
    fn test_released_projectile_is_parked_hidden() {
        let mut pool = ProjectilePool::new();
        let p = pool.acquire(&info(1, Vec2::X)).unwrap();
        pool.release(p);
        let parked = pool.iter().next().unwrap();
        assert!(!parked.is_active());
        assert!(!parked.core.visible);
    }

    #[test]
    fn test_acquire_is_lifo() {
        let mut pool = ProjectilePool::new();
        let first = pool.acquire(&info(1, Vec2::X)).unwrap();
        let second = pool.acquire(&info(1, Vec2::X)).unwrap();
        let (first_id, second_id) = (first.id(), second.id());
        pool.release(first);
        pool.release(second);
        assert_eq!(pool.acquire(&info(1, Vec2::X)).unwrap().id(), second_id);
        assert_eq!(pool.acquire(&info(1, Vec2::X)).unwrap().id(), first_id);
    }

    #[test]
    fn test_flush_empties_pool() {
        let mut pool = ProjectilePool::new();
        let p = pool.acquire(&info(1, Vec2::X)).unwrap();
        pool.release(p);
        pool.flush();
        assert!(pool.is_empty());
        let _ = pool.acquire(&info(1, Vec2::X)).unwrap();
        assert_eq!(pool.created(), 2);
    }

    #[test]
    fn test_reuse_overwrites_old_fields() {
        let mut pool = ProjectilePool::new();
        let mut p = pool.acquire(&info(9, Vec2::X)).unwrap();
        p.update(1.0);
        let id = p.id();
        pool.release(p);

        let reused = pool.acquire(&info(2, -Vec2::Y)).unwrap();
        assert_eq!(reused.id(), id);
        assert!(reused.is_active());
        assert_eq!(reused.world_coord(), Vec2::new(1.0, 2.0));
        let body = reused.component::<AttackBody>().unwrap();
        assert_eq!(body.info().damage, 2);
        assert_eq!(body.info().direction, -Vec2::Y);
        assert!(!body.is_marked());
    }
}
