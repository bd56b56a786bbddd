//! Live attack bookkeeping: spawn, bulk update, removal sweep

use glam::Vec2;

use crate::combat::attack::{build_attack_entity, AttackBody, AttackInfo};
use crate::combat::pool::ProjectilePool;
use crate::core::error::Result;
use crate::core::types::EntityId;
use crate::entity::Entity;
use crate::simulation::policy::ExecutionPolicy;

/// What a sweep removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Projectiles returned to the pool
    pub released: usize,
    /// Effect attacks dropped
    pub dropped: usize,
    /// Every attack that left the live set, pooled or dropped
    pub removed: Vec<EntityId>,
}

#[derive(Debug, Default)]
pub struct AttackManager {
    attacks: Vec<Entity>,
}

impl AttackManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an attack; projectiles come from the pool
    pub fn spawn(&mut self, info: &AttackInfo, pool: &mut ProjectilePool) -> Result<EntityId> {
        let entity = if info.is_projectile() {
            pool.acquire(info)?
        } else {
            build_attack_entity(info)?
        };
        let id = entity.id();
        self.attacks.push(entity);
        Ok(id)
    }

    /// Advance every attack; each update only touches its own entity
    pub fn update(&mut self, dt: f32, policy: ExecutionPolicy) {
        policy.update_all(&mut self.attacks, |attack| attack.update(dt));
    }

    /// Remove finished attacks
    ///
    /// Runs after the bulk update, never alongside it. Projectiles are
    /// finished once marked or outside the playfield; effects once marked.
    pub fn sweep(&mut self, pool: &mut ProjectilePool, min: Vec2, max: Vec2) -> SweepStats {
        let mut stats = SweepStats::default();
        let mut kept = Vec::with_capacity(self.attacks.len());
        for attack in self.attacks.drain(..) {
            let Some(body) = attack.component::<AttackBody>() else {
                continue;
            };
            let projectile = body.info().is_projectile();
            let pos = attack.world_coord();
            let outside = pos.x < min.x || pos.x > max.x || pos.y < min.y || pos.y > max.y;
            let finished = body.is_marked() || !attack.is_active() || (projectile && outside);
            if !finished {
                kept.push(attack);
                continue;
            }
            stats.removed.push(attack.id());
            if projectile {
                pool.release(attack);
                stats.released += 1;
            } else {
                stats.dropped += 1;
            }
        }
        self.attacks = kept;
        stats
    }

    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.attacks.iter().find(|a| a.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.attacks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.attacks.iter_mut()
    }

    /// Drop every live attack without pooling
    pub fn clear(&mut self) {
        self.attacks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::attack::{AttackKind, EffectKind};
    use crate::core::types::{CharacterType, Transform};

    fn attack(kind: AttackKind, at: Vec2) -> AttackInfo {
        AttackInfo {
            origin: CharacterType::Enemy,
            transform: Transform::from_translation(at),
            direction: Vec2::X,
            size: 2.0,
            damage: 1,
            critical: false,
            can_reflect_bullet: false,
            can_block_bullet: false,
            disappear_on_hit: true,
            kind,
        }
    }

    #[test]
    fn test_sweep_releases_offscreen_projectiles() {
        let mut pool = ProjectilePool::new();
        let mut manager = AttackManager::new();
        let leaving = manager
            .spawn(&attack(AttackKind::Projectile { speed: 100.0 }, Vec2::new(95.0, 0.0)), &mut pool)
            .unwrap();
        manager
            .spawn(&attack(AttackKind::Projectile { speed: 100.0 }, Vec2::ZERO), &mut pool)
            .unwrap();
        manager.update(0.1, ExecutionPolicy::Sequential);
        let stats = manager.sweep(&mut pool, Vec2::splat(-100.0), Vec2::splat(100.0));
        assert_eq!(stats.released, 1);
        assert_eq!(stats.dropped, 0);
        assert_eq!(stats.removed, vec![leaving]);
        assert_eq!(manager.len(), 1);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_sweep_drops_expired_effects() {
        let mut pool = ProjectilePool::new();
        let mut manager = AttackManager::new();
        let effect = AttackKind::Effect {
            effect: EffectKind::Slash,
            lifetime: 0.2,
        };
        let slash = manager.spawn(&attack(effect, Vec2::ZERO), &mut pool).unwrap();
        manager.update(0.3, ExecutionPolicy::Sequential);
        let stats = manager.sweep(&mut pool, Vec2::splat(-100.0), Vec2::splat(100.0));
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.removed, vec![slash]);
        assert!(manager.is_empty());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_parallel_update_matches_sequential() {
        let mut pool = ProjectilePool::new();
        let mut seq = AttackManager::new();
        let mut par = AttackManager::new();
        for i in 0..150 {
            let info = attack(AttackKind::Projectile { speed: i as f32 }, Vec2::ZERO);
            seq.spawn(&info, &mut pool).unwrap();
            par.spawn(&info, &mut pool).unwrap();
        }
        seq.update(0.5, ExecutionPolicy::Sequential);
        par.update(0.5, ExecutionPolicy::Parallel);
        for (a, b) in seq.iter().zip(par.iter()) {
            assert_eq!(a.world_coord(), b.world_coord());
        }
    }
}
