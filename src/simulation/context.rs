//! Explicit owner of every per-session subsystem

use ahash::AHashSet;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::collision::CollisionManager;
use crate::combat::{AttackManager, ProjectilePool};
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{EntityId, Frame};
use crate::ecs::World;
use crate::entity::Entity;
use crate::render::Camera;
use crate::services::{AudioSink, NullAudio};

pub struct GameContext {
    pub config: SimulationConfig,
    pub world: World,
    pub attacks: AttackManager,
    pub pool: ProjectilePool,
    pub collisions: CollisionManager,
    pub camera: Camera,
    pub rng: ChaCha8Rng,
    pub audio: Box<dyn AudioSink>,
    pub frame: Frame,
    pub player: Option<EntityId>,
    /// Points earned from defeated monsters
    pub score: i32,
    /// Entities whose death has already been processed
    pub(crate) reaped: AHashSet<EntityId>,
}

impl GameContext {
    pub fn new(config: SimulationConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            collisions: CollisionManager::new(&config),
            camera: Camera::new(&config),
            config,
            world: World::new(),
            attacks: AttackManager::new(),
            pool: ProjectilePool::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            audio: Box::new(NullAudio),
            frame: 0,
            player: None,
            score: 0,
            reaped: AHashSet::new(),
        })
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioSink>) -> Self {
        self.audio = audio;
        self
    }

    /// Spawn the player; the camera follows it
    pub fn spawn_player(&mut self, player: Entity) -> EntityId {
        let id = self.world.spawn(player);
        self.player = Some(id);
        self.camera.set_follow_target(Some(id));
        id
    }

    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.world.spawn(entity)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player.and_then(|id| self.world.get(id))
    }

    /// Tear down the scene: entities, live attacks and pooled projectiles
    pub fn exit_scene(&mut self) {
        tracing::info!(
            "exiting scene at frame {} ({} entities, {} attacks, {} pooled)",
            self.frame,
            self.world.len(),
            self.attacks.len(),
            self.pool.len()
        );
        self.attacks.clear();
        self.pool.flush();
        self.world.clear();
        self.camera = Camera::new(&self.config);
        self.player = None;
        self.reaped.clear();
    }
}
