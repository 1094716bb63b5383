//! Frame Update Loop
//!
//! `World` owns the entities, the bucket index and the camera, and runs
//! one frame at a time:
//!
//! 1. clear the bucket index
//! 2. advance the camera toward the followed entity
//! 3. insert every entity at its frame-start position
//! 4. ask each behavior for a displacement, validate it, commit it
//!
//! Behaviors only ever see the frame-start snapshot taken in step 3, so
//! no entity can observe another entity's move from the same frame.

use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, WorldConfig};
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::DeterministicRng;
use crate::core::vec2::{Rect, Vec2};
use crate::game::bucket::{BucketIndex, EntityId};
use crate::game::camera::Camera;
use crate::game::entity::{Behavior, Enemy, EntityKind, Player, RenderTarget};
use crate::game::input::InputFrame;
use crate::game::map::{TileGeometry, TileMap, Walkability};
use crate::game::movement::can_move;

/// World errors.
#[derive(Debug, Error)]
pub enum WorldError {
    /// Configuration rejected.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Entity render size is zero, negative or not finite.
    #[error("entity size {0} must be positive on both axes")]
    DegenerateSize(Vec2),

    /// No entity with this id.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
}

/// One entity: its behavior and where it stands.
#[derive(Debug)]
pub struct EntityRecord {
    /// Per-entity logic
    pub behavior: Box<dyn Behavior>,
    /// Top-left corner in world space
    pub position: Vec2,
}

impl EntityRecord {
    /// Sprite size reported by the behavior.
    pub fn render_size(&self) -> Vec2 {
        self.behavior.render_size()
    }

    /// Rectangle used for bucketing.
    ///
    /// Width comes from the render size's y and height from its x; the
    /// sprite axis convention is kept as the renderer defines it.
    pub fn bounding_rect(&self) -> Rect {
        let size = self.render_size();
        Rect::new(self.position.x, self.position.y, size.y, size.x)
    }
}

/// Read-only view of the world handed to behaviors.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext<'a> {
    index: &'a BucketIndex,
    positions: &'a [Vec2],
    input: InputFrame,
}

impl<'a> FrameContext<'a> {
    /// Build a context from a populated index and frame-start positions.
    pub fn new(index: &'a BucketIndex, positions: &'a [Vec2], input: InputFrame) -> Self {
        Self {
            index,
            positions,
            input,
        }
    }

    /// Ids of entities sharing a bucket with `rect` (broad phase).
    pub fn neighbours(&self, rect: &Rect) -> Vec<EntityId> {
        self.index.query(rect)
    }

    /// Frame-start position of an entity.
    pub fn position_of(&self, id: EntityId) -> Option<Vec2> {
        self.positions.get(id).copied()
    }

    /// This frame's player input.
    pub fn input(&self) -> InputFrame {
        self.input
    }
}

/// Counters for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Entities whose non-zero move was committed
    pub moved: usize,
    /// Entities whose move was refused
    pub rejected: usize,
    /// Non-empty buckets after the rebuild
    pub buckets: usize,
}

/// The simulated world.
#[derive(Debug)]
pub struct World<M = TileMap> {
    config: WorldConfig,
    map: M,
    index: BucketIndex,
    camera: Camera,
    entities: Vec<EntityRecord>,
    followed: Option<EntityId>,
    frame: u64,
    snapshot: Vec<Vec2>,
}

impl<M: Walkability + TileGeometry> World<M> {
    /// Create an empty world over `map`.
    pub fn new(config: WorldConfig, map: M) -> Result<Self, WorldError> {
        config.validate()?;

        let world_size = map.world_size();
        let camera = Camera::new(config.camera, config.viewport, world_size, Vec2::ZERO);
        if camera.map_smaller_than_view() {
            warn!(
                "Map {} is smaller than the visible area {}; camera will stay centred",
                world_size,
                config.viewport.visible_size()
            );
        }

        info!(
            "World created: map {} world units, bucket size {}",
            world_size, config.bucket_size
        );

        Ok(Self {
            index: BucketIndex::new(config.bucket_size),
            config,
            map,
            camera,
            entities: Vec::new(),
            followed: None,
            frame: 0,
            snapshot: Vec::new(),
        })
    }

    /// Add an entity and return its id.
    ///
    /// The spawn position is not validated; an entity placed on blocked
    /// terrain cannot move until something moves it out. The first player
    /// spawned becomes the camera target.
    pub fn spawn(&mut self, behavior: Box<dyn Behavior>, position: Vec2) -> Result<EntityId, WorldError> {
        let size = behavior.render_size();
        if !(size.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return Err(WorldError::DegenerateSize(size));
        }

        let id = self.entities.len();
        if self.followed.is_none() && behavior.kind() == EntityKind::Player {
            self.followed = Some(id);
        }
        self.entities.push(EntityRecord { behavior, position });
        Ok(id)
    }

    /// Make the camera follow another entity.
    pub fn follow(&mut self, id: EntityId) -> Result<(), WorldError> {
        if id >= self.entities.len() {
            return Err(WorldError::UnknownEntity(id));
        }
        self.followed = Some(id);
        Ok(())
    }

    /// Spawn the configured player and enemy grid.
    pub fn populate(&mut self) -> Result<(), WorldError> {
        let population = self.config.population.clone();

        self.spawn(
            Box::new(Player::new(population.player_size, population.player_speed)),
            population.player_start,
        )?;

        for row in 0..population.enemy_rows {
            for column in 0..population.enemies_per_row {
                let stream = self.entities.len() as u64;
                let enemy = Enemy::new(
                    population.enemy_size,
                    population.enemy_speed,
                    DeterministicRng::for_stream(self.config.seed, stream),
                );
                let offset = Vec2::new(
                    column as f32 * population.enemy_spacing.x,
                    row as f32 * population.enemy_spacing.y,
                );
                self.spawn(Box::new(enemy), population.enemy_origin + offset)?;
            }
        }

        info!("Populated world with {} entities", self.entities.len());
        Ok(())
    }

    /// Run one frame.
    pub fn update(&mut self, input: InputFrame, elapsed: Duration) -> FrameStats {
        let mut stats = FrameStats::default();

        // 1. Fresh index
        self.index.clear();

        // 2. Camera
        let target = self
            .followed
            .and_then(|id| self.entities.get(id))
            .map_or(self.camera.position, |record| record.position);
        self.camera.advance(target, elapsed);

        // 3. Frame-start snapshot
        self.snapshot.clear();
        for (id, record) in self.entities.iter().enumerate() {
            self.snapshot.push(record.position);
            self.index.insert(id, &record.bounding_rect());
        }
        stats.buckets = self.index.len();

        // 4. Behaviors
        let ctx = FrameContext::new(&self.index, &self.snapshot, input);
        for (id, record) in self.entities.iter_mut().enumerate() {
            let displacement = record.behavior.update(elapsed, &ctx, id, record.position);
            let candidate = record.position + displacement;
            let size = record.behavior.render_size();

            if candidate.is_finite() && can_move(&self.map, record.position, candidate, size) {
                if displacement != Vec2::ZERO {
                    stats.moved += 1;
                }
                record.position = candidate;
            } else {
                stats.rejected += 1;
                #[cfg(feature = "debug-tracing")]
                tracing::trace!(entity = id, from = %record.position, to = %candidate, "move rejected");
            }
        }

        self.frame += 1;
        debug!(
            frame = self.frame,
            moved = stats.moved,
            rejected = stats.rejected,
            buckets = stats.buckets,
            "frame complete"
        );
        stats
    }

    /// Draw every entity relative to the camera.
    pub fn render(&self, target: &mut dyn RenderTarget) {
        let offset = self.camera.screen_offset();
        for record in &self.entities {
            record.behavior.render(record.position + offset, target);
        }
    }

    /// Digest of everything that evolves frame to frame.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.frame, self.config.seed, |hasher| {
            hasher.update_vec2(self.camera.position);
            hasher.update_vec2(self.camera.velocity);
            hasher.update_u64(self.entities.len() as u64);
            for record in &self.entities {
                hasher.update_u32(record.behavior.kind() as u32);
                hasher.update_vec2(record.position);
            }
        })
    }

    /// Entities in id order.
    pub fn entities(&self) -> &[EntityRecord] {
        &self.entities
    }

    /// Position of one entity.
    pub fn position_of(&self, id: EntityId) -> Option<Vec2> {
        self.entities.get(id).map(|record| record.position)
    }

    /// Id the camera follows.
    pub fn followed(&self) -> Option<EntityId> {
        self.followed
    }

    /// The camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The bucket index as built by the last frame.
    pub fn index(&self) -> &BucketIndex {
        &self.index
    }

    /// The map.
    pub fn map(&self) -> &M {
        &self.map
    }

    /// Configuration in use.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Frames completed.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// Run a world for `inputs.len()` frames at its configured frame rate.
///
/// Returns per-frame stats; used to compare replays.
pub fn replay<M: Walkability + TileGeometry>(world: &mut World<M>, inputs: &[InputFrame]) -> Vec<FrameStats> {
    let elapsed = world.config().frame_duration();
    inputs
        .iter()
        .map(|input| world.update(*input, elapsed))
        .collect()
}
