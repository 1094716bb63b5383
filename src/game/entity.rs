//! Entity Behaviors
//!
//! Each entity owns a boxed [`Behavior`]. Once per frame the world asks
//! it for a desired displacement; the world then decides whether that
//! move is allowed.

use std::fmt;
use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::core::vec2::{Rect, Vec2};
use crate::game::bucket::EntityId;
use crate::game::world::FrameContext;

/// Which kind of entity a behavior drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EntityKind {
    /// Input-driven, followed by the camera
    Player = 0,
    /// Wandering crowd
    Enemy = 1,
}

/// Per-entity logic.
pub trait Behavior: fmt::Debug {
    /// What this behavior drives.
    fn kind(&self) -> EntityKind;

    /// Desired displacement for this frame.
    ///
    /// `ctx` reflects the world as it was at the start of the frame;
    /// `this` is the caller's own id so it can skip itself in neighbour
    /// queries.
    fn update(
        &mut self,
        elapsed: Duration,
        ctx: &FrameContext<'_>,
        this: EntityId,
        position: Vec2,
    ) -> Vec2;

    /// Sprite size in world units. Also the collision box size.
    fn render_size(&self) -> Vec2;

    /// Emit draw commands at a screen position.
    fn render(&self, screen_position: Vec2, target: &mut dyn RenderTarget) {
        target.draw_sprite(self.kind(), screen_position, self.render_size());
    }
}

/// Sink for draw calls. Presentation lives outside this crate.
pub trait RenderTarget {
    /// Draw one sprite with its top-left corner at `screen_position`.
    fn draw_sprite(&mut self, kind: EntityKind, screen_position: Vec2, size: Vec2);
}

/// One recorded sprite draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    /// Entity kind
    pub kind: EntityKind,
    /// Top-left corner on screen
    pub screen_position: Vec2,
    /// Sprite size
    pub size: Vec2,
}

/// Render target that records draws instead of rasterizing them.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    /// Draws in submission order
    pub commands: Vec<DrawCommand>,
}

impl RenderTarget for DrawList {
    fn draw_sprite(&mut self, kind: EntityKind, screen_position: Vec2, size: Vec2) {
        self.commands.push(DrawCommand {
            kind,
            screen_position,
            size,
        });
    }
}

// =============================================================================
// PLAYER
// =============================================================================

/// Moves along the frame's input direction.
#[derive(Clone, Debug)]
pub struct Player {
    size: Vec2,
    /// World units per second at full stick
    pub speed: f32,
}

impl Player {
    /// Default sprite size
    pub const SIZE: Vec2 = Vec2::new(16.0, 16.0);

    /// Create a player.
    pub fn new(size: Vec2, speed: f32) -> Self {
        Self { size, speed }
    }
}

impl Behavior for Player {
    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }

    fn update(
        &mut self,
        elapsed: Duration,
        ctx: &FrameContext<'_>,
        _this: EntityId,
        _position: Vec2,
    ) -> Vec2 {
        ctx.input().move_direction() * (self.speed * elapsed.as_secs_f32())
    }

    fn render_size(&self) -> Vec2 {
        self.size
    }
}

// =============================================================================
// ENEMY
// =============================================================================

/// Wanders on a seeded random heading and steps away from crowding
/// neighbours found through the bucket index.
#[derive(Clone, Debug)]
pub struct Enemy {
    size: Vec2,
    /// World units per second
    pub speed: f32,
    /// Chance per frame of picking a new heading, in [0, 1]
    pub turn_chance: f32,
    /// Neighbours closer than this push the enemy away
    pub separation_radius: f32,
    heading: Vec2,
    rng: DeterministicRng,
}

impl Enemy {
    /// Default sprite size
    pub const SIZE: Vec2 = Vec2::new(8.0, 8.0);

    /// Create an enemy with its own random stream.
    pub fn new(size: Vec2, speed: f32, rng: DeterministicRng) -> Self {
        Self {
            size,
            speed,
            turn_chance: 0.02,
            separation_radius: size.min_component(),
            heading: Vec2::ZERO,
            rng,
        }
    }

    /// Current wander heading (zero until the first update).
    pub fn heading(&self) -> Vec2 {
        self.heading
    }

    /// Sum of unit pushes away from every neighbour inside the separation
    /// radius, weighted by closeness.
    fn separation(&self, ctx: &FrameContext<'_>, this: EntityId, position: Vec2) -> Vec2 {
        let radius = self.separation_radius;
        if radius <= 0.0 {
            return Vec2::ZERO;
        }
        let area = Rect::new(
            position.x - radius,
            position.y - radius,
            radius * 2.0,
            radius * 2.0,
        );

        let mut push = Vec2::ZERO;
        for other in ctx.neighbours(&area) {
            if other == this {
                continue;
            }
            let Some(other_position) = ctx.position_of(other) else {
                continue;
            };
            let away = position - other_position;
            let distance = away.magnitude();
            if distance > 0.0 && distance < radius {
                push += away.normalize() * (1.0 - distance / radius);
            }
        }
        push
    }
}

impl Behavior for Enemy {
    fn kind(&self) -> EntityKind {
        EntityKind::Enemy
    }

    fn update(
        &mut self,
        elapsed: Duration,
        ctx: &FrameContext<'_>,
        this: EntityId,
        position: Vec2,
    ) -> Vec2 {
        if self.heading == Vec2::ZERO || self.rng.next_bool(self.turn_chance) {
            self.heading = self.rng.random_direction();
        }

        let direction = (self.heading + self.separation(ctx, this, position)).normalize();
        direction * (self.speed * elapsed.as_secs_f32())
    }

    fn render_size(&self) -> Vec2 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::bucket::BucketIndex;
    use crate::game::input::InputFrame;

    const FRAME: Duration = Duration::from_millis(500);

    struct Fixture {
        index: BucketIndex,
        positions: Vec<Vec2>,
    }

    impl Fixture {
        fn new(positions: Vec<Vec2>, size: Vec2) -> Self {
            let mut index = BucketIndex::new(32.0);
            for (id, p) in positions.iter().enumerate() {
                index.insert(id, &Rect::new(p.x, p.y, size.y, size.x));
            }
            Self { index, positions }
        }

        fn ctx(&self, input: InputFrame) -> FrameContext<'_> {
            FrameContext::new(&self.index, &self.positions, input)
        }
    }

    #[test]
    fn test_player_follows_input() {
        let fixture = Fixture::new(vec![Vec2::ZERO], Player::SIZE);
        let mut player = Player::new(Player::SIZE, 60.0);

        let moved = player.update(FRAME, &fixture.ctx(InputFrame::with_movement(127, 0)), 0, Vec2::ZERO);
        assert!((moved.x - 30.0).abs() < 1e-4);
        assert_eq!(moved.y, 0.0);

        let idle = player.update(FRAME, &fixture.ctx(InputFrame::new()), 0, Vec2::ZERO);
        assert_eq!(idle, Vec2::ZERO);
    }

    #[test]
    fn test_enemy_moves_at_speed() {
        let fixture = Fixture::new(vec![Vec2::new(50.0, 50.0)], Enemy::SIZE);
        let mut enemy = Enemy::new(Enemy::SIZE, 20.0, DeterministicRng::new(1));

        let moved = enemy.update(FRAME, &fixture.ctx(InputFrame::new()), 0, Vec2::new(50.0, 50.0));
        assert!((moved.magnitude() - 10.0).abs() < 1e-3);
        assert_ne!(enemy.heading(), Vec2::ZERO);
    }

    #[test]
    fn test_enemy_deterministic() {
        let fixture = Fixture::new(vec![Vec2::new(50.0, 50.0)], Enemy::SIZE);
        let mut a = Enemy::new(Enemy::SIZE, 20.0, DeterministicRng::new(9));
        let mut b = Enemy::new(Enemy::SIZE, 20.0, DeterministicRng::new(9));

        for _ in 0..50 {
            let ctx = fixture.ctx(InputFrame::new());
            assert_eq!(
                a.update(FRAME, &ctx, 0, Vec2::new(50.0, 50.0)),
                b.update(FRAME, &ctx, 0, Vec2::new(50.0, 50.0))
            );
        }
    }

    #[test]
    fn test_separation_pushes_apart() {
        let me = Vec2::new(50.0, 50.0);
        let fixture = Fixture::new(vec![me, Vec2::new(54.0, 50.0)], Enemy::SIZE);
        let enemy = Enemy::new(Enemy::SIZE, 20.0, DeterministicRng::new(3));

        let push = enemy.separation(&fixture.ctx(InputFrame::new()), 0, me);
        assert!(push.x < 0.0, "neighbour on the right pushes left");
        assert_eq!(push.y, 0.0);
    }

    #[test]
    fn test_separation_ignores_self_and_far() {
        let me = Vec2::new(50.0, 50.0);
        let fixture = Fixture::new(vec![me, Vec2::new(300.0, 300.0)], Enemy::SIZE);
        let enemy = Enemy::new(Enemy::SIZE, 20.0, DeterministicRng::new(3));

        let push = enemy.separation(&fixture.ctx(InputFrame::new()), 0, me);
        assert_eq!(push, Vec2::ZERO);
    }

    #[test]
    fn test_default_render() {
        let player = Player::new(Vec2::new(16.0, 24.0), 60.0);
        let mut list = DrawList::default();
        player.render(Vec2::new(5.0, 6.0), &mut list);

        assert_eq!(
            list.commands,
            vec![DrawCommand {
                kind: EntityKind::Player,
                screen_position: Vec2::new(5.0, 6.0),
                size: Vec2::new(16.0, 24.0),
            }]
        );
    }
}
