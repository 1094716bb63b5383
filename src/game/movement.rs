//! Movement Validation
//!
//! Swept box-vs-terrain test. A move is allowed only if the box is free
//! at evenly spaced samples along the straight path and at the exact
//! destination.
//!
//! "Free" means all four corners of the box are walkable. A wall thinner
//! than the box that pokes in between two corners goes unnoticed; maps are
//! built from whole tiles at least as large as the sprites, so this is
//! accepted.

use crate::core::vec2::Vec2;
use crate::game::map::Walkability;

/// Lower bound on the sampling stride. Sprites narrower than this are
/// degenerate; clamping keeps the step count finite for them.
pub const MIN_STEP_SIZE: f32 = 1.0;

/// Check whether a box of `sprite_size` anchored (top-left) at `position`
/// stands entirely on walkable terrain.
///
/// Corners are tested top-left, top-right, bottom-right, bottom-left and
/// the test stops at the first blocked one.
#[inline]
pub fn position_is_free<W: Walkability + ?Sized>(
    map: &W,
    position: Vec2,
    sprite_size: Vec2,
) -> bool {
    map.is_reachable(position)
        && map.is_reachable(position + Vec2::new(sprite_size.x, 0.0))
        && map.is_reachable(position + sprite_size)
        && map.is_reachable(position + Vec2::new(0.0, sprite_size.y))
}

/// Sampling stride for a sprite: its narrower side, so no wall at least
/// that thick can be stepped over.
#[inline]
pub fn step_size(sprite_size: Vec2) -> f32 {
    sprite_size.min_component().max(MIN_STEP_SIZE)
}

/// Number of path samples taken before the destination check.
#[inline]
pub fn sample_count(start: Vec2, destination: Vec2, sprite_size: Vec2) -> usize {
    ((destination - start).magnitude() / step_size(sprite_size)) as usize
}

/// Check whether a box can travel in a straight line from `start` to
/// `destination` without touching blocked terrain.
///
/// Samples `start + i * stride` for `i in 0..n`, where `n` is
/// [`sample_count`], then always tests `destination` itself. When
/// `start == destination` only the destination is tested, so a
/// zero-length move answers exactly like [`position_is_free`].
pub fn can_move<W: Walkability + ?Sized>(
    map: &W,
    start: Vec2,
    destination: Vec2,
    sprite_size: Vec2,
) -> bool {
    let stride = (destination - start).normalize() * step_size(sprite_size);
    let steps = sample_count(start, destination, sprite_size);

    for i in 0..steps {
        if !position_is_free(map, start + stride * i as f32, sprite_size) {
            return false;
        }
    }

    position_is_free(map, destination, sprite_size)
}
