//! Follow Camera
//!
//! Damped spring toward the followed entity, then a leash that keeps the
//! target within a fraction of the half-screen, then a clamp that keeps
//! the viewport inside the map. Each stage can override the previous one;
//! the map clamp always has the last word.

use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;

/// Camera tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Fraction of velocity kept each frame, in [0, 1]
    pub damping: f32,
    /// Spring strength per second of displacement
    pub velocity_multiplier: f32,
    /// Leash length as a fraction of half the visible size, in (0, 1]
    pub bound_fraction: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            damping: 0.9,
            velocity_multiplier: 1.0,
            bound_fraction: 0.5,
        }
    }
}

/// Screen size and zoom; together they give the visible world area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Output size in pixels
    pub screen: Vec2,
    /// Pixels per world unit
    pub zoom: f32,
}

impl Viewport {
    /// Create a viewport.
    pub const fn new(screen: Vec2, zoom: f32) -> Self {
        Self { screen, zoom }
    }

    /// World-space size of what is on screen.
    #[inline]
    pub fn visible_size(&self) -> Vec2 {
        self.screen / self.zoom
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Vec2::new(1280.0, 720.0), 4.0)
    }
}

/// Camera position and velocity plus what it needs to clamp itself.
#[derive(Clone, Debug)]
pub struct Camera {
    /// Centre of the view in world space
    pub position: Vec2,
    /// Displacement applied at the start of the next advance
    pub velocity: Vec2,
    config: CameraConfig,
    viewport: Viewport,
    world_size: Vec2,
}

impl Camera {
    /// Create a camera at rest at `position`.
    pub fn new(config: CameraConfig, viewport: Viewport, world_size: Vec2, position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            config,
            viewport,
            world_size,
        }
    }

    /// Tuning in use.
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Viewport in use.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Map size in world units.
    pub fn world_size(&self) -> Vec2 {
        self.world_size
    }

    /// True when the map is smaller than the visible area on either axis.
    /// The camera then stays centred on the map along that axis.
    pub fn map_smaller_than_view(&self) -> bool {
        let visible = self.viewport.visible_size();
        visible.x > self.world_size.x || visible.y > self.world_size.y
    }

    /// Advance one frame toward `target`.
    ///
    /// Velocity is added to position unscaled (it already holds one
    /// frame's displacement); only the spring term is scaled by `elapsed`.
    pub fn advance(&mut self, target: Vec2, elapsed: Duration) {
        let seconds = elapsed.as_secs_f32();

        // 1. Spring
        self.position += self.velocity;
        let displacement = target - self.position;
        self.velocity = self.velocity * self.config.damping
            + (seconds * self.config.velocity_multiplier) * displacement;

        // 2. Leash
        let visible = self.viewport.visible_size();
        let max_distance = visible * 0.5 * self.config.bound_fraction;
        self.position.x = leash_axis(self.position.x, target.x, max_distance.x);
        self.position.y = leash_axis(self.position.y, target.y, max_distance.y);

        // 3. Map edges
        self.position.x = clamp_axis(self.position.x, visible.x / 2.0, self.world_size.x);
        self.position.y = clamp_axis(self.position.y, visible.y / 2.0, self.world_size.y);
    }

    /// Offset to add to world positions to get screen (render target)
    /// positions.
    pub fn screen_offset(&self) -> Vec2 {
        self.viewport.visible_size() / 2.0 - self.position
    }
}

/// Pull `position` to exactly `max_distance` from `target` if it is
/// further away than that.
#[inline]
fn leash_axis(position: f32, target: f32, max_distance: f32) -> f32 {
    if (target - position).abs() > max_distance {
        if target > position {
            target - max_distance
        } else {
            target + max_distance
        }
    } else {
        position
    }
}

/// Keep a half-extent window inside `[0, world]`. If the window is wider
/// than the world, centre it.
#[inline]
fn clamp_axis(position: f32, half_visible: f32, world: f32) -> f32 {
    let min = half_visible;
    let max = world - half_visible;
    if min > max {
        world / 2.0
    } else {
        position.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn camera_at(position: Vec2) -> Camera {
        // Visible area 320x180, map 1000x800
        Camera::new(
            CameraConfig::default(),
            Viewport::default(),
            Vec2::new(1000.0, 800.0),
            position,
        )
    }

    #[test]
    fn test_spring_velocity_example() {
        // Full-width leash so the 100-unit displacement is not snapped
        let config = CameraConfig {
            damping: 0.9,
            velocity_multiplier: 1.0,
            bound_fraction: 1.0,
        };
        let mut camera = Camera::new(
            config,
            Viewport::default(),
            Vec2::new(1000.0, 800.0),
            Vec2::new(400.0, 400.0),
        );
        camera.advance(Vec2::new(500.0, 400.0), FRAME);

        assert!((camera.velocity.x - 1.6).abs() < 1e-4);
        assert_eq!(camera.velocity.y, 0.0);
        // Position only moves by the previous velocity (zero)
        assert_eq!(camera.position, Vec2::new(400.0, 400.0));
    }

    #[test]
    fn test_velocity_applied_next_frame() {
        let mut camera = camera_at(Vec2::new(400.0, 400.0));
        camera.velocity = Vec2::new(3.0, -2.0);
        camera.advance(Vec2::new(403.0, 398.0), Duration::ZERO);

        assert_eq!(camera.position, Vec2::new(403.0, 398.0));
        // No elapsed time: only damping acts
        assert!((camera.velocity.x - 2.7).abs() < 1e-5);
        assert!((camera.velocity.y + 1.8).abs() < 1e-5);
    }

    #[test]
    fn test_leash_snaps_toward_target() {
        // Leash = 160 * 0.5 = 80 along x, 90 * 0.5 = 45 along y
        let mut camera = camera_at(Vec2::new(400.0, 400.0));
        camera.advance(Vec2::new(600.0, 300.0), Duration::ZERO);

        assert_eq!(camera.position, Vec2::new(520.0, 345.0));
    }

    #[test]
    fn test_within_leash_untouched() {
        let mut camera = camera_at(Vec2::new(400.0, 400.0));
        camera.advance(Vec2::new(450.0, 420.0), Duration::ZERO);
        assert_eq!(camera.position, Vec2::new(400.0, 400.0));
    }

    #[test]
    fn test_world_clamp_wins_over_leash() {
        let mut camera = camera_at(Vec2::new(400.0, 400.0));
        camera.advance(Vec2::new(0.0, 0.0), FRAME);
        assert_eq!(camera.position, Vec2::new(160.0, 90.0));

        let mut camera = camera_at(Vec2::new(400.0, 400.0));
        camera.advance(Vec2::new(1000.0, 800.0), FRAME);
        assert_eq!(camera.position, Vec2::new(840.0, 710.0));
    }

    #[test]
    fn test_small_map_centres_camera() {
        let mut camera = Camera::new(
            CameraConfig::default(),
            Viewport::default(),
            Vec2::new(100.0, 400.0),
            Vec2::ZERO,
        );
        assert!(camera.map_smaller_than_view());

        camera.advance(Vec2::new(90.0, 300.0), FRAME);
        assert_eq!(camera.position.x, 50.0);
        assert!(camera.position.y >= 90.0 && camera.position.y <= 310.0);
    }

    #[test]
    fn test_screen_offset() {
        let camera = camera_at(Vec2::new(400.0, 300.0));
        assert_eq!(camera.screen_offset(), Vec2::new(-240.0, -210.0));
    }

    proptest! {
        #[test]
        fn prop_viewport_stays_inside_map(
            start_x in 0.0f32..1000.0,
            start_y in 0.0f32..800.0,
            targets in prop::collection::vec((-5000.0f32..5000.0, -5000.0f32..5000.0), 1..30),
        ) {
            let mut camera = camera_at(Vec2::new(start_x, start_y));
            let half = camera.viewport().visible_size() / 2.0;

            for (x, y) in targets {
                camera.advance(Vec2::new(x, y), FRAME);
                prop_assert!(camera.position.x - half.x >= 0.0);
                prop_assert!(camera.position.y - half.y >= 0.0);
                prop_assert!(camera.position.x + half.x <= 1000.0);
                prop_assert!(camera.position.y + half.y <= 800.0);
            }
        }
    }
}
