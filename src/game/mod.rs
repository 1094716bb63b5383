//! World Update Module
//!
//! Everything that runs once per frame.
//!
//! ## Module Structure
//!
//! - `bucket`: Spatial bucket index, rebuilt every frame
//! - `movement`: Swept box-vs-terrain move validation
//! - `camera`: Damped follow camera with leash and map clamp
//! - `map`: Walkability and tile geometry collaborators
//! - `entity`: Behaviors (player, enemy) and render hooks
//! - `input`: Per-frame player input
//! - `world`: The frame update loop

pub mod bucket;
pub mod movement;
pub mod camera;
pub mod map;
pub mod entity;
pub mod input;
pub mod world;

// Re-export key types
pub use bucket::{BucketId, BucketIndex, EntityId};
pub use camera::{Camera, CameraConfig, Viewport};
pub use entity::{Behavior, DrawList, Enemy, EntityKind, Player, RenderTarget};
pub use input::InputFrame;
pub use map::{MapError, TileGeometry, TileLayer, TileMap, TileSet, Walkability};
pub use movement::{can_move, position_is_free};
pub use world::{EntityRecord, FrameContext, FrameStats, World, WorldError};
