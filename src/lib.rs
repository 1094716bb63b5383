//! # Tileworld
//!
//! Per-frame world update core for a 2D tile game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        TILEWORLD                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Pure primitives                           │
//! │  ├── vec2.rs     - 2D vector and rectangle                   │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for replay checks           │
//! │                                                              │
//! │  game/           - Frame update                              │
//! │  ├── bucket.rs   - Spatial bucket index                      │
//! │  ├── movement.rs - Swept movement validation                 │
//! │  ├── camera.rs   - Damped follow camera                      │
//! │  ├── map.rs      - Tile map walkability and bounds           │
//! │  ├── entity.rs   - Player / enemy behaviors                  │
//! │  ├── input.rs    - Per-frame input                           │
//! │  └── world.rs    - Frame update loop                         │
//! │                                                              │
//! │  config.rs       - World configuration (JSON)                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frame Order
//!
//! Each frame clears the bucket index, advances the camera, re-inserts
//! every entity at its frame-start position, then lets every behavior
//! propose a move that is committed only if the swept path is walkable.
//!
//! ## Determinism
//!
//! Given the same config, map and input stream, two worlds end in the
//! same state hash: iteration uses BTreeMap and randomness comes from
//! seeded Xorshift128+ streams.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use config::{ConfigError, PopulationConfig, WorldConfig};
pub use crate::core::vec2::{Rect, Vec2};
pub use crate::core::rng::DeterministicRng;
pub use game::input::InputFrame;
pub use game::world::{FrameStats, World, WorldError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default simulation rate (Hz)
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Default spatial bucket edge length (world units)
pub const DEFAULT_BUCKET_SIZE: f32 = 32.0;
