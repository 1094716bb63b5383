//! Core primitives.
//!
//! Pure value types shared by every game module: geometry,
//! deterministic randomness and state hashing.

pub mod vec2;
pub mod rng;
pub mod hash;

// Re-export core types
pub use vec2::{Vec2, Rect};
pub use rng::DeterministicRng;
pub use hash::{StateHash, StateHasher, compute_state_hash};
