//! Headless game simulation: deterministic physics, sprite opacity masks,
//! and the pixel-accurate collision oracle.

pub mod collision;
pub mod hitmask;
pub mod physics;

pub use collision::{Hitmask, Rect, pixel_collision};
pub use hitmask::HitmaskStore;
pub use physics::{CrashKind, GameWorld, Observation, PipePair};
