//! Avatar Core - Shared types and timing for the avatar runtime
//!
//! This crate provides the foundational types used by the other crates:
//! - Plain vertex attribute aliases (positions, normals, texture coordinates)
//! - Euler angle orientation in degrees, wrapped to `[0, 360)`
//! - A fixed-step tick clock shared by the render and playback loops

pub mod time;
pub mod types;

pub use glam::{Mat3, Mat4, Vec3};
pub use time::TickClock;
pub use types::{wrap_degrees, Axis, EulerAngles, Normal, Position, TexCoord};
