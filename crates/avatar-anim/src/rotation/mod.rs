//! Rotation and zoom of the displayed mesh
//!
//! Orientation is driven either by a continuous auto-rotate tick or by manual
//! pointer drags, never both at once.

mod config;
mod engine;

pub use config::RotationConfig;
pub use engine::{
    rotate_normals, rotate_vertices, RotationMode, RotationState, RotationTransformEngine,
};
