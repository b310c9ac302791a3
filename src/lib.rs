//! Avatar - composition of the mesh, animation, rotation and speech crates
//!
//! The binary in `main.rs` is a thin headless driver around [`AvatarApp`].

pub mod app;
pub mod settings;

pub use app::{AppEvent, AvatarApp};
pub use settings::{AppSettings, ModelSettings};
