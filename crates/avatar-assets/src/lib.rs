//! Avatar Assets - Mesh loading
//!
//! Provides the immutable [`Mesh`] type and a best-effort loader for a
//! Wavefront OBJ subset (`v`, `vn`, `vt` and `f` records).

mod error;
mod mesh;
mod obj_loader;

pub use error::AssetError;
pub use mesh::Mesh;
pub use obj_loader::{parse_obj, MeshLoader};
