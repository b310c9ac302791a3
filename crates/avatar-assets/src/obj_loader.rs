use std::fs;
use std::path::Path;

use avatar_core::{Normal, Position, TexCoord};
use tracing::{debug, info, warn};

use crate::error::AssetError;
use crate::mesh::Mesh;

/// Loads meshes from the OBJ subset understood by the avatar runtime.
pub struct MeshLoader;

impl MeshLoader {
    /// Load a mesh from `path`.
    ///
    /// Malformed lines are skipped. Fails only when the file is missing or
    /// unreadable, or when no vertex survives parsing.
    pub fn load(path: impl AsRef<Path>) -> Result<Mesh, AssetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AssetError::NotFound(path.to_path_buf()));
        }

        let bytes = fs::read(path).map_err(|e| AssetError::Io(path.to_path_buf(), e))?;
        let mesh = parse_obj(&String::from_utf8_lossy(&bytes));

        if !mesh.is_loaded() {
            return Err(AssetError::NoVertices(path.to_path_buf()));
        }

        info!(
            "Loaded mesh '{}': {} vertices, {} faces, {} normals, {} tex coords",
            path.display(),
            mesh.vertex_count(),
            mesh.face_count(),
            mesh.normals().len(),
            mesh.tex_coords().len()
        );
        Ok(mesh)
    }

    /// Load a mesh, falling back to [`Mesh::empty`] on any failure.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Mesh {
        match Self::load(path) {
            Ok(mesh) => mesh,
            Err(e) => {
                warn!("Mesh unavailable, continuing without a model: {}", e);
                Mesh::empty()
            }
        }
    }
}

/// Parse OBJ-subset text into a mesh. Never fails; the result is unloaded
/// when the text holds no valid `v` record.
pub fn parse_obj(source: &str) -> Mesh {
    let mut vertices: Vec<Position> = Vec::new();
    let mut normals: Vec<Normal> = Vec::new();
    let mut tex_coords: Vec<TexCoord> = Vec::new();
    let mut faces: Vec<Vec<u32>> = Vec::new();

    for (line_no, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();

        let parsed = match tag {
            "v" => parse_floats::<3>(&args).map(|v| vertices.push(v)),
            "vn" => parse_floats::<3>(&args).map(|n| normals.push(n)),
            "vt" => parse_floats::<2>(&args).map(|t| tex_coords.push(t)),
            "f" => parse_face(&args).map(|f| faces.push(f)),
            _ => None,
        };

        if parsed.is_none() {
            debug!("Skipping OBJ line {}: '{}'", line_no + 1, line);
        }
    }

    Mesh::new(vertices, faces, normals, tex_coords)
}

/// Parse the first `N` arguments as floats; extra arguments are ignored
fn parse_floats<const N: usize>(args: &[&str]) -> Option<[f32; N]> {
    if args.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg.parse().ok()?;
    }
    Some(out)
}

/// Parse face tokens (`v`, `v/vt`, `v/vt/vn` or `v//vn`) into 0-based
/// vertex indices
fn parse_face(args: &[&str]) -> Option<Vec<u32>> {
    if args.len() < 3 {
        return None;
    }
    args.iter()
        .map(|token| {
            let vertex = token.split('/').next()?;
            let index: u32 = vertex.parse().ok()?;
            index.checked_sub(1)
        })
        .collect()
}
