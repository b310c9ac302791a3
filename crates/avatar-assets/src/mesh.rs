use avatar_core::{Normal, Position, TexCoord};
use tracing::warn;

/// A polygon mesh loaded once at startup and never mutated afterwards.
///
/// Every face index is 0-based and `< vertices.len()`. A mesh without
/// vertices is never `loaded`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Position>,
    faces: Vec<Vec<u32>>,
    normals: Vec<Normal>,
    tex_coords: Vec<TexCoord>,
    loaded: bool,
}

impl Mesh {
    /// An empty, unloaded mesh
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a mesh from raw parts.
    ///
    /// Faces referencing a vertex outside `vertices` are dropped. With no
    /// vertices the result is [`Mesh::empty`].
    pub fn new(
        vertices: Vec<Position>,
        faces: Vec<Vec<u32>>,
        normals: Vec<Normal>,
        tex_coords: Vec<TexCoord>,
    ) -> Self {
        if vertices.is_empty() {
            return Self::empty();
        }

        let vertex_count = vertices.len();
        let total_faces = faces.len();
        let faces: Vec<Vec<u32>> = faces
            .into_iter()
            .filter(|face| face.iter().all(|&i| (i as usize) < vertex_count))
            .collect();

        if faces.len() < total_faces {
            warn!(
                "Dropped {} faces with out-of-range vertex indices",
                total_faces - faces.len()
            );
        }

        Self {
            vertices,
            faces,
            normals,
            tex_coords,
            loaded: true,
        }
    }

    pub fn vertices(&self) -> &[Position] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Vec<u32>] {
        &self.faces
    }

    pub fn normals(&self) -> &[Normal] {
        &self.normals
    }

    pub fn tex_coords(&self) -> &[TexCoord] {
        &self.tex_coords
    }

    /// Whether the mesh holds at least one vertex
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Fan-triangulate every face into a flat triangle index buffer.
    ///
    /// Faces with fewer than three indices contribute nothing.
    pub fn triangulate(&self) -> Vec<u32> {
        let mut indices = Vec::new();
        for face in &self.faces {
            if face.len() < 3 {
                continue;
            }
            for i in 1..face.len() - 1 {
                indices.extend_from_slice(&[face[0], face[i], face[i + 1]]);
            }
        }
        indices
    }

    /// Axis-aligned bounding box as `(min, max)`, or `None` when empty
    pub fn bounds(&self) -> Option<(Position, Position)> {
        let first = *self.vertices.first()?;
        let mut min = first;
        let mut max = first;
        for v in &self.vertices[1..] {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        Some((min, max))
    }
}
