use std::path::PathBuf;

/// Errors that can occur during mesh loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("mesh file not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error loading '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("mesh file '{0}' contains no vertices")]
    NoVertices(PathBuf),
}
