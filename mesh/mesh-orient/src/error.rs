//! Error types for orientation operations.

use thiserror::Error;

/// Result type for orientation operations.
pub type OrientResult<T> = Result<T, OrientError>;

/// Errors that can occur during orientation operations.
///
/// Degenerate faces and non-manifold edges are not errors: they are
/// tolerated, logged, and counted in the [`OrientReport`](crate::OrientReport).
#[derive(Debug, Error)]
pub enum OrientError {
    /// Mesh has no faces to orient.
    #[error("mesh has no faces to orient")]
    EmptyMesh,

    /// Seed alignment was invoked with no faces selected.
    #[error("no faces selected for seed alignment")]
    EmptySelection,

    /// Seed alignment was invoked with more than one selected face.
    ///
    /// Picking an arbitrary face from a multi-selection would make the
    /// result depend on selection order, so it is rejected instead.
    #[error("ambiguous selection: {count} faces selected, expected exactly 1")]
    AmbiguousSelection {
        /// Number of faces in the selection.
        count: usize,
    },

    /// Face index is out of bounds.
    #[error("face index {face_idx} out of bounds (mesh has {face_count} faces)")]
    FaceOutOfBounds {
        /// The invalid face index.
        face_idx: usize,
        /// Total number of faces in the mesh.
        face_count: usize,
    },
}
