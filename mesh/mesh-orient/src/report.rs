//! Outcome report for orientation strategies.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of an orientation strategy.
///
/// `flipped_count` is cumulative across passes: a face flipped in two
/// different passes of an iterative strategy counts twice. The identities
/// of the faces touched are in `flipped_faces`, deduplicated and sorted.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_orient::flood_fill;
///
/// let mut cube = unit_cube();
/// cube.flip_face(1);
///
/// let report = flood_fill(&mut cube).unwrap();
/// assert_eq!(report.flipped_count, 1);
/// assert_eq!(report.flipped_faces, vec![1]);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientReport {
    /// Total number of flips applied, summed over all passes.
    pub flipped_count: usize,

    /// Distinct indices of faces that were flipped, sorted ascending.
    pub flipped_faces: Vec<usize>,

    /// Number of passes executed (1 for non-iterative strategies).
    pub passes_run: usize,

    /// Whether an iterative strategy reached a pass with zero flips
    /// within its pass budget. Always true for non-iterative strategies.
    pub converged: bool,

    /// Number of edges shared by more than two faces.
    pub non_manifold_edge_count: usize,

    /// Number of faces with zero-length normals, skipped for voting.
    pub degenerate_face_count: usize,
}

impl OrientReport {
    /// Check whether the run changed the mesh at all.
    #[inline]
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.flipped_count > 0
    }

    /// Check if the mesh had topology or geometry worth a second look.
    #[inline]
    #[must_use]
    pub const fn has_issues(&self) -> bool {
        self.non_manifold_edge_count > 0 || self.degenerate_face_count > 0
    }
}

impl std::fmt::Display for OrientReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Orientation Report:")?;
        writeln!(f, "  Flips applied: {}", self.flipped_count)?;
        writeln!(f, "  Faces touched: {}", self.flipped_faces.len())?;
        writeln!(f, "  Passes run: {}", self.passes_run)?;
        writeln!(
            f,
            "  Converged: {}",
            if self.converged { "Yes" } else { "No" }
        )?;

        if self.has_issues() {
            writeln!(f)?;
            writeln!(f, "  Issues:")?;
            if self.non_manifold_edge_count > 0 {
                writeln!(
                    f,
                    "    Non-manifold edges: {}",
                    self.non_manifold_edge_count
                )?;
            }
            if self.degenerate_face_count > 0 {
                writeln!(f, "    Degenerate faces: {}", self.degenerate_face_count)?;
            }
        }

        Ok(())
    }
}
