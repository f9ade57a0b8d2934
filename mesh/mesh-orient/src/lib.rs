//! Face orientation strategies for triangle meshes.
//!
//! This crate normalizes face winding on an [`IndexedMesh`] so normals
//! agree with their surroundings. It provides:
//!
//! - Majority voting against edge neighbors, single-shot or iterated
//! - Seed-anchored flood alignment, from a selected face or automatic
//! - Ray-probing heuristics for exposure and close-range occlusion
//! - Mesh-wide helpers: average-normal alignment and flip-everything
//!
//! Every strategy leaves vertex positions untouched; orientation changes
//! only by reversing face winding. Degenerate faces and non-manifold
//! edges are tolerated, counted in the [`OrientReport`], and logged.
//!
//! # Example
//!
//! ```
//! use mesh_types::unit_cube;
//! use mesh_orient::{orient, OrientParams, Strategy};
//!
//! let mut cube = unit_cube();
//! cube.flip_face(1);
//!
//! let report = orient(
//!     &mut cube,
//!     Strategy::FloodFill,
//!     &[],
//!     &OrientParams::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(report.flipped_faces, vec![1]);
//! assert!(report.converged);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod exposure;
mod occlusion;
mod orient;
mod params;
mod propagate;
mod raycast;
mod report;
mod view;
mod vote;

pub use error::{OrientError, OrientResult};
pub use orient::{
    align_from_selection, flip_all, flood_fill, orient, orient_average, orient_exposed,
    orient_hybrid, orient_majority, orient_occluded, orient_persistent, Strategy,
};
pub use params::{OrientParams, MAX_PASSES_LIMIT};
pub use report::OrientReport;
pub use view::OrientView;

// Re-export the mesh type strategies operate on
pub use mesh_types::IndexedMesh;
