//! Orientation strategy entry points and dispatch.
//!
//! Every strategy borrows the mesh mutably for the duration of the call,
//! runs against an [`OrientView`], and returns an [`OrientReport`]. Batch
//! callers that want to pick a strategy at runtime go through
//! [`orient`] and the [`Strategy`] enum; direct callers use the
//! per-strategy functions.

use mesh_types::IndexedMesh;
use tracing::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{OrientError, OrientResult};
use crate::exposure::exposure_pass;
use crate::occlusion::occlusion_pass;
use crate::params::OrientParams;
use crate::propagate::{propagate_from_seed, seed_nearest_min_corner};
use crate::report::OrientReport;
use crate::view::OrientView;
use crate::vote::vote_pass;

/// Selectable orientation strategy for [`orient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// One majority-vote pass over face neighborhoods.
    Majority,
    /// Repeated vote passes until quiet or the pass budget runs out.
    Persistent,
    /// Flood alignment anchored at a single selected face.
    Propagate,
    /// Flood alignment anchored near the minimum bounds corner.
    FloodFill,
    /// Bidirectional probing toward open space.
    Exposure,
    /// Flip faces staring into nearby geometry.
    Occlusion,
    /// Flip faces that disagree with the mesh-wide average normal.
    Average,
    /// Vote passes, then flood, then a signed-volume outward check.
    Hybrid,
}

/// Run the chosen strategy on a mesh.
///
/// `selection` is only consulted by [`Strategy::Propagate`]; every other
/// strategy ignores it.
///
/// # Errors
///
/// Returns [`OrientError::EmptyMesh`] for meshes without faces, and the
/// selection errors of [`align_from_selection`] for
/// [`Strategy::Propagate`].
pub fn orient(
    mesh: &mut IndexedMesh,
    strategy: Strategy,
    selection: &[usize],
    params: &OrientParams,
) -> OrientResult<OrientReport> {
    match strategy {
        Strategy::Majority => orient_majority(mesh),
        Strategy::Persistent => orient_persistent(mesh, params),
        Strategy::Propagate => align_from_selection(mesh, selection),
        Strategy::FloodFill => flood_fill(mesh),
        Strategy::Exposure => orient_exposed(mesh, params),
        Strategy::Occlusion => orient_occluded(mesh, params),
        Strategy::Average => orient_average(mesh),
        Strategy::Hybrid => orient_hybrid(mesh, params),
    }
}

/// Assemble a report from the raw per-pass flip log.
///
/// `flips` may name the same face more than once when an iterative
/// strategy flipped it in several passes; the count keeps every
/// occurrence while the identity list is deduplicated.
fn finish(
    view: &OrientView<'_>,
    flips: Vec<usize>,
    passes_run: usize,
    converged: bool,
) -> OrientReport {
    let flipped_count = flips.len();
    let mut flipped_faces = flips;
    flipped_faces.sort_unstable();
    flipped_faces.dedup();

    OrientReport {
        flipped_count,
        flipped_faces,
        passes_run,
        converged,
        non_manifold_edge_count: view.non_manifold_edge_count(),
        degenerate_face_count: view.degenerate_face_count(),
    }
}

/// Run a single majority-vote pass.
///
/// # Errors
///
/// Returns [`OrientError::EmptyMesh`] if the mesh has no faces.
pub fn orient_majority(mesh: &mut IndexedMesh) -> OrientResult<OrientReport> {
    let mut view = OrientView::build(mesh)?;
    let flipped = vote_pass(&mut view);
    let report = finish(&view, flipped, 1, true);
    info!(flipped = report.flipped_count, "majority vote complete");
    Ok(report)
}

/// Run vote passes until a pass flips nothing or the budget runs out.
///
/// A face flipped in several passes counts once per pass in
/// `flipped_count` but once in `flipped_faces`. `converged` reports
/// whether a quiet pass was reached within `params.max_passes`.
///
/// # Errors
///
/// Returns [`OrientError::EmptyMesh`] if the mesh has no faces.
pub fn orient_persistent(
    mesh: &mut IndexedMesh,
    params: &OrientParams,
) -> OrientResult<OrientReport> {
    let mut view = OrientView::build(mesh)?;
    let max_passes = params.effective_passes();

    let mut flips = Vec::new();
    let mut passes_run = 0;
    let mut converged = false;
    for _ in 0..max_passes {
        passes_run += 1;
        let pass_flips = vote_pass(&mut view);
        if pass_flips.is_empty() {
            converged = true;
            break;
        }
        flips.extend(pass_flips);
    }

    let report = finish(&view, flips, passes_run, converged);
    info!(
        flipped = report.flipped_count,
        passes = report.passes_run,
        converged = report.converged,
        "persistent vote complete"
    );
    Ok(report)
}

/// Flood-align all faces reachable from a single selected face.
///
/// The selected face anchors the flood with its current normal and is
/// never flipped itself.
///
/// # Errors
///
/// - [`OrientError::EmptyMesh`] if the mesh has no faces.
/// - [`OrientError::EmptySelection`] if `selection` is empty.
/// - [`OrientError::AmbiguousSelection`] if more than one face is
///   selected.
/// - [`OrientError::FaceOutOfBounds`] if the selected index does not
///   name a face.
pub fn align_from_selection(
    mesh: &mut IndexedMesh,
    selection: &[usize],
) -> OrientResult<OrientReport> {
    let mut view = OrientView::build(mesh)?;

    let seed = match *selection {
        [] => return Err(OrientError::EmptySelection),
        [seed] => seed,
        _ => {
            return Err(OrientError::AmbiguousSelection {
                count: selection.len(),
            });
        }
    };
    if seed >= view.face_count() {
        return Err(OrientError::FaceOutOfBounds {
            face_idx: seed,
            face_count: view.face_count(),
        });
    }

    let flipped = propagate_from_seed(&mut view, seed);
    let report = finish(&view, flipped, 1, true);
    info!(seed, flipped = report.flipped_count, "seed alignment complete");
    Ok(report)
}

/// Flood-align from the face nearest the minimum bounds corner.
///
/// The seed face keeps its current normal; everything reachable from it
/// is brought into sign agreement along the traversal.
///
/// # Errors
///
/// Returns [`OrientError::EmptyMesh`] if the mesh has no faces.
pub fn flood_fill(mesh: &mut IndexedMesh) -> OrientResult<OrientReport> {
    let mut view = OrientView::build(mesh)?;
    let seed = seed_nearest_min_corner(&view);
    let flipped = propagate_from_seed(&mut view, seed);
    let report = finish(&view, flipped, 1, true);
    info!(seed, flipped = report.flipped_count, "flood fill complete");
    Ok(report)
}

/// Orient boundary faces by probing toward open space.
///
/// On a closed mesh every face is probed, since there is no boundary to
/// narrow the scan to.
///
/// # Errors
///
/// Returns [`OrientError::EmptyMesh`] if the mesh has no faces.
pub fn orient_exposed(mesh: &mut IndexedMesh, params: &OrientParams) -> OrientResult<OrientReport> {
    let mut view = OrientView::build(mesh)?;
    let flipped = exposure_pass(&mut view, params);
    let report = finish(&view, flipped, 1, true);
    info!(flipped = report.flipped_count, "exposure pass complete");
    Ok(report)
}

/// Flip faces whose forward probe hits geometry at close range.
///
/// # Errors
///
/// Returns [`OrientError::EmptyMesh`] if the mesh has no faces.
pub fn orient_occluded(
    mesh: &mut IndexedMesh,
    params: &OrientParams,
) -> OrientResult<OrientReport> {
    let mut view = OrientView::build(mesh)?;
    let flipped = occlusion_pass(&mut view, params);
    let report = finish(&view, flipped, 1, true);
    info!(flipped = report.flipped_count, "occlusion pass complete");
    Ok(report)
}

/// Flip every face that disagrees with the area-weighted average normal.
///
/// Meant for open sheets with a dominant facing direction. On a closed
/// consistently wound mesh the average cancels to zero and nothing
/// flips.
///
/// # Errors
///
/// Returns [`OrientError::EmptyMesh`] if the mesh has no faces.
pub fn orient_average(mesh: &mut IndexedMesh) -> OrientResult<OrientReport> {
    let mut view = OrientView::build(mesh)?;

    let mut flipped = Vec::new();
    if let Some(average) = view.mesh().area_weighted_normal() {
        for face in view.faces() {
            if let Some(normal) = view.normal_of(face) {
                if normal.dot(&average) < 0.0 {
                    flipped.push(face);
                }
            }
        }
        for &face in &flipped {
            view.flip(face);
        }
    }

    let report = finish(&view, flipped, 1, true);
    info!(flipped = report.flipped_count, "average alignment complete");
    Ok(report)
}

/// Unconditionally reverse the winding of every face.
///
/// # Errors
///
/// Returns [`OrientError::EmptyMesh`] if the mesh has no faces.
pub fn flip_all(mesh: &mut IndexedMesh) -> OrientResult<OrientReport> {
    let mut view = OrientView::build(mesh)?;
    let flipped: Vec<usize> = view.faces().collect();
    for &face in &flipped {
        view.flip(face);
    }
    let report = finish(&view, flipped, 1, true);
    info!(flipped = report.flipped_count, "flipped all faces");
    Ok(report)
}

/// Settle local agreement with vote passes, then push the result
/// globally outward.
///
/// After the persistent phase, a flood from the minimum-corner seed
/// aligns connected faces, and a signed-volume check flips the whole
/// mesh when it comes out inside-out.
///
/// # Errors
///
/// Returns [`OrientError::EmptyMesh`] if the mesh has no faces.
pub fn orient_hybrid(mesh: &mut IndexedMesh, params: &OrientParams) -> OrientResult<OrientReport> {
    let mut view = OrientView::build(mesh)?;
    let max_passes = params.effective_passes();

    let mut flips = Vec::new();
    let mut passes_run = 0;
    let mut converged = false;
    for _ in 0..max_passes {
        passes_run += 1;
        let pass_flips = vote_pass(&mut view);
        if pass_flips.is_empty() {
            converged = true;
            break;
        }
        flips.extend(pass_flips);
    }

    let seed = seed_nearest_min_corner(&view);
    flips.extend(propagate_from_seed(&mut view, seed));
    passes_run += 1;

    if view.mesh().is_inside_out() {
        info!("mesh is inside-out after alignment, flipping everything");
        let all: Vec<usize> = view.faces().collect();
        for &face in &all {
            view.flip(face);
        }
        flips.extend(all);
    }

    let report = finish(&view, flips, passes_run, converged);
    info!(
        flipped = report.flipped_count,
        passes = report.passes_run,
        "hybrid alignment complete"
    );
    Ok(report)
}
