//! Exposure heuristic: bidirectional probing toward open space.
//!
//! Each target face probes a short distance forward along its normal and
//! backward along the opposite direction. A face whose forward probe runs
//! into geometry while its backward probe escapes is facing into solid
//! and flips. Faces whose probes hit on both sides sit between walls and
//! are left alone.

use tracing::debug;

use crate::params::OrientParams;
use crate::raycast::RayCaster;
use crate::view::OrientView;

/// Run one exposure pass and return the flipped face indices, sorted
/// ascending.
///
/// Targets are the boundary faces; on a closed mesh every face is a
/// target, since a closed mesh has no boundary to start from. Decisions
/// read pre-pass normals only and flips are applied in one batch.
pub(crate) fn exposure_pass(view: &mut OrientView<'_>, params: &OrientParams) -> Vec<usize> {
    let caster = RayCaster::build(view.mesh(), params.ray_epsilon);

    let targets: Vec<usize> = if view.is_closed() {
        view.faces().collect()
    } else {
        view.boundary_faces().to_vec()
    };

    let mut marked = Vec::new();
    for face in targets {
        let Some(normal) = view.normal_of(face) else {
            continue;
        };
        let Some(centroid) = view.centroid_of(face) else {
            continue;
        };

        let forward = caster.cast(
            centroid + normal * params.probe_epsilon,
            normal,
            params.probe_distance,
            Some(face),
        );
        // Forward miss: the normal already faces open space
        if forward.is_none() {
            continue;
        }

        let backward = caster.cast(
            centroid - normal * params.probe_epsilon,
            -normal,
            params.probe_distance,
            Some(face),
        );
        match backward {
            // Open space lies behind the face, so the normal points
            // into solid
            None => {
                debug!(face, "forward probe blocked, backward escapes, flipping");
                marked.push(face);
            }
            // Enclosed on both sides within probe range, leave alone
            Some(_) => {}
        }
    }

    for &face in &marked {
        view.flip(face);
    }

    marked
}
