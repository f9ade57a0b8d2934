//! Occlusion heuristic: flip faces staring into nearby geometry.
//!
//! One forward probe per face. A hit closer than the occlusion threshold
//! means the normal points straight at a wall, so the face turns around.
//! Distant hits are fine; only close-range occlusion triggers a flip.

use tracing::debug;

use crate::params::OrientParams;
use crate::raycast::RayCaster;
use crate::view::OrientView;

/// Run one occlusion pass and return the flipped face indices, sorted
/// ascending.
///
/// Flips are applied in one batch after every probe has resolved. On a
/// convex closed mesh with outward normals this is a no-op.
pub(crate) fn occlusion_pass(view: &mut OrientView<'_>, params: &OrientParams) -> Vec<usize> {
    let caster = RayCaster::build(view.mesh(), params.ray_epsilon);

    let mut marked = Vec::new();
    for face in view.faces() {
        let Some(normal) = view.normal_of(face) else {
            continue;
        };
        let Some(centroid) = view.centroid_of(face) else {
            continue;
        };

        let origin = centroid + normal * params.probe_epsilon;
        if let Some(hit) = caster.cast(origin, normal, f64::INFINITY, Some(face)) {
            if hit.distance < params.occlusion_threshold {
                debug!(face, distance = hit.distance, "occluded at close range, flipping");
                marked.push(face);
            }
        }
    }

    for &face in &marked {
        view.flip(face);
    }

    marked
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::{unit_cube, IndexedMesh, Vertex};

    /// A large floor sheet with a small triangle hovering just above it,
    /// facing down into the floor.
    fn hovering_over_floor() -> IndexedMesh {
        let vertices = vec![
            Vertex::from_coords(0.0, 0.0, 0.0),
            Vertex::from_coords(4.0, 0.0, 0.0),
            Vertex::from_coords(0.0, 4.0, 0.0),
            // Small triangle at z = 0.05, wound to face -z
            Vertex::from_coords(0.0, 0.0, 0.05),
            Vertex::from_coords(0.4, 0.0, 0.05),
            Vertex::from_coords(0.0, 0.4, 0.05),
        ];
        let faces = vec![[0, 1, 2], [3, 5, 4]];
        IndexedMesh::from_parts(vertices, faces)
    }

    #[test]
    fn outward_cube_is_a_no_op() {
        let mut cube = unit_cube();
        let mut view = OrientView::build(&mut cube).unwrap();
        assert!(occlusion_pass(&mut view, &OrientParams::default()).is_empty());
    }

    #[test]
    fn inverted_unit_cube_face_is_not_close_enough() {
        // The opposite wall is a full unit away, past the 0.1 threshold
        let mut cube = unit_cube();
        cube.flip_face(0);
        let mut view = OrientView::build(&mut cube).unwrap();
        assert!(occlusion_pass(&mut view, &OrientParams::default()).is_empty());
    }

    #[test]
    fn face_staring_into_nearby_wall_is_flipped() {
        let mut mesh = hovering_over_floor();
        let mut view = OrientView::build(&mut mesh).unwrap();

        // The hovering triangle looks down at the floor from 0.05 away;
        // the floor's own centroid is out from under it, so the floor
        // sees open space.
        let flipped = occlusion_pass(&mut view, &OrientParams::default());
        assert_eq!(flipped, vec![1]);
    }

    #[test]
    fn tightened_threshold_spares_the_hovering_face() {
        let mut mesh = hovering_over_floor();
        let mut view = OrientView::build(&mut mesh).unwrap();

        let params = OrientParams::default().occlusion_threshold(0.01);
        assert!(occlusion_pass(&mut view, &params).is_empty());
    }
}
