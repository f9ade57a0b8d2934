//! Majority-vote pass over face neighborhoods.
//!
//! A face compares its normal against each edge neighbor with a usable
//! normal and flips when a strict majority disagrees. The scan reads only
//! pre-pass normals; flips are applied in one batch afterwards, so the
//! outcome does not depend on face order.

use tracing::debug;

use crate::view::OrientView;

/// Run one majority-vote pass and return the flipped face indices,
/// sorted ascending.
///
/// A face is marked to flip iff more than half of its neighbors with
/// usable normals point the opposite way (negative dot product). Ties do
/// not flip, faces without usable neighbors do not flip, and degenerate
/// faces never vote on their own behalf.
pub(crate) fn vote_pass(view: &mut OrientView<'_>) -> Vec<usize> {
    let mut marked = Vec::new();

    for face in view.faces() {
        let Some(normal) = view.normal_of(face) else {
            continue;
        };

        let mut usable = 0_usize;
        let mut opposite = 0_usize;
        for &neighbor in view.neighbors(face) {
            let Some(other) = view.normal_of(neighbor) else {
                continue;
            };
            usable += 1;
            if normal.dot(&other) < 0.0 {
                opposite += 1;
            }
        }

        // Strict majority in integer form: opposite > usable / 2 exactly
        if opposite * 2 > usable {
            debug!(face, opposite, usable, "majority vote flips face");
            marked.push(face);
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

    fn strip(faces: Vec<[u32; 3]>) -> IndexedMesh {
        let vertices = vec![
            Vertex::from_coords(0.0, 0.0, 0.0),
            Vertex::from_coords(1.0, 0.0, 0.0),
            Vertex::from_coords(2.0, 0.0, 0.0),
            Vertex::from_coords(0.5, 1.0, 0.0),
            Vertex::from_coords(1.5, 1.0, 0.0),
        ];
        IndexedMesh::from_parts(vertices, faces)
    }

    #[test]
    fn consistent_cube_is_stable() {
        let mut cube = unit_cube();
        let mut view = OrientView::build(&mut cube).unwrap();
        assert!(vote_pass(&mut view).is_empty());
    }

    /// Six coplanar triangles around a shared center vertex, all facing
    /// +z.
    fn hex_fan() -> IndexedMesh {
        let mut vertices = vec![Vertex::from_coords(0.0, 0.0, 0.0)];
        for i in 0..6_u32 {
            let angle = f64::from(i) * std::f64::consts::FRAC_PI_3;
            vertices.push(Vertex::from_coords(angle.cos(), angle.sin(), 0.0));
        }
        let faces = (0..6_u32).map(|i| [0, i + 1, (i + 1) % 6 + 1]).collect();
        IndexedMesh::from_parts(vertices, faces)
    }

    #[test]
    fn single_inverted_fan_face_is_flipped_back() {
        let mut fan = hex_fan();
        fan.flip_face(2);
        let mut view = OrientView::build(&mut fan).unwrap();

        // Both ring neighbors disagree with the inverted face
        assert_eq!(vote_pass(&mut view), vec![2]);
        // A second pass has nothing left to do
        assert!(vote_pass(&mut view).is_empty());
    }

    #[test]
    fn perpendicular_neighbors_do_not_vote_against() {
        // A lone inverted cube face keeps its winding: only its coplanar
        // sibling opposes it, the two perpendicular neighbors dot to
        // zero.
        let mut cube = unit_cube();
        cube.flip_face(4);
        let mut view = OrientView::build(&mut cube).unwrap();
        assert!(vote_pass(&mut view).is_empty());
    }

    #[test]
    fn fully_inverted_cube_is_stable() {
        // Every neighbor agrees, so unanimity holds even though all
        // normals point inward.
        let mut cube = unit_cube();
        cube.flip_normals();
        let mut view = OrientView::build(&mut cube).unwrap();
        assert!(vote_pass(&mut view).is_empty());
    }

    #[test]
    fn tie_does_not_flip() {
        // Middle face of a three-face strip with one agreeing and one
        // disagreeing neighbor: 1 opposite of 2 usable is not a majority.
        let mut mesh = strip(vec![[0, 1, 3], [1, 4, 3], [1, 2, 4]]);
        mesh.flip_face(2);
        let mut view = OrientView::build(&mut mesh).unwrap();

        let flipped = vote_pass(&mut view);
        assert!(!flipped.contains(&1));
        // The end face has a single disagreeing neighbor, which is a
        // strict majority of one.
        assert_eq!(flipped, vec![2]);
    }

    #[test]
    fn isolated_face_never_flips() {
        let vertices = vec![
            Vertex::from_coords(0.0, 0.0, 0.0),
            Vertex::from_coords(1.0, 0.0, 0.0),
            Vertex::from_coords(0.5, 1.0, 0.0),
        ];
        let mut mesh = IndexedMesh::from_parts(vertices, vec![[0, 1, 2]]);
        let mut view = OrientView::build(&mut mesh).unwrap();
        assert!(vote_pass(&mut view).is_empty());
    }

    #[test]
    fn mirrored_meshes_flip_mirrored_faces() {
        let mut a = hex_fan();
        a.flip_face(2);
        let mut b = hex_fan();
        b.flip_normals();
        b.flip_face(2);

        let mut view_a = OrientView::build(&mut a).unwrap();
        let mut view_b = OrientView::build(&mut b).unwrap();
        assert_eq!(vote_pass(&mut view_a), vec![2]);
        assert_eq!(vote_pass(&mut view_b), vec![2]);
    }
}
