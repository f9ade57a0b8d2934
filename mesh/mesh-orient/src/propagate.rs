//! Seed-anchored flood alignment.
//!
//! A breadth-first traversal carries a reference normal outward from a
//! seed face. Every visited face that disagrees in sign with its
//! reference flips, then hands its own (possibly just flipped) normal to
//! its neighbors. Faces in components the seed cannot reach are never
//! touched.

use std::collections::VecDeque;

use mesh_types::{MeshBounds, Vector3};
use tracing::debug;

use crate::view::OrientView;

/// Fixed-size visited set, one bit per face.
#[derive(Debug)]
struct FaceBitset {
    words: Vec<u64>,
}

impl FaceBitset {
    fn new(face_count: usize) -> Self {
        Self {
            words: vec![0; face_count.div_ceil(64)],
        }
    }

    /// Mark a face visited. Returns `true` if it was not visited before.
    fn insert(&mut self, face: usize) -> bool {
        let mask = 1_u64 << (face % 64);
        let word = &mut self.words[face / 64];
        let fresh = *word & mask == 0;
        *word |= mask;
        fresh
    }

    fn contains(&self, face: usize) -> bool {
        self.words[face / 64] & (1_u64 << (face % 64)) != 0
    }
}

/// Flood-align every face reachable from `seed` and return the flipped
/// face indices, sorted ascending.
///
/// The seed's own normal anchors the traversal, so the seed itself never
/// flips. Degenerate faces pass the incoming reference normal through
/// unchanged.
pub(crate) fn propagate_from_seed(view: &mut OrientView<'_>, seed: usize) -> Vec<usize> {
    let mut visited = FaceBitset::new(view.face_count());
    let mut queue: VecDeque<(usize, Vector3<f64>)> = VecDeque::new();

    let seed_reference = view.normal_of(seed).unwrap_or_else(Vector3::zeros);
    queue.push_back((seed, seed_reference));

    let mut flipped = Vec::new();
    while let Some((face, reference)) = queue.pop_front() {
        if !visited.insert(face) {
            continue;
        }

        let outgoing = match view.normal_of(face) {
            Some(normal) => {
                if normal.dot(&reference) < 0.0 {
                    debug!(face, "normal disagrees with flood reference, flipping");
                    view.flip(face);
                    flipped.push(face);
                    -normal
                } else {
                    normal
                }
            }
            None => reference,
        };

        for &neighbor in view.neighbors(face) {
            if !visited.contains(neighbor) {
                queue.push_back((neighbor, outgoing));
            }
        }
    }

    flipped.sort_unstable();
    flipped
}

/// The face whose centroid lies nearest the minimum corner of the mesh
/// bounds, used to seed an automatic flood.
pub(crate) fn seed_nearest_min_corner(view: &OrientView<'_>) -> usize {
    let corner = view.mesh().bounds().min;

    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for face in view.faces() {
        if let Some(centroid) = view.centroid_of(face) {
            let distance = (centroid - corner).norm_squared();
            if distance < best_distance {
                best_distance = distance;
                best = face;
            }
        }
    }
    best
}
