//! Mutable adjacency view over a mesh.
//!
//! [`OrientView`] is the only window strategies get onto a mesh: it caches
//! face normals, centroids, and edge adjacency at build time, and funnels
//! every mutation through [`OrientView::flip`] so the cache never
//! desynchronizes from the winding.

use hashbrown::HashMap;
use mesh_types::{IndexedMesh, MeshTopology, Point3, Vector3};
use tracing::{debug, warn};

use crate::error::{OrientError, OrientResult};

/// Normalize an edge so the smaller vertex index comes first.
#[inline]
fn normalize_edge(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

/// Adjacency view over a mesh with cached per-face normals and centroids.
///
/// Connectivity is immutable after build: flipping a face changes its
/// winding and cached normal but never the adjacency. Faces with
/// degenerate (zero-length) normals report `None` from
/// [`normal_of`](Self::normal_of); they stay in the adjacency and are
/// counted, but cast no votes of their own.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_orient::OrientView;
///
/// let mut cube = unit_cube();
/// let view = OrientView::build(&mut cube).unwrap();
///
/// assert_eq!(view.face_count(), 12);
/// // Every triangle of a closed cube has three edge neighbors
/// assert_eq!(view.neighbors(0).len(), 3);
/// assert!(view.is_closed());
/// ```
#[derive(Debug)]
pub struct OrientView<'a> {
    mesh: &'a mut IndexedMesh,
    edge_to_faces: HashMap<(u32, u32), Vec<usize>>,
    neighbors: Vec<Vec<usize>>,
    normals: Vec<Option<Vector3<f64>>>,
    centroids: Vec<Point3<f64>>,
    boundary_faces: Vec<usize>,
    boundary_edge_count: usize,
    non_manifold_edge_count: usize,
    degenerate_face_count: usize,
}

impl<'a> OrientView<'a> {
    /// Build the view: edge map, neighbor lists, cached normals and
    /// centroids.
    ///
    /// Faces joined across a non-manifold edge (more than two incident
    /// faces) are all mutual neighbors; nothing is special-cased away.
    ///
    /// # Errors
    ///
    /// Returns [`OrientError::EmptyMesh`] if the mesh has no vertices or
    /// no faces.
    pub fn build(mesh: &'a mut IndexedMesh) -> OrientResult<Self> {
        if mesh.is_empty() {
            return Err(OrientError::EmptyMesh);
        }

        let face_count = mesh.faces.len();

        let mut edge_to_faces: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
        for (face_idx, face) in mesh.faces.iter().enumerate() {
            for i in 0..3 {
                let edge = normalize_edge(face[i], face[(i + 1) % 3]);
                edge_to_faces.entry(edge).or_default().push(face_idx);
            }
        }

        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); face_count];
        let mut is_boundary = vec![false; face_count];
        let mut boundary_edge_count = 0;
        let mut non_manifold_edge_count = 0;

        for faces in edge_to_faces.values() {
            match faces.len() {
                1 => {
                    is_boundary[faces[0]] = true;
                    boundary_edge_count += 1;
                }
                2 => {}
                _ => non_manifold_edge_count += 1,
            }
            for &a in faces {
                for &b in faces {
                    if a != b && !neighbors[a].contains(&b) {
                        neighbors[a].push(b);
                    }
                }
            }
        }

        // Neighbor order must not depend on hash iteration order
        for list in &mut neighbors {
            list.sort_unstable();
        }

        let mut normals = Vec::with_capacity(face_count);
        let mut centroids = Vec::with_capacity(face_count);
        let mut degenerate_face_count = 0;
        for tri in mesh.triangles() {
            let normal = tri.normal();
            if normal.is_none() {
                degenerate_face_count += 1;
            }
            normals.push(normal);
            centroids.push(tri.centroid());
        }

        if degenerate_face_count > 0 {
            warn!(
                count = degenerate_face_count,
                "degenerate faces have no usable normal and cast no votes"
            );
        }
        if non_manifold_edge_count > 0 {
            warn!(
                count = non_manifold_edge_count,
                "non-manifold edges present, treating all incident faces as neighbors"
            );
        }
        debug!(
            faces = face_count,
            edges = edge_to_faces.len(),
            boundary_edges = boundary_edge_count,
            "adjacency view built"
        );

        let boundary_faces = is_boundary
            .iter()
            .enumerate()
            .filter_map(|(idx, &b)| b.then_some(idx))
            .collect();

        Ok(Self {
            mesh,
            edge_to_faces,
            neighbors,
            normals,
            centroids,
            boundary_faces,
            boundary_edge_count,
            non_manifold_edge_count,
            degenerate_face_count,
        })
    }

    /// Number of faces in the mesh.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.normals.len()
    }

    /// Iterate over all face indices.
    pub fn faces(&self) -> impl Iterator<Item = usize> {
        0..self.face_count()
    }

    /// The three normalized edge keys of a face, or `None` if the index
    /// is out of bounds.
    #[must_use]
    pub fn edges_of(&self, face: usize) -> Option<[(u32, u32); 3]> {
        self.mesh.faces.get(face).map(|&[v0, v1, v2]| {
            [
                normalize_edge(v0, v1),
                normalize_edge(v1, v2),
                normalize_edge(v2, v0),
            ]
        })
    }

    /// All faces incident to an edge (0, 1, 2, or more for non-manifold
    /// geometry). Vertex order does not matter.
    #[must_use]
    pub fn faces_for_edge(&self, v0: u32, v1: u32) -> &[usize] {
        self.edge_to_faces
            .get(&normalize_edge(v0, v1))
            .map_or(&[], Vec::as_slice)
    }

    /// Edge-adjacent neighbor faces of a face, sorted ascending.
    #[must_use]
    pub fn neighbors(&self, face: usize) -> &[usize] {
        self.neighbors.get(face).map_or(&[], Vec::as_slice)
    }

    /// Cached unit normal of a face.
    ///
    /// `None` for degenerate faces and out-of-bounds indices. Reflects
    /// the current winding immediately after a [`flip`](Self::flip).
    #[inline]
    #[must_use]
    pub fn normal_of(&self, face: usize) -> Option<Vector3<f64>> {
        self.normals.get(face).copied().flatten()
    }

    /// Cached centroid of a face.
    #[inline]
    #[must_use]
    pub fn centroid_of(&self, face: usize) -> Option<Point3<f64>> {
        self.centroids.get(face).copied()
    }

    /// Reverse the winding of a face, inverting its cached normal.
    ///
    /// The centroid and adjacency are unchanged. Flipping twice restores
    /// the original state. Does nothing if the index is out of bounds.
    pub fn flip(&mut self, face: usize) {
        if face >= self.face_count() {
            return;
        }
        self.mesh.flip_face(face);
        if let Some(Some(normal)) = self.normals.get_mut(face) {
            *normal = -*normal;
        }
    }

    /// Faces with at least one boundary edge (exactly one incident face),
    /// sorted ascending.
    #[must_use]
    pub fn boundary_faces(&self) -> &[usize] {
        &self.boundary_faces
    }

    /// Check whether the mesh is closed (no boundary edges).
    #[inline]
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.boundary_edge_count == 0
    }

    /// Number of edges shared by more than two faces.
    #[inline]
    #[must_use]
    pub const fn non_manifold_edge_count(&self) -> usize {
        self.non_manifold_edge_count
    }

    /// Number of faces with zero-length normals.
    #[inline]
    #[must_use]
    pub const fn degenerate_face_count(&self) -> usize {
        self.degenerate_face_count
    }

    /// Read access to the underlying mesh.
    #[inline]
    #[must_use]
    pub fn mesh(&self) -> &IndexedMesh {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::{unit_cube, Vertex};

    fn two_triangles_sharing_edge() -> IndexedMesh {
        let vertices = vec![
            Vertex::from_coords(0.0, 0.0, 0.0),
            Vertex::from_coords(1.0, 0.0, 0.0),
            Vertex::from_coords(0.5, 1.0, 0.0),
            Vertex::from_coords(0.5, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 3, 1]];
        IndexedMesh::from_parts(vertices, faces)
    }

    fn non_manifold_fan() -> IndexedMesh {
        // Three triangles all sharing the edge (0, 1)
        let vertices = vec![
            Vertex::from_coords(0.0, 0.0, 0.0),
            Vertex::from_coords(1.0, 0.0, 0.0),
            Vertex::from_coords(0.5, 1.0, 0.0),
            Vertex::from_coords(0.5, 0.0, 1.0),
            Vertex::from_coords(0.5, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 1, 3], [0, 1, 4]];
        IndexedMesh::from_parts(vertices, faces)
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let mut mesh = IndexedMesh::new();
        assert!(matches!(
            OrientView::build(&mut mesh),
            Err(OrientError::EmptyMesh)
        ));
    }

    #[test]
    fn cube_adjacency() {
        let mut cube = unit_cube();
        let view = OrientView::build(&mut cube).unwrap();

        assert_eq!(view.face_count(), 12);
        assert!(view.is_closed());
        assert_eq!(view.non_manifold_edge_count(), 0);
        for face in view.faces() {
            assert_eq!(view.neighbors(face).len(), 3);
        }
        assert!(view.boundary_faces().is_empty());
    }

    #[test]
    fn open_pair_has_boundary_faces() {
        let mut mesh = two_triangles_sharing_edge();
        let view = OrientView::build(&mut mesh).unwrap();

        assert!(!view.is_closed());
        assert_eq!(view.boundary_faces(), &[0, 1]);
        assert_eq!(view.neighbors(0), &[1]);
        assert_eq!(view.neighbors(1), &[0]);
    }

    #[test]
    fn non_manifold_edge_links_all_faces() {
        let mut mesh = non_manifold_fan();
        let view = OrientView::build(&mut mesh).unwrap();

        assert_eq!(view.non_manifold_edge_count(), 1);
        assert_eq!(view.neighbors(0), &[1, 2]);
        assert_eq!(view.neighbors(1), &[0, 2]);
        assert_eq!(view.neighbors(2), &[0, 1]);
        assert_eq!(view.faces_for_edge(0, 1).len(), 3);
        assert_eq!(view.faces_for_edge(1, 0).len(), 3);
    }

    #[test]
    fn flip_negates_cached_normal() {
        let mut mesh = two_triangles_sharing_edge();
        let mut view = OrientView::build(&mut mesh).unwrap();

        let before = view.normal_of(0).unwrap();
        view.flip(0);
        let after = view.normal_of(0).unwrap();
        assert!((before + after).norm() < 1e-12);

        view.flip(0);
        let restored = view.normal_of(0).unwrap();
        assert!((before - restored).norm() < 1e-12);
    }

    #[test]
    fn flip_updates_winding_in_mesh() {
        let mut mesh = two_triangles_sharing_edge();
        let original = mesh.faces[0];
        {
            let mut view = OrientView::build(&mut mesh).unwrap();
            view.flip(0);
        }
        assert_ne!(mesh.faces[0], original);
        assert_eq!(mesh.faces[0], [original[0], original[2], original[1]]);
    }

    #[test]
    fn degenerate_face_has_no_normal_but_stays_adjacent() {
        let vertices = vec![
            Vertex::from_coords(0.0, 0.0, 0.0),
            Vertex::from_coords(1.0, 0.0, 0.0),
            Vertex::from_coords(0.5, 1.0, 0.0),
            Vertex::from_coords(2.0, 0.0, 0.0),
        ];
        // Face 1 is collinear (all on the x axis)
        let faces = vec![[0, 1, 2], [0, 3, 1]];
        let mut mesh = IndexedMesh::from_parts(vertices, faces);
        let view = OrientView::build(&mut mesh).unwrap();

        assert_eq!(view.degenerate_face_count(), 1);
        assert!(view.normal_of(1).is_none());
        assert_eq!(view.neighbors(0), &[1]);
    }

    #[test]
    fn edges_of_returns_normalized_keys() {
        let mut mesh = two_triangles_sharing_edge();
        let view = OrientView::build(&mut mesh).unwrap();

        let edges = view.edges_of(1).unwrap();
        for (a, b) in edges {
            assert!(a < b);
        }
        assert!(view.edges_of(99).is_none());
    }
}
