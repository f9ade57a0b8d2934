//! Ray intersection service for the probing heuristics.
//!
//! A [`RayCaster`] snapshots the mesh triangles into a BVH (median split
//! on the longest axis, small multi-triangle leaves) and answers
//! closest-hit queries. Probes that miss everything return `None`; a miss
//! is a valid answer, not a failure.

use mesh_types::{Aabb, IndexedMesh, MeshTopology, Point3, Triangle, Vector3};

/// Triangles per BVH leaf before a split stops paying for itself.
const MAX_LEAF_SIZE: usize = 4;

/// Closest intersection of a probe ray with the mesh.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RayHit {
    /// Distance from the ray origin to the hit point.
    pub distance: f64,
    /// The hit point in mesh coordinates.
    pub point: Point3<f64>,
    /// Index of the face that was hit.
    pub face: usize,
}

#[derive(Debug)]
enum BvhNode {
    Leaf {
        aabb: Aabb,
        faces: Vec<usize>,
    },
    Internal {
        aabb: Aabb,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    fn build(triangles: &[Triangle], indices: &mut [usize], epsilon: f64) -> Option<Self> {
        if indices.is_empty() {
            return None;
        }

        let mut aabb = Aabb::empty();
        for &idx in indices.iter() {
            let tri = &triangles[idx];
            aabb.expand_to_include(&tri.v0);
            aabb.expand_to_include(&tri.v1);
            aabb.expand_to_include(&tri.v2);
        }
        let aabb = aabb.expanded(epsilon);

        if indices.len() <= MAX_LEAF_SIZE {
            return Some(Self::Leaf {
                aabb,
                faces: indices.to_vec(),
            });
        }

        let axis = aabb.longest_axis();
        indices.sort_unstable_by(|&a, &b| {
            let ca = triangles[a].centroid()[axis];
            let cb = triangles[b].centroid()[axis];
            ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = indices.len() / 2;
        let (left_indices, right_indices) = indices.split_at_mut(mid);
        let left = Self::build(triangles, left_indices, epsilon);
        let right = Self::build(triangles, right_indices, epsilon);

        match (left, right) {
            (Some(l), Some(r)) => Some(Self::Internal {
                aabb,
                left: Box::new(l),
                right: Box::new(r),
            }),
            (Some(node), None) | (None, Some(node)) => Some(node),
            (None, None) => None,
        }
    }

    const fn aabb(&self) -> &Aabb {
        match self {
            Self::Leaf { aabb, .. } | Self::Internal { aabb, .. } => aabb,
        }
    }
}

/// Slab test against an AABB with a precomputed inverse direction.
///
/// Returns the entry distance clamped to zero, or `None` when the ray
/// misses the box entirely or the box lies behind the origin.
fn slab_entry(aabb: &Aabb, origin: &Point3<f64>, dir_inv: &Vector3<f64>) -> Option<f64> {
    let tx1 = (aabb.min.x - origin.x) * dir_inv.x;
    let tx2 = (aabb.max.x - origin.x) * dir_inv.x;
    let ty1 = (aabb.min.y - origin.y) * dir_inv.y;
    let ty2 = (aabb.max.y - origin.y) * dir_inv.y;
    let tz1 = (aabb.min.z - origin.z) * dir_inv.z;
    let tz2 = (aabb.max.z - origin.z) * dir_inv.z;

    let t_min = tx1.min(tx2).max(ty1.min(ty2)).max(tz1.min(tz2));
    let t_max = tx1.max(tx2).min(ty1.max(ty2)).min(tz1.max(tz2));

    (t_max >= t_min && t_max >= 0.0).then(|| t_min.max(0.0))
}

/// Möller–Trumbore ray-triangle intersection.
///
/// Returns the hit distance, or `None` for parallel rays, hits outside
/// the triangle, and hits closer than `epsilon` (including behind the
/// origin).
#[allow(clippy::many_single_char_names)]
fn ray_triangle_intersect(
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    tri: &Triangle,
    epsilon: f64,
) -> Option<f64> {
    let edge1 = tri.v1 - tri.v0;
    let edge2 = tri.v2 - tri.v0;

    let h = direction.cross(&edge2);
    let a = edge1.dot(&h);
    if a.abs() < epsilon {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - tri.v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > epsilon).then_some(t)
}

/// Closest-hit ray caster over a snapshot of the mesh triangles.
///
/// Built once per strategy invocation; flips applied after the snapshot
/// do not move any geometry, only winding, so the snapshot stays valid
/// for the whole batch of probes.
#[derive(Debug)]
pub(crate) struct RayCaster {
    triangles: Vec<Triangle>,
    root: Option<BvhNode>,
    ray_epsilon: f64,
}

impl RayCaster {
    /// Snapshot the mesh triangles and build the BVH.
    pub fn build(mesh: &IndexedMesh, ray_epsilon: f64) -> Self {
        let triangles: Vec<Triangle> = mesh.triangles().collect();
        let mut indices: Vec<usize> = (0..triangles.len()).collect();
        let root = BvhNode::build(&triangles, &mut indices, ray_epsilon);
        Self {
            triangles,
            root,
            ray_epsilon,
        }
    }

    /// Find the closest hit along `direction` within `max_distance`.
    ///
    /// `skip_face` excludes one face from consideration, normally the
    /// face the probe started from. A miss is `None`.
    pub fn cast(
        &self,
        origin: Point3<f64>,
        direction: Vector3<f64>,
        max_distance: f64,
        skip_face: Option<usize>,
    ) -> Option<RayHit> {
        let root = self.root.as_ref()?;
        let dir_inv = Vector3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z);

        self.trace(root, &origin, &direction, &dir_inv, max_distance, skip_face)
            .map(|(distance, face)| RayHit {
                distance,
                point: origin + direction * distance,
                face,
            })
    }

    fn trace(
        &self,
        node: &BvhNode,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        dir_inv: &Vector3<f64>,
        max_distance: f64,
        skip_face: Option<usize>,
    ) -> Option<(f64, usize)> {
        let entry = slab_entry(node.aabb(), origin, dir_inv)?;
        if entry > max_distance {
            return None;
        }

        match node {
            BvhNode::Leaf { faces, .. } => faces
                .iter()
                .filter(|&&face| Some(face) != skip_face)
                .filter_map(|&face| {
                    ray_triangle_intersect(origin, direction, &self.triangles[face], self.ray_epsilon)
                        .filter(|&t| t <= max_distance)
                        .map(|t| (t, face))
                })
                .min_by(|(t1, _), (t2, _)| t1.partial_cmp(t2).unwrap_or(std::cmp::Ordering::Equal)),
            BvhNode::Internal { left, right, .. } => {
                let hit_left =
                    self.trace(left, origin, direction, dir_inv, max_distance, skip_face);
                // A left hit tightens the search range for the right child
                let max_right = hit_left.map_or(max_distance, |(t, _)| t);
                let hit_right =
                    self.trace(right, origin, direction, dir_inv, max_right, skip_face);

                match (hit_left, hit_right) {
                    (Some((t1, f1)), Some((t2, f2))) => {
                        if t1 <= t2 {
                            Some((t1, f1))
                        } else {
                            Some((t2, f2))
                        }
                    }
                    (Some(hit), None) | (None, Some(hit)) => Some(hit),
                    (None, None) => None,
                }
            }
        }
    }
}
