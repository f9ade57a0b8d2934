//! Parameters for orientation strategies.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound on iterative vote passes.
pub const MAX_PASSES_LIMIT: usize = 20;

/// Parameters for orientation strategies.
///
/// All strategies take their configuration explicitly through this struct;
/// nothing is read from ambient state.
///
/// # Example
///
/// ```
/// use mesh_orient::OrientParams;
///
/// // Default parameters (5 vote passes, 0.5 unit probes)
/// let params = OrientParams::default();
/// assert_eq!(params.max_passes, 5);
///
/// // Single-pass voting
/// let single = OrientParams::single_pass();
/// assert_eq!(single.max_passes, 1);
///
/// // Builder style
/// let custom = OrientParams::default()
///     .max_passes(10)
///     .probe_distance(2.0);
/// assert_eq!(custom.max_passes, 10);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientParams {
    /// Maximum number of iterative vote passes. Clamped to 1..=20.
    pub max_passes: usize,

    /// Maximum probe ray distance for the exposure and occlusion
    /// heuristics, in mesh units.
    pub probe_distance: f64,

    /// Offset applied to probe ray origins along the face normal, so a
    /// probe does not start exactly on its own face.
    pub probe_epsilon: f64,

    /// Hit distance below which the occlusion heuristic flips a face.
    pub occlusion_threshold: f64,

    /// Epsilon for ray-triangle intersection tests.
    pub ray_epsilon: f64,
}

impl Default for OrientParams {
    fn default() -> Self {
        Self {
            max_passes: 5,
            probe_distance: 0.5,
            probe_epsilon: 1e-3,
            occlusion_threshold: 0.1,
            ray_epsilon: 1e-8,
        }
    }
}

impl OrientParams {
    /// Create params for a single vote pass.
    #[must_use]
    pub fn single_pass() -> Self {
        Self {
            max_passes: 1,
            ..Self::default()
        }
    }

    /// Create params for stubborn meshes: the full pass budget.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            max_passes: MAX_PASSES_LIMIT,
            ..Self::default()
        }
    }

    /// Set the maximum number of vote passes, clamped to 1..=20.
    #[must_use]
    pub fn max_passes(mut self, passes: usize) -> Self {
        self.max_passes = passes.clamp(1, MAX_PASSES_LIMIT);
        self
    }

    /// Set the maximum probe ray distance.
    #[must_use]
    pub const fn probe_distance(mut self, distance: f64) -> Self {
        self.probe_distance = distance;
        self
    }

    /// Set the probe origin offset.
    #[must_use]
    pub const fn probe_epsilon(mut self, epsilon: f64) -> Self {
        self.probe_epsilon = epsilon;
        self
    }

    /// Set the occlusion flip threshold.
    #[must_use]
    pub const fn occlusion_threshold(mut self, threshold: f64) -> Self {
        self.occlusion_threshold = threshold;
        self
    }

    /// Number of passes to actually run, with the 1..=20 clamp applied.
    #[must_use]
    pub fn effective_passes(&self) -> usize {
        self.max_passes.clamp(1, MAX_PASSES_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = OrientParams::default();
        assert_eq!(params.max_passes, 5);
        assert!((params.probe_distance - 0.5).abs() < f64::EPSILON);
        assert!((params.probe_epsilon - 1e-3).abs() < f64::EPSILON);
        assert!((params.occlusion_threshold - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_pass_params() {
        let params = OrientParams::single_pass();
        assert_eq!(params.max_passes, 1);
    }

    #[test]
    fn test_thorough_params() {
        let params = OrientParams::thorough();
        assert_eq!(params.max_passes, MAX_PASSES_LIMIT);
    }

    #[test]
    fn test_max_passes_clamped() {
        let too_many = OrientParams::default().max_passes(100);
        assert_eq!(too_many.max_passes, MAX_PASSES_LIMIT);

        let zero = OrientParams::default().max_passes(0);
        assert_eq!(zero.max_passes, 1);
    }

    #[test]
    fn test_effective_passes_clamps_direct_assignment() {
        let mut params = OrientParams::default();
        params.max_passes = 0;
        assert_eq!(params.effective_passes(), 1);

        params.max_passes = 50;
        assert_eq!(params.effective_passes(), MAX_PASSES_LIMIT);
    }

    #[test]
    fn test_builder_pattern() {
        let params = OrientParams::default()
            .max_passes(3)
            .probe_distance(1.5)
            .occlusion_threshold(0.05);

        assert_eq!(params.max_passes, 3);
        assert!((params.probe_distance - 1.5).abs() < f64::EPSILON);
        assert!((params.occlusion_threshold - 0.05).abs() < f64::EPSILON);
    }
}
