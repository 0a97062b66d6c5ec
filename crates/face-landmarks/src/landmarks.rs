//! Landmark geometry types

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::DetectError;

/// Landmarks in the base face mesh topology
pub const FACE_LANDMARK_COUNT: usize = 468;

/// Index range covering the left eye region
pub const LEFT_EYE_RANGE: Range<usize> = 33..133;

/// Index range covering the right eye region
pub const RIGHT_EYE_RANGE: Range<usize> = 362..462;

/// One landmark in normalized image coordinates.
///
/// `x` and `y` are fractions of frame width and height. Depth is model
/// dependent and absent for 2D backends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    pub z: Option<f32>,
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: None }
    }
}

/// The full landmark topology for one detected face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    points: Vec<LandmarkPoint>,
}

impl LandmarkSet {
    /// Build a set from raw model output.
    ///
    /// Refined-mesh backends emit extra iris points past index 467; those
    /// are kept. Sets shorter than the base topology are rejected.
    pub fn new(points: Vec<LandmarkPoint>) -> Result<Self, DetectError> {
        if points.len() < FACE_LANDMARK_COUNT {
            return Err(DetectError::IncompleteTopology {
                expected: FACE_LANDMARK_COUNT,
                got: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// A full topology with every landmark at `point`
    pub fn filled(point: LandmarkPoint) -> Self {
        Self {
            points: vec![point; FACE_LANDMARK_COUNT],
        }
    }

    /// Overwrite one landmark region with a single position
    pub fn with_region(mut self, range: Range<usize>, point: LandmarkPoint) -> Self {
        if let Some(slice) = self.points.get_mut(range) {
            for p in slice {
                *p = point;
            }
        }
        self
    }

    /// Landmarks for an index range, e.g. [`LEFT_EYE_RANGE`].
    ///
    /// Empty when the range falls outside the set.
    pub fn region(&self, range: Range<usize>) -> &[LandmarkPoint] {
        self.points.get(range).unwrap_or(&[])
    }

    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_topology() {
        let points = vec![LandmarkPoint::new(0.5, 0.5); 10];
        let err = LandmarkSet::new(points).unwrap_err();
        assert!(matches!(
            err,
            DetectError::IncompleteTopology { expected: 468, got: 10 }
        ));
    }

    #[test]
    fn test_accepts_refined_topology() {
        // Iris refinement adds 10 points past the base mesh.
        let points = vec![LandmarkPoint::new(0.5, 0.5); 478];
        let set = LandmarkSet::new(points).unwrap();
        assert_eq!(set.len(), 478);
    }

    #[test]
    fn test_region_overwrite_and_slice() {
        let set = LandmarkSet::filled(LandmarkPoint::new(0.5, 0.5))
            .with_region(LEFT_EYE_RANGE, LandmarkPoint::new(0.2, 0.4));

        let left = set.region(LEFT_EYE_RANGE);
        assert_eq!(left.len(), 100);
        assert!(left.iter().all(|p| p.x == 0.2 && p.y == 0.4));

        // Untouched region keeps the fill value.
        let right = set.region(RIGHT_EYE_RANGE);
        assert_eq!(right.len(), 100);
        assert!(right.iter().all(|p| p.x == 0.5));

        // Out-of-range lookup is empty, never a panic.
        assert!(set.region(460..480).is_empty());
    }
}
