//! Gaze thresholds

use serde::{Deserialize, Serialize};

/// Horizontal gaze limits in normalized frame coordinates.
///
/// A face is looking away when its left-eye centroid crosses left of
/// `lookaway_left_x` or its right-eye centroid crosses right of
/// `lookaway_right_x`. Both comparisons are strict, so a centroid sitting
/// exactly on a limit is still in bounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GazeConfig {
    pub lookaway_left_x: f32,
    pub lookaway_right_x: f32,
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            lookaway_left_x: 0.3,
            lookaway_right_x: 0.7,
        }
    }
}

impl GazeConfig {
    /// Narrower band for high-stakes sessions
    pub fn strict() -> Self {
        Self {
            lookaway_left_x: 0.35,
            lookaway_right_x: 0.65,
        }
    }

    /// Wider band for webcams mounted off-center
    pub fn lenient() -> Self {
        Self {
            lookaway_left_x: 0.2,
            lookaway_right_x: 0.8,
        }
    }

    /// The look-away rule over a pair of eye centroid x positions
    pub fn is_lookaway(&self, left_x: f32, right_x: f32) -> bool {
        left_x < self.lookaway_left_x || right_x > self.lookaway_right_x
    }
}
