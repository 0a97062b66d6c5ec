//! Frame analysis
//!
//! Centroid math over the fixed eye-landmark regions, then the look-away
//! verdict per face and aggregated per frame.

use face_landmarks::{LandmarkPoint, LandmarkSet, LEFT_EYE_RANGE, RIGHT_EYE_RANGE};
use serde::Serialize;

use crate::{GazeConfig, Observation};

/// Eye centroids and the gaze verdict for one face
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FaceGaze {
    /// Left-eye centroid, normalized (x, y)
    pub left_eye: (f32, f32),
    /// Right-eye centroid, normalized (x, y)
    pub right_eye: (f32, f32),
    pub looking_away: bool,
}

/// Everything an overlay needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameAnalysis {
    pub observation: Observation,
    pub gazes: Vec<FaceGaze>,
    /// The landmark sets the verdicts came from, kept whole for mesh drawing
    pub landmarks: Vec<LandmarkSet>,
}

fn region_center(points: &[LandmarkPoint]) -> Option<(f32, f32)> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f32;
    let (sx, sy) = points
        .iter()
        .fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some((sx / n, sy / n))
}

/// Eye centroids for one face, judged against the gaze limits.
///
/// `None` when either eye region is missing from the set.
pub fn eye_centers(set: &LandmarkSet, config: &GazeConfig) -> Option<FaceGaze> {
    let left_eye = region_center(set.region(LEFT_EYE_RANGE))?;
    let right_eye = region_center(set.region(RIGHT_EYE_RANGE))?;
    Some(FaceGaze {
        left_eye,
        right_eye,
        looking_away: config.is_lookaway(left_eye.0, right_eye.0),
    })
}

/// Analyze every face in one frame.
///
/// The aggregate `looking_away` is true when any face is away. Face count
/// reflects what the detector reported, not how many gazes resolved. The
/// landmark sets move into the result untouched so overlays can draw the
/// full mesh.
pub fn analyze_frame(
    faces: Vec<LandmarkSet>,
    config: &GazeConfig,
    timestamp_ms: u64,
) -> FrameAnalysis {
    let gazes: Vec<FaceGaze> = faces
        .iter()
        .filter_map(|set| eye_centers(set, config))
        .collect();
    let looking_away = gazes.iter().any(|g| g.looking_away);
    FrameAnalysis {
        observation: Observation::new(faces.len(), looking_away, timestamp_ms),
        gazes,
        landmarks: faces,
    }
}

/// [`analyze_frame`] without the overlay payload
pub fn extract(sets: &[LandmarkSet], config: &GazeConfig, timestamp_ms: u64) -> Observation {
    let looking_away = sets
        .iter()
        .filter_map(|set| eye_centers(set, config))
        .any(|gaze| gaze.looking_away);
    Observation::new(sets.len(), looking_away, timestamp_ms)
}
