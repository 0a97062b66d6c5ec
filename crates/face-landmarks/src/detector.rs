//! Detection adapter
//!
//! Mirrors the upstream face-mesh setup: at most two faces, refined eye
//! landmarks, 0.5 detection and tracking confidence floors.

use camera_stream::VideoFrame;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{DetectError, LandmarkSet};

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Upper bound on faces reported per frame
    pub max_faces: usize,
    /// Track eye and iris landmarks at higher resolution
    pub refine_landmarks: bool,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_faces: 2,
            refine_landmarks: true,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

/// A face landmark inference backend.
///
/// Implementations are driven from a single call site at a time; `&mut self`
/// makes overlapping inference impossible to express.
pub trait LandmarkModel: Send {
    /// Apply detector options to the backend session.
    ///
    /// Called once when the model is handed to a [`FaceDetector`]. Backends
    /// map the confidence floors and the refinement flag onto their session
    /// settings; models with no tunables keep the no-op default.
    fn configure(&mut self, _config: &DetectorConfig) {}

    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<LandmarkSet>, DetectError>;
}

/// Containment wrapper around a [`LandmarkModel`]
pub struct FaceDetector {
    model: Box<dyn LandmarkModel>,
    config: DetectorConfig,
}

impl FaceDetector {
    pub fn new(mut model: Box<dyn LandmarkModel>, config: DetectorConfig) -> Self {
        model.configure(&config);
        Self { model, config }
    }

    /// Run the model on one frame.
    ///
    /// Model failures do not escape. They are logged and reported as zero
    /// faces, so a transient inference hiccup reads like an empty frame
    /// instead of tearing the pipeline down.
    pub fn detect(&mut self, frame: &VideoFrame) -> Vec<LandmarkSet> {
        let mut faces = match self.model.detect(frame) {
            Ok(faces) => faces,
            Err(e) => {
                debug!("landmark inference failed on frame {}: {}", frame.sequence, e);
                return Vec::new();
            }
        };
        if faces.len() > self.config.max_faces {
            debug!(
                "model returned {} faces, keeping first {}",
                faces.len(),
                self.config.max_faces
            );
            faces.truncate(self.config.max_faces);
        }
        faces
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }
}
