//! Face landmark detection
//!
//! Wraps a landmark inference backend behind the [`LandmarkModel`] trait so
//! production models and the scripted [`SyntheticModel`] are interchangeable.
//! The [`FaceDetector`] adapter owns failure containment: a model error is
//! logged and surfaces downstream as zero detected faces.

pub mod detector;
pub mod landmarks;
pub mod synthetic;

pub use detector::{DetectorConfig, FaceDetector, LandmarkModel};
pub use landmarks::{
    LandmarkPoint, LandmarkSet, FACE_LANDMARK_COUNT, LEFT_EYE_RANGE, RIGHT_EYE_RANGE,
};
pub use synthetic::{face_with_eyes, Scene, SyntheticModel};

use thiserror::Error;

/// Landmark detection failures
#[derive(Error, Debug)]
pub enum DetectError {
    #[error("Landmark model is not loaded")]
    ModelUnavailable,

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Expected at least {expected} landmarks per face, got {got}")]
    IncompleteTopology { expected: usize, got: usize },
}
