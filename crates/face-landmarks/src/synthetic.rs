//! Scripted landmark model
//!
//! Plays back a fixed sequence of scenes, one per `detect` call, holding the
//! final scene forever. Scenes map directly onto the classifier-visible
//! outcomes: an empty room, a centered face, an averted gaze, a second
//! person, a model failure.

use camera_stream::VideoFrame;

use crate::{
    DetectError, LandmarkModel, LandmarkPoint, LandmarkSet, LEFT_EYE_RANGE, RIGHT_EYE_RANGE,
};

/// What a scripted frame shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    /// Nobody in view
    Empty,
    /// One face, eyes near frame center
    Centered,
    /// One face, gaze pushed toward the left frame edge
    GazeLeft,
    /// One face, gaze pushed toward the right frame edge
    GazeRight,
    /// Two faces in view
    TwoFaces,
    /// Model failure on this frame
    Failing,
}

/// Deterministic [`LandmarkModel`] for tests and demos
pub struct SyntheticModel {
    script: Vec<Scene>,
    cursor: usize,
    repeat: bool,
}

impl SyntheticModel {
    /// Play `script` scene by scene, repeating the final scene forever
    pub fn scripted(script: Vec<Scene>) -> Self {
        Self {
            script,
            cursor: 0,
            repeat: false,
        }
    }

    /// Play `script` scene by scene, wrapping back to the start
    pub fn cycle(script: Vec<Scene>) -> Self {
        Self {
            script,
            cursor: 0,
            repeat: true,
        }
    }

    /// A model that always shows one centered face
    pub fn steady() -> Self {
        Self::scripted(vec![Scene::Centered])
    }

    fn next_scene(&mut self) -> Scene {
        if self.script.is_empty() {
            return Scene::Empty;
        }
        let scene = self.script[self.cursor];
        if self.cursor + 1 < self.script.len() {
            self.cursor += 1;
        } else if self.repeat {
            self.cursor = 0;
        }
        scene
    }
}

impl LandmarkModel for SyntheticModel {
    fn detect(&mut self, _frame: &VideoFrame) -> Result<Vec<LandmarkSet>, DetectError> {
        let faces = match self.next_scene() {
            Scene::Empty => Vec::new(),
            Scene::Centered => vec![face_with_eyes((0.44, 0.45), (0.56, 0.45))],
            Scene::GazeLeft => vec![face_with_eyes((0.22, 0.45), (0.38, 0.45))],
            Scene::GazeRight => vec![face_with_eyes((0.62, 0.45), (0.78, 0.45))],
            Scene::TwoFaces => vec![
                face_with_eyes((0.34, 0.40), (0.46, 0.40)),
                face_with_eyes((0.56, 0.52), (0.66, 0.52)),
            ],
            Scene::Failing => return Err(DetectError::Inference("scripted failure".into())),
        };
        Ok(faces)
    }
}

/// Build a full landmark set whose eye regions sit at the given normalized
/// centers. Every other landmark clusters at mid frame.
pub fn face_with_eyes(left: (f32, f32), right: (f32, f32)) -> LandmarkSet {
    let fill = LandmarkPoint {
        x: 0.5,
        y: 0.5,
        z: Some(0.0),
    };
    LandmarkSet::filled(fill)
        .with_region(
            LEFT_EYE_RANGE,
            LandmarkPoint {
                x: left.0,
                y: left.1,
                z: Some(0.0),
            },
        )
        .with_region(
            RIGHT_EYE_RANGE,
            LandmarkPoint {
                x: right.0,
                y: right.1,
                z: Some(0.0),
            },
        )
}
