//! Behavioral signal extraction
//!
//! Turns detected landmark sets into per-frame [`Observation`]s: how many
//! faces are present and whether the gaze left the allowed horizontal band.
//! Everything here is pure geometry; the monitor owns timing and the
//! classifier owns debouncing.

pub mod analysis;
pub mod config;
pub mod observation;

pub use analysis::{analyze_frame, extract, eye_centers, FaceGaze, FrameAnalysis};
pub use config::GazeConfig;
pub use observation::Observation;
