//! Exam proctoring application
//!
//! Composition root for the pipeline: settings, logging, the camera
//! preflight that gates entry to the exam, and the scripted demo run.

pub mod demo;
pub mod settings;

pub use demo::{demo_script, run_demo, run_scripted, SessionSummary};
pub use settings::Settings;

use camera_stream::{CameraConfig, CameraDevice, CameraError, CameraStream};
use exam_session::SessionError;
use thiserror::Error;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Guidance shown when the camera preflight fails
pub const CAMERA_REQUIRED: &str =
    "Camera access is required for the proctored exam. Please allow camera access and try again.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{}", CAMERA_REQUIRED)]
    CameraRequired(#[source] CameraError),

    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("session ended without a final snapshot")]
    SessionAborted,
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Request camera access and release the device immediately.
///
/// The exam may not start without a working camera. The monitor opens
/// its own stream afterwards; this call only proves permission.
pub fn preflight_camera(
    device: &dyn CameraDevice,
    config: &CameraConfig,
) -> Result<(), AppError> {
    let mut stream = CameraStream::open(device, config).map_err(|e| {
        if e.is_device_unavailable() {
            AppError::CameraRequired(e)
        } else {
            AppError::Camera(e)
        }
    })?;
    stream.close();
    info!("camera preflight passed");
    Ok(())
}
