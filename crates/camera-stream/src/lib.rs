//! Camera Frame Acquisition
//!
//! Provides the frame source for the proctoring pipeline:
//! - Pluggable camera devices behind the [`CameraDevice`] trait
//! - Continuous frame streaming on a dedicated capture thread
//! - Idempotent stream shutdown that releases the device on every exit path
//! - A deterministic synthetic camera for tests and demos

pub mod frame;
pub mod stream;
pub mod synthetic;

pub use frame::VideoFrame;
pub use stream::CameraStream;
pub use synthetic::SyntheticCamera;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("No camera device found")]
    NoDevice,

    #[error("Streaming error: {0}")]
    Stream(String),
}

impl CameraError {
    /// Whether the error means no usable device exists right now.
    ///
    /// Denied permission and a missing device are both fatal to starting a
    /// monitored exam, but recoverable by retrying access.
    pub fn is_device_unavailable(&self) -> bool {
        matches!(self, CameraError::PermissionDenied | CameraError::NoDevice)
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Device identifier (e.g., "/dev/video0")
    pub device: String,
    /// Capture width
    pub width: u32,
    /// Capture height
    pub height: u32,
    /// Target FPS (0 = uncapped, used by tests)
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            width: 640,
            height: 480,
            fps: 15,
        }
    }
}

/// A source of decoded frames while the camera is held open.
///
/// Produced by [`CameraDevice::request_access`] and driven from the capture
/// thread. The sequence is infinite and non-restartable; an error ends it.
pub trait FrameProducer: Send {
    /// Capture the next frame. Blocks for device pacing.
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError>;
}

/// A camera device that can grant exclusive stream access.
///
/// Real webcams, platform capture APIs, and the [`SyntheticCamera`] all sit
/// behind this trait; the rest of the pipeline never sees the difference.
pub trait CameraDevice {
    /// Request exclusive access to the device.
    ///
    /// Fails with [`CameraError::PermissionDenied`] or
    /// [`CameraError::NoDevice`] when no monitored exam can start.
    fn request_access(&self, config: &CameraConfig) -> Result<Box<dyn FrameProducer>, CameraError>;
}
