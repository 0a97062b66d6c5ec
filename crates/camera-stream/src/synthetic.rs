//! Synthetic camera device
//!
//! Renders a moving bright disc on a gradient background so downstream
//! stages have real pixel data to chew on without hardware. Also models
//! denied or missing devices for permission-path tests.

use std::time::Duration;

use image::{ImageBuffer, Rgb};

use crate::frame::now_ms;
use crate::{CameraConfig, CameraDevice, CameraError, FrameProducer, VideoFrame};

#[derive(Debug, Clone, Copy)]
enum AccessMode {
    Granted,
    Denied,
    Missing,
}

/// A camera that exists only in memory
#[derive(Debug, Clone, Copy)]
pub struct SyntheticCamera {
    access: AccessMode,
}

impl SyntheticCamera {
    /// A camera that grants access and produces frames
    pub fn new() -> Self {
        Self {
            access: AccessMode::Granted,
        }
    }

    /// A camera whose permission prompt was declined
    pub fn denied() -> Self {
        Self {
            access: AccessMode::Denied,
        }
    }

    /// A host with no camera attached
    pub fn missing() -> Self {
        Self {
            access: AccessMode::Missing,
        }
    }
}

impl Default for SyntheticCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraDevice for SyntheticCamera {
    fn request_access(&self, config: &CameraConfig) -> Result<Box<dyn FrameProducer>, CameraError> {
        match self.access {
            AccessMode::Granted => Ok(Box::new(SyntheticProducer::new(config))),
            AccessMode::Denied => Err(CameraError::PermissionDenied),
            AccessMode::Missing => Err(CameraError::NoDevice),
        }
    }
}

struct SyntheticProducer {
    width: u32,
    height: u32,
    frame_interval: Option<Duration>,
    sequence: u32,
}

impl SyntheticProducer {
    fn new(config: &CameraConfig) -> Self {
        let frame_interval = if config.fps > 0 {
            Some(Duration::from_secs_f64(1.0 / config.fps as f64))
        } else {
            None
        };
        Self {
            width: config.width,
            height: config.height,
            frame_interval,
            sequence: 0,
        }
    }
}

impl FrameProducer for SyntheticProducer {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
        if let Some(interval) = self.frame_interval {
            std::thread::sleep(interval);
        }
        let image = render_scene(self.width, self.height, self.sequence);
        let frame = VideoFrame::new(
            image.into_raw(),
            self.width,
            self.height,
            now_ms(),
            self.sequence,
        );
        self.sequence = self.sequence.wrapping_add(1);
        Ok(frame)
    }
}

/// Gradient backdrop with a bright disc swaying left and right over time
fn render_scene(width: u32, height: u32, sequence: u32) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
    let sway = (sequence as f32 * 0.12).sin() * width as f32 * 0.15;
    let cx = width as f32 * 0.5 + sway;
    let cy = height as f32 * 0.45;
    let radius = height as f32 * 0.22;

    ImageBuffer::from_fn(width, height, |x, y| {
        let base = 32 + (y * 48 / height.max(1)) as u8;
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        if dx * dx + dy * dy <= radius * radius {
            Rgb([base.saturating_add(140); 3])
        } else {
            Rgb([base; 3])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_producer_renders_frames() {
        let config = CameraConfig {
            width: 80,
            height: 60,
            fps: 0,
            ..Default::default()
        };
        let mut producer = SyntheticCamera::new().request_access(&config).unwrap();

        let frame = producer.next_frame().unwrap();
        assert_eq!(frame.sequence, 0);
        assert_eq!(frame.data.len(), 80 * 60 * 3);

        // Disc center is brighter than the top-left corner.
        let center = frame.pixel_at(40, 27).unwrap();
        let corner = frame.pixel_at(0, 0).unwrap();
        assert!(center[0] > corner[0]);

        let next = producer.next_frame().unwrap();
        assert_eq!(next.sequence, 1);
    }

    #[test]
    fn test_access_modes() {
        let config = CameraConfig::default();
        assert!(SyntheticCamera::new().request_access(&config).is_ok());
        assert!(matches!(
            SyntheticCamera::denied().request_access(&config),
            Err(CameraError::PermissionDenied)
        ));
        assert!(matches!(
            SyntheticCamera::missing().request_access(&config),
            Err(CameraError::NoDevice)
        ));
    }
}
