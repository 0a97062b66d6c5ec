//! Camera stream lifecycle
//!
//! A [`CameraStream`] holds exclusive device access for its whole lifetime.
//! Frames are captured on a dedicated thread and handed to async consumers
//! over a bounded channel, so a slow consumer backpressures the device
//! instead of piling frames up in memory.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{CameraConfig, CameraDevice, CameraError, VideoFrame};

/// Frames buffered between the capture thread and the consumer
const FRAME_CHANNEL_CAPACITY: usize = 8;

/// An open camera stream
#[derive(Debug)]
pub struct CameraStream {
    frames: mpsc::Receiver<VideoFrame>,
    shutdown: Arc<AtomicBool>,
    open: bool,
}

impl CameraStream {
    /// Acquire exclusive camera access and start capturing.
    ///
    /// Fails with a device-unavailable error when permission is denied or no
    /// device exists; in that case nothing was spawned and nothing must be
    /// released.
    pub fn open(device: &dyn CameraDevice, config: &CameraConfig) -> Result<Self, CameraError> {
        let mut producer = device.request_access(config)?;
        let (tx, rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = shutdown.clone();
        let device_name = config.device.clone();

        std::thread::spawn(move || {
            debug!("capture thread started for {}", device_name);
            while !shutdown_flag.load(Ordering::SeqCst) {
                match producer.next_frame() {
                    Ok(frame) => {
                        if tx.blocking_send(frame).is_err() {
                            debug!("frame receiver dropped, stopping capture");
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("frame capture failed, stream ends: {}", e);
                        break;
                    }
                }
            }
            debug!("capture thread for {} exited", device_name);
        });

        Ok(Self {
            frames: rx,
            shutdown,
            open: true,
        })
    }

    /// Receive the next frame.
    ///
    /// Returns `None` once the stream has been closed and buffered frames
    /// are drained. The sequence is never restartable.
    pub async fn next_frame(&mut self) -> Option<VideoFrame> {
        self.frames.recv().await
    }

    /// Stop capturing and release the device. Idempotent.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.shutdown.store(true, Ordering::SeqCst);
        // Unblocks a capture thread waiting on a full channel.
        self.frames.close();
        debug!("camera stream closed");
    }

    /// Whether the stream still holds the device
    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        self.close();
    }
}
