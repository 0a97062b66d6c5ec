//! Monitor loop and handle

use camera_stream::CameraStream;
use face_landmarks::FaceDetector;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use violation_classifier::ViolationEvent;

use crate::core::{MonitorCore, MonitorStats, MonitorStatus};
use crate::worker;
use crate::MonitorConfig;

const VIOLATION_CHANNEL_CAPACITY: usize = 16;

/// Entry point for one monitoring session
pub struct ProctorMonitor;

impl ProctorMonitor {
    /// Start monitoring an open camera stream.
    ///
    /// The loop owns the stream and the detector; it ends when the stream
    /// ends or the handle stops it, closing the camera either way.
    pub fn spawn(
        mut stream: CameraStream,
        detector: FaceDetector,
        config: MonitorConfig,
    ) -> MonitorHandle {
        let (job_tx, mut outcome_rx) = worker::spawn_detector(detector);
        let (status_tx, status_rx) = watch::channel(MonitorStatus::default());
        let (stats_tx, stats_rx) = watch::channel(MonitorStats::default());
        let (violation_tx, violation_rx) = mpsc::channel(VIOLATION_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();

        let token = cancel.clone();
        let mut core = MonitorCore::new(config.gaze.clone());
        let join = tokio::spawn(async move {
            info!(
                "proctoring monitor started, sampling every {:?}",
                config.sample_interval
            );
            let mut sampler = time::interval(config.sample_interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("monitor cancelled");
                        break;
                    }
                    maybe_frame = stream.next_frame() => {
                        let Some(frame) = maybe_frame else {
                            info!("camera stream ended");
                            break;
                        };
                        if let Some(job) = core.on_frame(frame) {
                            if job_tx.try_send(job).is_err() {
                                core.on_submit_failed();
                            }
                        }
                        stats_tx.send_replace(core.stats());
                    }
                    Some(outcome) = outcome_rx.recv() => {
                        if core.on_result(outcome) {
                            status_tx.send_replace(core.status().clone());
                        }
                        stats_tx.send_replace(core.stats());
                    }
                    _ = sampler.tick() => {
                        if let Some(event) = core.on_tick() {
                            info!("violation: {}", event.message);
                            stats_tx.send_replace(core.stats());
                            // Never lets a stalled consumer wedge the loop.
                            if let Err(e) = violation_tx.try_send(event) {
                                warn!("dropping violation event: {}", e);
                            }
                        }
                    }
                }
            }

            core.stop();
            // Anything still in flight lands here and is discarded by the
            // epoch guard instead of resurfacing as fresh status.
            while let Ok(outcome) = outcome_rx.try_recv() {
                core.on_result(outcome);
            }
            stream.close();
            stats_tx.send_replace(core.stats());
            info!("proctoring monitor stopped");
        });

        MonitorHandle {
            status: status_rx,
            stats: stats_rx,
            violations: Some(violation_rx),
            cancel,
            join,
        }
    }
}

/// Handle to a running monitor
pub struct MonitorHandle {
    status: watch::Receiver<MonitorStatus>,
    stats: watch::Receiver<MonitorStats>,
    violations: Option<mpsc::Receiver<ViolationEvent>>,
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl MonitorHandle {
    /// Latest published status
    pub fn status(&self) -> MonitorStatus {
        self.status.borrow().clone()
    }

    /// Watch the status stream, e.g. for overlay rendering
    pub fn status_stream(&self) -> watch::Receiver<MonitorStatus> {
        self.status.clone()
    }

    pub fn stats(&self) -> MonitorStats {
        *self.stats.borrow()
    }

    /// Take the violation stream. Events arrive in emission order; the
    /// stream can be taken once.
    pub fn take_violations(&mut self) -> Option<mpsc::Receiver<ViolationEvent>> {
        self.violations.take()
    }

    /// Request the loop to stop. Idempotent; the camera is released by the
    /// loop on its way out.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Stop, wait for the loop to wind down, and return the final counters
    pub async fn shutdown(self) -> MonitorStats {
        self.cancel.cancel();
        if let Err(e) = self.join.await {
            warn!("monitor task ended abnormally: {}", e);
        }
        *self.stats.borrow()
    }

    pub fn is_running(&self) -> bool {
        !self.join.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camera_stream::{
        CameraConfig, CameraDevice, CameraError, FrameProducer, SyntheticCamera, VideoFrame,
    };
    use face_landmarks::{DetectorConfig, Scene, SyntheticModel};
    use gaze_analysis::GazeConfig;
    use std::time::Duration;
    use violation_classifier::ViolationKind;

    fn fast_config() -> MonitorConfig {
        MonitorConfig {
            sample_interval: Duration::from_millis(50),
            gaze: GazeConfig::default(),
        }
    }

    fn camera_config() -> CameraConfig {
        CameraConfig {
            width: 64,
            height: 48,
            fps: 30,
            ..Default::default()
        }
    }

    fn open_stream() -> CameraStream {
        CameraStream::open(&SyntheticCamera::new(), &camera_config()).unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_pipeline_emits_lookaway_violation() {
        let detector = FaceDetector::new(
            Box::new(SyntheticModel::scripted(vec![Scene::Centered, Scene::GazeLeft])),
            DetectorConfig::default(),
        );
        let mut handle = ProctorMonitor::spawn(open_stream(), detector, fast_config());
        let mut violations = handle.take_violations().unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), violations.recv())
            .await
            .expect("violation within deadline")
            .expect("monitor still running");
        assert_eq!(event.kind, ViolationKind::LookingAway);

        let stats = handle.stats();
        assert!(stats.frames_seen > 0);
        assert!(stats.frames_analyzed > 0);
        let status = handle.status();
        assert_eq!(status.faces, 1);
        assert_eq!(status.landmarks.len(), 1);

        handle.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stop_is_idempotent() {
        let detector = FaceDetector::new(
            Box::new(SyntheticModel::steady()),
            DetectorConfig::default(),
        );
        let handle = ProctorMonitor::spawn(open_stream(), detector, fast_config());

        handle.stop();
        handle.stop();
        handle.shutdown().await;
    }

    /// Camera that fails after a fixed number of frames
    struct ShortCamera {
        frames: u32,
    }

    impl CameraDevice for ShortCamera {
        fn request_access(
            &self,
            _config: &CameraConfig,
        ) -> Result<Box<dyn FrameProducer>, CameraError> {
            Ok(Box::new(ShortProducer {
                remaining: self.frames,
                sequence: 0,
            }))
        }
    }

    struct ShortProducer {
        remaining: u32,
        sequence: u32,
    }

    impl FrameProducer for ShortProducer {
        fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
            if self.remaining == 0 {
                return Err(CameraError::Stream("feed ended".into()));
            }
            self.remaining -= 1;
            let frame = VideoFrame::new(vec![0; 12], 2, 2, 0, self.sequence);
            self.sequence += 1;
            Ok(frame)
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stream_end_stops_loop() {
        let stream = CameraStream::open(&ShortCamera { frames: 3 }, &camera_config()).unwrap();
        let detector = FaceDetector::new(
            Box::new(SyntheticModel::steady()),
            DetectorConfig::default(),
        );
        let handle = ProctorMonitor::spawn(stream, detector, fast_config());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!handle.is_running());
        let stats = handle.shutdown().await;
        assert_eq!(stats.frames_seen, 3);
    }
}
