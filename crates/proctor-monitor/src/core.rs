//! Monitor step logic
//!
//! Every decision the monitor makes lives here as a synchronous method, so
//! the rules are testable without spawning a single task: when to submit a
//! frame, when a detection result still counts, and when the sampler fires.

use camera_stream::VideoFrame;
use face_landmarks::LandmarkSet;
use gaze_analysis::{analyze_frame, FaceGaze, GazeConfig, Observation};
use serde::Serialize;
use tracing::debug;
use violation_classifier::{ViolationClassifier, ViolationCounts, ViolationEvent};

use crate::worker::{DetectJob, DetectOutcome};

/// Latest pipeline output, published for overlays and status displays
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonitorStatus {
    /// `None` until the first frame has been analyzed
    pub observation: Option<Observation>,
    /// Faces in the latest analyzed frame
    pub faces: usize,
    /// Per-face eye centroids for overlay rendering
    pub gazes: Vec<FaceGaze>,
    /// Per-face mesh points from the same frame, for drawing the mesh
    pub landmarks: Vec<LandmarkSet>,
}

/// Monitor throughput counters
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MonitorStats {
    pub frames_seen: u64,
    pub frames_analyzed: u64,
    /// Frames dropped because a detection was already in flight
    pub frames_skipped: u64,
    pub violations_emitted: u64,
    pub violation_counts: ViolationCounts,
}

/// Synchronous monitor state machine
pub struct MonitorCore {
    gaze: GazeConfig,
    classifier: ViolationClassifier,
    status: MonitorStatus,
    stats: MonitorStats,
    in_flight: bool,
    epoch: u64,
    stopped: bool,
}

impl MonitorCore {
    pub fn new(gaze: GazeConfig) -> Self {
        Self {
            gaze,
            classifier: ViolationClassifier::new(),
            status: MonitorStatus::default(),
            stats: MonitorStats::default(),
            in_flight: false,
            epoch: 0,
            stopped: false,
        }
    }

    /// Admit one captured frame.
    ///
    /// Returns a job only when no detection is in flight; otherwise the
    /// frame is counted as skipped and dropped. Newest-frame-wins is the
    /// sampling policy, not a backlog.
    pub fn on_frame(&mut self, frame: VideoFrame) -> Option<DetectJob> {
        self.stats.frames_seen += 1;
        if self.stopped || self.in_flight {
            self.stats.frames_skipped += 1;
            return None;
        }
        self.in_flight = true;
        Some(DetectJob {
            frame,
            epoch: self.epoch,
        })
    }

    /// A job returned by [`on_frame`](Self::on_frame) could not be handed to
    /// the worker.
    pub fn on_submit_failed(&mut self) {
        self.in_flight = false;
        self.stats.frames_skipped += 1;
    }

    /// Apply one detection outcome.
    ///
    /// Outcomes from a previous epoch or arriving after stop are discarded
    /// without touching the published status. Returns whether the status
    /// changed.
    pub fn on_result(&mut self, outcome: DetectOutcome) -> bool {
        self.in_flight = false;
        if self.stopped || outcome.epoch != self.epoch {
            debug!(
                "discarding stale detection outcome (epoch {} != {})",
                outcome.epoch, self.epoch
            );
            return false;
        }
        let analysis = analyze_frame(outcome.faces, &self.gaze, outcome.timestamp_ms);
        self.status = MonitorStatus {
            observation: Some(analysis.observation),
            faces: analysis.landmarks.len(),
            gazes: analysis.gazes,
            landmarks: analysis.landmarks,
        };
        self.stats.frames_analyzed += 1;
        true
    }

    /// One sampler tick: classify the latest observation.
    ///
    /// No-op until the first analysis lands and after stop.
    pub fn on_tick(&mut self) -> Option<ViolationEvent> {
        if self.stopped {
            return None;
        }
        let observation = self.status.observation.as_ref()?;
        let event = self.classifier.sample(observation)?;
        self.stats.violations_emitted += 1;
        self.stats.violation_counts = self.classifier.counts();
        Some(event)
    }

    /// Stop admitting work and invalidate in-flight detections. Idempotent.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.epoch += 1;
    }

    pub fn status(&self) -> &MonitorStatus {
        &self.status
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use face_landmarks::{face_with_eyes, FACE_LANDMARK_COUNT, LEFT_EYE_RANGE};

    fn frame(sequence: u32) -> VideoFrame {
        VideoFrame::new(vec![0; 12], 2, 2, sequence as u64 * 66, sequence)
    }

    fn outcome_away(epoch: u64, timestamp_ms: u64) -> DetectOutcome {
        DetectOutcome {
            faces: vec![face_with_eyes((0.2, 0.45), (0.4, 0.45))],
            timestamp_ms,
            epoch,
        }
    }

    #[test]
    fn test_one_detection_in_flight() {
        let mut core = MonitorCore::new(GazeConfig::default());

        let job = core.on_frame(frame(0)).expect("idle, submits");
        assert_eq!(job.epoch, 0);

        // Next frames are skipped until the result lands.
        assert!(core.on_frame(frame(1)).is_none());
        assert!(core.on_frame(frame(2)).is_none());
        assert_eq!(core.stats().frames_skipped, 2);

        assert!(core.on_result(outcome_away(0, 0)));
        assert!(core.on_frame(frame(3)).is_some());
        assert_eq!(core.stats().frames_seen, 4);
        assert_eq!(core.stats().frames_analyzed, 1);
    }

    #[test]
    fn test_stale_epoch_outcome_is_discarded() {
        let mut core = MonitorCore::new(GazeConfig::default());
        assert!(core.on_frame(frame(0)).is_some());

        core.stop();
        assert!(!core.on_result(outcome_away(0, 0)));
        assert!(core.status().observation.is_none());
        assert_eq!(core.stats().frames_analyzed, 0);
    }

    #[test]
    fn test_stop_is_idempotent_and_blocks_everything() {
        let mut core = MonitorCore::new(GazeConfig::default());
        core.stop();
        core.stop();
        assert!(core.is_stopped());
        assert!(core.on_frame(frame(0)).is_none());
        assert!(core.on_tick().is_none());
    }

    #[test]
    fn test_tick_before_first_analysis_is_silent() {
        let mut core = MonitorCore::new(GazeConfig::default());
        assert!(core.on_tick().is_none());
    }

    #[test]
    fn test_tick_fires_on_edge_only() {
        let mut core = MonitorCore::new(GazeConfig::default());

        assert!(core.on_frame(frame(0)).is_some());
        assert!(core.on_result(outcome_away(0, 0)));

        let event = core.on_tick().expect("first tick fires");
        assert_eq!(event.kind, violation_classifier::ViolationKind::LookingAway);

        // Same condition on the next tick stays silent.
        assert!(core.on_tick().is_none());
        assert_eq!(core.stats().violations_emitted, 1);
        assert_eq!(core.stats().violation_counts.looking_away, 1);
    }

    #[test]
    fn test_status_publishes_mesh_for_overlay() {
        let mut core = MonitorCore::new(GazeConfig::default());
        assert!(core.on_frame(frame(0)).is_some());
        assert!(core.on_result(outcome_away(0, 5)));

        // The full mesh rides along with the centroids.
        let status = core.status();
        assert_eq!(status.landmarks.len(), 1);
        assert_eq!(status.landmarks[0].len(), FACE_LANDMARK_COUNT);
        assert!(status.landmarks[0]
            .region(LEFT_EYE_RANGE)
            .iter()
            .all(|p| p.x == 0.2));
    }

    #[test]
    fn test_submit_failure_reopens_the_slot() {
        let mut core = MonitorCore::new(GazeConfig::default());
        let _job = core.on_frame(frame(0)).unwrap();
        core.on_submit_failed();
        assert!(core.on_frame(frame(1)).is_some());
    }
}
