//! Landmark detection worker
//!
//! Detection can take longer than a frame interval, so it runs on its own
//! thread with the monitor bridging over channels. The job channel holds a
//! single slot; the monitor only submits when nothing is in flight, so a full
//! slot is a bug surfaced by `try_send`, not a queue that silently grows.

use camera_stream::VideoFrame;
use face_landmarks::{FaceDetector, LandmarkSet};
use tokio::sync::mpsc;
use tracing::debug;

const JOB_CAPACITY: usize = 1;
const OUTCOME_CAPACITY: usize = 4;

/// One frame handed to the detection worker
#[derive(Debug)]
pub struct DetectJob {
    pub frame: VideoFrame,
    /// Monitor epoch the job belongs to
    pub epoch: u64,
}

/// What came back from the worker
#[derive(Debug)]
pub struct DetectOutcome {
    pub faces: Vec<LandmarkSet>,
    /// Capture timestamp of the analyzed frame
    pub timestamp_ms: u64,
    pub epoch: u64,
}

/// Start the worker thread owning `detector`.
///
/// The thread drains jobs until the sender side is dropped, then exits.
pub fn spawn_detector(
    mut detector: FaceDetector,
) -> (mpsc::Sender<DetectJob>, mpsc::Receiver<DetectOutcome>) {
    let (job_tx, mut job_rx) = mpsc::channel::<DetectJob>(JOB_CAPACITY);
    let (outcome_tx, outcome_rx) = mpsc::channel::<DetectOutcome>(OUTCOME_CAPACITY);

    std::thread::spawn(move || {
        debug!("detection worker started");
        while let Some(job) = job_rx.blocking_recv() {
            let timestamp_ms = job.frame.timestamp_ms;
            let faces = detector.detect(&job.frame);
            let outcome = DetectOutcome {
                faces,
                timestamp_ms,
                epoch: job.epoch,
            };
            if outcome_tx.blocking_send(outcome).is_err() {
                debug!("outcome receiver dropped, stopping worker");
                break;
            }
        }
        debug!("detection worker exited");
    });

    (job_tx, outcome_rx)
}
