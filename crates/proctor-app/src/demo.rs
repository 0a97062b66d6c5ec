//! Scripted demo attempt
//!
//! Drives the full pipeline against the synthetic camera: a compliant
//! candidate, an averted gaze, a recovery, then a second person in frame.
//! Two strikes end the attempt with an automatic submission.

use camera_stream::{CameraStream, SyntheticCamera};
use exam_session::{
    Exam, ExamSession, NavigateTo, SessionCommand, SessionPhase, SessionRunner, SubmitKind,
    AUTO_SUBMIT_NOTICE,
};
use face_landmarks::{FaceDetector, Scene, SyntheticModel};
use proctor_monitor::{MonitorStats, ProctorMonitor};
use serde::Serialize;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

use crate::{preflight_camera, AppError, Settings};

/// Outcome of one demo attempt, printed as JSON by the binary
#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub exam_title: String,
    pub total_questions: usize,
    pub session: ExamSession,
    /// `(correct, graded)` when the exam carries an answer key
    pub score: Option<(usize, usize)>,
    pub monitor: MonitorStats,
}

/// Default scene script. Repeats so the classifier re-arms between the
/// lookaway strike and the second-face strike.
pub fn demo_script() -> Vec<Scene> {
    let mut script = Vec::new();
    script.extend(std::iter::repeat(Scene::Centered).take(45));
    script.extend(std::iter::repeat(Scene::GazeLeft).take(30));
    script.extend(std::iter::repeat(Scene::Centered).take(30));
    script.extend(std::iter::repeat(Scene::TwoFaces).take(30));
    script
}

/// Run the demo scenario with the default script
pub async fn run_demo(settings: &Settings) -> Result<SessionSummary, AppError> {
    run_scripted(settings, demo_script()).await
}

/// Run one scripted proctored attempt end to end
pub async fn run_scripted(
    settings: &Settings,
    script: Vec<Scene>,
) -> Result<SessionSummary, AppError> {
    let camera = SyntheticCamera::new();
    preflight_camera(&camera, &settings.camera)?;

    let stream = CameraStream::open(&camera, &settings.camera)?;
    let detector = FaceDetector::new(
        Box::new(SyntheticModel::cycle(script)),
        settings.detector.clone(),
    );
    let mut monitor = ProctorMonitor::spawn(stream, detector, settings.monitor_config());
    let violations = monitor.take_violations().ok_or(AppError::SessionAborted)?;

    let exam = Exam::sample();
    let exam_title = exam.title.clone();
    let total_questions = exam.questions.len();
    let grader = exam.clone();
    let runner = SessionRunner::start(exam, settings.policy, violations)?;
    info!("proctored exam '{}' started", exam_title);

    // The candidate settles in and answers the first two questions.
    runner
        .command(SessionCommand::Answer {
            question_id: 1,
            choice: "O(log n)".into(),
        })
        .await;
    runner.command(SessionCommand::Navigate(NavigateTo::Next)).await;
    runner
        .command(SessionCommand::Answer {
            question_id: 2,
            choice: "Stack".into(),
        })
        .await;

    // Acknowledge each warning dialog after a beat, as a candidate would.
    let ack_delay = Duration::from_millis(settings.ack_delay_ms);
    let mut snapshots = runner.snapshot_stream();
    let mut acknowledged = 0;
    while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow().clone();
        if snapshot.phase.is_terminal() {
            break;
        }
        if snapshot.is_paused && snapshot.warning_count > acknowledged {
            acknowledged = snapshot.warning_count;
            if let Some(warning) = &snapshot.pending_warning {
                warn!("Proctoring Violation Detected: {}", warning.violation);
                info!("{}", warning.message);
            }
            info!(
                "exam paused at {} remaining, awaiting acknowledgement",
                snapshot.format_remaining()
            );
            sleep(ack_delay).await;
            runner.command(SessionCommand::Resume).await;
        }
    }

    let session = runner.wait().await.ok_or(AppError::SessionAborted)?;
    let stats = monitor.shutdown().await;

    if session.phase == SessionPhase::Submitted(SubmitKind::Auto) {
        warn!("{}", AUTO_SUBMIT_NOTICE);
    }
    let score = grader.score(&session.answers);

    Ok(SessionSummary {
        exam_title,
        total_questions,
        session,
        score,
        monitor: stats,
    })
}
