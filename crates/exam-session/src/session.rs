//! Session state types

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Remaining seconds below which the countdown renders as urgent
pub const LOW_TIME_THRESHOLD_SECS: u32 = 300;

/// Escalation text for the first strike
pub const FIRST_WARNING: &str = "This is your first warning. If another violation is detected, your exam will be automatically submitted.";

/// Escalation text once the next strike ends the exam
pub const FINAL_WARNING: &str = "This is your final warning. Another violation will result in automatic submission of your exam.";

/// Notice shown when the strike limit auto-submits the exam
pub const AUTO_SUBMIT_NOTICE: &str =
    "Exam automatically submitted due to multiple violations of proctoring rules.";

/// How a session reached submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmitKind {
    Manual,
    Auto,
    Timeout,
}

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    Idle,
    Running,
    Paused,
    Submitted(SubmitKind),
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Submitted(_))
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Running => "running",
            SessionPhase::Paused => "paused",
            SessionPhase::Submitted(_) => "submitted",
        }
    }
}

/// Warning surfaced to the candidate after a strike below the limit.
///
/// The dialog shows both lines: the banner of the violation that tripped
/// the strike and the escalation sentence underneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// Banner text of the triggering violation
    pub violation: String,
    /// Escalation sentence, first versus final
    pub message: String,
    /// The next strike will auto-submit
    pub is_final: bool,
}

/// Full state of one exam attempt
#[derive(Debug, Clone, Serialize)]
pub struct ExamSession {
    pub attempt_id: Uuid,
    pub exam_id: String,
    pub phase: SessionPhase,
    pub remaining_seconds: u32,
    pub warning_count: u32,
    pub current_question_index: usize,
    pub answers: HashMap<u32, String>,
    pub started_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ExamSession {
    pub(crate) fn new(exam_id: String, duration_seconds: u32) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            exam_id,
            phase: SessionPhase::Idle,
            remaining_seconds: duration_seconds,
            warning_count: 0,
            current_question_index: 0,
            answers: HashMap::new(),
            started_at: None,
            submitted_at: None,
        }
    }
}

/// Seconds rendered as `MM:SS`
pub fn format_remaining(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Whether the countdown should render as urgent
pub fn is_low_time(seconds: u32) -> bool {
    seconds < LOW_TIME_THRESHOLD_SECS
}
