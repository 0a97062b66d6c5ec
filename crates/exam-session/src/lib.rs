//! Exam session control
//!
//! A pausable countdown, a two-strike violation policy, answer bookkeeping,
//! and the submission state machine. [`ExamController`] is pure and
//! synchronous; [`SessionRunner`] wraps it in a single command queue so user
//! actions, countdown ticks, and monitor violations mutate the session in one
//! strict arrival order.

pub mod controller;
pub mod exam;
pub mod runner;
pub mod session;

pub use controller::ExamController;
pub use exam::{Exam, Question};
pub use runner::{NavigateTo, SessionCommand, SessionRunner, SessionSnapshot};
pub use session::{
    format_remaining, is_low_time, ExamSession, SessionPhase, SubmitKind, Warning,
    AUTO_SUBMIT_NOTICE, FINAL_WARNING, FIRST_WARNING, LOW_TIME_THRESHOLD_SECS,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Strike policy for proctoring violations
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Strike count at which the exam auto-submits
    pub max_strikes: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self { max_strikes: 2 }
    }
}

/// Invalid session operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },

    #[error("Unknown question id {0}")]
    UnknownQuestion(u32),

    #[error("Question index {0} out of range")]
    IndexOutOfRange(usize),
}
