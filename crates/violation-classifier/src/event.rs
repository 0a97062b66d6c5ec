//! Violation events

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What the classifier flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViolationKind {
    NoFace,
    MultipleFaces,
    LookingAway,
}

impl ViolationKind {
    /// Banner text shown to the candidate
    pub fn message(&self) -> &'static str {
        match self {
            ViolationKind::NoFace => "NO FACE DETECTED!",
            ViolationKind::MultipleFaces => "MULTIPLE FACES DETECTED! ALERT!",
            ViolationKind::LookingAway => "LOOKING AWAY! ALERT!",
        }
    }
}

/// One edge-triggered violation
#[derive(Debug, Clone, Serialize)]
pub struct ViolationEvent {
    pub kind: ViolationKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ViolationEvent {
    pub fn now(kind: ViolationKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
            timestamp: Utc::now(),
        }
    }
}
