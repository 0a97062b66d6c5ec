//! Proctoring monitor
//!
//! Drives the full pipeline for one session: camera frames go to a landmark
//! detection worker (never more than one frame in flight), results are
//! distilled into observations, and a 1 Hz sampler turns sustained conditions
//! into edge-triggered violation events.
//!
//! The monitor is split into a synchronous [`MonitorCore`] holding every
//! decision rule and an async shell ([`ProctorMonitor::spawn`]) that owns the
//! channels, the select loop, and shutdown.

pub mod core;
pub mod monitor;
pub mod worker;

pub use crate::core::{MonitorCore, MonitorStats, MonitorStatus};
pub use monitor::{MonitorHandle, ProctorMonitor};
pub use worker::{DetectJob, DetectOutcome};

use std::time::Duration;

use gaze_analysis::GazeConfig;

/// Monitor loop tuning
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Cadence of the violation sampler
    pub sample_interval: Duration,
    pub gaze: GazeConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_secs(1),
            gaze: GazeConfig::default(),
        }
    }
}
