//! Application settings
//!
//! Defaults layered under an optional `proctor.toml` file and `PROCTOR_*`
//! environment variables. Nested sections use a double underscore, e.g.
//! `PROCTOR_POLICY__MAX_STRIKES=3` or `PROCTOR_GAZE__LOOKAWAY_LEFT_X=0.25`.

use std::time::Duration;

use camera_stream::CameraConfig;
use exam_session::PolicyConfig;
use face_landmarks::DetectorConfig;
use gaze_analysis::GazeConfig;
use proctor_monitor::MonitorConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub camera: CameraConfig,
    pub detector: DetectorConfig,
    pub gaze: GazeConfig,
    pub policy: PolicyConfig,
    /// Cadence of the violation sampler in milliseconds
    pub sample_interval_ms: u64,
    /// Simulated delay before the candidate acknowledges a warning dialog
    pub ack_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            detector: DetectorConfig::default(),
            gaze: GazeConfig::default(),
            policy: PolicyConfig::default(),
            sample_interval_ms: 1000,
            ack_delay_ms: 1500,
        }
    }
}

impl Settings {
    /// Load settings from defaults, then `proctor.toml`, then environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name("proctor").required(false))
            .add_source(
                config::Environment::with_prefix("PROCTOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            sample_interval: Duration::from_millis(self.sample_interval_ms),
            gaze: self.gaze,
        }
    }
}
