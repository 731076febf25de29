use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::smoothing::POINT_WINDOW;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub thresholds: Thresholds,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Frames in the forward-tilt moving average.
    pub point_window: usize,
    /// Minimum landmark confidence for head-angle inputs.
    pub visibility_threshold: f64,
    pub consecutive_bad_required: u32,
    pub consecutive_good_required: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            point_window: POINT_WINDOW,
            visibility_threshold: 0.3,
            consecutive_bad_required: 3,
            consecutive_good_required: 2,
        }
    }
}

/// Per-signal "bad" thresholds.
///
/// Angles are in degrees, the other two in landmark coordinate units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub forward_tilt_deg: f64,
    pub head_y_diff: f64,
    pub shoulder_diff: f64,
    pub back_angle_deg: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            // older deployments used 10.0
            forward_tilt_deg: 3.0,
            head_y_diff: 3.0,
            shoulder_diff: 3.0,
            back_angle_deg: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.analysis;
        if a.point_window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if a.consecutive_bad_required == 0 || a.consecutive_good_required == 0 {
            return Err(ConfigError::ZeroStreak);
        }
        let t = &self.thresholds;
        for (name, value) in [
            ("analysis.visibility_threshold", a.visibility_threshold),
            ("thresholds.forward_tilt_deg", t.forward_tilt_deg),
            ("thresholds.head_y_diff", t.head_y_diff),
            ("thresholds.shoulder_diff", t.shoulder_diff),
            ("thresholds.back_angle_deg", t.back_angle_deg),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }
}
