//! Upper-body posture scoring from pose-estimation landmarks.
//!
//! Each frame flows through landmark lookup, head/shoulder/back geometry,
//! calibration, a moving-average window and a streak-based classifier, and
//! comes out as a [`PostureReport`] with a smoothed forward-tilt angle, a
//! reason and feedback text. [`PostureSession`] wraps the analyzer for
//! concurrent callers; [`server`] exposes it over HTTP.

pub mod calibration;
pub mod classifier;
pub mod config;
pub mod error;
pub mod feedback;
pub mod geometry;
pub mod landmark;
pub mod posture;
pub mod server;
pub mod session;
pub mod smoothing;

pub use classifier::{PostureReason, PostureState};
pub use config::Config;
pub use error::{AnalysisError, ConfigError};
pub use landmark::Landmark;
pub use posture::{PostureAnalyzer, PostureReport};
pub use session::PostureSession;
