//! Process-wide posture session shared by concurrent request handlers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::classifier::PostureState;
use crate::config::Config;
use crate::error::AnalysisError;
use crate::landmark::Landmark;
use crate::posture::{PostureAnalyzer, PostureReport};

/// Cloneable handle to the single global analyzer.
///
/// Every call holds the lock for its whole duration, so the window push, the
/// mean, the streak update and the calibration read of one frame are atomic
/// with respect to other frames.
#[derive(Clone)]
pub struct PostureSession {
    analyzer: Arc<Mutex<PostureAnalyzer>>,
}

impl PostureSession {
    pub fn new(config: &Config) -> Self {
        Self {
            analyzer: Arc::new(Mutex::new(PostureAnalyzer::new(config))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PostureAnalyzer> {
        // fields are only ever replaced whole; a poisoned guard is still consistent
        self.analyzer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn analyze_frame(&self, landmarks: &[Landmark]) -> Result<PostureReport, AnalysisError> {
        self.lock().analyze(landmarks)
    }

    /// Sets the neutral offset and returns the accepted value.
    pub fn calibrate(&self, angle_deg: f64) -> f64 {
        self.lock().calibrate(angle_deg)
    }

    pub fn neutral_offset(&self) -> f64 {
        self.lock().neutral_offset()
    }

    pub fn last_angle(&self) -> Option<f64> {
        self.lock().last_angle()
    }

    pub fn state(&self) -> PostureState {
        self.lock().state()
    }

    pub fn reset(&self) {
        self.lock().reset();
    }
}

impl Default for PostureSession {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
