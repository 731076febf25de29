use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calibration::Calibration;
use crate::classifier::{
    FrameMetrics, PostureReason, PostureSignals, PostureState, StreakClassifier,
};
use crate::config::{AnalysisConfig, Config, Thresholds};
use crate::error::AnalysisError;
use crate::feedback::generate_feedback;
use crate::geometry::{
    back_deviation_deg, head_angles, head_vertical_offset, shoulder_level_difference,
};
use crate::landmark::{Frame, Landmark};
use crate::smoothing::AngleWindow;

/// Result of one successfully analyzed frame, rounded for the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureReport {
    /// Smoothed, calibrated forward tilt.
    pub angle_deg: f64,
    /// Forward tilt of this frame before calibration and smoothing.
    pub raw_angle_deg: f64,
    pub side_tilt_deg: f64,
    pub state: PostureState,
    pub reason: PostureReason,
    pub shoulder_level_diff: Option<f64>,
    pub back_deviation_deg: Option<f64>,
    pub feedback: String,
}

/// The whole scoring pipeline plus the state it carries between frames.
///
/// Not synchronized; see [`crate::session::PostureSession`] for the shared
/// handle used by concurrent callers.
pub struct PostureAnalyzer {
    analysis: AnalysisConfig,
    thresholds: Thresholds,
    calibration: Calibration,
    window: AngleWindow,
    classifier: StreakClassifier,
    last_angle: Option<f64>,
}

impl PostureAnalyzer {
    pub fn new(config: &Config) -> Self {
        let analysis = config.analysis.clone();
        Self {
            window: AngleWindow::new(analysis.point_window),
            classifier: StreakClassifier::new(
                analysis.consecutive_bad_required,
                analysis.consecutive_good_required,
            ),
            calibration: Calibration::default(),
            thresholds: config.thresholds.clone(),
            last_angle: None,
            analysis,
        }
    }

    /// Stores a new neutral offset. Angles already in the window keep the
    /// offset they were computed with.
    pub fn calibrate(&mut self, angle_deg: f64) -> f64 {
        self.calibration.set_neutral_offset(angle_deg);
        info!(neutral_offset = angle_deg, "calibrated neutral pitch");
        angle_deg
    }

    pub fn neutral_offset(&self) -> f64 {
        self.calibration.neutral_offset()
    }

    pub fn analyze(&mut self, landmarks: &[Landmark]) -> Result<PostureReport, AnalysisError> {
        let frame = Frame::new(landmarks);

        let Some(angles) = head_angles(&frame, self.analysis.visibility_threshold) else {
            warn!(
                landmarks = frame.len(),
                "head or shoulders not visible, skipping frame"
            );
            return Err(AnalysisError::InsufficientVisibility);
        };

        let adjusted = self.calibration.adjust(angles.forward_tilt_deg);
        let smoothed = self.window.push(adjusted);
        self.last_angle = Some(smoothed);

        let metrics = FrameMetrics {
            smoothed_angle_deg: smoothed,
            head_y_diff: head_vertical_offset(&frame),
            shoulder_level_diff: shoulder_level_difference(&frame),
            back_deviation_deg: back_deviation_deg(&frame),
        };
        let signals = PostureSignals::evaluate(&metrics, &self.thresholds);

        let previous = self.classifier.state();
        let state = self.classifier.update(signals.is_bad());
        if state != previous {
            info!(
                from = %previous,
                to = %state,
                reason = %signals.reason(),
                "posture state changed"
            );
        }

        debug!(
            raw = angles.forward_tilt_deg,
            smoothed,
            side = angles.side_tilt_deg,
            bad = signals.is_bad(),
            "frame analyzed"
        );

        Ok(PostureReport {
            angle_deg: round_to(smoothed, 2),
            raw_angle_deg: round_to(angles.forward_tilt_deg, 2),
            side_tilt_deg: round_to(angles.side_tilt_deg, 2),
            state,
            reason: signals.reason(),
            shoulder_level_diff: metrics.shoulder_level_diff.map(|d| round_to(d, 4)),
            back_deviation_deg: metrics.back_deviation_deg.map(|d| round_to(d, 2)),
            feedback: generate_feedback(&frame, &metrics, &self.thresholds),
        })
    }

    /// Most recent smoothed angle, unrounded.
    pub fn last_angle(&self) -> Option<f64> {
        self.last_angle
    }

    pub fn state(&self) -> PostureState {
        self.classifier.state()
    }

    /// Adjusted angles currently in the smoothing window, oldest first.
    pub fn history(&self) -> Vec<f64> {
        self.window.values().collect()
    }

    /// Drops angle history, streaks, state and last angle. The calibration
    /// offset survives.
    pub fn reset(&mut self) {
        self.window.clear();
        self.classifier.reset();
        self.last_angle = None;
        info!("posture session reset");
    }
}

impl Default for PostureAnalyzer {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{LEFT_HIP, LEFT_SHOULDER, NOSE, RIGHT_HIP, RIGHT_SHOULDER};

    fn upright(nose_x: f64) -> Vec<Landmark> {
        vec![
            Landmark::new(LEFT_SHOULDER, 0.4, 0.5, 0.9),
            Landmark::new(RIGHT_SHOULDER, 0.6, 0.5, 0.9),
            Landmark::new(NOSE, nose_x, 0.3, 0.9),
        ]
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(-2.005, 0), -2.0);
    }

    #[test]
    fn test_insufficient_visibility_leaves_state_untouched() {
        let mut analyzer = PostureAnalyzer::default();
        let lms = vec![Landmark::new(NOSE, 0.5, 0.3, 0.9)];

        assert_eq!(
            analyzer.analyze(&lms),
            Err(AnalysisError::InsufficientVisibility)
        );
        assert!(analyzer.last_angle().is_none());
        assert!(analyzer.history().is_empty());
    }

    #[test]
    fn test_report_fields() {
        let mut analyzer = PostureAnalyzer::default();
        let report = analyzer.analyze(&upright(0.7)).unwrap();

        assert_eq!(report.raw_angle_deg, 45.0);
        assert_eq!(report.angle_deg, 45.0);
        assert_eq!(report.state, PostureState::Unknown);
        assert_eq!(report.reason, PostureReason::ForwardHead);
        assert_eq!(report.shoulder_level_diff, Some(0.0));
        assert_eq!(report.back_deviation_deg, None);
        assert_eq!(report.feedback, "Move head up.");
    }

    #[test]
    fn test_back_lean_alone_makes_frame_bad() {
        let mut analyzer = PostureAnalyzer::default();
        analyzer.calibrate(45.0);
        let mut lms = upright(0.7);
        // hip midpoint (0.7, 0.7): torso at 45 degrees from vertical
        lms.push(Landmark::new(LEFT_HIP, 0.6, 0.7, 0.9));
        lms.push(Landmark::new(RIGHT_HIP, 0.8, 0.7, 0.9));

        let mut report = analyzer.analyze(&lms).unwrap();
        for _ in 0..2 {
            report = analyzer.analyze(&lms).unwrap();
        }
        assert_eq!(report.reason, PostureReason::BackLean);
        assert_eq!(report.state, PostureState::BadPosture);
        assert_eq!(report.back_deviation_deg, Some(45.0));
        assert_eq!(report.feedback, "Straighten your back.");
    }

    #[test]
    fn test_calibration_is_not_retroactive() {
        let mut analyzer = PostureAnalyzer::default();
        analyzer.analyze(&upright(0.7)).unwrap();
        analyzer.calibrate(45.0);
        analyzer.analyze(&upright(0.7)).unwrap();

        let history = analyzer.history();
        assert!((history[0] - 45.0).abs() < 1e-9);
        assert!(history[1].abs() < 1e-9);
        assert!((analyzer.last_angle().unwrap() - 22.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_bad_requirement_needs_a_bad_frame() {
        let mut config = Config::default();
        config.analysis.consecutive_bad_required = 0;
        config.analysis.consecutive_good_required = 0;
        let mut analyzer = PostureAnalyzer::new(&config);
        analyzer.calibrate(45.0);

        let report = analyzer.analyze(&upright(0.7)).unwrap();
        assert_eq!(report.reason, PostureReason::GoodPosture);
        assert_eq!(report.state, PostureState::GoodPosture);
    }

    #[test]
    fn test_reset_keeps_calibration() {
        let mut analyzer = PostureAnalyzer::default();
        analyzer.calibrate(10.0);
        for _ in 0..3 {
            analyzer.analyze(&upright(0.7)).unwrap();
        }
        assert_eq!(analyzer.state(), PostureState::BadPosture);

        analyzer.reset();
        assert_eq!(analyzer.state(), PostureState::Unknown);
        assert!(analyzer.last_angle().is_none());
        assert!(analyzer.history().is_empty());
        assert_eq!(analyzer.neutral_offset(), 10.0);
    }
}
