//! Human-readable corrective messages.
//!
//! The wording is user-facing text only; clients should key off `state` and
//! `reason` instead.

use crate::classifier::FrameMetrics;
use crate::config::Thresholds;
use crate::landmark::{Frame, LEFT_SHOULDER, NOSE, RIGHT_SHOULDER};

pub const INSUFFICIENT_LANDMARKS: &str = "Insufficient landmarks";
pub const GOOD_POSTURE: &str = "Good Posture";

/// Builds the space-joined list of directives for one frame.
///
/// Uses the same thresholds as the classifier, so every message corresponds
/// to a bad signal. Returns [`INSUFFICIENT_LANDMARKS`] when the nose or
/// either shoulder is missing from the frame.
pub fn generate_feedback(
    frame: &Frame<'_>,
    metrics: &FrameMetrics,
    thresholds: &Thresholds,
) -> String {
    if [NOSE, LEFT_SHOULDER, RIGHT_SHOULDER]
        .iter()
        .any(|&idx| frame.find(idx).is_none())
    {
        return INSUFFICIENT_LANDMARKS.to_string();
    }

    let mut messages: Vec<&'static str> = Vec::new();

    if let Some(diff) = metrics.head_y_diff {
        if diff > thresholds.head_y_diff {
            messages.push("Lift your head.");
        } else if diff < -thresholds.head_y_diff {
            messages.push("Lower your head.");
        }
    }

    if metrics.shoulder_level_bad(thresholds) {
        messages.push("Level your shoulders.");
    }

    if metrics.forward_pitch_bad(thresholds) {
        if metrics.smoothed_angle_deg > 0.0 {
            messages.push("Move head up.");
        } else {
            messages.push("Move head down.");
        }
    }

    if metrics.back_lean_bad(thresholds) {
        messages.push("Straighten your back.");
    }

    if messages.is_empty() {
        GOOD_POSTURE.to_string()
    } else {
        messages.join(" ")
    }
}
