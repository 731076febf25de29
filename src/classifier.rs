//! Debounced good/bad posture classification.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Thresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureState {
    #[default]
    Unknown,
    GoodPosture,
    BadPosture,
}

impl PostureState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostureState::Unknown => "unknown",
            PostureState::GoodPosture => "good_posture",
            PostureState::BadPosture => "bad_posture",
        }
    }
}

impl fmt::Display for PostureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a frame was judged the way it was. Ordered by reporting priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureReason {
    ForwardHead,
    HeadHeight,
    UnevenShoulders,
    BackLean,
    GoodPosture,
}

impl PostureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostureReason::ForwardHead => "forward_head",
            PostureReason::HeadHeight => "head_height",
            PostureReason::UnevenShoulders => "uneven_shoulders",
            PostureReason::BackLean => "back_lean",
            PostureReason::GoodPosture => "good_posture",
        }
    }
}

impl fmt::Display for PostureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-frame measurements fed to both the classifier and the feedback text.
///
/// `None` means the measurement was unavailable for this frame; it never
/// counts as bad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMetrics {
    pub smoothed_angle_deg: f64,
    pub head_y_diff: Option<f64>,
    pub shoulder_level_diff: Option<f64>,
    pub back_deviation_deg: Option<f64>,
}

impl FrameMetrics {
    pub fn forward_pitch_bad(&self, t: &Thresholds) -> bool {
        self.smoothed_angle_deg.abs() >= t.forward_tilt_deg
    }

    pub fn head_offset_bad(&self, t: &Thresholds) -> bool {
        self.head_y_diff.is_some_and(|d| d.abs() > t.head_y_diff)
    }

    pub fn shoulder_level_bad(&self, t: &Thresholds) -> bool {
        self.shoulder_level_diff.is_some_and(|d| d > t.shoulder_diff)
    }

    pub fn back_lean_bad(&self, t: &Thresholds) -> bool {
        self.back_deviation_deg.is_some_and(|d| d > t.back_angle_deg)
    }
}

/// The four "bad" flags for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PostureSignals {
    pub forward_pitch: bool,
    pub head_offset: bool,
    pub shoulder_level: bool,
    pub back_lean: bool,
}

impl PostureSignals {
    pub fn evaluate(metrics: &FrameMetrics, thresholds: &Thresholds) -> Self {
        Self {
            forward_pitch: metrics.forward_pitch_bad(thresholds),
            head_offset: metrics.head_offset_bad(thresholds),
            shoulder_level: metrics.shoulder_level_bad(thresholds),
            back_lean: metrics.back_lean_bad(thresholds),
        }
    }

    pub fn is_bad(&self) -> bool {
        self.forward_pitch || self.head_offset || self.shoulder_level || self.back_lean
    }

    /// First triggered signal in priority order.
    pub fn reason(&self) -> PostureReason {
        if self.forward_pitch {
            PostureReason::ForwardHead
        } else if self.head_offset {
            PostureReason::HeadHeight
        } else if self.shoulder_level {
            PostureReason::UnevenShoulders
        } else if self.back_lean {
            PostureReason::BackLean
        } else {
            PostureReason::GoodPosture
        }
    }
}

/// Hysteresis over consecutive frame verdicts.
///
/// The state only moves once a streak reaches its requirement, and then
/// holds until the opposite streak does.
#[derive(Debug, Clone)]
pub struct StreakClassifier {
    bad_required: u32,
    good_required: u32,
    bad_streak: u32,
    good_streak: u32,
    state: PostureState,
}

impl StreakClassifier {
    /// Requirements below 1 are raised to 1.
    pub fn new(bad_required: u32, good_required: u32) -> Self {
        Self {
            bad_required: bad_required.max(1),
            good_required: good_required.max(1),
            bad_streak: 0,
            good_streak: 0,
            state: PostureState::Unknown,
        }
    }

    /// Feeds one frame verdict and returns the (possibly unchanged) state.
    pub fn update(&mut self, is_bad_frame: bool) -> PostureState {
        if is_bad_frame {
            self.bad_streak = self.bad_streak.saturating_add(1);
            self.good_streak = 0;
        } else {
            self.good_streak = self.good_streak.saturating_add(1);
            self.bad_streak = 0;
        }

        if self.bad_streak >= self.bad_required {
            self.state = PostureState::BadPosture;
        } else if self.good_streak >= self.good_required {
            self.state = PostureState::GoodPosture;
        }
        self.state
    }

    pub fn state(&self) -> PostureState {
        self.state
    }

    pub fn bad_streak(&self) -> u32 {
        self.bad_streak
    }

    pub fn good_streak(&self) -> u32 {
        self.good_streak
    }

    pub fn reset(&mut self) {
        self.bad_streak = 0;
        self.good_streak = 0;
        self.state = PostureState::Unknown;
    }
}

impl Default for StreakClassifier {
    fn default() -> Self {
        Self::new(3, 2)
    }
}
