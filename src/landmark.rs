use serde::{Deserialize, Serialize};

// MediaPipe Pose indices used by the analyzer
pub const NOSE: u32 = 0;
pub const LEFT_EAR: u32 = 7;
pub const RIGHT_EAR: u32 = 8;
pub const LEFT_SHOULDER: u32 = 11;
pub const RIGHT_SHOULDER: u32 = 12;
pub const LEFT_HIP: u32 = 23;
pub const RIGHT_HIP: u32 = 24;

/// Head reference landmarks, averaged when visible.
pub const HEAD_POINTS: [u32; 3] = [NOSE, LEFT_EAR, RIGHT_EAR];

/// One tracked keypoint as submitted by the pose model.
///
/// Coordinates are whatever the client sends (normally 0-1 normalized,
/// y growing downwards). `z` and `visibility` are optional on the wire and
/// default to 0, so a landmark without a confidence score never counts as
/// visible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    #[serde(alias = "idx")]
    pub index: u32,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub visibility: f64,
}

impl Landmark {
    pub fn new(index: u32, x: f64, y: f64, visibility: f64) -> Self {
        Self {
            index,
            x,
            y,
            z: 0.0,
            visibility,
        }
    }

    pub fn point(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// All landmarks submitted for a single analysis call.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    landmarks: &'a [Landmark],
}

impl<'a> Frame<'a> {
    pub fn new(landmarks: &'a [Landmark]) -> Self {
        Self { landmarks }
    }

    /// Looks a landmark up by its `index` field.
    ///
    /// Position in the slice is never used. If an index appears twice the
    /// first occurrence wins.
    pub fn find(&self, index: u32) -> Option<&'a Landmark> {
        self.landmarks.iter().find(|lm| lm.index == index)
    }

    /// Returns the landmark only if it passes the visibility threshold.
    pub fn find_visible(&self, index: u32, threshold: f64) -> Option<&'a Landmark> {
        self.find(index).filter(|lm| is_visible(Some(*lm), threshold))
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

/// True iff the landmark exists and its confidence reaches `threshold`.
pub fn is_visible(landmark: Option<&Landmark>, threshold: f64) -> bool {
    landmark.is_some_and(|lm| lm.visibility >= threshold)
}
