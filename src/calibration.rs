/// User-specific neutral pitch, subtracted from every raw forward tilt.
///
/// Lives inside the analyzer so it is guarded by the same lock as the angle
/// window. Any float is accepted; validating the input is the caller's job.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Calibration {
    neutral_offset: f64,
}

impl Calibration {
    pub fn new(neutral_offset: f64) -> Self {
        Self { neutral_offset }
    }

    pub fn set_neutral_offset(&mut self, value: f64) {
        self.neutral_offset = value;
    }

    pub fn neutral_offset(&self) -> f64 {
        self.neutral_offset
    }

    pub fn adjust(&self, raw_angle_deg: f64) -> f64 {
        raw_angle_deg - self.neutral_offset
    }
}
