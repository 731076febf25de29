//! Angle and distance measurements taken straight from landmark coordinates.
//!
//! Head angles need confident detections. Shoulder level, midpoints and back
//! deviation only need the landmarks to be present in the frame.

use crate::landmark::{
    Frame, HEAD_POINTS, LEFT_HIP, LEFT_SHOULDER, NOSE, RIGHT_HIP, RIGHT_SHOULDER,
};

/// Substitute for an exactly-zero denominator.
const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadAngles {
    /// Lateral tilt of the head relative to the shoulder midpoint.
    pub side_tilt_deg: f64,
    /// Forward/backward pitch ("tech neck").
    pub forward_tilt_deg: f64,
}

/// Computes side and forward head tilt.
///
/// Requires both shoulders and at least one of nose/left ear/right ear to be
/// visible. The head reference point is the average of whichever head
/// landmarks are visible.
pub fn head_angles(frame: &Frame<'_>, visibility_threshold: f64) -> Option<HeadAngles> {
    let ls = frame.find_visible(LEFT_SHOULDER, visibility_threshold)?;
    let rs = frame.find_visible(RIGHT_SHOULDER, visibility_threshold)?;
    let (sx, sy) = average([ls.point(), rs.point()].into_iter())?;

    let (hx, hy) = average(
        HEAD_POINTS
            .iter()
            .filter_map(|&idx| frame.find_visible(idx, visibility_threshold))
            .map(|lm| lm.point()),
    )?;

    let dx = hx - sx;
    let mut dy = hy - sy;
    if dy == 0.0 {
        dy = EPSILON;
    }
    let side_tilt_deg = dx.atan2(dy).to_degrees();

    let forward_tilt_deg = (sy - hy).atan2(dx.abs().max(EPSILON)).to_degrees();

    Some(HeadAngles {
        side_tilt_deg,
        forward_tilt_deg,
    })
}

/// Absolute vertical gap between the shoulders. Visibility is not checked.
pub fn shoulder_level_difference(frame: &Frame<'_>) -> Option<f64> {
    let ls = frame.find(LEFT_SHOULDER)?;
    let rs = frame.find(RIGHT_SHOULDER)?;
    Some((ls.y - rs.y).abs())
}

/// Average of two landmarks' coordinates, if both are present.
pub fn midpoint(frame: &Frame<'_>, a: u32, b: u32) -> Option<(f64, f64)> {
    let pa = frame.find(a)?;
    let pb = frame.find(b)?;
    average([pa.point(), pb.point()].into_iter())
}

/// `noseY - shoulderMidY`. Positive means the nose sits below the shoulder
/// line in image coordinates.
pub fn head_vertical_offset(frame: &Frame<'_>) -> Option<f64> {
    let nose = frame.find(NOSE)?;
    let (_, shoulder_y) = midpoint(frame, LEFT_SHOULDER, RIGHT_SHOULDER)?;
    Some(nose.y - shoulder_y)
}

/// How far the shoulder→hip line leans away from vertical, in degrees.
pub fn back_deviation_deg(frame: &Frame<'_>) -> Option<f64> {
    let (sx, sy) = midpoint(frame, LEFT_SHOULDER, RIGHT_SHOULDER)?;
    let (hx, hy) = midpoint(frame, LEFT_HIP, RIGHT_HIP)?;
    let angle = (hy - sy).atan2(hx - sx).to_degrees().abs();
    Some((90.0 - angle).abs())
}

fn average(points: impl Iterator<Item = (f64, f64)>) -> Option<(f64, f64)> {
    let (mut sum_x, mut sum_y, mut n) = (0.0, 0.0, 0usize);
    for (x, y) in points {
        sum_x += x;
        sum_y += y;
        n += 1;
    }
    if n == 0 {
        return None;
    }
    Some((sum_x / n as f64, sum_y / n as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Landmark, LEFT_EAR, RIGHT_EAR};

    fn shoulders() -> Vec<Landmark> {
        vec![
            Landmark::new(LEFT_SHOULDER, 0.4, 0.5, 0.9),
            Landmark::new(RIGHT_SHOULDER, 0.6, 0.5, 0.9),
        ]
    }

    #[test]
    fn test_head_directly_above_shoulders() {
        let mut lms = shoulders();
        lms.push(Landmark::new(NOSE, 0.5, 0.3, 0.9));
        let angles = head_angles(&Frame::new(&lms), 0.3).unwrap();

        assert!((angles.forward_tilt_deg - 90.0).abs() < 1e-3);
        // dx = 0, dy = -0.2: head straight above, measured against +y
        assert!((angles.side_tilt_deg - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_forward_tilt_uses_horizontal_displacement() {
        let mut lms = shoulders();
        lms.push(Landmark::new(NOSE, 0.7, 0.3, 0.9));
        let angles = head_angles(&Frame::new(&lms), 0.3).unwrap();

        // atan2(0.2, 0.2) = 45 degrees
        assert!((angles.forward_tilt_deg - 45.0).abs() < 1e-6);
    }

    #[test]
    fn test_head_point_averages_visible_only() {
        let mut lms = shoulders();
        lms.push(Landmark::new(NOSE, 0.5, 0.3, 0.1));
        lms.push(Landmark::new(LEFT_EAR, 0.6, 0.3, 0.9));
        lms.push(Landmark::new(RIGHT_EAR, 0.8, 0.3, 0.9));
        let angles = head_angles(&Frame::new(&lms), 0.3).unwrap();

        // head point (0.7, 0.3): dx = 0.2, dy = 0.2
        assert!((angles.forward_tilt_deg - 45.0).abs() < 1e-6);
    }

    #[test]
    fn test_head_angles_need_visible_shoulders() {
        let lms = vec![
            Landmark::new(LEFT_SHOULDER, 0.4, 0.5, 0.9),
            Landmark::new(RIGHT_SHOULDER, 0.6, 0.5, 0.2),
            Landmark::new(NOSE, 0.5, 0.3, 0.9),
        ];
        assert!(head_angles(&Frame::new(&lms), 0.3).is_none());
    }

    #[test]
    fn test_head_angles_need_a_head_point() {
        let lms = shoulders();
        assert!(head_angles(&Frame::new(&lms), 0.3).is_none());
    }

    #[test]
    fn test_side_tilt_zero_dy_is_guarded() {
        let mut lms = shoulders();
        lms.push(Landmark::new(NOSE, 0.6, 0.5, 0.9));
        let angles = head_angles(&Frame::new(&lms), 0.3).unwrap();

        assert!(angles.side_tilt_deg.is_finite());
        assert!((angles.side_tilt_deg - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_shoulder_level_ignores_visibility() {
        let lms = vec![
            Landmark::new(LEFT_SHOULDER, 0.4, 0.5, 0.0),
            Landmark::new(RIGHT_SHOULDER, 0.6, 0.55, 0.0),
        ];
        let diff = shoulder_level_difference(&Frame::new(&lms)).unwrap();
        assert!((diff - 0.05).abs() < 1e-12);

        assert!(shoulder_level_difference(&Frame::new(&lms[..1])).is_none());
    }

    #[test]
    fn test_back_deviation_vertical_torso_is_zero() {
        let mut lms = shoulders();
        lms.push(Landmark::new(LEFT_HIP, 0.4, 0.9, 0.9));
        lms.push(Landmark::new(RIGHT_HIP, 0.6, 0.9, 0.9));
        let dev = back_deviation_deg(&Frame::new(&lms)).unwrap();
        assert!(dev.abs() < 1e-9);
    }

    #[test]
    fn test_back_deviation_grows_with_hip_shift() {
        let mut last = -1.0;
        for shift in [0.0, 0.05, 0.1, 0.2, 0.3] {
            let mut lms = shoulders();
            lms.push(Landmark::new(LEFT_HIP, 0.4 + shift, 0.9, 0.9));
            lms.push(Landmark::new(RIGHT_HIP, 0.6 + shift, 0.9, 0.9));
            let dev = back_deviation_deg(&Frame::new(&lms)).unwrap();
            assert!(dev > last);
            last = dev;
        }
    }

    #[test]
    fn test_back_deviation_missing_hip() {
        let mut lms = shoulders();
        lms.push(Landmark::new(LEFT_HIP, 0.4, 0.9, 0.9));
        assert!(back_deviation_deg(&Frame::new(&lms)).is_none());
    }

    #[test]
    fn test_head_vertical_offset() {
        let mut lms = shoulders();
        lms.push(Landmark::new(NOSE, 0.5, 0.3, 0.9));
        let offset = head_vertical_offset(&Frame::new(&lms)).unwrap();
        assert!((offset + 0.2).abs() < 1e-12);
    }
}
