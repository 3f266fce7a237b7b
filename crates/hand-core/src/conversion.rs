//! Raw actuator values to joint angles and back.
//!
//! All functions here are pure and only read the static tables in
//! [`crate::limits`]. Raw values span `0..=255`; angles are radians within the
//! joint's `[min_angle, max_angle]`. Out-of-range inputs are clamped; only
//! non-finite angles are rejected.

use crate::error::{HandError, HandResult};
use crate::limits::{resolve_limit_table, Direction, JointLimit};
use crate::model::{HandModel, Handedness};

/// Lowest raw actuator value.
pub const RAW_MIN: u8 = 0;
/// Highest raw actuator value.
pub const RAW_MAX: u8 = 255;

/// Saturate `value` into `[lo, hi]`.
pub fn clamp_to_domain(value: f64, lo: f64, hi: f64) -> f64 {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

/// Affine map of `value` from `[src_lo, src_hi]` onto `[dst_lo, dst_hi]`.
///
/// Either destination bound may be the larger one. `src_lo` maps to exactly
/// `dst_lo` and `src_hi` to exactly `dst_hi`.
pub fn scale_value(value: f64, src_lo: f64, src_hi: f64, dst_lo: f64, dst_hi: f64) -> HandResult<f64> {
    let width = src_hi - src_lo;
    if width == 0.0 {
        return Err(HandError::DegenerateDomain {
            lo: src_lo,
            hi: src_hi,
        });
    }
    let t = (value - src_lo) / width;
    Ok(dst_lo * (1.0 - t) + dst_hi * t)
}

/// Joints of a shared wide layout that have no actuator on `model`.
///
/// Total: unknown model/index combinations are never skipped.
pub fn should_skip_joint(model: HandModel, joint_index: usize) -> bool {
    match model {
        HandModel::L20 | HandModel::L21 => (11..=14).contains(&joint_index),
        _ => false,
    }
}

/// Number of joints of `model` that take part in conversion.
pub fn active_joint_count(model: HandModel) -> usize {
    (0..model.joint_count())
        .filter(|&i| !should_skip_joint(model, i))
        .count()
}

fn joint_raw_to_angle(joint: &JointLimit, raw: u8) -> HandResult<f64> {
    let (at_zero, at_full) = joint.raw_ordered_range();
    let angle = scale_value(
        f64::from(raw),
        f64::from(RAW_MIN),
        f64::from(RAW_MAX),
        at_zero,
        at_full,
    )?;
    Ok(clamp_to_domain(angle, joint.min_angle, joint.max_angle))
}

fn joint_angle_to_raw(joint: &JointLimit, angle: f64) -> HandResult<u8> {
    let clamped = clamp_to_domain(angle, joint.min_angle, joint.max_angle);
    let (dst_lo, dst_hi) = match joint.direction {
        Direction::Forward => (f64::from(RAW_MIN), f64::from(RAW_MAX)),
        Direction::Inverted => (f64::from(RAW_MAX), f64::from(RAW_MIN)),
    };
    let scaled = scale_value(clamped, joint.min_angle, joint.max_angle, dst_lo, dst_hi)?;
    Ok(clamp_to_domain(scaled.round(), f64::from(RAW_MIN), f64::from(RAW_MAX)) as u8)
}

/// Convert a raw joint vector into angles.
///
/// Fails with [`HandError::LengthMismatch`] if `raw` does not have one entry
/// per joint. Skipped joints come back as `0.0`.
pub fn raw_to_angle(model: HandModel, handedness: Handedness, raw: &[u8]) -> HandResult<Vec<f64>> {
    let table = resolve_limit_table(model, handedness)?;
    table.check_len(raw.len())?;
    table
        .iter()
        .zip(raw)
        .enumerate()
        .map(|(i, (joint, &value))| {
            if should_skip_joint(model, i) {
                Ok(0.0)
            } else {
                joint_raw_to_angle(joint, value)
            }
        })
        .collect()
}

/// Convert an angle vector into raw actuator values.
///
/// Angles outside a joint's range are clamped first. Skipped joints come back
/// as `0`. Fails with [`HandError::NonFiniteAngle`] for a NaN or infinite
/// entry, skipped joints included.
pub fn angle_to_raw(model: HandModel, handedness: Handedness, angles: &[f64]) -> HandResult<Vec<u8>> {
    let table = resolve_limit_table(model, handedness)?;
    table.check_len(angles.len())?;
    if let Some((joint, &value)) = angles.iter().enumerate().find(|(_, a)| !a.is_finite()) {
        return Err(HandError::NonFiniteAngle { joint, value });
    }
    table
        .iter()
        .zip(angles)
        .enumerate()
        .map(|(i, (joint, &angle))| {
            if should_skip_joint(model, i) {
                Ok(RAW_MIN)
            } else {
                joint_angle_to_raw(joint, angle)
            }
        })
        .collect()
}

/// [`raw_to_angle`] keyed by model name (`"L10"`) and hand label (`"left"`).
pub fn raw_to_angle_named(model: &str, hand: &str, raw: &[u8]) -> HandResult<Vec<f64>> {
    raw_to_angle(model.parse()?, hand.parse()?, raw)
}

/// [`angle_to_raw`] keyed by model name and hand label.
pub fn angle_to_raw_named(model: &str, hand: &str, angles: &[f64]) -> HandResult<Vec<u8>> {
    angle_to_raw(model.parse()?, hand.parse()?, angles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp_to_domain(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp_to_domain(2.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp_to_domain(0.25, 0.0, 1.0), 0.25);
    }

    #[test]
    fn test_scale_midpoint() {
        let v = scale_value(128.0, 0.0, 255.0, 0.0, 1.57).unwrap();
        assert!((v - 0.785).abs() < 0.01, "{v}");
    }

    #[test]
    fn test_scale_descending_destination() {
        assert_eq!(scale_value(0.0, 0.0, 255.0, 1.2, -0.4).unwrap(), 1.2);
        assert_eq!(scale_value(255.0, 0.0, 255.0, 1.2, -0.4).unwrap(), -0.4);
    }

    #[test]
    fn test_scale_degenerate() {
        assert!(matches!(
            scale_value(1.0, 3.0, 3.0, 0.0, 1.0),
            Err(HandError::DegenerateDomain { .. })
        ));
    }

    #[test]
    fn test_skip_table() {
        assert!(should_skip_joint(HandModel::L20, 11));
        assert!(should_skip_joint(HandModel::L21, 14));
        assert!(!should_skip_joint(HandModel::L21, 15));
        assert!(!should_skip_joint(HandModel::L25, 12));
        assert!(!should_skip_joint(HandModel::L10, 11));
        assert!(!should_skip_joint(HandModel::L6, 999));
        assert_eq!(active_joint_count(HandModel::L21), 21);
        assert_eq!(active_joint_count(HandModel::L20), 16);
        assert_eq!(active_joint_count(HandModel::L25), 25);
    }

    #[test]
    fn test_inverted_joint_endpoints() {
        // L10 left index flexion is inverted: raw 0 is fully flexed.
        let mut raw = vec![128u8; 10];
        raw[2] = 0;
        let angles = raw_to_angle(HandModel::L10, Handedness::Left, &raw).unwrap();
        assert_eq!(angles[2], 1.62);

        raw[2] = 255;
        let angles = raw_to_angle(HandModel::L10, Handedness::Left, &raw).unwrap();
        assert_eq!(angles[2], 0.0);
    }

    #[test]
    fn test_out_of_range_angles_clamp() {
        let angles = vec![100.0; 6];
        let raw = angle_to_raw(HandModel::L6, Handedness::Left, &angles).unwrap();
        // Every L6 left joint is inverted, so max angle is raw 0.
        assert!(raw.iter().all(|&r| r == 0));

        let angles = vec![-100.0; 6];
        let raw = angle_to_raw(HandModel::L6, Handedness::Left, &angles).unwrap();
        assert!(raw.iter().all(|&r| r == 255));
    }

    #[test]
    fn test_non_finite_angles_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut angles = vec![0.0; 10];
            angles[2] = bad;
            match angle_to_raw(HandModel::L10, Handedness::Left, &angles) {
                Err(HandError::NonFiniteAngle { joint, .. }) => assert_eq!(joint, 2),
                other => panic!("expected NonFiniteAngle for {bad}, got {other:?}"),
            }
        }

        let mut angles = vec![0.0; 20];
        angles[12] = f64::NAN;
        assert!(matches!(
            angle_to_raw(HandModel::L20, Handedness::Right, &angles),
            Err(HandError::NonFiniteAngle { joint: 12, .. })
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let err = raw_to_angle(HandModel::L10, Handedness::Right, &[0; 6]).unwrap_err();
        assert!(matches!(
            err,
            HandError::LengthMismatch {
                expected: 10,
                actual: 6
            }
        ));
        assert!(angle_to_raw(HandModel::L7, Handedness::Left, &[0.0; 8]).is_err());
    }

    #[test]
    fn test_skipped_joints_are_neutral() {
        let raw = vec![200u8; 20];
        let angles = raw_to_angle(HandModel::L20, Handedness::Right, &raw).unwrap();
        assert!(angles[11..=14].iter().all(|&a| a == 0.0));

        let back = angle_to_raw(HandModel::L20, Handedness::Right, &angles).unwrap();
        assert!(back[11..=14].iter().all(|&r| r == 0));
    }

    #[test]
    fn test_named_entry_points() {
        let angles = raw_to_angle_named("l10", "left", &[128; 10]).unwrap();
        assert_eq!(angles.len(), 10);
        assert!(matches!(
            raw_to_angle_named("L10", "center", &[128; 10]),
            Err(HandError::InvalidHandedness(_))
        ));
        assert!(matches!(
            angle_to_raw_named("L11", "left", &[0.0; 10]),
            Err(HandError::UnsupportedModel { .. })
        ));
    }
}
