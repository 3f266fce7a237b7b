//! Properties of the raw/angle conversion engine across every limit table.

use hand_core::conversion::{
    angle_to_raw, clamp_to_domain, raw_to_angle, scale_value, should_skip_joint,
};
use hand_core::{resolve_limit_table, Direction, HandModel, Handedness};

const HANDS: [Handedness; 2] = [Handedness::Left, Handedness::Right];

fn every_table() -> impl Iterator<Item = (HandModel, Handedness)> {
    HandModel::ALL
        .into_iter()
        .flat_map(|m| HANDS.into_iter().map(move |h| (m, h)))
}

#[test]
fn clamp_stays_in_range_and_is_idempotent() {
    let samples = [-1e9, -3.5, -0.0, 0.0, 0.4, 1.0, 1.57, 2.0, 1e9];
    for &(lo, hi) in &[(0.0, 1.0), (-0.26, 0.26), (-1.43, 0.0), (0.0, 0.0)] {
        for &v in &samples {
            let once = clamp_to_domain(v, lo, hi);
            assert!(lo <= once && once <= hi, "{v} -> {once} not in [{lo}, {hi}]");
            assert_eq!(clamp_to_domain(once, lo, hi), once);
        }
    }
}

#[test]
fn scale_value_midpoint_scenario() {
    let v = scale_value(128.0, 0.0, 255.0, 0.0, 1.57).unwrap();
    assert!((v - 0.785).abs() < 0.01);
}

#[test]
fn raw_to_angle_lengths_match_tables() {
    for (model, hand) in every_table() {
        let table = resolve_limit_table(model, hand).unwrap();
        let angles = raw_to_angle(model, hand, &vec![0; table.joint_count()]).unwrap();
        assert_eq!(angles.len(), table.joint_count());
    }
    let l10 = raw_to_angle(HandModel::L10, Handedness::Left, &[128; 10]).unwrap();
    assert_eq!(l10.len(), 10);
}

#[test]
fn raw_to_angle_stays_within_limits() {
    for (model, hand) in every_table() {
        let table = resolve_limit_table(model, hand).unwrap();
        for v in (0..=255u8).step_by(5) {
            let angles = raw_to_angle(model, hand, &vec![v; table.joint_count()]).unwrap();
            for (i, (joint, angle)) in table.iter().zip(&angles).enumerate() {
                if should_skip_joint(model, i) {
                    continue;
                }
                assert!(
                    joint.min_angle <= *angle && *angle <= joint.max_angle,
                    "{model} {hand} joint {i}: {angle}"
                );
            }
        }
    }
}

#[test]
fn boundaries_are_exact() {
    for (model, hand) in every_table() {
        let table = resolve_limit_table(model, hand).unwrap();
        let n = table.joint_count();
        let at_zero = raw_to_angle(model, hand, &vec![0; n]).unwrap();
        let at_full = raw_to_angle(model, hand, &vec![255; n]).unwrap();

        for (i, joint) in table.iter().enumerate() {
            if should_skip_joint(model, i) {
                assert_eq!(at_zero[i], 0.0);
                assert_eq!(at_full[i], 0.0);
                continue;
            }
            let (lo, hi) = match joint.direction {
                Direction::Forward => (joint.min_angle, joint.max_angle),
                Direction::Inverted => (joint.max_angle, joint.min_angle),
            };
            assert_eq!(at_zero[i], lo, "{model} {hand} joint {i} at raw 0");
            assert_eq!(at_full[i], hi, "{model} {hand} joint {i} at raw 255");
        }
    }
}

#[test]
fn round_trip_within_two_raw_units() {
    for (model, hand) in every_table() {
        let n = model.joint_count();
        for v in 0..=255u8 {
            let raw = vec![v; n];
            let angles = raw_to_angle(model, hand, &raw).unwrap();
            let back = angle_to_raw(model, hand, &angles).unwrap();
            for i in (0..n).filter(|&i| !should_skip_joint(model, i)) {
                let diff = (i16::from(back[i]) - i16::from(raw[i])).abs();
                assert!(diff <= 2, "{model} {hand} joint {i}: {} -> {}", raw[i], back[i]);
            }
        }
    }
}

#[test]
fn l10_left_raw_128_lands_mid_range() {
    let table = resolve_limit_table(HandModel::L10, Handedness::Left).unwrap();
    let angles = raw_to_angle(HandModel::L10, Handedness::Left, &[128; 10]).unwrap();
    assert_eq!(angles.len(), 10);

    for (i, (joint, angle)) in table.iter().zip(&angles).enumerate() {
        let step = (joint.max_angle - joint.min_angle) / 255.0;
        assert!(
            (angle - joint.center()).abs() <= step,
            "joint {i} ({:?}): {angle} vs center {}",
            joint.direction,
            joint.center()
        );
    }
    assert!(table.iter().any(|j| j.direction == Direction::Forward));
    assert!(table.iter().any(|j| j.direction == Direction::Inverted));
}

#[test]
fn l10_left_midpoint_round_trip() {
    let raw = [128u8; 10];
    let angles = raw_to_angle(HandModel::L10, Handedness::Left, &raw).unwrap();
    let back = angle_to_raw(HandModel::L10, Handedness::Left, &angles).unwrap();
    for (a, b) in raw.iter().zip(&back) {
        assert!((i16::from(*a) - i16::from(*b)).abs() <= 2);
    }
}

#[test]
fn clamped_angles_hit_the_raw_extremes() {
    for (model, hand) in every_table() {
        let table = resolve_limit_table(model, hand).unwrap();
        let n = table.joint_count();
        let high = angle_to_raw(model, hand, &vec![10.0; n]).unwrap();
        let low = angle_to_raw(model, hand, &vec![-10.0; n]).unwrap();
        for (i, joint) in table.iter().enumerate() {
            if should_skip_joint(model, i) {
                continue;
            }
            let (expect_high, expect_low) = match joint.direction {
                Direction::Forward => (255, 0),
                Direction::Inverted => (0, 255),
            };
            assert_eq!(high[i], expect_high, "{model} {hand} joint {i}");
            assert_eq!(low[i], expect_low, "{model} {hand} joint {i}");
        }
    }
}
