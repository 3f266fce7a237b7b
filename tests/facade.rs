//! Facade smoke tests
//!
//! Builds hands through the re-exported prelude only.

use linker_hand::prelude::*;
use std::sync::Arc;

/// Test a full pose cycle through the prelude types
#[tokio::test]
async fn test_prelude_pose_cycle() {
    let bus = SimulatedBus::new();
    let factory = HandFactory::new(Arc::new(bus.clone()), HandSettings::default());
    let mut hand = factory
        .create_hand(HandModel::L10, Handedness::Left.hand_id(), TransportKind::Can0)
        .await
        .unwrap();

    let raw = angle_to_raw(HandModel::L10, Handedness::Left, &[0.0; 10]).unwrap();
    hand.set_joint_raw(&raw).await.unwrap();
    let angles = hand.read_joint_angles().await.unwrap();
    assert_eq!(angles, raw_to_angle(HandModel::L10, Handedness::Left, &raw).unwrap());
    assert!(!bus.sent_frames().is_empty());
}

/// Test that bad requests keep their typed errors through the facade
#[tokio::test]
async fn test_prelude_errors() {
    let factory = HandFactory::new(Arc::new(SimulatedBus::new()), HandSettings::default());
    let request = HandRequest {
        model: "L99".into(),
        hand: "left".into(),
        transport: "can0".into(),
    };
    assert!(matches!(
        factory.create_from_config(&request).await,
        Err(HandError::UnsupportedModel { .. })
    ));
}
