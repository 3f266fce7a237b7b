//! Integration tests for the simulated bus
//!
//! These tests drive the bus through the public transport traits only.

use hand_core::{
    Frame, FrameTransport, TransportEndpoint, TransportError, TransportKind, TransportOpener,
};
use hand_driver_mock::*;
use std::time::Duration;

fn endpoint(kind: TransportKind) -> TransportEndpoint {
    TransportEndpoint {
        kind,
        channel: format!("sim-{kind}"),
        bitrate: 1_000_000,
    }
}

/// Test that the opener hands out working transports
#[tokio::test]
async fn test_open_write_query() {
    let bus = SimulatedBus::new();
    let mut link = bus.open(&endpoint(TransportKind::Can0)).await.unwrap();
    assert_eq!(bus.open_count(), 1);
    assert_eq!(link.label(), "sim:sim-can0");

    link.send(Frame::new(0x28, &[0x01, 9, 8, 7]).unwrap())
        .await
        .unwrap();
    link.send(Frame::new(0x28, &[0x01]).unwrap()).await.unwrap();
    let reply = link.recv().await.unwrap();
    assert_eq!(reply.data(), &[0x01, 9, 8, 7]);
    assert_eq!(bus.register(0x28, 0x01), Some(vec![9, 8, 7]));
}

/// Test that writes produce no reply
#[tokio::test]
async fn test_recv_without_query_times_out() {
    let bus = SimulatedBus::new();
    let mut link = bus.hand(TransportKind::Can1);
    link.send(Frame::new(0x27, &[0x05, 1, 1, 1]).unwrap())
        .await
        .unwrap();
    assert!(matches!(link.recv().await, Err(TransportError::Timeout)));
}

/// Test that two transports on one bus share registers
#[tokio::test]
async fn test_transports_share_register_file() {
    let bus = SimulatedBus::new();
    let mut writer = bus.hand(TransportKind::Can0);
    let mut reader = bus.hand(TransportKind::Can0);

    writer
        .send(Frame::new(0x27, &[0x33, 40, 41]).unwrap())
        .await
        .unwrap();
    reader.send(Frame::new(0x27, &[0x33]).unwrap()).await.unwrap();
    assert_eq!(reader.recv().await.unwrap().body(), &[40, 41]);
    assert_eq!(bus.sent_frames().len(), 2);

    bus.clear_sent();
    assert!(bus.sent_frames().is_empty());
}

/// Test open failure injection
#[tokio::test]
async fn test_fail_open() {
    let bus = SimulatedBus::with_faults(FaultPlan::scenario(FaultScenario::FailOpen));
    let err = bus.open(&endpoint(TransportKind::Can0)).await.err().unwrap();
    assert!(matches!(err, TransportError::Open { ref channel, .. } if channel == "sim-can0"));
    assert_eq!(bus.open_count(), 0);
}

/// Test communication loss scenario
#[tokio::test]
async fn test_communication_loss() {
    let bus =
        SimulatedBus::with_faults(FaultPlan::scenario(FaultScenario::CommunicationLoss { after: 2 }));
    let mut link = bus.hand(TransportKind::Can0);

    link.send(Frame::new(0x28, &[0x01]).unwrap()).await.unwrap();
    link.send(Frame::new(0x28, &[0x01]).unwrap()).await.unwrap();
    assert!(matches!(
        link.send(Frame::new(0x28, &[0x01]).unwrap()).await,
        Err(TransportError::Bus(_))
    ));
    assert!(matches!(link.recv().await, Err(TransportError::Closed)));
    assert!(bus.faults().is_link_lost());

    link.close().await.unwrap();
    assert!(link.reopen().await.is_err());
}

/// Test dropped replies
#[tokio::test]
async fn test_drop_replies() {
    let bus = SimulatedBus::with_faults(FaultPlan::scenario(FaultScenario::DropReplies {
        command: 0x20,
    }));
    let mut link = bus.hand(TransportKind::Can0);

    link.send(Frame::new(0x28, &[0x20]).unwrap()).await.unwrap();
    assert!(matches!(link.recv().await, Err(TransportError::Timeout)));

    link.send(Frame::new(0x28, &[0x21]).unwrap()).await.unwrap();
    assert!(link.recv().await.is_ok());
}

/// Test close and reopen
#[tokio::test]
async fn test_close_and_reopen() {
    let bus = SimulatedBus::new();
    let mut link = bus.hand(TransportKind::EtherCat);
    link.close().await.unwrap();
    assert!(link.is_closed());
    assert!(matches!(
        link.send(Frame::new(0x28, &[0x01]).unwrap()).await,
        Err(TransportError::Closed)
    ));

    link.reopen().await.unwrap();
    assert!(!link.is_closed());
    link.send(Frame::new(0x28, &[0x01]).unwrap()).await.unwrap();
}

/// Test sensor defaults
#[tokio::test]
async fn test_seeded_defaults() {
    let bus = SimulatedBus::new();
    bus.seed_default(0x23, &[1, 2, 3, 4, 5]);
    bus.seed_register(0x27, 0x23, &[6, 7, 8, 9, 10]);
    let mut link = bus.hand(TransportKind::Can0);

    link.send(Frame::new(0x28, &[0x23]).unwrap()).await.unwrap();
    assert_eq!(link.recv().await.unwrap().body(), &[1, 2, 3, 4, 5]);
    link.send(Frame::new(0x27, &[0x23]).unwrap()).await.unwrap();
    assert_eq!(link.recv().await.unwrap().body(), &[6, 7, 8, 9, 10]);
}

/// Test latency
#[tokio::test(start_paused = true)]
async fn test_latency_delays_send() {
    let bus = SimulatedBus::new().with_latency(Duration::from_millis(5));
    let mut link = bus.hand(TransportKind::Can0);
    let start = tokio::time::Instant::now();
    link.send(Frame::new(0x28, &[0x01]).unwrap()).await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(5));
}

/// Test that a Modbus transport speaks RTU, not the CAN register protocol
#[tokio::test]
async fn test_modbus_transport_ignores_can_queries() {
    let bus = SimulatedBus::new();
    let mut link = bus.hand(TransportKind::Modbus);
    link.send(Frame::new(0x28, &[0x01]).unwrap()).await.unwrap();
    assert!(matches!(link.recv().await, Err(TransportError::Timeout)));
}
