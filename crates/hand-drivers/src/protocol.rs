//! LinkerHand CAN command protocol.
//!
//! Frames are addressed by hand id (0x28 left, 0x27 right). The first payload
//! byte is the command code, the rest carries up to 7 joint values:
//!
//! ```text
//! write:  [cmd, v0, v1, ... v6]      no reply
//! query:  [cmd]                       hand replies [cmd, v0, v1, ...]
//! ```
//!
//! Joint vectors wider than 7 are split into [`Segment`]s. Each model has its
//! own [`CommandSet`] describing which segments exist for which register.

use hand_core::conversion::should_skip_joint;
use hand_core::{
    Frame, FrameTransport, HandError, HandIdentity, HandResult, JointLimitTable, SensorSnapshot,
};

// =============================================================================
// Command Codes
// =============================================================================

/// Fingertip normal force, one byte per finger.
pub const SENSOR_NORMAL_FORCE: u8 = 0x20;
/// Fingertip tangential force, one byte per finger.
pub const SENSOR_TANGENTIAL_FORCE: u8 = 0x21;
/// Direction of the tangential force, one byte per finger.
pub const SENSOR_TANGENTIAL_DIRECTION: u8 = 0x22;
/// Proximity, one byte per finger.
pub const SENSOR_PROXIMITY: u8 = 0x23;
/// Firmware version block.
pub const VERSION: u8 = 0xC1;

/// Sensor commands in [`SensorSnapshot`] field order.
pub const SENSOR_COMMANDS: [u8; 4] = [
    SENSOR_NORMAL_FORCE,
    SENSOR_TANGENTIAL_FORCE,
    SENSOR_TANGENTIAL_DIRECTION,
    SENSOR_PROXIMITY,
];

/// Frames from other nodes tolerated while waiting for a reply.
const MAX_STRAY_FRAMES: usize = 16;

/// One command frame's worth of joints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Command byte opening the frame.
    pub command: u8,
    /// Joint indices carried by the frame body, in body order.
    pub joints: &'static [usize],
}

impl Segment {
    /// Segment for `command` carrying `joints`.
    pub const fn new(command: u8, joints: &'static [usize]) -> Self {
        Self { command, joints }
    }
}

/// Registers a model exposes over CAN. `None` means the model has no such
/// register.
#[derive(Debug, Clone, Copy)]
pub struct CommandSet {
    /// Joint position frames.
    pub position: &'static [Segment],
    /// Joint speed frames.
    pub speed: Option<&'static [Segment]>,
    /// Joint torque frames.
    pub torque: Option<&'static [Segment]>,
    /// Motor temperature frames.
    pub temperature: Option<&'static [Segment]>,
    /// Fault code frames.
    pub fault: Option<&'static [Segment]>,
    /// Version command byte.
    pub version: Option<u8>,
}

/// Per-joint registers a [`CommandSet`] may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// Joint positions.
    Position,
    /// Joint speeds.
    Speed,
    /// Joint torques.
    Torque,
    /// Motor temperatures.
    Temperature,
    /// Fault codes.
    Fault,
}

impl CommandSet {
    /// Segments of `register`, if this model has it.
    pub fn segments(&self, register: Register) -> Option<&'static [Segment]> {
        match register {
            Register::Position => Some(self.position),
            Register::Speed => self.speed,
            Register::Torque => self.torque,
            Register::Temperature => self.temperature,
            Register::Fault => self.fault,
        }
    }

    /// Every command code used by any register of this set.
    pub fn commands(&self) -> impl Iterator<Item = u8> + '_ {
        let optional = [self.speed, self.torque, self.temperature, self.fault];
        self.position
            .iter()
            .chain(optional.into_iter().flatten().flatten())
            .map(|s| s.command)
            .chain(self.version)
    }
}

// =============================================================================
// HandLink
// =============================================================================

/// Transport plus protocol state shared by every CAN-framed driver.
///
/// Validates vector lengths against the limit table before any frame is
/// built, masks reserved joint slots, and pairs queries with replies.
pub(crate) struct HandLink {
    identity: HandIdentity,
    limits: JointLimitTable,
    commands: &'static CommandSet,
    transport: Box<dyn FrameTransport>,
    connected: bool,
}

impl HandLink {
    pub(crate) fn new(
        identity: HandIdentity,
        commands: &'static CommandSet,
        transport: Box<dyn FrameTransport>,
    ) -> HandResult<Self> {
        let limits = hand_core::resolve_limit_table(identity.model, identity.handedness)?;
        Ok(Self {
            identity,
            limits,
            commands,
            transport,
            connected: true,
        })
    }

    pub(crate) fn identity(&self) -> HandIdentity {
        self.identity
    }

    pub(crate) fn limits(&self) -> JointLimitTable {
        self.limits
    }

    pub(crate) fn hand_id(&self) -> u32 {
        self.identity.hand_id()
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.connected
    }

    fn ensure_connected(&self) -> HandResult<()> {
        if self.connected {
            Ok(())
        } else {
            Err(HandError::NotConnected)
        }
    }

    pub(crate) async fn connect(&mut self) -> HandResult<()> {
        if self.connected {
            return Ok(());
        }
        self.transport.reopen().await?;
        self.connected = true;
        tracing::info!(hand = %self.identity, "hand reconnected");
        Ok(())
    }

    pub(crate) async fn disconnect(&mut self) -> HandResult<()> {
        if !self.connected {
            return Ok(());
        }
        self.transport.close().await?;
        self.connected = false;
        tracing::info!(hand = %self.identity, "hand disconnected");
        Ok(())
    }

    /// Zero reserved joint slots in place.
    fn mask_reserved(&self, values: &mut [u8]) {
        for (i, v) in values.iter_mut().enumerate() {
            if should_skip_joint(self.identity.model, i) {
                *v = 0;
            }
        }
    }

    async fn send(&mut self, frame: Frame) -> HandResult<()> {
        tracing::trace!(?frame, "tx");
        self.transport.send(frame).await?;
        Ok(())
    }

    /// Send a one-byte query and wait for the matching reply body.
    async fn query(&mut self, command: u8) -> HandResult<Vec<u8>> {
        let hand_id = self.hand_id();
        self.send(Frame::command(hand_id, command, &[])?).await?;

        for _ in 0..MAX_STRAY_FRAMES {
            let reply = self.transport.recv().await?;
            if reply.identifier() != hand_id {
                tracing::trace!(?reply, "ignoring frame for another node");
                continue;
            }
            return match reply.command_byte() {
                Some(c) if c == command => Ok(reply.body().to_vec()),
                Some(c) => Err(HandError::UnexpectedResponse {
                    command,
                    reason: format!("reply carries command {c:#04x}"),
                }),
                None => Err(HandError::UnexpectedResponse {
                    command,
                    reason: "empty reply".to_string(),
                }),
            };
        }
        Err(HandError::UnexpectedResponse {
            command,
            reason: format!("no reply after {MAX_STRAY_FRAMES} foreign frames"),
        })
    }

    /// Write one value per joint across `segments`.
    async fn write_joints(&mut self, segments: &[Segment], values: &[u8]) -> HandResult<()> {
        self.ensure_connected()?;
        self.limits.check_len(values.len())?;

        let mut masked = values.to_vec();
        self.mask_reserved(&mut masked);

        let hand_id = self.hand_id();
        let frames = segments
            .iter()
            .map(|segment| {
                let body: Vec<u8> = segment.joints.iter().map(|&j| masked[j]).collect();
                Frame::command(hand_id, segment.command, &body)
            })
            .collect::<HandResult<Vec<_>>>()?;

        for frame in frames {
            self.send(frame).await?;
        }
        Ok(())
    }

    /// Read one value per joint from `segments`.
    async fn read_joints(&mut self, segments: &[Segment]) -> HandResult<Vec<u8>> {
        self.ensure_connected()?;
        let mut values = vec![0u8; self.limits.joint_count()];
        for segment in segments {
            let body = self.query(segment.command).await?;
            if body.len() < segment.joints.len() {
                return Err(HandError::UnexpectedResponse {
                    command: segment.command,
                    reason: format!(
                        "expected {} joint values, got {}",
                        segment.joints.len(),
                        body.len()
                    ),
                });
            }
            for (&joint, &value) in segment.joints.iter().zip(&body) {
                values[joint] = value;
            }
        }
        self.mask_reserved(&mut values);
        Ok(values)
    }

    pub(crate) async fn read_sensors(&mut self) -> HandResult<SensorSnapshot> {
        self.ensure_connected()?;
        let mut snapshot = SensorSnapshot::default();
        for command in SENSOR_COMMANDS {
            let body = self.query(command).await?;
            let field = match command {
                SENSOR_NORMAL_FORCE => &mut snapshot.normal_force,
                SENSOR_TANGENTIAL_FORCE => &mut snapshot.tangential_force,
                SENSOR_TANGENTIAL_DIRECTION => &mut snapshot.tangential_direction,
                _ => &mut snapshot.proximity,
            };
            if body.len() < field.len() {
                return Err(HandError::UnexpectedResponse {
                    command,
                    reason: format!("expected {} finger values, got {}", field.len(), body.len()),
                });
            }
            let len = field.len();
            field.copy_from_slice(&body[..len]);
        }
        Ok(snapshot)
    }

    /// Write a per-joint register, or report `capability` unsupported.
    pub(crate) async fn write_register(
        &mut self,
        register: Register,
        capability: &'static str,
        values: &[u8],
    ) -> HandResult<()> {
        let segments = self
            .commands
            .segments(register)
            .ok_or_else(|| self.unsupported(capability))?;
        self.write_joints(segments, values).await
    }

    /// Read a per-joint register, or report `capability` unsupported.
    pub(crate) async fn read_register(
        &mut self,
        register: Register,
        capability: &'static str,
    ) -> HandResult<Vec<u8>> {
        let segments = self
            .commands
            .segments(register)
            .ok_or_else(|| self.unsupported(capability))?;
        self.read_joints(segments).await
    }

    /// Writing zeros to the fault register acknowledges every fault.
    pub(crate) async fn clear_faults(&mut self) -> HandResult<()> {
        let segments = self
            .commands
            .fault
            .ok_or_else(|| self.unsupported("clear_faults"))?;
        let zeros = vec![0u8; self.limits.joint_count()];
        self.write_joints(segments, &zeros).await
    }

    pub(crate) async fn read_version(&mut self) -> HandResult<Vec<u8>> {
        self.ensure_connected()?;
        let command = self
            .commands
            .version
            .ok_or_else(|| self.unsupported("read_version"))?;
        self.query(command).await
    }

    fn unsupported(&self, capability: &'static str) -> HandError {
        HandError::Unsupported {
            model: self.identity.model,
            capability,
        }
    }
}
