//! Simulated hand transport and bus.
//!
//! A [`SimulatedBus`] owns one register file shared by every
//! [`SimulatedHand`] transport it opens. Tests seed registers and inspect the
//! frames drivers sent through the bus handle, which is cheap to clone.

use crate::common::FaultPlan;
use crate::registers::RegisterFile;
use async_trait::async_trait;
use futures::future::BoxFuture;
use hand_core::config::DEFAULT_BITRATE;
use hand_core::{
    Frame, FrameTransport, TransportEndpoint, TransportError, TransportKind, TransportOpener,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
struct BusState {
    registers: RegisterFile,
    sent: Vec<Frame>,
    opens: usize,
}

// =============================================================================
// SimulatedBus
// =============================================================================

/// In-memory bus that emulates LinkerHand firmware.
#[derive(Debug, Clone, Default)]
pub struct SimulatedBus {
    state: Arc<Mutex<BusState>>,
    faults: FaultPlan,
    latency: Option<Duration>,
}

impl SimulatedBus {
    /// Fault-free bus with no latency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus whose transports fail according to `faults`.
    pub fn with_faults(faults: FaultPlan) -> Self {
        Self {
            faults,
            ..Self::default()
        }
    }

    /// Delay every send by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Fault plan shared by every transport on this bus.
    pub fn faults(&self) -> &FaultPlan {
        &self.faults
    }

    /// Transport on this bus without going through [`TransportOpener`].
    pub fn hand(&self, kind: TransportKind) -> SimulatedHand {
        self.transport_for(TransportEndpoint {
            kind,
            channel: kind.as_str().to_string(),
            bitrate: DEFAULT_BITRATE,
        })
    }

    fn transport_for(&self, endpoint: TransportEndpoint) -> SimulatedHand {
        SimulatedHand {
            state: Arc::clone(&self.state),
            faults: self.faults.clone(),
            latency: self.latency,
            endpoint,
            pending: VecDeque::new(),
            closed: false,
        }
    }

    /// Preset a CAN register of one hand.
    pub fn seed_register(&self, identifier: u32, command: u8, body: &[u8]) {
        self.state.lock().registers.seed_can(identifier, command, body);
    }

    /// Preset a CAN register for every hand that has not written it.
    pub fn seed_default(&self, command: u8, body: &[u8]) {
        self.state.lock().registers.seed_can_default(command, body);
    }

    /// Last body written to a CAN register.
    pub fn register(&self, identifier: u32, command: u8) -> Option<Vec<u8>> {
        self.state.lock().registers.can_register(identifier, command)
    }

    /// Preset a Modbus input register of one unit.
    pub fn seed_input_register(&self, unit: u32, address: u16, value: u16) {
        if let Ok(unit) = u8::try_from(unit) {
            self.state.lock().registers.seed_input(unit, address, value);
        }
    }

    /// Current Modbus holding register of one unit, 0 if unset.
    pub fn holding_register(&self, unit: u32, address: u16) -> u16 {
        u8::try_from(unit)
            .map(|unit| self.state.lock().registers.holding(unit, address))
            .unwrap_or(0)
    }

    /// Every frame sent on the bus, oldest first.
    pub fn sent_frames(&self) -> Vec<Frame> {
        self.state.lock().sent.clone()
    }

    /// Forget the sent-frame log.
    pub fn clear_sent(&self) {
        self.state.lock().sent.clear();
    }

    /// Successful [`TransportOpener::open`] calls.
    pub fn open_count(&self) -> usize {
        self.state.lock().opens
    }
}

impl TransportOpener for SimulatedBus {
    fn open<'a>(
        &'a self,
        endpoint: &'a TransportEndpoint,
    ) -> BoxFuture<'a, Result<Box<dyn FrameTransport>, TransportError>> {
        Box::pin(async move {
            self.faults.check_open(endpoint)?;
            self.state.lock().opens += 1;
            tracing::debug!(%endpoint, "simulated transport opened");
            Ok(Box::new(self.transport_for(endpoint.clone())) as Box<dyn FrameTransport>)
        })
    }
}

// =============================================================================
// SimulatedHand
// =============================================================================

/// One open link to a [`SimulatedBus`].
#[derive(Debug)]
pub struct SimulatedHand {
    state: Arc<Mutex<BusState>>,
    faults: FaultPlan,
    latency: Option<Duration>,
    endpoint: TransportEndpoint,
    pending: VecDeque<Frame>,
    closed: bool,
}

impl SimulatedHand {
    /// Endpoint this link was opened for.
    pub fn endpoint(&self) -> &TransportEndpoint {
        &self.endpoint
    }

    /// True after [`FrameTransport::close`].
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl FrameTransport for SimulatedHand {
    async fn send(&mut self, frame: Frame) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.faults.check_send()?;

        let reply = {
            let mut state = self.state.lock();
            state.sent.push(frame);
            match self.endpoint.kind {
                TransportKind::Modbus => state.registers.respond_modbus(&frame),
                _ => state.registers.respond_can(&frame),
            }
        };
        if let Some(reply) = reply {
            if self.faults.drops_reply(&frame) {
                tracing::trace!(?frame, "reply dropped by fault plan");
            } else {
                self.pending.push_back(reply);
            }
        }
        Ok(())
    }

    async fn recv(&mut self) -> Result<Frame, TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.faults.check_recv()?;
        self.pending.pop_front().ok_or(TransportError::Timeout)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.closed = true;
        self.pending.clear();
        Ok(())
    }

    async fn reopen(&mut self) -> Result<(), TransportError> {
        self.faults.check_open(&self.endpoint)?;
        self.closed = false;
        Ok(())
    }

    fn label(&self) -> String {
        format!("sim:{}", self.endpoint.channel)
    }
}
