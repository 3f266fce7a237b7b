//! Fault injection for the simulated bus.
//!
//! A [`FaultPlan`] is shared by a [`SimulatedBus`](crate::SimulatedBus) and
//! every transport it opens, so counters and the lost-link flag are bus wide.

use super::rng::SimRng;
use hand_core::{Frame, TransportEndpoint, TransportError};
use parking_lot::Mutex;
use std::sync::Arc;

/// A scripted failure.
#[derive(Debug, Clone, PartialEq)]
pub enum FaultScenario {
    /// Every open attempt fails.
    FailOpen,
    /// Sends beyond the first `count` fail with a bus error.
    FailAfterSends { count: u32 },
    /// After `after` successful sends the link drops for good: sends fail,
    /// receives report the transport closed, reopening fails.
    CommunicationLoss { after: u32 },
    /// Queries for `command` get no reply, so the next receive times out.
    DropReplies { command: u8 },
}

#[derive(Debug, Default)]
struct FaultState {
    sends: u32,
    link_lost: bool,
}

/// Fault configuration plus its running state.
#[derive(Debug, Clone)]
pub struct FaultPlan {
    scenarios: Arc<Vec<FaultScenario>>,
    send_failure_rate: f64,
    rng: Arc<SimRng>,
    state: Arc<Mutex<FaultState>>,
}

impl Default for FaultPlan {
    fn default() -> Self {
        Self::none()
    }
}

impl FaultPlan {
    /// No faults.
    pub fn none() -> Self {
        Self::scenarios(Vec::new())
    }

    /// A single scripted fault.
    pub fn scenario(scenario: FaultScenario) -> Self {
        Self::scenarios(vec![scenario])
    }

    /// Several scripted faults, all active.
    pub fn scenarios(scenarios: Vec<FaultScenario>) -> Self {
        Self {
            scenarios: Arc::new(scenarios),
            send_failure_rate: 0.0,
            rng: Arc::new(SimRng::new(None)),
            state: Arc::new(Mutex::new(FaultState::default())),
        }
    }

    /// Fail each send independently with probability `rate`.
    pub fn random_send_failures(rate: f64, seed: Option<u64>) -> Self {
        Self {
            send_failure_rate: rate,
            rng: Arc::new(SimRng::new(seed)),
            ..Self::none()
        }
    }

    /// True once a communication-loss fault has fired.
    pub fn is_link_lost(&self) -> bool {
        self.state.lock().link_lost
    }

    pub(crate) fn check_open(&self, endpoint: &TransportEndpoint) -> Result<(), TransportError> {
        let refuse = self.state.lock().link_lost
            || self.scenarios.iter().any(|s| *s == FaultScenario::FailOpen);
        if refuse {
            tracing::debug!(%endpoint, "injected open failure");
            return Err(TransportError::Open {
                channel: endpoint.channel.clone(),
                reason: "injected fault".to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn check_send(&self) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if state.link_lost {
            return Err(TransportError::Bus("communication lost".to_string()));
        }
        for scenario in self.scenarios.iter() {
            match *scenario {
                FaultScenario::FailAfterSends { count } if state.sends >= count => {
                    return Err(TransportError::Bus(format!(
                        "injected failure after {count} sends"
                    )));
                }
                FaultScenario::CommunicationLoss { after } if state.sends >= after => {
                    state.link_lost = true;
                    tracing::debug!(after, "injected communication loss");
                    return Err(TransportError::Bus("communication lost".to_string()));
                }
                _ => {}
            }
        }
        if self.rng.should_fail(self.send_failure_rate) {
            return Err(TransportError::Bus("random send failure".to_string()));
        }
        state.sends += 1;
        Ok(())
    }

    pub(crate) fn check_recv(&self) -> Result<(), TransportError> {
        if self.state.lock().link_lost {
            return Err(TransportError::Closed);
        }
        Ok(())
    }

    /// Whether the reply to `request` should be swallowed.
    pub(crate) fn drops_reply(&self, request: &Frame) -> bool {
        let command = request.command_byte();
        self.scenarios.iter().any(|s| match s {
            FaultScenario::DropReplies { command: c } => Some(*c) == command,
            _ => false,
        })
    }
}
