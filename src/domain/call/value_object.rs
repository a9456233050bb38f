//! Call value objects

use serde::{Deserialize, Serialize};

/// Call state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallState {
    /// Agent is being alerted
    Ringing,
    /// Agent answered; media negotiates directly between the parties
    Connected,
    /// Terminal
    Ended(EndReason),
}

impl CallState {
    /// Check if state transition is valid
    pub fn can_transition_to(&self, new_state: &CallState) -> bool {
        use CallState::*;

        match (self, new_state) {
            (Ringing, Connected) => true,
            (Ringing, Ended(_)) => true,
            (Connected, Ended(_)) => true,

            // Can't transition from Ended
            (Ended(_), _) => false,

            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, CallState::Ended(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallState::Ringing => "ringing",
            CallState::Connected => "connected",
            CallState::Ended(_) => "ended",
        }
    }
}

/// Reason for call ending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Agent declined while ringing
    Declined(String),
    CallerHangup,
    AgentHangup,
    CallerDisconnected,
    AgentDisconnected,
    /// Ringing timed out
    NoAnswer,
}

impl EndReason {
    /// Metric label
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::Declined(_) => "declined",
            EndReason::CallerHangup => "caller_hangup",
            EndReason::AgentHangup => "agent_hangup",
            EndReason::CallerDisconnected => "caller_disconnected",
            EndReason::AgentDisconnected => "agent_disconnected",
            EndReason::NoAnswer => "no_answer",
        }
    }
}
