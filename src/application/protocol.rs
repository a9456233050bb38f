//! Switchboard message protocol
//!
//! JSON objects tagged by `type`. Negotiation payloads (offer, answer,
//! candidate) are carried as opaque JSON values and never inspected beyond
//! presence.

use crate::domain::agent::AgentSummary;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::value_objects::{CallId, ConnectionId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Party → switchboard
///
/// Ids arrive as plain strings: an unparseable id behaves like an unknown
/// one rather than failing the whole event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InboundEvent {
    DirectoryRequest,
    AgentRegister {
        #[serde(default)]
        name: String,
        #[serde(default)]
        attributes: HashMap<String, String>,
    },
    AgentSetAvailable {
        available: bool,
    },
    AgentDeregister,
    CallPlace {
        target_agent_id: String,
        offer: Value,
        #[serde(default)]
        caller_name: Option<String>,
    },
    CallAccept {
        call_id: String,
        answer: Value,
    },
    CallDecline {
        call_id: String,
        #[serde(default)]
        reason: Option<String>,
    },
    CallHangup {
        call_id: String,
    },
    SignalingCandidate {
        call_id: String,
        candidate: Value,
    },
    CallTranscript {
        call_id: String,
        text: String,
        #[serde(default)]
        language: Option<String>,
    },
    Ping,
}

impl InboundEvent {
    /// Parse one text frame. Missing fields and null negotiation payloads
    /// are `MalformedEvent`.
    pub fn decode(text: &str) -> Result<Self, DomainError> {
        let event: InboundEvent = serde_json::from_str(text)
            .map_err(|e| DomainError::MalformedEvent(e.to_string()))?;
        event.validate()?;
        Ok(event)
    }

    fn validate(&self) -> Result<(), DomainError> {
        let missing = match self {
            InboundEvent::CallPlace { offer, .. } if offer.is_null() => Some("offer"),
            InboundEvent::CallAccept { answer, .. } if answer.is_null() => Some("answer"),
            InboundEvent::SignalingCandidate { candidate, .. } if candidate.is_null() => {
                Some("candidate")
            }
            _ => None,
        };

        match missing {
            Some(field) => Err(DomainError::MalformedEvent(format!(
                "{} must not be null",
                field
            ))),
            None => Ok(()),
        }
    }

    /// Wire name, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::DirectoryRequest => "directory-request",
            InboundEvent::AgentRegister { .. } => "agent-register",
            InboundEvent::AgentSetAvailable { .. } => "agent-set-available",
            InboundEvent::AgentDeregister => "agent-deregister",
            InboundEvent::CallPlace { .. } => "call-place",
            InboundEvent::CallAccept { .. } => "call-accept",
            InboundEvent::CallDecline { .. } => "call-decline",
            InboundEvent::CallHangup { .. } => "call-hangup",
            InboundEvent::SignalingCandidate { .. } => "signaling-candidate",
            InboundEvent::CallTranscript { .. } => "call-transcript",
            InboundEvent::Ping => "ping",
        }
    }
}

/// Switchboard → party
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OutboundEvent {
    /// First message on every connection
    Connected {
        connection_id: ConnectionId,
    },
    DirectorySnapshot {
        agents: Vec<AgentSummary>,
    },
    CallIncoming {
        call_id: CallId,
        caller_id: ConnectionId,
        caller_name: String,
        offer: Value,
    },
    CallRinging {
        call_id: CallId,
        agent_name: String,
    },
    CallAccepted {
        call_id: CallId,
        answer: Value,
    },
    CallDeclined {
        call_id: CallId,
        reason: String,
    },
    /// Placement failed; `reason` is `AgentNotFound` or `AgentUnavailable`
    CallError {
        reason: String,
        message: String,
    },
    CallEnded {
        call_id: CallId,
    },
    SignalingCandidate {
        call_id: CallId,
        candidate: Value,
    },
    CallTranscript {
        call_id: CallId,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    RequestRejected {
        reason: String,
        message: String,
    },
    Pong,
}

impl OutboundEvent {
    /// Answer to a failed request
    pub fn from_error(err: &DomainError) -> Self {
        if err.is_placement_failure() {
            OutboundEvent::CallError {
                reason: err.code().to_string(),
                message: err.to_string(),
            }
        } else {
            OutboundEvent::RequestRejected {
                reason: err.code().to_string(),
                message: err.to_string(),
            }
        }
    }
}
