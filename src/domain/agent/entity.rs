//! Agent entity

use crate::domain::shared::value_objects::ConnectionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_AGENT_NAME: &str = "Agent";

/// A directory-registered party that can receive calls
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    id: ConnectionId,
    name: String,
    attributes: HashMap<String, String>,
    available: bool,
    busy: bool,
    registered_at: DateTime<Utc>,
}

impl Agent {
    /// Fresh record: available and not busy. A blank name falls back to
    /// [`DEFAULT_AGENT_NAME`].
    pub fn new(id: ConnectionId, name: &str, attributes: HashMap<String, String>) -> Self {
        let name = name.trim();
        let name = if name.is_empty() {
            DEFAULT_AGENT_NAME.to_string()
        } else {
            name.to_string()
        };

        Self {
            id,
            name,
            attributes,
            available: true,
            busy: false,
            registered_at: Utc::now(),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn registered_at(&self) -> &DateTime<Utc> {
        &self.registered_at
    }

    /// Available and not on a live call
    pub fn is_eligible(&self) -> bool {
        self.available && !self.busy
    }

    pub(crate) fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            id: self.id,
            name: self.name.clone(),
            eligible: self.is_eligible(),
        }
    }
}

/// External read view of an agent; `busy` is folded into `eligible`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub id: ConnectionId,
    pub name: String,
    pub eligible: bool,
}
