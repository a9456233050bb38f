//! Agent directory
//!
//! In-memory store of registered agents, keyed by connection. Callers are
//! never stored here. Mutations report whether the directory changed so the
//! coordinator can broadcast a snapshot in the same step.

use super::entity::{Agent, AgentSummary};
use crate::domain::shared::value_objects::ConnectionId;
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct AgentDirectory {
    agents: HashMap<ConnectionId, Agent>,
}

impl AgentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `id`. Always a directory change.
    pub fn register(
        &mut self,
        id: ConnectionId,
        name: &str,
        attributes: HashMap<String, String>,
    ) -> &Agent {
        let agent = Agent::new(id, name, attributes);
        info!("Agent registered: {} ({})", id, agent.name());
        self.agents.insert(id, agent);
        &self.agents[&id]
    }

    /// Returns false when `id` is not a registered agent.
    pub fn set_available(&mut self, id: ConnectionId, available: bool) -> bool {
        match self.agents.get_mut(&id) {
            Some(agent) => {
                agent.set_available(available);
                info!("Agent {} availability: {}", id, available);
                true
            }
            None => {
                warn!("Availability update from unregistered connection {}", id);
                false
            }
        }
    }

    pub(crate) fn set_busy(&mut self, id: ConnectionId, busy: bool) -> bool {
        match self.agents.get_mut(&id) {
            Some(agent) => {
                agent.set_busy(busy);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: ConnectionId) -> Option<Agent> {
        let removed = self.agents.remove(&id);
        if let Some(agent) = &removed {
            info!("Agent removed: {} ({})", id, agent.name());
        }
        removed
    }

    pub fn lookup(&self, id: ConnectionId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.agents.contains_key(&id)
    }

    /// Current directory view, in no particular order
    pub fn snapshot(&self) -> Vec<AgentSummary> {
        self.agents.values().map(Agent::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
