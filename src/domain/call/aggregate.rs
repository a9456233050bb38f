//! Call aggregate root

use crate::domain::call::value_object::{CallState, EndReason};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{CallId, ConnectionId};
use chrono::{DateTime, Utc};

/// Which side of a call a connection is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Caller,
    Agent,
}

/// One negotiated session between a caller and an agent.
///
/// Party ids are weak references: the call never owns the connections, it
/// only uses them for membership checks.
#[derive(Debug, Clone)]
pub struct Call {
    id: CallId,
    caller_id: ConnectionId,
    agent_id: ConnectionId,
    caller_name: String,
    state: CallState,
    started_at: DateTime<Utc>,
    connected_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl Call {
    /// New call in `Ringing`
    pub fn new(
        id: CallId,
        caller_id: ConnectionId,
        agent_id: ConnectionId,
        caller_name: String,
    ) -> Self {
        Self {
            id,
            caller_id,
            agent_id,
            caller_name,
            state: CallState::Ringing,
            started_at: Utc::now(),
            connected_at: None,
            ended_at: None,
        }
    }

    /// Agent answered
    pub fn accept(&mut self) -> Result<()> {
        self.transition_to(CallState::Connected)?;
        self.connected_at = Some(Utc::now());
        Ok(())
    }

    /// End the call
    pub fn end(&mut self, reason: EndReason) -> Result<()> {
        self.transition_to(CallState::Ended(reason))?;
        self.ended_at = Some(Utc::now());
        Ok(())
    }

    fn transition_to(&mut self, new_state: CallState) -> Result<()> {
        if !self.state.can_transition_to(&new_state) {
            return Err(DomainError::InvalidCallState(format!(
                "call {} cannot go from {} to {}",
                self.id,
                self.state.as_str(),
                new_state.as_str()
            )));
        }

        self.state = new_state;
        Ok(())
    }

    pub fn party(&self, connection: ConnectionId) -> Option<Party> {
        if connection == self.agent_id {
            Some(Party::Agent)
        } else if connection == self.caller_id {
            Some(Party::Caller)
        } else {
            None
        }
    }

    /// The other party, if `connection` is one of the two
    pub fn counterpart(&self, connection: ConnectionId) -> Option<ConnectionId> {
        match self.party(connection)? {
            Party::Caller => Some(self.agent_id),
            Party::Agent => Some(self.caller_id),
        }
    }

    // Getters
    pub fn id(&self) -> CallId {
        self.id
    }

    pub fn caller_id(&self) -> ConnectionId {
        self.caller_id
    }

    pub fn agent_id(&self) -> ConnectionId {
        self.agent_id
    }

    pub fn caller_name(&self) -> &str {
        &self.caller_name
    }

    pub fn state(&self) -> &CallState {
        &self.state
    }

    pub fn started_at(&self) -> &DateTime<Utc> {
        &self.started_at
    }

    pub fn connected_at(&self) -> Option<&DateTime<Utc>> {
        self.connected_at.as_ref()
    }

    pub fn ended_at(&self) -> Option<&DateTime<Utc>> {
        self.ended_at.as_ref()
    }

    pub fn duration(&self) -> Option<chrono::Duration> {
        self.connected_at
            .and_then(|connected| self.ended_at.map(|ended| ended - connected))
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}
