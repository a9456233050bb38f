//! Signaling relay routing groups
//!
//! A routing group is exactly the two connections of one live call. Group
//! membership, not call state, decides whether relay traffic is delivered.

use crate::domain::shared::value_objects::{CallId, ConnectionId};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingGroup {
    pub caller: ConnectionId,
    pub agent: ConnectionId,
}

impl RoutingGroup {
    pub fn contains(&self, connection: ConnectionId) -> bool {
        self.caller == connection || self.agent == connection
    }

    pub fn members(&self) -> [ConnectionId; 2] {
        [self.caller, self.agent]
    }

    /// The opposite member, or `None` for a non-member
    pub fn counterpart(&self, connection: ConnectionId) -> Option<ConnectionId> {
        if connection == self.caller {
            Some(self.agent)
        } else if connection == self.agent {
            Some(self.caller)
        } else {
            None
        }
    }
}

#[derive(Debug, Default)]
pub struct RoutingTable {
    groups: HashMap<CallId, RoutingGroup>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn establish(&mut self, call_id: CallId, caller: ConnectionId, agent: ConnectionId) {
        self.groups.insert(call_id, RoutingGroup { caller, agent });
    }

    /// Returns false when no group existed
    pub fn dissolve(&mut self, call_id: CallId) -> bool {
        self.groups.remove(&call_id).is_some()
    }

    pub fn group(&self, call_id: CallId) -> Option<&RoutingGroup> {
        self.groups.get(&call_id)
    }

    /// Where a relay message from `from` on `call_id` goes. `None` when the
    /// group is gone or `from` is not a member.
    pub fn route(&self, call_id: CallId, from: ConnectionId) -> Option<ConnectionId> {
        self.groups.get(&call_id)?.counterpart(from)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
