//! Call session table
//!
//! Owns every in-flight call. Calls are removed as soon as they end, so the
//! table only ever holds `Ringing` or `Connected` entries.

use crate::domain::call::aggregate::Call;
use crate::domain::shared::value_objects::{CallId, ConnectionId};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct CallSessionTable {
    calls: HashMap<CallId, Call>,
}

impl CallSessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint an id not present in the table
    pub fn next_id(&self) -> CallId {
        loop {
            let id = CallId::new();
            if !self.calls.contains_key(&id) {
                return id;
            }
        }
    }

    pub fn insert(&mut self, call: Call) {
        self.calls.insert(call.id(), call);
    }

    pub fn get(&self, id: CallId) -> Option<&Call> {
        self.calls.get(&id)
    }

    pub fn get_mut(&mut self, id: CallId) -> Option<&mut Call> {
        self.calls.get_mut(&id)
    }

    pub fn remove(&mut self, id: CallId) -> Option<Call> {
        self.calls.remove(&id)
    }

    /// The live call assigned to `agent`, if any
    pub fn active_for_agent(&self, agent: ConnectionId) -> Option<&Call> {
        self.calls
            .values()
            .find(|call| call.is_active() && call.agent_id() == agent)
    }

    /// Ids of every call that `connection` is a party to
    pub fn involving(&self, connection: ConnectionId) -> Vec<CallId> {
        self.calls
            .values()
            .filter(|call| call.party(connection).is_some())
            .map(Call::id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Call> {
        self.calls.values()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_lookup_remove() {
        let mut table = CallSessionTable::new();
        let id = table.next_id();
        let caller = ConnectionId::new();
        let agent = ConnectionId::new();

        table.insert(Call::new(id, caller, agent, "Caller".to_string()));

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(id).unwrap().agent_id(), agent);
        assert_eq!(table.active_for_agent(agent).unwrap().id(), id);
        assert!(table.active_for_agent(caller).is_none());

        assert!(table.remove(id).is_some());
        assert!(table.is_empty());
    }

    #[test]
    fn test_involving_matches_both_sides() {
        let mut table = CallSessionTable::new();
        let caller = ConnectionId::new();
        let agent_a = ConnectionId::new();
        let agent_b = ConnectionId::new();

        let first = table.next_id();
        table.insert(Call::new(first, caller, agent_a, "C".to_string()));
        let second = table.next_id();
        table.insert(Call::new(second, caller, agent_b, "C".to_string()));

        let mut ids = table.involving(caller);
        ids.sort_by_key(|id| id.as_uuid());
        let mut expected = vec![first, second];
        expected.sort_by_key(|id| id.as_uuid());
        assert_eq!(ids, expected);

        assert_eq!(table.involving(agent_b), vec![second]);
        assert!(table.involving(ConnectionId::new()).is_empty());
    }

    #[test]
    fn test_next_id_is_fresh_per_placement() {
        let table = CallSessionTable::new();
        assert_ne!(table.next_id(), table.next_id());
    }
}
