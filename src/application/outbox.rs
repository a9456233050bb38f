//! Outbound delivery
//!
//! One unbounded queue per live connection. Pushing never blocks, so
//! delivery happens inside the switchboard's critical section and
//! per-connection order follows mutation order.

use crate::application::protocol::OutboundEvent;
use crate::domain::relay::RoutingGroup;
use crate::domain::shared::value_objects::ConnectionId;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::debug;

pub type OutboundSender = mpsc::UnboundedSender<OutboundEvent>;
pub type OutboundReceiver = mpsc::UnboundedReceiver<OutboundEvent>;

#[derive(Debug, Default)]
pub struct Outbox {
    peers: HashMap<ConnectionId, OutboundSender>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a queue for `id`, replacing any previous one
    pub fn attach(&mut self, id: ConnectionId) -> OutboundReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.peers.insert(id, tx);
        rx
    }

    pub fn detach(&mut self, id: ConnectionId) -> bool {
        self.peers.remove(&id).is_some()
    }

    pub fn is_attached(&self, id: ConnectionId) -> bool {
        self.peers.contains_key(&id)
    }

    /// Returns false when the connection is gone
    pub fn unicast(&self, to: ConnectionId, event: OutboundEvent) -> bool {
        match self.peers.get(&to) {
            Some(tx) => {
                if tx.send(event).is_err() {
                    debug!("Outbound queue closed for {}", to);
                    false
                } else {
                    true
                }
            }
            None => {
                debug!("No outbound queue for {}", to);
                false
            }
        }
    }

    pub fn broadcast(&self, event: OutboundEvent) {
        for (id, tx) in &self.peers {
            if tx.send(event.clone()).is_err() {
                debug!("Outbound queue closed for {}", id);
            }
        }
    }

    /// Deliver to both members of a routing group, minus `except`
    pub fn multicast(
        &self,
        group: &RoutingGroup,
        event: OutboundEvent,
        except: Option<ConnectionId>,
    ) -> usize {
        group
            .members()
            .into_iter()
            .filter(|id| Some(*id) != except)
            .filter(|id| self.unicast(*id, event.clone()))
            .count()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
