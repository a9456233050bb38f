//! Switchboard coordinator
//!
//! Owns the agent directory, the call session table, the routing groups and
//! the outbox as one store behind a single lock. Every inbound event runs to
//! completion, deliveries included, before the next event touches the store,
//! so the cross-table invariants are never observed half-applied:
//!
//! - an agent is busy exactly while it is the agent of a live call
//! - an agent has at most one live call
//! - a call exists exactly as long as its routing group does

use crate::application::outbox::{OutboundReceiver, Outbox};
use crate::application::protocol::{InboundEvent, OutboundEvent};
use crate::domain::agent::{AgentDirectory, AgentSummary};
use crate::domain::call::{Call, CallSessionTable, CallState, EndReason, Party};
use crate::domain::relay::RoutingTable;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{CallId, ConnectionId};
use crate::infrastructure::metrics;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const DEFAULT_CALLER_NAME: &str = "Caller";
pub const DEFAULT_DECLINE_REASON: &str = "Declined";
pub const NO_ANSWER_REASON: &str = "No answer";

#[derive(Debug, Default)]
struct Store {
    directory: AgentDirectory,
    calls: CallSessionTable,
    routes: RoutingTable,
    outbox: Outbox,
}

fn parse_call_id(raw: &str) -> Result<CallId> {
    raw.parse()
        .map_err(|_| DomainError::UnknownCall(raw.to_string()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Store {
    fn snapshot_event(&self) -> OutboundEvent {
        OutboundEvent::DirectorySnapshot {
            agents: self.directory.snapshot(),
        }
    }

    fn broadcast_directory(&self) {
        self.outbox.broadcast(self.snapshot_event());
        metrics::update_registered_agents(self.directory.len());
    }

    fn reject(&self, to: ConnectionId, err: &DomainError) {
        self.outbox.unicast(to, OutboundEvent::from_error(err));
    }

    fn register(&mut self, id: ConnectionId, name: &str, attributes: HashMap<String, String>) {
        self.directory.register(id, name, attributes);

        // A replaced record must not hide a call that is still live.
        if self.calls.active_for_agent(id).is_some() {
            self.directory.set_busy(id, true);
        }

        self.broadcast_directory();
    }

    fn set_available(&mut self, id: ConnectionId, available: bool) {
        if self.directory.set_available(id, available) {
            self.broadcast_directory();
        }
    }

    fn deregister(&mut self, id: ConnectionId) {
        let mut changed = false;

        if let Some(call_id) = self.calls.active_for_agent(id).map(Call::id) {
            changed |= self.end_and_notify(call_id, id, EndReason::AgentDisconnected);
        }
        changed |= self.directory.remove(id).is_some();

        if changed {
            self.broadcast_directory();
        }
    }

    fn place(
        &mut self,
        caller: ConnectionId,
        target: &str,
        offer: Value,
        caller_name: Option<String>,
    ) -> Result<CallId> {
        let result = self.try_place(caller, target, offer, caller_name);
        match &result {
            Ok(_) => metrics::record_call_placed(),
            Err(err) => metrics::record_call_failed(err.code()),
        }
        result
    }

    fn try_place(
        &mut self,
        caller: ConnectionId,
        target: &str,
        offer: Value,
        caller_name: Option<String>,
    ) -> Result<CallId> {
        let agent_id: ConnectionId = target
            .parse()
            .map_err(|_| DomainError::AgentNotFound(target.to_string()))?;
        let agent = self
            .directory
            .lookup(agent_id)
            .ok_or_else(|| DomainError::AgentNotFound(target.to_string()))?;

        if !agent.is_eligible()
            || agent_id == caller
            || self.calls.active_for_agent(agent_id).is_some()
        {
            return Err(DomainError::AgentUnavailable(target.to_string()));
        }

        let agent_name = agent.name().to_string();
        let caller_name =
            non_blank(caller_name).unwrap_or_else(|| DEFAULT_CALLER_NAME.to_string());

        self.directory.set_busy(agent_id, true);
        self.broadcast_directory();

        let call_id = self.calls.next_id();
        self.calls
            .insert(Call::new(call_id, caller, agent_id, caller_name.clone()));
        self.routes.establish(call_id, caller, agent_id);
        metrics::update_active_calls(self.calls.len());

        info!(
            "Call {} placed: {} ({}) -> {} ({})",
            call_id, caller, caller_name, agent_id, agent_name
        );

        self.outbox.unicast(
            agent_id,
            OutboundEvent::CallIncoming {
                call_id,
                caller_id: caller,
                caller_name,
                offer,
            },
        );
        self.outbox.unicast(
            caller,
            OutboundEvent::CallRinging {
                call_id,
                agent_name,
            },
        );

        Ok(call_id)
    }

    fn accept(&mut self, from: ConnectionId, call_id: &str, answer: Value) -> Result<()> {
        let call_id = parse_call_id(call_id)?;
        let call = self
            .calls
            .get_mut(call_id)
            .ok_or_else(|| DomainError::UnknownCall(call_id.to_string()))?;

        if call.party(from) != Some(Party::Agent) {
            return Err(DomainError::NotCallParty(call_id.to_string()));
        }

        call.accept()?;
        let caller = call.caller_id();
        info!("Call {} connected", call_id);

        self.outbox
            .unicast(caller, OutboundEvent::CallAccepted { call_id, answer });
        Ok(())
    }

    fn decline(&mut self, from: ConnectionId, call_id: &str, reason: Option<String>) -> Result<()> {
        let call_id = parse_call_id(call_id)?;
        let call = self
            .calls
            .get(call_id)
            .ok_or_else(|| DomainError::UnknownCall(call_id.to_string()))?;

        if call.party(from) != Some(Party::Agent) {
            return Err(DomainError::NotCallParty(call_id.to_string()));
        }

        let reason = non_blank(reason).unwrap_or_else(|| DEFAULT_DECLINE_REASON.to_string());
        if let Some((call, released)) = self.end_call(call_id, EndReason::Declined(reason.clone())) {
            self.outbox
                .unicast(call.caller_id(), OutboundEvent::CallDeclined { call_id, reason });
            if released {
                self.broadcast_directory();
            }
        }
        Ok(())
    }

    fn hangup(&mut self, from: ConnectionId, call_id: &str) -> Result<()> {
        let call_id = parse_call_id(call_id)?;
        let call = self
            .calls
            .get(call_id)
            .ok_or_else(|| DomainError::UnknownCall(call_id.to_string()))?;

        let reason = match call.party(from) {
            Some(Party::Caller) => EndReason::CallerHangup,
            Some(Party::Agent) => EndReason::AgentHangup,
            None => return Err(DomainError::NotCallParty(call_id.to_string())),
        };

        if self.end_and_notify(call_id, from, reason) {
            self.broadcast_directory();
        }
        Ok(())
    }

    /// Forward an opaque relay message to the sender's counterpart. Traffic
    /// for a missing group, or from a non-member, is dropped.
    fn relay(
        &self,
        from: ConnectionId,
        call_id: &str,
        build: impl FnOnce(CallId) -> OutboundEvent,
    ) -> bool {
        let routed = call_id
            .parse::<CallId>()
            .ok()
            .and_then(|id| self.routes.group(id).map(|group| (id, *group)))
            .filter(|(_, group)| group.contains(from));

        match routed {
            Some((id, group)) => {
                debug!("Relaying on call {} from {}", id, from);
                self.outbox.multicast(&group, build(id), Some(from)) > 0
            }
            None => {
                debug!("Dropping relay message for call {} from {}", call_id, from);
                metrics::record_relay_dropped();
                false
            }
        }
    }

    fn disconnect(&mut self, id: ConnectionId) {
        let mut changed = false;

        for call_id in self.calls.involving(id) {
            let reason = match self.calls.get(call_id).and_then(|call| call.party(id)) {
                Some(Party::Agent) => EndReason::AgentDisconnected,
                _ => EndReason::CallerDisconnected,
            };
            changed |= self.end_and_notify(call_id, id, reason);
        }
        changed |= self.directory.remove(id).is_some();
        self.outbox.detach(id);

        if changed {
            self.broadcast_directory();
        }
    }

    fn expire_ringing(&mut self, call_id: CallId) {
        let ringing = matches!(
            self.calls.get(call_id).map(Call::state),
            Some(CallState::Ringing)
        );
        if !ringing {
            return;
        }

        if let Some((call, released)) = self.end_call(call_id, EndReason::NoAnswer) {
            self.outbox.unicast(
                call.caller_id(),
                OutboundEvent::CallDeclined {
                    call_id,
                    reason: NO_ANSWER_REASON.to_string(),
                },
            );
            self.outbox
                .unicast(call.agent_id(), OutboundEvent::CallEnded { call_id });
            if released {
                self.broadcast_directory();
            }
        }
    }

    /// End `call_id` and tell the party opposite `initiator`. Returns
    /// whether the directory changed.
    fn end_and_notify(&mut self, call_id: CallId, initiator: ConnectionId, reason: EndReason) -> bool {
        match self.end_call(call_id, reason) {
            Some((call, released)) => {
                if let Some(other) = call.counterpart(initiator) {
                    self.outbox
                        .unicast(other, OutboundEvent::CallEnded { call_id });
                }
                released
            }
            None => false,
        }
    }

    /// Retire a call: drop it from the table, dissolve its routing group and
    /// release the agent. Returns the ended call and whether the directory
    /// changed.
    fn end_call(&mut self, call_id: CallId, reason: EndReason) -> Option<(Call, bool)> {
        let mut call = self.calls.remove(call_id)?;
        self.routes.dissolve(call_id);

        let label = reason.as_str();
        if let Err(err) = call.end(reason) {
            warn!("Ending call {}: {}", call_id, err);
        }
        let released = self.directory.set_busy(call.agent_id(), false);

        info!("Call {} ended ({})", call_id, label);
        metrics::record_call_ended(label);
        metrics::update_active_calls(self.calls.len());

        Some((call, released))
    }
}

/// Single coordinating unit for all connections
#[derive(Clone, Default)]
pub struct Switchboard {
    store: Arc<Mutex<Store>>,
    ringing_timeout: Option<Duration>,
}

impl Switchboard {
    /// `ringing_timeout` of `None` lets a call ring until a party acts
    pub fn new(ringing_timeout: Option<Duration>) -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::default())),
            ringing_timeout,
        }
    }

    /// Open a connection. The party first receives its own id, then the
    /// current directory.
    pub async fn connect(&self) -> (ConnectionId, OutboundReceiver) {
        let id = ConnectionId::new();
        let mut store = self.store.lock().await;
        let rx = store.outbox.attach(id);

        store
            .outbox
            .unicast(id, OutboundEvent::Connected { connection_id: id });
        store.outbox.unicast(id, store.snapshot_event());
        info!("Connection opened: {}", id);

        (id, rx)
    }

    /// Decode and dispatch one text frame
    pub async fn handle_text(&self, from: ConnectionId, text: &str) {
        match InboundEvent::decode(text) {
            Ok(event) => self.handle(from, event).await,
            Err(err) => {
                warn!("Rejected frame from {}: {}", from, err);
                self.store.lock().await.reject(from, &err);
            }
        }
    }

    pub async fn handle(&self, from: ConnectionId, event: InboundEvent) {
        let kind = event.kind();
        debug!("Handling {} from {}", kind, from);

        let placed = {
            let mut store = self.store.lock().await;

            let result = match event {
                InboundEvent::DirectoryRequest => {
                    store.outbox.unicast(from, store.snapshot_event());
                    Ok(None)
                }
                InboundEvent::AgentRegister { name, attributes } => {
                    store.register(from, &name, attributes);
                    Ok(None)
                }
                InboundEvent::AgentSetAvailable { available } => {
                    store.set_available(from, available);
                    Ok(None)
                }
                InboundEvent::AgentDeregister => {
                    store.deregister(from);
                    Ok(None)
                }
                InboundEvent::CallPlace {
                    target_agent_id,
                    offer,
                    caller_name,
                } => store
                    .place(from, &target_agent_id, offer, caller_name)
                    .map(Some),
                InboundEvent::CallAccept { call_id, answer } => {
                    store.accept(from, &call_id, answer).map(|_| None)
                }
                InboundEvent::CallDecline { call_id, reason } => {
                    store.decline(from, &call_id, reason).map(|_| None)
                }
                InboundEvent::CallHangup { call_id } => store.hangup(from, &call_id).map(|_| None),
                InboundEvent::SignalingCandidate { call_id, candidate } => {
                    store.relay(from, &call_id, |call_id| OutboundEvent::SignalingCandidate {
                        call_id,
                        candidate,
                    });
                    Ok(None)
                }
                InboundEvent::CallTranscript {
                    call_id,
                    text,
                    language,
                } => {
                    store.relay(from, &call_id, |call_id| OutboundEvent::CallTranscript {
                        call_id,
                        text,
                        language,
                    });
                    Ok(None)
                }
                InboundEvent::Ping => {
                    store.outbox.unicast(from, OutboundEvent::Pong);
                    Ok(None)
                }
            };

            match result {
                Ok(placed) => placed,
                Err(err) => {
                    warn!("Rejected {} from {}: {}", kind, from, err);
                    store.reject(from, &err);
                    None
                }
            }
        };

        if let Some(call_id) = placed {
            self.schedule_ringing_timeout(call_id);
        }
    }

    /// Tear down everything `id` is part of, then forget the connection
    pub async fn disconnect(&self, id: ConnectionId) {
        self.store.lock().await.disconnect(id);
        info!("Connection closed: {}", id);
    }

    /// Relay text to the counterpart of `from` on `call_id`. Returns false
    /// when the message was dropped.
    pub async fn relay_transcript(
        &self,
        from: ConnectionId,
        call_id: CallId,
        text: String,
        language: Option<String>,
    ) -> bool {
        let store = self.store.lock().await;
        store.relay(from, &call_id.to_string(), |call_id| {
            OutboundEvent::CallTranscript {
                call_id,
                text,
                language,
            }
        })
    }

    pub async fn snapshot(&self) -> Vec<AgentSummary> {
        self.store.lock().await.directory.snapshot()
    }

    pub async fn call_state(&self, call_id: CallId) -> Option<CallState> {
        self.store
            .lock()
            .await
            .calls
            .get(call_id)
            .map(|call| call.state().clone())
    }

    pub async fn active_calls(&self) -> usize {
        self.store.lock().await.calls.len()
    }

    pub async fn connection_count(&self) -> usize {
        self.store.lock().await.outbox.len()
    }

    fn schedule_ringing_timeout(&self, call_id: CallId) {
        let Some(timeout) = self.ringing_timeout else {
            return;
        };

        let switchboard = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            switchboard.store.lock().await.expire_ringing(call_id);
        });
    }
}
