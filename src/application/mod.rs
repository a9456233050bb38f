//! Application layer - Use cases and application services
//!
//! This layer orchestrates domain objects to fulfill use cases.
//! It's responsible for:
//! - Serializing every inbound event against the shared store
//! - Coordinating the directory, call table and routing groups
//! - Delivering the resulting outbound events

pub mod outbox;
pub mod protocol;
pub mod speech;
pub mod switchboard;

pub use outbox::Outbox;
pub use protocol::{InboundEvent, OutboundEvent};
pub use switchboard::Switchboard;
