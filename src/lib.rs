//! Switchdesk - a real-time call switchboard
//!
//! Matches callers to available agents, relays connection-negotiation
//! messages between the two parties of each call, and tears sessions down
//! on decline, hangup or disconnect. Media never passes through here.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interface;

// Re-export commonly used types
pub use application::Switchboard;
pub use domain::shared::error::DomainError;
pub use domain::shared::result::Result;
