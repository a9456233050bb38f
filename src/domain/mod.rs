//! Domain layer - Core switchboard rules
//!
//! This layer contains:
//! - Agent directory: who can receive calls
//! - Call aggregate and session table: the call lifecycle
//! - Relay routing groups: who may receive negotiation traffic
//!
//! Nothing here knows about sockets; connections are opaque ids.

pub mod agent;
pub mod call;
pub mod relay;
pub mod shared;

// Re-export commonly used types
pub use shared::{DomainError, Result};
