//! Agent bounded context - who can take calls and whether they are free

pub mod directory;
pub mod entity;

pub use directory::AgentDirectory;
pub use entity::{Agent, AgentSummary};
