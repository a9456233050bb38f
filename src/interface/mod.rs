//! Interface layer - External interfaces
//!
//! This layer handles:
//! - The WebSocket connection gateway for callers and agents
//! - HTTP endpoints (health, directory view, metrics)

pub mod api;
pub mod gateway;
