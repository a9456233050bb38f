//! HTTP API

pub mod directory_handler;
pub mod metrics_handler;
pub mod router;

pub use router::build_router;
