//! Infrastructure layer - Technical implementations
//!
//! This layer contains:
//! - Prometheus metrics recorder and helpers

pub mod metrics;
