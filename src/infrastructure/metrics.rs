//! Prometheus metrics

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_gauge!(
        "switchboard_registered_agents",
        "Number of currently registered agents"
    );
    describe_gauge!(
        "switchboard_active_calls",
        "Number of calls ringing or connected"
    );
    describe_counter!(
        "switchboard_calls_placed_total",
        "Total number of calls placed successfully"
    );
    describe_counter!(
        "switchboard_calls_failed_total",
        "Total number of placements rejected"
    );
    describe_counter!(
        "switchboard_calls_ended_total",
        "Total number of calls ended, by reason"
    );
    describe_counter!(
        "switchboard_relay_dropped_total",
        "Relay messages dropped for unknown or dissolved calls"
    );

    Ok(handle)
}

pub fn update_registered_agents(count: usize) {
    gauge!("switchboard_registered_agents").set(count as f64);
}

pub fn update_active_calls(count: usize) {
    gauge!("switchboard_active_calls").set(count as f64);
}

pub fn record_call_placed() {
    counter!("switchboard_calls_placed_total").increment(1);
}

pub fn record_call_failed(reason: &str) {
    counter!("switchboard_calls_failed_total", "reason" => reason.to_string()).increment(1);
}

pub fn record_call_ended(reason: &str) {
    counter!("switchboard_calls_ended_total", "reason" => reason.to_string()).increment(1);
}

pub fn record_relay_dropped() {
    counter!("switchboard_relay_dropped_total").increment(1);
}
