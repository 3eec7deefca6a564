use metrics::{Unit, describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub fn setup_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let builder = PrometheusBuilder::new();
            let handle = builder
                .install_recorder()
                .expect("failed to install Prometheus recorder");

            describe_counter!(
                "alertcord_http_requests_total",
                Unit::Count,
                "Total number of HTTP requests received"
            );
            describe_counter!(
                "alertcord_relays_total",
                Unit::Count,
                "Total number of alert batches delivered to Discord"
            );
            describe_counter!(
                "alertcord_relay_failures_total",
                Unit::Count,
                "Total number of alert batches that failed to reach Discord"
            );
            describe_gauge!(
                "alertcord_start_time_seconds",
                Unit::Seconds,
                "Unix timestamp the process started at"
            );

            handle
        })
        .clone()
}
