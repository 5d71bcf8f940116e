//! Logging, tracing export and Prometheus metrics for the service.

use crate::config::Config;
use anyhow::Context;
use metrics::{describe_counter, describe_histogram, Unit};
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime, trace as sdktrace, Resource};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "happa=debug,tower_http=debug,axum=info";

/// Keeps the OTLP pipeline alive; pending spans are flushed on drop.
pub struct Telemetry {
    otlp_enabled: bool,
}

impl Drop for Telemetry {
    fn drop(&mut self) {
        if self.otlp_enabled {
            global::shutdown_tracer_provider();
        }
    }
}

pub fn init(config: &Config) -> anyhow::Result<Telemetry> {
    let tracer = config
        .otel_exporter_endpoint
        .as_deref()
        .map(|endpoint| otlp_tracer(endpoint, &config.service_name))
        .transpose()?;
    let otlp_enabled = tracer.is_some();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer)))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], config.metrics_port))
        .install()
        .context("Failed to install Prometheus exporter")?;
    describe_metrics();

    tracing::info!(
        otlp = otlp_enabled,
        metrics_port = config.metrics_port,
        "Observability initialized"
    );

    Ok(Telemetry { otlp_enabled })
}

fn otlp_tracer(endpoint: &str, service_name: &str) -> anyhow::Result<sdktrace::Tracer> {
    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(exporter)
        .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
            KeyValue::new("service.name", service_name.to_string()),
        ])))
        .install_batch(runtime::Tokio)
        .with_context(|| format!("Failed to install OTLP pipeline for {}", endpoint))
}

fn describe_metrics() {
    describe_counter!(
        "happa_role_aggregations_total",
        "Role lists aggregated from RBAC resources"
    );
    describe_counter!(
        "happa_kubernetes_requests_total",
        "Requests sent to the Kubernetes API, by outcome"
    );
    describe_histogram!(
        "happa_kubernetes_request_duration_seconds",
        Unit::Seconds,
        "Latency of Kubernetes API requests"
    );
}
