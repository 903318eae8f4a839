pub mod middleware;
pub mod registry;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use anyhow::Context;
use prometheus::{proto::MetricFamily, Encoder, TextEncoder};

/// Handler for the /metrics endpoint
/// Returns metrics in Prometheus exposition format
pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();

    match render(&encoder, &prometheus::gather()) {
        Ok(body) => (
            StatusCode::OK,
            [("Content-Type", encoder.format_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode metrics: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {:#}", e),
            )
                .into_response()
        }
    }
}

fn render(encoder: &TextEncoder, metric_families: &[MetricFamily]) -> anyhow::Result<String> {
    let mut buffer = Vec::new();
    encoder
        .encode(metric_families, &mut buffer)
        .context("encoding metric families")?;
    String::from_utf8(buffer).context("metrics output is not UTF-8")
}

pub use registry::{
    init_metrics, ERRORS_HANDLED_TOTAL, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS,
};
