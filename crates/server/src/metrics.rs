use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static AUTH_GATE_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "registry_auth_gate_total",
        "Bearer token checks on mutating routes by outcome",
        &["outcome"]
    )
    .expect("register auth_gate_total")
});

pub static LOGIN_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "registry_login_total",
        "Login attempts by outcome",
        &["outcome"]
    )
    .expect("register login_total")
});

pub static ORIGIN_DENIED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "registry_origin_denied_total",
        "Requests rejected by the origin allow-list"
    )
    .expect("register origin_denied_total")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
