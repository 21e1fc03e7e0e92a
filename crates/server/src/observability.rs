use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static SET_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "adapter_status_set_total",
        "Total status writes acknowledged by the store"
    )
    .expect("register set_total")
});

pub static SET_REJECTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "adapter_status_set_rejected_total",
        "Total status writes the store did not acknowledge"
    )
    .expect("register set_rejected_total")
});

pub static GET_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "adapter_status_get_total",
        "Total status lookups"
    )
    .expect("register get_total")
});

pub static GET_MISS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "adapter_status_get_miss_total",
        "Total status lookups for keys that were never set"
    )
    .expect("register get_miss_total")
});

pub static STORE_ERRORS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "adapter_status_store_errors_total",
        "Total store transport failures seen by handlers"
    )
    .expect("register store_errors_total")
});

/// Touch every counter so they show up in `/metrics` before first use.
pub fn init_metrics() {
    Lazy::force(&SET_TOTAL);
    Lazy::force(&SET_REJECTED_TOTAL);
    Lazy::force(&GET_TOTAL);
    Lazy::force(&GET_MISS_TOTAL);
    Lazy::force(&STORE_ERRORS_TOTAL);
}

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

pub async fn metrics() -> (axum::http::StatusCode, String) {
    encode_metrics()
}
