use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{header, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramOpts, HistogramVec,
    IntCounterVec, Opts,
};
use std::sync::LazyLock;
use std::time::Instant;
use tracing::warn;

fn counter_vec_or_fallback(name: &str, help: &str, labels: &[&str]) -> IntCounterVec {
    match register_int_counter_vec!(name, help, labels) {
        Ok(metric) => metric,
        Err(err) => {
            warn!(event = "metrics_register_failed", metric = name, error = %err);
            IntCounterVec::new(Opts::new(name, help), labels).unwrap_or_else(|err| {
                warn!(event = "metrics_fallback_failed", metric = name, error = %err);
                IntCounterVec::new(
                    Opts::new("warden_metrics_fallback", "metrics fallback"),
                    &["name"],
                )
                .expect("fallback metric")
            })
        }
    }
}

fn histogram_vec_or_fallback(
    name: &str,
    help: &str,
    labels: &[&str],
    buckets: Vec<f64>,
) -> HistogramVec {
    match register_histogram_vec!(name, help, labels, buckets.clone()) {
        Ok(metric) => metric,
        Err(err) => {
            warn!(event = "metrics_register_failed", metric = name, error = %err);
            let opts = HistogramOpts::new(name, help).buckets(buckets);
            HistogramVec::new(opts, labels).unwrap_or_else(|err| {
                warn!(event = "metrics_fallback_failed", metric = name, error = %err);
                HistogramVec::new(
                    HistogramOpts::new("warden_metrics_fallback", "metrics fallback"),
                    &["name"],
                )
                .expect("fallback metric")
            })
        }
    }
}

fn http_buckets() -> Vec<f64> {
    vec![
        0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ]
}

static HTTP_REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    counter_vec_or_fallback(
        "warden_http_requests_total",
        "HTTP requests",
        &["method", "route", "status_class"],
    )
});

static HTTP_LATENCY: LazyLock<HistogramVec> = LazyLock::new(|| {
    histogram_vec_or_fallback(
        "warden_http_request_duration_seconds",
        "HTTP request latency",
        &["route"],
        http_buckets(),
    )
});

static SEED_RUNS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    counter_vec_or_fallback(
        "warden_seed_runs_total",
        "Bootstrap seed runs",
        &["result"],
    )
});

static AUTH_ATTEMPTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    counter_vec_or_fallback(
        "warden_auth_attempts_total",
        "Basic auth attempts",
        &["result"],
    )
});

/// `result` is one of `seeded`, `skipped` or `failed`.
pub fn seed_run(result: &str) {
    SEED_RUNS.with_label_values(&[result]).inc();
}

pub fn auth_attempt(result: &str) {
    AUTH_ATTEMPTS.with_label_values(&[result]).inc();
}

pub async fn http_metrics(req: Request<Body>, next: Next) -> Response {
    let method = req.method().as_str().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or("unmatched")
        .to_string();
    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed = start.elapsed().as_secs_f64();
    record_http_request(&method, &route, response.status().as_u16(), elapsed);
    response
}

pub fn record_http_request(method: &str, route: &str, status: u16, duration_seconds: f64) {
    let status_class = match status / 100 {
        1 => "1xx",
        2 => "2xx",
        3 => "3xx",
        4 => "4xx",
        5 => "5xx",
        _ => "unknown",
    };
    HTTP_REQUESTS
        .with_label_values(&[method, route, status_class])
        .inc();
    HTTP_LATENCY
        .with_label_values(&[route])
        .observe(duration_seconds);
}

/// Text exposition of the default registry.
pub async fn render() -> Response {
    let encoder = prometheus::TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        warn!(event = "metrics_encode_failed", error = %err);
    }

    let mut response = Response::new(Body::from(buffer));
    if let Ok(value) = HeaderValue::from_str(encoder.format_type()) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
}
