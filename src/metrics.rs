use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use schoolhub_config::ObservabilityConfig;

static METRICS_ENABLED: OnceLock<bool> = OnceLock::new();

/// `METRICS_ENABLED`, read once.
pub fn is_metrics_enabled() -> bool {
    *METRICS_ENABLED.get_or_init(|| ObservabilityConfig::from_env().metrics_enabled)
}

/// Installs the Prometheus recorder and spawns its upkeep task.
///
/// Returns `None` when metrics are disabled.
pub fn init_metrics() -> Result<Option<PrometheusHandle>, BuildError> {
    if !is_metrics_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )?
        .install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_metrics_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);
    gauge!("http_requests_active").decrement(1.0);

    response
}

pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Business metrics

pub fn track_login_success(role: &str) {
    if !is_metrics_enabled() {
        return;
    }
    counter!("user_logins_total", "role" => role.to_string(), "status" => "success").increment(1);
}

pub fn track_login_failure(reason: &'static str) {
    if !is_metrics_enabled() {
        return;
    }
    counter!("user_logins_total", "role" => "unknown", "status" => "failure", "reason" => reason)
        .increment(1);
}

pub fn track_user_created(role: &str) {
    if !is_metrics_enabled() {
        return;
    }
    counter!("users_created_total", "role" => role.to_string()).increment(1);
}

pub fn track_student_created() {
    if !is_metrics_enabled() {
        return;
    }
    counter!("students_created_total").increment(1);
}

/// `new_student` is true when enrollment also created the student record.
pub fn track_registration_created(new_student: bool) {
    if !is_metrics_enabled() {
        return;
    }
    let student = if new_student { "created" } else { "existing" };
    counter!("registrations_created_total", "student" => student).increment(1);
}

pub fn track_payment_recorded(method: &'static str, amount: f64) {
    if !is_metrics_enabled() {
        return;
    }
    counter!("payments_recorded_total", "method" => method).increment(1);
    histogram!("payment_amount", "method" => method).record(amount);
}

/// Report sections that failed and were served empty.
pub fn track_report_degraded(section: &'static str) {
    if !is_metrics_enabled() {
        return;
    }
    counter!("report_sections_degraded_total", "section" => section).increment(1);
}
