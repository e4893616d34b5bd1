use actix_web::HttpResponse;
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

/// Current `(requests, errors)` totals.
pub fn snapshot() -> (u64, u64) {
    (REQUEST_COUNT.load(Ordering::Relaxed), ERROR_COUNT.load(Ordering::Relaxed))
}

fn render(requests: u64, errors: u64) -> String {
    format!(
        "# HELP http_requests_total Total number of HTTP requests\n\
         # TYPE http_requests_total counter\n\
         http_requests_total {}\n\
         \n\
         # HELP http_errors_total Total number of HTTP 5xx responses\n\
         # TYPE http_errors_total counter\n\
         http_errors_total {}\n",
        requests, errors
    )
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Prometheus text exposition", content_type = "text/plain")
    )
)]
pub async fn get_metrics() -> HttpResponse {
    let (requests, errors) = snapshot();

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(render(requests, errors))
}
