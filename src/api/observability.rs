//! Request telemetry: one span and one summary event per request, plus the
//! Prometheus scrape endpoint.

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, Span, field, info, info_span};
use uuid::Uuid;

use super::AppState;
use crate::domain::ObjectId;

/// Attached to the response by the auth middleware so the request event can
/// name the account that made the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUser(pub ObjectId);

/// GET /metrics
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state
        .prometheus_handle
        .as_ref()
        .map_or_else(|| "Metrics recorder is disabled".to_string(), PrometheusHandle::render)
}

pub async fn track_requests(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();

    // Route templates keep `/todos/{id}` to one label value
    let route = req.extensions().get::<MatchedPath>().map_or_else(
        || req.uri().path().to_string(),
        |path| path.as_str().to_string(),
    );

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %method,
        route = %route,
        user_id = field::Empty,
    );

    async move {
        let response = next.run(req).await;
        let status = response.status();

        if let Some(RequestUser(user_id)) = response.extensions().get::<RequestUser>() {
            Span::current().record("user_id", user_id.as_str());
        }

        let labels = [
            ("method", method.to_string()),
            ("route", route),
            ("status", status.as_u16().to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(started.elapsed().as_secs_f64());

        if status == axum::http::StatusCode::UNAUTHORIZED {
            metrics::counter!("auth_rejections_total").increment(1);
        }

        info!(
            event = "http_request_finished",
            status_code = status.as_u16(),
            duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Request finished"
        );

        response
    }
    .instrument(span)
    .await
}
