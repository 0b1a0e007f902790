use crate::AppState;
use api_shared::{HealthRes, HealthService};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are reachable", body = HealthRes),
        (status = 503, description = "Database unreachable", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API.
///
/// Used by monitoring and load balancers; also round-trips a trivial query to the store.
pub(crate) async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthRes>) {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthService::check_health())),
        Err(e) => {
            tracing::error!("health check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthRes {
                    ok: false,
                    message: "Database unreachable".into(),
                }),
            )
        }
    }
}
