use crate::error::{ApiResult, ErrorBody};
use crate::responses::DashboardRes;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use lab_core::DashboardService;

#[utoipa::path(
    get,
    path = "/api/dashboard-summary",
    responses(
        (status = 200, description = "Dashboard counts", body = DashboardRes),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub(crate) async fn dashboard_summary(
    State(state): State<AppState>,
) -> ApiResult<Json<DashboardRes>> {
    let summary = DashboardService::new(state.db).summary().await?;
    Ok(Json(DashboardRes {
        success: true,
        summary,
    }))
}
