//! Report endpoints.
//!
//! Create and replace validate the body into a [`ReportDraft`] first, so malformed requests are
//! rejected with 400 before any transaction starts.

use crate::error::{ApiResult, ErrorBody};
use crate::extract::{ApiJson, ApiPath};
use crate::responses::{CreateReportRes, MessageRes, ReportDetailRes, ReportsRes};
use crate::AppState;
use api_shared::ReportReq;
use axum::extract::State;
use axum::Json;
use lab_core::{ReportDraft, ReportService};

#[utoipa::path(
    get,
    path = "/api/reports",
    responses(
        (status = 200, description = "One summary per report, newest first", body = ReportsRes),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub(crate) async fn list_reports(State(state): State<AppState>) -> ApiResult<Json<ReportsRes>> {
    let reports = ReportService::new(state.db).list().await?;
    Ok(Json(ReportsRes {
        success: true,
        reports,
    }))
}

#[utoipa::path(
    get,
    path = "/api/reports/today",
    responses(
        (status = 200, description = "Reports dated today (server local time)", body = ReportsRes),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub(crate) async fn list_reports_today(
    State(state): State<AppState>,
) -> ApiResult<Json<ReportsRes>> {
    let reports = ReportService::new(state.db).list_today().await?;
    Ok(Json(ReportsRes {
        success: true,
        reports,
    }))
}

#[utoipa::path(
    get,
    path = "/api/reports/detail/{reportId}",
    params(("reportId" = String, Path, description = "Report id, e.g. REP-0F9E8D")),
    responses(
        (status = 200, description = "Report items; empty for an unknown id", body = ReportDetailRes),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub(crate) async fn report_detail(
    State(state): State<AppState>,
    ApiPath(report_id): ApiPath<String>,
) -> ApiResult<Json<ReportDetailRes>> {
    let report_items = ReportService::new(state.db).detail(&report_id).await?;
    Ok(Json(ReportDetailRes {
        success: true,
        report_items,
    }))
}

#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = ReportReq,
    responses(
        (status = 200, description = "Report created", body = CreateReportRes),
        (status = 400, description = "Missing report data or tests", body = ErrorBody),
        (status = 500, description = "Write rolled back", body = ErrorBody)
    )
)]
/// Creates a report: every conducted test becomes one row under a single new report id.
pub(crate) async fn create_report(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ReportReq>,
) -> ApiResult<Json<CreateReportRes>> {
    let draft = ReportDraft::from_request(req)?;
    let report_id = ReportService::new(state.db).create(&draft).await?;
    Ok(Json(CreateReportRes {
        success: true,
        message: "Report added successfully".into(),
        report_id: report_id.into_string(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/reports/{reportId}",
    params(("reportId" = String, Path, description = "Report id, e.g. REP-0F9E8D")),
    request_body = ReportReq,
    responses(
        (status = 200, description = "Report items replaced", body = MessageRes),
        (status = 400, description = "Missing report data or tests", body = ErrorBody),
        (status = 500, description = "Write rolled back", body = ErrorBody)
    )
)]
/// Replaces every item of a report with the items in the body.
pub(crate) async fn replace_report(
    State(state): State<AppState>,
    ApiPath(report_id): ApiPath<String>,
    ApiJson(req): ApiJson<ReportReq>,
) -> ApiResult<Json<MessageRes>> {
    let draft = ReportDraft::from_request(req)?;
    ReportService::new(state.db)
        .replace(&report_id, &draft)
        .await?;
    Ok(Json(MessageRes::ok(format!(
        "Report {report_id} updated successfully"
    ))))
}

#[utoipa::path(
    delete,
    path = "/api/reports/{reportId}",
    params(("reportId" = String, Path, description = "Report id, e.g. REP-0F9E8D")),
    responses(
        (status = 200, description = "Report deleted", body = MessageRes),
        (status = 404, description = "Report not found or already deleted", body = ErrorBody)
    )
)]
pub(crate) async fn delete_report(
    State(state): State<AppState>,
    ApiPath(report_id): ApiPath<String>,
) -> ApiResult<Json<MessageRes>> {
    ReportService::new(state.db).delete(&report_id).await?;
    Ok(Json(MessageRes::ok("Report deleted successfully")))
}
