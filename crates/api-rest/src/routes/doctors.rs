use crate::error::{ApiResult, ErrorBody};
use crate::extract::{ApiJson, ApiPath};
use crate::responses::{CreateDoctorRes, DoctorsRes, MessageRes};
use crate::AppState;
use api_shared::DoctorReq;
use axum::extract::State;
use axum::Json;
use lab_core::DoctorService;

#[utoipa::path(
    get,
    path = "/api/doctors",
    responses(
        (status = 200, description = "All doctors", body = DoctorsRes),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub(crate) async fn list_doctors(State(state): State<AppState>) -> ApiResult<Json<DoctorsRes>> {
    let doctors = DoctorService::new(state.db).list().await?;
    Ok(Json(DoctorsRes {
        success: true,
        doctors,
    }))
}

#[utoipa::path(
    post,
    path = "/api/doctors",
    request_body = DoctorReq,
    responses(
        (status = 200, description = "Doctor created", body = CreateDoctorRes),
        (status = 400, description = "Missing doctor_name or clinic_name", body = ErrorBody),
        (status = 409, description = "No free doctor id", body = ErrorBody)
    )
)]
pub(crate) async fn create_doctor(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DoctorReq>,
) -> ApiResult<Json<CreateDoctorRes>> {
    let doctor_id = DoctorService::new(state.db).create(req).await?;
    Ok(Json(CreateDoctorRes {
        success: true,
        message: "Doctor added successfully".into(),
        doctor_id: doctor_id.into_string(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/doctors/{doctorId}",
    params(("doctorId" = String, Path, description = "Doctor id, e.g. DOC-A1B2C3")),
    request_body = DoctorReq,
    responses(
        (status = 200, description = "Doctor updated", body = MessageRes),
        (status = 400, description = "Missing doctor_name or clinic_name", body = ErrorBody),
        (status = 404, description = "Doctor not found", body = ErrorBody)
    )
)]
pub(crate) async fn update_doctor(
    State(state): State<AppState>,
    ApiPath(doctor_id): ApiPath<String>,
    ApiJson(req): ApiJson<DoctorReq>,
) -> ApiResult<Json<MessageRes>> {
    DoctorService::new(state.db).update(&doctor_id, req).await?;
    Ok(Json(MessageRes::ok("Doctor updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/doctors/{doctorId}",
    params(("doctorId" = String, Path, description = "Doctor id, e.g. DOC-A1B2C3")),
    responses(
        (status = 200, description = "Doctor deleted", body = MessageRes),
        (status = 404, description = "Doctor not found", body = ErrorBody),
        (status = 409, description = "Doctor still has reports", body = ErrorBody)
    )
)]
pub(crate) async fn delete_doctor(
    State(state): State<AppState>,
    ApiPath(doctor_id): ApiPath<String>,
) -> ApiResult<Json<MessageRes>> {
    DoctorService::new(state.db).delete(&doctor_id).await?;
    Ok(Json(MessageRes::ok("Doctor deleted successfully")))
}
