use crate::error::{ApiResult, ErrorBody};
use crate::extract::{ApiJson, ApiPath};
use crate::responses::{CreatePatientRes, MessageRes, PatientsRes};
use crate::AppState;
use api_shared::PatientReq;
use axum::extract::State;
use axum::Json;
use lab_core::PatientService;

#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "All patients", body = PatientsRes),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub(crate) async fn list_patients(State(state): State<AppState>) -> ApiResult<Json<PatientsRes>> {
    let patients = PatientService::new(state.db).list().await?;
    Ok(Json(PatientsRes {
        success: true,
        patients,
    }))
}

#[utoipa::path(
    post,
    path = "/api/patients",
    request_body = PatientReq,
    responses(
        (status = 200, description = "Patient created", body = CreatePatientRes),
        (status = 400, description = "Missing patients_name or gender", body = ErrorBody),
        (status = 409, description = "No free patient id", body = ErrorBody)
    )
)]
/// Creates a patient under a generated `PAT-XXXXXX` id.
pub(crate) async fn create_patient(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PatientReq>,
) -> ApiResult<Json<CreatePatientRes>> {
    let patient_id = PatientService::new(state.db).create(req).await?;
    Ok(Json(CreatePatientRes {
        success: true,
        message: "Patient added successfully".into(),
        patient_id: patient_id.into_string(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/patients/{patientId}",
    params(("patientId" = String, Path, description = "Patient id, e.g. PAT-1A2B3C")),
    request_body = PatientReq,
    responses(
        (status = 200, description = "Patient updated", body = MessageRes),
        (status = 400, description = "Missing patients_name or gender", body = ErrorBody),
        (status = 404, description = "Patient not found", body = ErrorBody)
    )
)]
pub(crate) async fn update_patient(
    State(state): State<AppState>,
    ApiPath(patient_id): ApiPath<String>,
    ApiJson(req): ApiJson<PatientReq>,
) -> ApiResult<Json<MessageRes>> {
    PatientService::new(state.db)
        .update(&patient_id, req)
        .await?;
    Ok(Json(MessageRes::ok("Patient updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/patients/{patientId}",
    params(("patientId" = String, Path, description = "Patient id, e.g. PAT-1A2B3C")),
    responses(
        (status = 200, description = "Patient deleted", body = MessageRes),
        (status = 404, description = "Patient not found", body = ErrorBody),
        (status = 409, description = "Patient still has reports", body = ErrorBody)
    )
)]
pub(crate) async fn delete_patient(
    State(state): State<AppState>,
    ApiPath(patient_id): ApiPath<String>,
) -> ApiResult<Json<MessageRes>> {
    PatientService::new(state.db).delete(&patient_id).await?;
    Ok(Json(MessageRes::ok("Patient deleted successfully")))
}
