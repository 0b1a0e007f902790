//! # API REST
//!
//! REST API implementation for the lab records service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON envelopes, status codes, CORS, request tracing)
//!
//! Data operations live in `lab-core`; request bodies come from `api-shared`.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod extract;
pub mod responses;
mod routes;

use axum::routing::{get, post, put};
use axum::Router;
use lab_core::Database;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::{ApiError, ApiResult};

/// Application state for the REST API server.
///
/// Holds the shared database handle; services are built from it per request.
#[derive(Clone, Debug)]
pub struct AppState {
    pub(crate) db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health,
        routes::auth::login,
        routes::auth::signup,
        routes::auth::get_user,
        routes::patients::list_patients,
        routes::patients::create_patient,
        routes::patients::update_patient,
        routes::patients::delete_patient,
        routes::doctors::list_doctors,
        routes::doctors::create_doctor,
        routes::doctors::update_doctor,
        routes::doctors::delete_doctor,
        routes::tests::list_tests,
        routes::tests::create_test,
        routes::tests::update_test,
        routes::tests::delete_test,
        routes::catalogue::list_categories,
        routes::catalogue::create_category,
        routes::catalogue::list_components,
        routes::catalogue::create_component,
        routes::reports::list_reports,
        routes::reports::list_reports_today,
        routes::reports::report_detail,
        routes::reports::create_report,
        routes::reports::replace_report,
        routes::reports::delete_report,
        routes::dashboard::dashboard_summary,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::LoginReq,
        api_shared::SignupReq,
        api_shared::PatientReq,
        api_shared::DoctorReq,
        api_shared::TestReq,
        api_shared::CategoryReq,
        api_shared::ComponentReq,
        api_shared::ReportReq,
        api_shared::ReportItemReq,
        lab_core::Patient,
        lab_core::Doctor,
        lab_core::LabTest,
        lab_core::CategoryOption,
        lab_core::Component,
        lab_core::LoginUser,
        lab_core::UserProfile,
        lab_core::ReportSummary,
        lab_core::ReportItemDetail,
        lab_core::DashboardSummary,
        lab_core::StatusCount,
        error::ErrorBody,
        responses::MessageRes,
        responses::LoginRes,
        responses::UserRes,
        responses::PatientsRes,
        responses::CreatePatientRes,
        responses::DoctorsRes,
        responses::CreateDoctorRes,
        responses::TestsRes,
        responses::CreateTestRes,
        responses::CategoriesRes,
        responses::CreateCategoryRes,
        responses::ComponentsRes,
        responses::CreateComponentRes,
        responses::ReportsRes,
        responses::ReportDetailRes,
        responses::CreateReportRes,
        responses::DashboardRes,
    ))
)]
pub struct ApiDoc;

/// Builds the full application router: API routes, Swagger UI, CORS and request tracing.
pub fn router(state: AppState) -> Router {
    use routes::{auth, catalogue, dashboard, doctors, health, patients, reports, tests};

    Router::new()
        .route("/health", get(health::health))
        .route("/api/login", post(auth::login))
        .route("/api/signup", post(auth::signup))
        .route("/api/users/:userId", get(auth::get_user))
        .route(
            "/api/patients",
            get(patients::list_patients).post(patients::create_patient),
        )
        .route(
            "/api/patients/:patientId",
            put(patients::update_patient).delete(patients::delete_patient),
        )
        .route(
            "/api/doctors",
            get(doctors::list_doctors).post(doctors::create_doctor),
        )
        .route(
            "/api/doctors/:doctorId",
            put(doctors::update_doctor).delete(doctors::delete_doctor),
        )
        .route("/api/tests", get(tests::list_tests).post(tests::create_test))
        .route(
            "/api/tests/:testId",
            put(tests::update_test).delete(tests::delete_test),
        )
        .route(
            "/api/categories",
            get(catalogue::list_categories).post(catalogue::create_category),
        )
        .route(
            "/api/components",
            get(catalogue::list_components).post(catalogue::create_component),
        )
        .route(
            "/api/reports",
            get(reports::list_reports).post(reports::create_report),
        )
        .route("/api/reports/today", get(reports::list_reports_today))
        .route(
            "/api/reports/detail/:reportId",
            get(reports::report_detail),
        )
        .route(
            "/api/reports/:reportId",
            put(reports::replace_report).delete(reports::delete_report),
        )
        .route("/api/dashboard-summary", get(dashboard::dashboard_summary))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
