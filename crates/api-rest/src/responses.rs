//! Success envelopes. Every body carries `success: true` next to its payload.

use lab_core::{
    CategoryOption, Component, DashboardSummary, Doctor, LabTest, LoginUser, Patient,
    ReportItemDetail, ReportSummary, UserProfile,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageRes {
    pub success: bool,
    pub message: String,
}

impl MessageRes {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginRes {
    pub success: bool,
    pub message: String,
    pub user: LoginUser,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserRes {
    pub success: bool,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PatientsRes {
    pub success: bool,
    pub patients: Vec<Patient>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatePatientRes {
    pub success: bool,
    pub message: String,
    pub patient_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DoctorsRes {
    pub success: bool,
    pub doctors: Vec<Doctor>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateDoctorRes {
    pub success: bool,
    pub message: String,
    pub doctor_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TestsRes {
    pub success: bool,
    pub tests: Vec<LabTest>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestRes {
    pub success: bool,
    pub message: String,
    pub test_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoriesRes {
    pub success: bool,
    pub categories: Vec<CategoryOption>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRes {
    pub success: bool,
    pub message: String,
    pub category_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentsRes {
    pub success: bool,
    pub components: Vec<Component>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateComponentRes {
    pub success: bool,
    pub message: String,
    pub component_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportsRes {
    pub success: bool,
    pub reports: Vec<ReportSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetailRes {
    pub success: bool,
    pub report_items: Vec<ReportItemDetail>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateReportRes {
    pub success: bool,
    pub message: String,
    pub report_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardRes {
    pub success: bool,
    pub summary: DashboardSummary,
}
