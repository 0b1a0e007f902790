//! Request bodies for entity and report writes.
//!
//! Field names match the JSON the mobile client sends (snake_case column names). Numeric and
//! phone fields go through [`lab_types::loose`] so numbers, numeric strings and blanks are all
//! accepted.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body for `POST /api/patients` and `PUT /api/patients/{id}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct PatientReq {
    pub patient_salutation: Option<String>,
    pub patients_name: Option<String>,
    pub guardian_name: Option<String>,
    #[serde(default, deserialize_with = "lab_types::loose::opt_text")]
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lab_types::loose::opt_i64")]
    pub age_years: Option<i64>,
    #[serde(default, deserialize_with = "lab_types::loose::opt_i64")]
    pub age_months: Option<i64>,
    #[serde(default, deserialize_with = "lab_types::loose::opt_i64")]
    pub age_days: Option<i64>,
    #[serde(default, deserialize_with = "lab_types::loose::opt_text")]
    pub alternate_phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lab_types::loose::opt_text")]
    pub zip_code: Option<String>,
}

/// Body for `POST /api/doctors` and `PUT /api/doctors/{id}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct DoctorReq {
    pub doctor_name: Option<String>,
    pub clinic_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lab_types::loose::opt_text")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lab_types::loose::opt_f64")]
    pub commission: Option<f64>,
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lab_types::loose::opt_f64")]
    pub paid_commission: Option<f64>,
}

/// Body for `POST /api/tests` and `PUT /api/tests/{id}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct TestReq {
    pub test_name: Option<String>,
    #[serde(default, deserialize_with = "lab_types::loose::opt_f64")]
    pub test_rate: Option<f64>,
    pub report_heading: Option<String>,
    #[serde(default, deserialize_with = "lab_types::loose::opt_text")]
    pub test_code: Option<String>,
    pub method: Option<String>,
    pub comments: Option<String>,
    #[serde(default, deserialize_with = "lab_types::loose::opt_i64")]
    pub category_id: Option<i64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CategoryReq {
    pub category_name: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ComponentReq {
    #[serde(default, deserialize_with = "lab_types::loose::opt_i64")]
    pub test_id: Option<i64>,
    pub component_name: Option<String>,
    pub sub_test_name: Option<String>,
    pub specimen: Option<String>,
    pub test_unit: Option<String>,
    pub reference_range: Option<String>,
}

/// Body for `POST /api/reports` and `PUT /api/reports/{report_id}`.
///
/// `status` is the overall status, used for any item that does not carry its own.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ReportReq {
    pub patient_id: Option<String>,
    pub doctor_id: Option<String>,
    /// `YYYY-MM-DD`, or an RFC 3339 timestamp whose date part is used.
    pub test_date: Option<String>,
    pub overall_comments: Option<String>,
    pub status: Option<String>,
    pub tests_conducted: Option<Vec<ReportItemReq>>,
}

/// One conducted test (or test component) inside a report write.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ReportItemReq {
    #[serde(default, deserialize_with = "lab_types::loose::opt_i64")]
    pub test_id: Option<i64>,
    #[serde(default, deserialize_with = "lab_types::loose::opt_i64")]
    pub component_id: Option<i64>,
    #[serde(default, deserialize_with = "lab_types::loose::opt_text")]
    pub result: Option<String>,
    pub method: Option<String>,
    pub comments: Option<String>,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_req_parses_client_payload() {
        let req: ReportReq = serde_json::from_str(
            r#"{
                "patient_id": "PAT-1A2B3C",
                "doctor_id": "DOC-A1B2C3",
                "test_date": "2024-05-01",
                "overall_comments": "fasting",
                "status": "Pending",
                "tests_conducted": [
                    {"test_id": 1, "component_id": null, "result": 13.5},
                    {"test_id": "2", "component_id": "4", "result": "Negative", "status": "Done"}
                ]
            }"#,
        )
        .unwrap();

        let items = req.tests_conducted.expect("items present");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].test_id, Some(1));
        assert_eq!(items[0].component_id, None);
        assert_eq!(items[0].result.as_deref(), Some("13.5"));
        assert_eq!(items[1].test_id, Some(2));
        assert_eq!(items[1].component_id, Some(4));
        assert_eq!(items[1].status.as_deref(), Some("Done"));
    }

    #[test]
    fn test_patient_req_tolerates_missing_fields() {
        let req: PatientReq =
            serde_json::from_str(r#"{"patients_name": "Jane Doe", "gender": "Female"}"#).unwrap();
        assert_eq!(req.patients_name.as_deref(), Some("Jane Doe"));
        assert_eq!(req.age_years, None);
        assert_eq!(req.phone_number, None);
    }
}
