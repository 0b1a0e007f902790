//! # API Shared
//!
//! Wire-level definitions shared by the lab service's HTTP surface and core.
//!
//! Contains:
//! - Request bodies for every write endpoint (`requests`, `auth`)
//! - The health service used by the REST API and CLI
//!
//! Request bodies are deliberately permissive (`Option` everywhere): required-field checks
//! happen in `lab-core` so a missing field becomes a descriptive 400 rather than a generic
//! JSON decoding failure.

pub mod auth;
pub mod health;
pub mod requests;

pub use auth::{LoginReq, SignupReq};
pub use health::{HealthRes, HealthService};
pub use requests::{
    CategoryReq, ComponentReq, DoctorReq, PatientReq, ReportItemReq, ReportReq, TestReq,
};
