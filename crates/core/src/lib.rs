//! # Lab Core
//!
//! Core business logic for the pathology lab records service.
//!
//! This crate contains pure data operations over the relational store:
//! - Patient, doctor, test, category, component and user records
//! - Multi-row reports written inside one transaction (create, replace, delete)
//! - Report listings, report detail and dashboard aggregates
//!
//! **No API concerns**: HTTP routing, status codes and JSON envelopes belong in `api-rest`.
//! Request bodies are shared with the API through `api-shared`.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod repositories;
pub mod validation;

pub use config::CoreConfig;
pub use db::Database;
pub use error::{LabError, LabResult};
pub use lab_types::NonEmptyText;

pub use repositories::catalogue::{CatalogueService, CategoryOption, Component};
pub use repositories::dashboard::{DashboardService, DashboardSummary, StatusCount};
pub use repositories::doctors::{Doctor, DoctorService};
pub use repositories::lab_tests::{LabTest, LabTestService};
pub use repositories::patients::{Patient, PatientService};
pub use repositories::reports::{ReportDraft, ReportItemDetail, ReportService, ReportSummary};
pub use repositories::users::{LoginUser, UserProfile, UserService};
