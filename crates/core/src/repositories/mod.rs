//! Repository services, one per stored entity.
//!
//! Every service owns a cloned [`crate::Database`] handle and is cheap to construct per
//! request. `reports` holds the only multi-statement writes; everything else is a single
//! statement per call.

pub mod catalogue;
pub mod dashboard;
pub mod doctors;
pub(crate) mod helpers;
pub mod lab_tests;
pub mod patients;
pub mod reports;
pub mod users;

#[cfg(test)]
pub(crate) mod fixtures;
