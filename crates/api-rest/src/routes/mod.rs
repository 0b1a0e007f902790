//! Request handlers, one module per resource.

pub(crate) mod auth;
pub(crate) mod catalogue;
pub(crate) mod dashboard;
pub(crate) mod doctors;
pub(crate) mod health;
pub(crate) mod patients;
pub(crate) mod reports;
