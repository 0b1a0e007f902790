use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness payload returned by `GET /health`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Simple health service shared by the REST API and the CLI.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Creates a new instance of HealthService.
    pub fn new() -> Self {
        Self
    }

    /// Static method to check health without creating an instance.
    ///
    /// Database reachability is reported separately by the caller; this only says the process
    /// is serving.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Lab service is alive".into(),
        }
    }
}
