//! Health and readiness reports.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    /// Always true while the process serves requests.
    pub ok: bool,
}

/// Readiness check body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Readiness {
    /// Whether every checked upstream answered.
    pub ready: bool,
    /// Whether LND answered `/v1/getinfo`.
    pub lnd: bool,
}

impl Readiness {
    /// Readiness from the outcome of the LND check.
    pub fn from_lnd_check(lnd: bool) -> Self {
        Self { ready: lnd, lnd }
    }
}
