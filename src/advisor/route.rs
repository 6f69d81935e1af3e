//! Routing-score advice.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Score given to every destination.
pub const BASELINE_SCORE: f64 = 0.5;
/// Rationale attached to the baseline score.
pub const BASELINE_RATIONALE: &str = "baseline score";

/// Routing advice for one destination node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RouteAdvice {
    /// Destination node public key, echoed as given.
    pub dest_pubkey: String,
    /// Score in [0, 1] by convention.
    pub score: f64,
    /// How the score was produced.
    pub rationale: String,
}

impl RouteAdvice {
    /// Baseline advice. The pubkey is opaque and not validated.
    pub fn baseline(dest_pubkey: impl Into<String>) -> Self {
        Self {
            dest_pubkey: dest_pubkey.into(),
            score: BASELINE_SCORE,
            rationale: BASELINE_RATIONALE.to_string(),
        }
    }
}
