//! Fee-rate advice.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::UpstreamError;

/// Confirmation target used when the caller does not give one.
pub const DEFAULT_TARGET_BLOCKS: i64 = 3;
/// Fee rate served when bitcoind gives no usable estimate.
pub const DEFAULT_SATS_PER_VB: f64 = 15.0;
/// Lowest fee rate ever advised.
pub const MIN_SATS_PER_VB: f64 = 1.0;
/// Rationale attached to the fallback fee rate.
pub const DEFAULT_RATIONALE: &str = "default heuristic";
/// Rationale attached to a fee rate derived from bitcoind.
pub const ESTIMATE_RATIONALE: &str = "bitcoind estimatesmartfee";

const SATS_PER_BTC: f64 = 100_000_000.0;
const VBYTES_PER_KVB: f64 = 1000.0;

/// Fee-rate advice for one confirmation target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeeAdvice {
    /// Confirmation target in blocks, echoed from the request.
    pub target_blocks: i64,
    /// Advised fee rate in sat/vB, never below 1.0.
    pub sats_per_vb: f64,
    /// Where the fee rate came from.
    pub rationale: String,
}

impl FeeAdvice {
    /// Advice built from the fallback heuristic.
    pub fn heuristic(target_blocks: i64) -> Self {
        Self {
            target_blocks,
            sats_per_vb: DEFAULT_SATS_PER_VB,
            rationale: DEFAULT_RATIONALE.to_string(),
        }
    }

    /// Advice built from the outcome of `estimatesmartfee`.
    ///
    /// Any upstream failure leaves the heuristic in place, as does a fee rate
    /// too large to convert to a finite sat/vB value.
    pub fn from_estimate(target_blocks: i64, estimate: &Result<f64, UpstreamError>) -> Self {
        match estimate.as_ref().map(|feerate| sats_per_vb(*feerate)) {
            Ok(sats) if sats.is_finite() => Self {
                target_blocks,
                sats_per_vb: sats,
                rationale: ESTIMATE_RATIONALE.to_string(),
            },
            _ => Self::heuristic(target_blocks),
        }
    }

    /// Whether this advice came from the fallback heuristic.
    pub fn is_heuristic(&self) -> bool {
        self.rationale == DEFAULT_RATIONALE
    }
}

/// Convert a BTC/kvB fee rate to sat/vB, floored at [`MIN_SATS_PER_VB`].
pub fn sats_per_vb(feerate_btc_per_kvb: f64) -> f64 {
    (feerate_btc_per_kvb * SATS_PER_BTC / VBYTES_PER_KVB).max(MIN_SATS_PER_VB)
}
