//! Advisory operations served by the API.
//!
//! Every operation starts from a fixed default, makes at most one upstream
//! call, and keeps the default when that call yields nothing usable. No
//! upstream failure ever reaches the caller.

pub mod fee;
pub mod health;
pub mod route;

use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::AdvisorError;
use crate::metrics::{self, UPSTREAM_BITCOIND, UPSTREAM_LND};
use crate::upstream::{BitcoindClient, LndClient};

pub use fee::{FeeAdvice, DEFAULT_TARGET_BLOCKS};
pub use health::{HealthStatus, Readiness};
pub use route::RouteAdvice;

/// Advisory endpoint handler, built once from configuration.
#[derive(Debug, Clone)]
pub struct Advisor {
    bitcoind: BitcoindClient,
    lnd: LndClient,
}

impl Advisor {
    /// Create an advisor talking to the upstreams named in `config`.
    pub fn new(config: &Config) -> Result<Self, AdvisorError> {
        let timeout = config.upstream_timeout();
        Ok(Self {
            bitcoind: BitcoindClient::new(&config.bitcoin_rpc_url, timeout)?,
            lnd: LndClient::new(&config.lnd_rest_url, timeout)?,
        })
    }

    /// Fee advice for a confirmation target.
    #[instrument(skip(self))]
    pub async fn fee_advice(&self, target_blocks: i64) -> FeeAdvice {
        let estimate = self.bitcoind.estimate_smart_fee(target_blocks).await;
        let advice = FeeAdvice::from_estimate(target_blocks, &estimate);

        if advice.is_heuristic() {
            match &estimate {
                Err(e) => {
                    debug!(error = %e, "Fee estimate unavailable, using default heuristic");
                    metrics::inc_upstream_failures(UPSTREAM_BITCOIND, e.reason());
                }
                Ok(feerate) => {
                    debug!(feerate, "Fee estimate out of range, using default heuristic");
                    metrics::inc_upstream_failures(UPSTREAM_BITCOIND, "out_of_range");
                }
            }
            metrics::inc_fee_fallbacks();
        }

        advice
    }

    /// Routing advice for a destination node.
    pub fn route_advice(&self, dest_pubkey: impl Into<String>) -> RouteAdvice {
        RouteAdvice::baseline(dest_pubkey)
    }

    /// Health report.
    ///
    /// LND is called, but `ok` is true whatever it returns; use
    /// [`Advisor::readiness`] for the real outcome.
    #[instrument(skip(self))]
    pub async fn check_health(&self) -> HealthStatus {
        let ok = true;
        let _ = self.lnd_reachable().await;
        HealthStatus { ok }
    }

    /// Readiness report, reflecting whether LND answered.
    #[instrument(skip(self))]
    pub async fn readiness(&self) -> Readiness {
        Readiness::from_lnd_check(self.lnd_reachable().await)
    }

    async fn lnd_reachable(&self) -> bool {
        match self.lnd.get_info().await {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "LND getinfo failed");
                metrics::inc_upstream_failures(UPSTREAM_LND, e.reason());
                false
            }
        }
    }

    /// bitcoind client, for diagnostics.
    pub fn bitcoind(&self) -> &BitcoindClient {
        &self.bitcoind
    }

    /// LND client, for diagnostics.
    pub fn lnd(&self) -> &LndClient {
        &self.lnd
    }
}
