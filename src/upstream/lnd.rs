//! LND REST client, used only as a liveness check.

use std::time::Duration;

use reqwest::Url;
use tracing::instrument;

use crate::error::{AdvisorError, UpstreamError};
use crate::metrics::{self, UPSTREAM_LND};

/// LND REST client.
#[derive(Debug, Clone)]
pub struct LndClient {
    http: reqwest::Client,
    base_url: Url,
}

impl LndClient {
    /// Create a client for the given base URL with a per-call timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AdvisorError> {
        Ok(Self {
            http: super::http_client(timeout)?,
            base_url: super::parse_base_url("LND_REST_URL", base_url)?,
        })
    }

    fn getinfo_url(&self) -> String {
        format!("{}/v1/getinfo", self.base_url.as_str().trim_end_matches('/'))
    }

    /// Call `GET /v1/getinfo`. The body is ignored; any 2xx counts as alive.
    #[instrument(skip(self))]
    pub async fn get_info(&self) -> Result<(), UpstreamError> {
        let _timer = metrics::timer_upstream(UPSTREAM_LND);

        let response = self.http.get(self.getinfo_url()).send().await?;

        if !response.status().is_success() {
            return Err(UpstreamError::Status(response.status()));
        }

        Ok(())
    }
}
