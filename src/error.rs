//! Unified error types for the advisory service.

use reqwest::StatusCode;
use strum::IntoStaticStr;
use thiserror::Error;

/// Unified error type for the advisory service.
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Reasons an upstream call produced no usable result.
///
/// The advisor treats every variant the same way: the default advice stands.
#[derive(Error, Debug, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum UpstreamError {
    /// Connection refused, timed out, or otherwise failed in transport.
    #[error("transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with an unexpected status.
    #[error("unexpected status {0}")]
    Status(StatusCode),

    /// Body was not the expected JSON shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// `estimatesmartfee` returned no usable fee rate.
    #[error("no fee rate in response")]
    MissingFeeRate,
}

impl UpstreamError {
    /// Short label used as a metrics dimension.
    pub fn reason(&self) -> &'static str {
        if let UpstreamError::Transport(e) = self {
            if e.is_timeout() {
                return "timeout";
            }
        }
        self.into()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AdvisorError>;
