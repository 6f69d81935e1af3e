//! Fee and routing advisory service for the Brixa Lightning stack.
//!
//! Each advisory endpoint starts from a fixed default and makes at most one
//! bounded-time upstream call to refine it:
//!
//! ```text
//! GET /ai/fee?target_blocks=3
//!   -> bitcoind estimatesmartfee [3]      (2s timeout)
//!   -> 0.0001 BTC/kvB  => 10.0 sat/vB     ("bitcoind estimatesmartfee")
//!   -> any failure     => 15.0 sat/vB     ("default heuristic")
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`upstream`]: bitcoind and LND clients
//! - [`advisor`]: Fee, route, and health operations
//! - [`api`]: HTTP API
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod advisor;
pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod upstream;
pub mod utils;

pub use advisor::Advisor;
pub use config::Config;
pub use error::{AdvisorError, Result};
