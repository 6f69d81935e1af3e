//! Brixa advisory service entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use brixa_advisor::advisor::{FeeAdvice, DEFAULT_TARGET_BLOCKS};
use brixa_advisor::api::{create_router, AppState};
use brixa_advisor::config::Config;
use brixa_advisor::metrics;
use brixa_advisor::utils::shutdown_signal;
use brixa_advisor::Advisor;

/// Fee and routing advisory service.
#[derive(Parser, Debug)]
#[command(name = "brixa-advisor")]
#[command(about = "Fee and routing advice backed by bitcoind and LND")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default).
    Run {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Call bitcoind and LND once and print what the advisor would serve.
    CheckUpstreams {
        /// Confirmation target for the fee estimate.
        #[arg(long, default_value_t = DEFAULT_TARGET_BLOCKS, allow_negative_numbers = true)]
        target_blocks: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("brixa_advisor=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::Run { port }) => cmd_run(port.or(args.port)).await,
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::CheckUpstreams { target_blocks }) => {
            cmd_check_upstreams(target_blocks).await
        }
        None => cmd_run(args.port).await,
    }
}

/// Load and validate configuration.
fn load_config() -> anyhow::Result<Config> {
    Config::load_validated().map_err(|e| {
        error!("{}", e);
        anyhow::anyhow!("Configuration load failed: {}", e)
    })
}

/// Serve the HTTP API until a shutdown signal arrives.
async fn cmd_run(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = load_config()?;

    if let Some(port) = port_override {
        config.port = port;
    }

    info!("Configuration loaded successfully");
    info!("bitcoind RPC: {}", redact(&config.bitcoin_rpc_url));
    info!("LND REST: {}", config.lnd_rest_url);
    info!("Upstream timeout: {}ms", config.upstream_timeout_ms);

    let advisor = Advisor::new(&config)?;
    let mut app_state = AppState::new(advisor);

    if config.metrics_enabled {
        let handle = metrics::install_recorder()?;
        app_state = app_state.with_metrics(handle);
        info!("Metrics enabled on /metrics");
    }

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("BRIXA ADVISOR - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  bitcoind RPC: {}", redact(&config.bitcoin_rpc_url));
    println!("  LND REST: {}", config.lnd_rest_url);
    println!("  Upstream Timeout: {}ms", config.upstream_timeout_ms);
    println!("  Port: {}", config.port);
    println!("  Metrics: {}", if config.metrics_enabled { "Enabled" } else { "Disabled" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Call each upstream once and report the outcome.
async fn cmd_check_upstreams(target_blocks: i64) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("BRIXA ADVISOR - UPSTREAM CHECK");
    println!("======================================================================");

    let config = load_config()?;
    let advisor = Advisor::new(&config)?;

    print!("\n1. bitcoind estimatesmartfee [{}]... ", target_blocks);
    let estimate = advisor.bitcoind().estimate_smart_fee(target_blocks).await;
    match &estimate {
        Ok(feerate) => {
            println!("OK");
            println!("   Fee rate: {} BTC/kvB", feerate);
        }
        Err(e) => {
            println!("FAILED");
            println!("   Error: {}", e);
        }
    }

    let advice = FeeAdvice::from_estimate(target_blocks, &estimate);
    println!(
        "   Advice: {} sat/vB ({})",
        advice.sats_per_vb, advice.rationale
    );

    print!("\n2. LND /v1/getinfo... ");
    match advisor.lnd().get_info().await {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("   Error: {}", e);
        }
    }

    println!("\n======================================================================");

    Ok(())
}

/// Hide credentials embedded in a URL before printing it.
fn redact(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut url) if !url.username().is_empty() || url.password().is_some() => {
            let _ = url.set_username("***");
            let _ = url.set_password(None);
            url.to_string()
        }
        Ok(url) => url.to_string(),
        Err(_) => raw.to_string(),
    }
}
