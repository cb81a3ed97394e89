//! Sum service entry point.

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sum_service::config::Config;
use sum_service::metrics;
use sum_service::server;
use sum_service::utils::shutdown_signal;

/// HTTP service exposing a health check and two-number addition.
#[derive(Parser, Debug)]
#[command(name = "sum-service")]
#[command(about = "Minimal HTTP service adding two numbers")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_logging(&config, args.verbose);

    if let Some(raw) = Config::ignored_port_value() {
        warn!(value = %raw, "PORT is not a valid port number, using {}", config.port);
    }
    if let Some(raw) = Config::ignored_host_value() {
        warn!(value = %raw, "SUM_SERVICE_HOST is not an IP address, using {}", config.host);
    }

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Serve) | None => cmd_serve(config).await,
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("sum_service=debug,info")
    } else {
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_json_logging() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("SUM SERVICE - CONFIGURATION CHECK");
    println!("======================================================================");

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
    println!("  Service Name: {}", config.service_name);
    println!("  Host: {}", config.host);
    println!("  Port: {}", config.port);
    println!("  Log Filter: {}", config.rust_log);
    println!("  Log Format: {}", config.log_format);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    info!(service = %config.service_name, "Starting sum service");

    // Initialize metrics
    let metrics_handle = metrics::init_metrics()?;

    let listener = server::bind(&config).await.map_err(|e| {
        error!("Failed to bind HTTP listener: {}", e);
        e
    })?;

    server::serve(listener, &config, metrics_handle, shutdown_signal()).await?;

    info!("Shutdown complete");
    Ok(())
}
