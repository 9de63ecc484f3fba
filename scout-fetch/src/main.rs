//! scout-fetch - find the K youngest entities with a valid phone number
//!
//! Pages through the listing service, fetches every entity's details
//! concurrently and prints the best K by age, ordered by name.

use anyhow::{Context, Result};
use clap::Parser;
use scout_common::human_time::format_elapsed;
use scout_fetch::{AppConfig, Args, OutputFormat, Pipeline, PipelineOutput};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = scout_common::config::load_config(args.config.as_deref())
        .context("Failed to load configuration file")?;
    let config = AppConfig::resolve(&args, &loaded.config).context("Invalid configuration")?;

    scout_common::logging::init_tracing(&config.log_level)
        .context("Failed to initialize logging")?;

    info!(
        "Starting scout-fetch v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &loaded.source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }
    info!(
        base_url = %config.http.base_url,
        list_route = %config.http.list_route,
        detail_route = %config.http.detail_route,
        "Service endpoints"
    );

    let pipeline = Pipeline::over_http(&config).context("Failed to build HTTP client")?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    let output = pipeline.run(cancel).await;
    print_output(&output, config.output)?;

    if !output.summary.is_complete() {
        warn!(summary = ?output.summary, "Run incomplete; results may be missing entities");
    }

    Ok(())
}

fn print_output(output: &PipelineOutput, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for record in &output.records {
                println!("{}", record);
            }
            println!("elapsed: {}", format_elapsed(output.elapsed));
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(output).context("Failed to serialize output")?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Cancel the run on Ctrl+C or SIGTERM
async fn cancel_on_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, cancelling run");
        },
        _ = terminate => {
            info!("Received terminate signal, cancelling run");
        },
    }

    cancel.cancel();
}
