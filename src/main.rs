use anyhow::{Context, Result};
use tokio::io::BufReader;
use tokio::signal;
use tokio::sync::broadcast;

use kibana_json_formatter::config::Settings;
use kibana_json_formatter::formatter::Formatter;
use kibana_json_formatter::metrics::encode_metrics;
use kibana_json_formatter::pipeline::{self, PipelineOptions};
use kibana_json_formatter::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;

    // Initialize tracing
    init_tracing(&settings.logging)?;
    tracing::info!("Configuration loaded");

    // Resolve the active profile
    let store = settings.profile_store()?;
    let profile = store
        .get(&settings.active_profile)
        .with_context(|| format!("Unknown active profile '{}'", settings.active_profile))?;
    tracing::info!(
        profile_id = %profile.id,
        name = %profile.name,
        description = ?profile.description,
        profiles = store.count(),
        "Active profile selected"
    );

    let formatter = Formatter::from_profile(&profile, settings.render_options());
    if !formatter.has_template() {
        tracing::info!(fields = ?profile.summary_fields, "Using field-list summaries");
    }

    // Stop cleanly on Ctrl+C / SIGTERM
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(shutdown_signal_handler(shutdown_tx));

    let stats = pipeline::run(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        &formatter,
        PipelineOptions::from(&settings.output),
        shutdown_rx,
    )
    .await?;

    tracing::debug!(?stats, "Input exhausted");

    if settings.output.report_metrics {
        eprint!("{}", encode_metrics()?);
    }

    Ok(())
}

async fn shutdown_signal_handler(shutdown_tx: broadcast::Sender<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }

    let _ = shutdown_tx.send(());
}
