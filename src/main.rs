mod settings;
mod telemetry;
mod workload;

use opentelemetry::global;
use tracing::{error, info};

use crate::telemetry::{runtime, TelemetryConfig};
use crate::workload::{Workload, WorkloadConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = TelemetryConfig::from_env()?;
    let workload_config = WorkloadConfig::from_env()?;

    let guard = telemetry::init_with_config(&config).await?;

    let meter = global::meter("manual-instrumentation");
    let _runtime_observers = runtime::register_observers(&meter);

    info!("Let's simulate some fictional data processing...");
    info!(
        batch_size = workload_config.batch_size,
        period_ms = workload_config.period.as_millis() as u64,
        max_batches = ?workload_config.max_batches,
        "Starting workload"
    );

    let mut workload = Workload::new(workload_config, &meter);
    tokio::select! {
        _ = workload.run() => {}
        _ = shutdown_signal() => {}
    }

    info!(batches = workload.batches_run(), "Fictional data processing stopped");

    // Exporters may block while flushing
    tokio::task::spawn_blocking(move || guard.shutdown()).await??;
    Ok(())
}

/// Resolve on SIGINT (Ctrl+C) or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C), shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
