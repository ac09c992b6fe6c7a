use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use opentelemetry_sdk::error::{OTelSdkError, OTelSdkResult};
use opentelemetry_sdk::metrics::data::ResourceMetrics;
use opentelemetry_sdk::metrics::exporter::PushMetricExporter;
use opentelemetry_sdk::metrics::Temporality;
use opentelemetry_sdk::trace::{SpanData, SpanExporter};
use tracing::info;

use crate::telemetry::logging::record::{metric_records, RecordFormat, SpanRecord};

/// Log target used for exported telemetry, so it can be filtered separately
/// (e.g. `RUST_LOG=info,otel::export=off`).
pub const EXPORT_TARGET: &str = "otel::export";

fn internal(err: serde_json::Error) -> OTelSdkError {
    OTelSdkError::InternalFailure(err.to_string())
}

/// Span exporter that writes each finished span through the logging facade.
#[derive(Debug, Default)]
pub struct LoggingSpanExporter {
    format: RecordFormat,
}

impl LoggingSpanExporter {
    pub fn new(format: RecordFormat) -> Self {
        Self { format }
    }

    /// Render a batch into one log message per span
    pub fn render_batch(&self, batch: &[SpanData]) -> Result<Vec<String>, OTelSdkError> {
        batch
            .iter()
            .map(|span| self.format.render(&SpanRecord::from(span)).map_err(internal))
            .collect()
    }
}

impl SpanExporter for LoggingSpanExporter {
    async fn export(&self, batch: Vec<SpanData>) -> OTelSdkResult {
        for line in self.render_batch(&batch)? {
            info!(target: EXPORT_TARGET, "{}", line);
        }
        Ok(())
    }
}

/// Metric exporter that writes each metric stream through the logging facade.
///
/// Reports cumulative totals, the same view a pull-based backend would see.
#[derive(Debug, Default)]
pub struct LoggingMetricExporter {
    format: RecordFormat,
    is_shutdown: AtomicBool,
}

impl LoggingMetricExporter {
    pub fn new(format: RecordFormat) -> Self {
        Self {
            format,
            is_shutdown: AtomicBool::new(false),
        }
    }

    pub fn render(&self, metrics: &ResourceMetrics) -> Result<Vec<String>, OTelSdkError> {
        metric_records(metrics)
            .iter()
            .map(|record| self.format.render(record).map_err(internal))
            .collect()
    }
}

impl PushMetricExporter for LoggingMetricExporter {
    async fn export(&self, metrics: &ResourceMetrics) -> OTelSdkResult {
        if self.is_shutdown.load(Ordering::SeqCst) {
            return Err(OTelSdkError::AlreadyShutdown);
        }
        for line in self.render(metrics)? {
            info!(target: EXPORT_TARGET, "{}", line);
        }
        Ok(())
    }

    fn force_flush(&self) -> OTelSdkResult {
        Ok(())
    }

    fn shutdown_with_timeout(&self, _timeout: Duration) -> OTelSdkResult {
        self.is_shutdown.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn temporality(&self) -> Temporality {
        Temporality::Cumulative
    }
}
