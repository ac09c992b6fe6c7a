//! Log-to-console telemetry provider.
//!
//! Finished spans and collected metrics are written through `tracing` under
//! the `otel::export` target instead of being sent over the network. Each
//! record follows the process log format: a single text line with pretty logs,
//! a JSON object with JSON logs.
//!
//! # Example
//!
//! ```rust,ignore
//! use telemetry::logging::LoggingProvider;
//! use telemetry::{TelemetryConfig, api::init_with_provider};
//!
//! let config = TelemetryConfig::from_env()?;
//! let _guard = init_with_provider(&LoggingProvider, &config).await?;
//! ```

mod exporter;
mod record;

pub use exporter::{LoggingMetricExporter, LoggingSpanExporter, EXPORT_TARGET};
pub use record::{metric_records, MetricRecord, PointRecord, PointValue, RecordFormat, SpanRecord};

use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;

use crate::telemetry::api::TelemetryProvider;
use crate::telemetry::config::{LogFormat, TelemetryConfig};
use crate::telemetry::error::TelemetryError;
use crate::telemetry::pipeline::{build_meter_provider, build_tracer_provider};

impl From<LogFormat> for RecordFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => Self::Text,
            LogFormat::Json => Self::Json,
        }
    }
}

/// Provider exporting through the logging facade
pub struct LoggingProvider;

impl TelemetryProvider for LoggingProvider {
    async fn build_tracer_provider(
        &self,
        config: &TelemetryConfig,
    ) -> Result<SdkTracerProvider, TelemetryError> {
        let exporter = LoggingSpanExporter::new(config.log_format.into());
        Ok(build_tracer_provider(exporter, config))
    }

    async fn build_meter_provider(
        &self,
        config: &TelemetryConfig,
    ) -> Result<SdkMeterProvider, TelemetryError> {
        let exporter = LoggingMetricExporter::new(config.log_format.into());
        Ok(build_meter_provider(exporter, config))
    }
}
