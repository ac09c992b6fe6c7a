use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;

use crate::telemetry::api::TelemetryProvider;
use crate::telemetry::config::TelemetryConfig;
use crate::telemetry::error::TelemetryError;
use crate::telemetry::pipeline::{empty_meter_provider, empty_tracer_provider};

/// Provider that keeps the resource and sampler but exports nothing
pub struct NoopProvider;

impl TelemetryProvider for NoopProvider {
    async fn build_tracer_provider(
        &self,
        config: &TelemetryConfig,
    ) -> Result<SdkTracerProvider, TelemetryError> {
        Ok(empty_tracer_provider(config))
    }

    async fn build_meter_provider(
        &self,
        config: &TelemetryConfig,
    ) -> Result<SdkMeterProvider, TelemetryError> {
        Ok(empty_meter_provider(config))
    }
}
