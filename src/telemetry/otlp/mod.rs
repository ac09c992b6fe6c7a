//! OTLP telemetry provider.
//!
//! Exports traces and metrics to an OpenTelemetry collector over one of three
//! transports:
//!
//! - gRPC (tonic), the default; configured headers travel as gRPC metadata
//! - HTTP with protobuf bodies
//! - HTTP with JSON bodies
//!
//! HTTP requests go out through either the exporter's own client
//! ([`HttpSender::Default`]) or one built by [`sender::custom_http_client`]
//! ([`HttpSender::Custom`], requires the `otlp-custom-sender` feature).
//!
//! # Environment Variables
//!
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: collector base URL
//! - `OTEL_EXPORTER_OTLP_PROTOCOL`: `grpc`, `http/protobuf` or `http/json`
//! - `OTEL_EXPORTER_OTLP_HTTP_SENDER`: `default` or `custom`
//! - `OTEL_EXPORTER_OTLP_HEADERS`, `OTEL_EXPORTER_OTLP_TIMEOUT`
//!
//! [`HttpSender::Default`]: crate::telemetry::config::HttpSender::Default
//! [`HttpSender::Custom`]: crate::telemetry::config::HttpSender::Custom

pub mod exporter;
#[cfg(feature = "otlp-custom-sender")]
pub mod sender;

use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;

use crate::telemetry::api::TelemetryProvider;
use crate::telemetry::config::{OtlpConfig, TelemetryConfig};
use crate::telemetry::error::TelemetryError;
use crate::telemetry::pipeline::{build_meter_provider, build_tracer_provider};

pub use exporter::{build_metric_exporter, build_span_exporter};

/// OTLP telemetry provider.
pub struct OtlpProvider {
    config: OtlpConfig,
}

impl OtlpProvider {
    /// Create a new OTLP provider with the given exporter settings.
    pub fn new(config: OtlpConfig) -> Self {
        Self { config }
    }
}

impl TelemetryProvider for OtlpProvider {
    async fn build_tracer_provider(
        &self,
        config: &TelemetryConfig,
    ) -> Result<SdkTracerProvider, TelemetryError> {
        let exporter = build_span_exporter(&self.config)?;
        Ok(build_tracer_provider(exporter, config))
    }

    async fn build_meter_provider(
        &self,
        config: &TelemetryConfig,
    ) -> Result<SdkMeterProvider, TelemetryError> {
        let exporter = build_metric_exporter(&self.config)?;
        Ok(build_meter_provider(exporter, config))
    }
}
