//! Modular telemetry with pluggable exporters.
//!
//! Built on OpenTelemetry. Traces and metrics go through the SDK's batch span
//! processor and periodic metric reader to one exporter per signal, chosen at
//! start-up from the environment.
//!
//! # Features
//!
//! - `otlp-custom-sender` (default): explicitly configured OTLP/HTTP client
//!
//! # Quick Start
//!
//! ```rust,ignore
//! // Exporters, transport and batching all come from the environment
//! let guard = telemetry::init().await?;
//! // ...
//! guard.shutdown()?;
//! ```
//!
//! # Configuration
//!
//! ## Using the Builder
//!
//! ```rust,ignore
//! use telemetry::{ExporterKind, OtlpProtocol, TelemetryConfig};
//!
//! let config = TelemetryConfig::builder()
//!     .service_name("my-service")
//!     .traces_exporter(ExporterKind::Otlp)
//!     .metrics_exporter(ExporterKind::Logging)
//!     .otlp_endpoint("http://collector:4318")
//!     .otlp_protocol(OtlpProtocol::HttpProtobuf)
//!     .json()
//!     .build();
//!
//! let guard = telemetry::init_with_config(&config).await?;
//! ```
//!
//! ## Exporters
//!
//! - [`ExporterKind::Logging`]: records written through `tracing`
//! - [`ExporterKind::Otlp`]: OTLP over gRPC, HTTP/protobuf or HTTP/JSON
//! - [`ExporterKind::None`]: recorded, never exported
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `OTEL_SERVICE_NAME` | Service name | `manual-instrumentation-server` |
//! | `OTEL_SERVICE_VERSION` | Service version | `CARGO_PKG_VERSION` |
//! | `OTEL_SDK_DISABLED` | Console logging only | `false` |
//! | `OTEL_TRACES_EXPORTER` | `logging`, `otlp` or `none` | `otlp` with an endpoint, else `logging` |
//! | `OTEL_METRICS_EXPORTER` | `logging`, `otlp` or `none` | as above |
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | Collector base URL | `:4317` gRPC, `:4318` HTTP |
//! | `OTEL_EXPORTER_OTLP_PROTOCOL` | `grpc`, `http/protobuf`, `http/json` | `grpc` |
//! | `OTEL_EXPORTER_OTLP_HTTP_SENDER` | `default` or `custom` | `default` |
//! | `OTEL_EXPORTER_OTLP_TIMEOUT` | Export timeout (ms) | `10000` |
//! | `OTEL_EXPORTER_OTLP_HEADERS` | `k=v,k2=v2` | - |
//! | `OTEL_METRIC_EXPORT_INTERVAL` | Metric reader interval (ms) | `60000` |
//! | `OTEL_BSP_SCHEDULE_DELAY` | Span batch delay (ms) | `5000` |
//! | `OTEL_BSP_MAX_QUEUE_SIZE` | Span queue capacity | `2048` |
//! | `OTEL_BSP_MAX_EXPORT_BATCH_SIZE` | Spans per export | `512` |
//! | `OTEL_TRACES_SAMPLER_ARG` | Sampling ratio | `1.0` |
//! | `OTEL_RESOURCE_ATTRIBUTES` | Extra resource attributes | - |
//! | `RUST_LOG` | Log level filter | `info` |
//! | `LOG_FORMAT` | `pretty` or `json` | `pretty` |
//!
//! # Module Structure
//!
//! - [`api`]: Core trait, initialization functions and [`TelemetryGuard`]
//! - [`config`]: Configuration types
//! - [`error`]: Error types
//! - [`pipeline`]: Batch processor and periodic reader wiring
//! - [`logging`], [`otlp`], [`default`]: Providers
//! - [`propagation`]: W3C context propagation
//! - [`runtime`]: Process metrics
//! - [`trace`]: Subscriber wiring

#![allow(dead_code, unused_imports)] // Public API - not all items used internally

pub mod api;
pub mod config;
pub mod default;
pub mod error;
pub mod logging;
pub mod otlp;
pub mod pipeline;
pub mod propagation;
pub mod resource;
pub mod runtime;
pub mod trace;

// Re-exports
pub use api::{init, init_with_config, init_with_provider, TelemetryGuard, TelemetryProvider};
pub use config::{
    ExporterKind, HttpSender, LogFormat, OtlpProtocol, TelemetryConfig, TelemetryConfigBuilder,
};
pub use error::TelemetryError;
