//! No-op telemetry provider.
//!
//! Used when a signal's exporter is `none`. Spans are still created and
//! sampled, so trace context keeps propagating, but nothing leaves the
//! process. Metric instruments record into a provider with no reader.
//!
//! # Example
//!
//! ```rust,ignore
//! use telemetry::default::NoopProvider;
//! use telemetry::{TelemetryConfig, api::init_with_provider};
//!
//! let config = TelemetryConfig::from_env()?;
//! let _guard = init_with_provider(&NoopProvider, &config).await?;
//! ```

mod provider;

pub use provider::NoopProvider;
