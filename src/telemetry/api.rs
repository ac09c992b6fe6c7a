use opentelemetry::global;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::info;

use crate::telemetry::config::{ExporterKind, TelemetryConfig};
use crate::telemetry::default::NoopProvider;
use crate::telemetry::error::TelemetryError;
use crate::telemetry::logging::LoggingProvider;
use crate::telemetry::otlp::OtlpProvider;
use crate::telemetry::propagation;
use crate::telemetry::trace::init_subscriber;

/// Trait for telemetry providers (logging, OTLP, no-op)
pub trait TelemetryProvider: Send + Sync {
    /// Build the tracer provider for this backend
    fn build_tracer_provider(
        &self,
        config: &TelemetryConfig,
    ) -> impl std::future::Future<Output = Result<SdkTracerProvider, TelemetryError>> + Send;

    /// Build the meter provider for this backend
    fn build_meter_provider(
        &self,
        config: &TelemetryConfig,
    ) -> impl std::future::Future<Output = Result<SdkMeterProvider, TelemetryError>> + Send;
}

/// Keeps the installed providers alive.
///
/// [`TelemetryGuard::shutdown`] flushes pending spans and metrics and reports
/// failures; dropping the guard does the same but can only log them.
#[derive(Default)]
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
    meter_provider: Option<SdkMeterProvider>,
}

impl std::fmt::Debug for TelemetryGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryGuard")
            .field("tracing", &self.tracer_provider.is_some())
            .field("metrics", &self.meter_provider.is_some())
            .finish()
    }
}

impl TelemetryGuard {
    pub fn new(tracer_provider: SdkTracerProvider, meter_provider: SdkMeterProvider) -> Self {
        Self {
            tracer_provider: Some(tracer_provider),
            meter_provider: Some(meter_provider),
        }
    }

    /// Guard for a process running with the SDK disabled
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.tracer_provider.is_some() || self.meter_provider.is_some()
    }

    pub fn tracer_provider(&self) -> Option<&SdkTracerProvider> {
        self.tracer_provider.as_ref()
    }

    pub fn meter_provider(&self) -> Option<&SdkMeterProvider> {
        self.meter_provider.as_ref()
    }

    /// Export everything buffered so far without shutting down
    pub fn force_flush(&self) -> Result<(), TelemetryError> {
        if let Some(provider) = &self.tracer_provider {
            provider.force_flush()?;
        }
        if let Some(provider) = &self.meter_provider {
            provider.force_flush()?;
        }
        Ok(())
    }

    /// Flush and shut down both providers.
    ///
    /// Both are always shut down; the first failure is returned.
    pub fn shutdown(mut self) -> Result<(), TelemetryError> {
        let traces = self.tracer_provider.take().map(|p| p.shutdown());
        let metrics = self.meter_provider.take().map(|p| p.shutdown());

        for result in [traces, metrics].into_iter().flatten() {
            result?;
        }
        Ok(())
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(e) = provider.shutdown() {
                tracing::error!("Failed to shutdown tracer provider: {:?}", e);
            }
        }
        if let Some(provider) = self.meter_provider.take() {
            if let Err(e) = provider.shutdown() {
                tracing::error!("Failed to shutdown meter provider: {:?}", e);
            }
        }
    }
}

/// Install built providers globally along with the propagators and the
/// subscriber
fn install(
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
    config: &TelemetryConfig,
) -> Result<TelemetryGuard, TelemetryError> {
    init_subscriber(Some(&tracer_provider), config)?;

    global::set_tracer_provider(tracer_provider.clone());
    global::set_meter_provider(meter_provider.clone());
    propagation::install();

    info!(
        service = %config.service_name,
        traces = config.traces_exporter.as_str(),
        metrics = config.metrics_exporter.as_str(),
        "Telemetry initialized"
    );
    Ok(TelemetryGuard::new(tracer_provider, meter_provider))
}

/// Initialize telemetry with a specific provider for both signals
pub async fn init_with_provider<P: TelemetryProvider>(
    provider: &P,
    config: &TelemetryConfig,
) -> Result<TelemetryGuard, TelemetryError> {
    let tracer_provider = provider.build_tracer_provider(config).await?;
    let meter_provider = provider.build_meter_provider(config).await?;
    install(tracer_provider, meter_provider, config)
}

async fn tracer_provider_for(
    kind: ExporterKind,
    config: &TelemetryConfig,
) -> Result<SdkTracerProvider, TelemetryError> {
    match kind {
        ExporterKind::Logging => LoggingProvider.build_tracer_provider(config).await,
        ExporterKind::Otlp => {
            OtlpProvider::new(config.otlp.clone())
                .build_tracer_provider(config)
                .await
        }
        ExporterKind::None => NoopProvider.build_tracer_provider(config).await,
    }
}

async fn meter_provider_for(
    kind: ExporterKind,
    config: &TelemetryConfig,
) -> Result<SdkMeterProvider, TelemetryError> {
    match kind {
        ExporterKind::Logging => LoggingProvider.build_meter_provider(config).await,
        ExporterKind::Otlp => {
            OtlpProvider::new(config.otlp.clone())
                .build_meter_provider(config)
                .await
        }
        ExporterKind::None => NoopProvider.build_meter_provider(config).await,
    }
}

/// Initialize telemetry with config, choosing the exporter per signal
pub async fn init_with_config(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    config.validate()?;

    if config.sdk_disabled {
        init_subscriber(None, config)?;
        info!("OpenTelemetry SDK disabled, console logging only");
        return Ok(TelemetryGuard::disabled());
    }

    let tracer_provider = tracer_provider_for(config.traces_exporter, config).await?;
    let meter_provider = meter_provider_for(config.metrics_exporter, config).await?;
    install(tracer_provider, meter_provider, config)
}

/// Initialize telemetry from environment
pub async fn init() -> Result<TelemetryGuard, TelemetryError> {
    let config = TelemetryConfig::from_env()?;
    init_with_config(&config).await
}
