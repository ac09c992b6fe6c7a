//! Processor and reader wiring shared by every exporter backend.
//!
//! Finished spans go through a batch span processor: they queue up to
//! `max_queue_size` and leave in chunks of `max_export_batch_size`, either when
//! a chunk fills or when `scheduled_delay` elapses. Measurements are collected
//! by a periodic reader every `metric_export_interval`.

use opentelemetry_sdk::metrics::exporter::PushMetricExporter;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::trace::{
    BatchConfigBuilder, BatchSpanProcessor, Sampler, SdkTracerProvider, SpanExporter,
};

use crate::telemetry::config::{BatchSettings, TelemetryConfig};
use crate::telemetry::resource::build_resource;

/// Parent-based sampler honouring the configured ratio
pub fn build_sampler(ratio: f64) -> Sampler {
    let root = if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    };
    Sampler::ParentBased(Box::new(root))
}

/// Batch span processor around `exporter`
pub fn build_batch_processor<E>(exporter: E, batch: &BatchSettings) -> BatchSpanProcessor
where
    E: SpanExporter + 'static,
{
    let batch_config = BatchConfigBuilder::default()
        .with_scheduled_delay(batch.scheduled_delay)
        .with_max_queue_size(batch.max_queue_size)
        .with_max_export_batch_size(batch.max_export_batch_size)
        .build();

    BatchSpanProcessor::builder(exporter)
        .with_batch_config(batch_config)
        .build()
}

/// Tracer provider exporting through a batch processor
pub fn build_tracer_provider<E>(exporter: E, config: &TelemetryConfig) -> SdkTracerProvider
where
    E: SpanExporter + 'static,
{
    SdkTracerProvider::builder()
        .with_span_processor(build_batch_processor(exporter, &config.batch))
        .with_sampler(build_sampler(config.sampling_ratio))
        .with_resource(build_resource(config))
        .build()
}

/// Meter provider exporting through a periodic reader
pub fn build_meter_provider<E>(exporter: E, config: &TelemetryConfig) -> SdkMeterProvider
where
    E: PushMetricExporter,
{
    let reader = PeriodicReader::builder(exporter)
        .with_interval(config.metric_export_interval)
        .build();

    SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(build_resource(config))
        .build()
}

/// Tracer provider that samples and records but never exports
pub fn empty_tracer_provider(config: &TelemetryConfig) -> SdkTracerProvider {
    SdkTracerProvider::builder()
        .with_sampler(build_sampler(config.sampling_ratio))
        .with_resource(build_resource(config))
        .build()
}

/// Meter provider with no reader; instruments are no-ops
pub fn empty_meter_provider(config: &TelemetryConfig) -> SdkMeterProvider {
    SdkMeterProvider::builder()
        .with_resource(build_resource(config))
        .build()
}
