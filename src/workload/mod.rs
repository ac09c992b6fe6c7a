//! Fictional data processing.
//!
//! On a fixed-rate schedule the workload creates a large batch of
//! [`DataPacket`]s, walks it once and throws it away. Each cycle is traced as
//! a `generate_data_packets` span followed by a `process_data_packets` span
//! whose parent travels with the batch as W3C headers, the way it would cross
//! a queue between two services.

mod config;
mod metrics;
mod packet;

pub use config::{WorkloadConfig, WorkloadError, DEFAULT_BATCH_SIZE, DEFAULT_PERIOD};
pub use metrics::WorkloadMetrics;
pub use packet::{generate, DataBatch, DataPacket};

use std::time::{Duration, Instant};

use opentelemetry::metrics::Meter;
use tokio::time::interval;
use tracing::{debug, info, info_span, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::telemetry::propagation;

/// Outcome of one generate and process cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub batch: u64,
    pub packets: usize,
    pub checksum: u64,
    pub duration: Duration,
}

pub struct Workload {
    config: WorkloadConfig,
    metrics: WorkloadMetrics,
    batches_run: u64,
    next_sequence: u64,
}

impl Workload {
    pub fn new(config: WorkloadConfig, meter: &Meter) -> Self {
        Self {
            config,
            metrics: WorkloadMetrics::new(meter),
            batches_run: 0,
            next_sequence: 0,
        }
    }

    pub fn batches_run(&self) -> u64 {
        self.batches_run
    }

    /// Generate, process and discard one batch
    pub fn run_batch(&mut self) -> BatchReport {
        let started = Instant::now();

        let batch = self.generate_batch();
        let packets = batch.packets.len();
        let checksum = process_batch(&batch);
        drop(batch);

        let duration = started.elapsed();
        self.batches_run += 1;

        self.metrics.generated.add(packets as u64, &[]);
        self.metrics.batches.add(1, &[]);
        self.metrics
            .batch_duration
            .record(duration.as_secs_f64(), &[]);

        BatchReport {
            batch: self.batches_run,
            packets,
            checksum,
            duration,
        }
    }

    #[tracing::instrument(
        name = "generate_data_packets",
        skip(self),
        fields(batch.size, batch.first_sequence)
    )]
    fn generate_batch(&mut self) -> DataBatch {
        let span = Span::current();
        span.record("batch.size", self.config.batch_size);
        span.record("batch.first_sequence", self.next_sequence);

        let packets = generate(self.next_sequence, self.config.batch_size);
        // Numbering restarts at zero once u64 is exhausted
        self.next_sequence = self
            .next_sequence
            .checked_add(packets.len() as u64)
            .unwrap_or(0);

        let headers = propagation::inject(&span.context());
        debug!(packets = packets.len(), "Data packets generated");
        DataBatch { packets, headers }
    }

    /// Run batches at a fixed rate, the first one immediately.
    ///
    /// Returns once `max_batches` have run; without a limit it only returns
    /// when the future is dropped.
    pub async fn run(&mut self) -> u64 {
        let mut ticker = interval(self.config.period);

        while !matches!(self.config.max_batches, Some(max) if self.batches_run >= max) {
            ticker.tick().await;
            let report = self.run_batch();
            debug!(
                batch = report.batch,
                packets = report.packets,
                elapsed_ms = report.duration.as_secs_f64() * 1000.0,
                "Batch discarded"
            );
        }

        info!(batches = self.batches_run, "Workload finished");
        self.batches_run
    }
}

/// Walk every packet once under a span parented from the batch headers
fn process_batch(batch: &DataBatch) -> u64 {
    let span = info_span!("process_data_packets", packets = batch.packets.len());
    if let Err(e) = span.set_parent(propagation::extract(&batch.headers)) {
        debug!(error = ?e, "Batch headers carried no usable parent");
    }
    let _entered = span.enter();

    batch
        .packets
        .iter()
        .fold(0u64, |acc, packet| acc.wrapping_add(packet.sequence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::logging::{metric_records, PointValue};
    use crate::telemetry::trace::build_otel_layer;
    use opentelemetry::metrics::MeterProvider;
    use opentelemetry::trace::TraceContextExt;
    use opentelemetry_sdk::metrics::{InMemoryMetricExporter, PeriodicReader, SdkMeterProvider};
    use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};
    use tracing_subscriber::layer::SubscriberExt;

    fn small_config(max_batches: Option<u64>) -> WorkloadConfig {
        WorkloadConfig {
            batch_size: 5,
            period: Duration::from_millis(1),
            max_batches,
        }
    }

    fn meter_provider() -> (SdkMeterProvider, InMemoryMetricExporter) {
        let exporter = InMemoryMetricExporter::default();
        let provider = SdkMeterProvider::builder()
            .with_reader(PeriodicReader::builder(exporter.clone()).build())
            .build();
        (provider, exporter)
    }

    #[test]
    fn run_batch_continues_sequence() {
        let (provider, _) = meter_provider();
        let mut workload = Workload::new(small_config(None), &provider.meter("workload-test"));

        let first = workload.run_batch();
        let second = workload.run_batch();

        assert_eq!(first.batch, 1);
        assert_eq!(first.packets, 5);
        assert_eq!(first.checksum, 10);
        assert_eq!(second.batch, 2);
        assert_eq!(second.checksum, 35);
        assert_eq!(workload.batches_run(), 2);
    }

    #[test]
    fn run_batch_records_measurements() {
        let (provider, exporter) = meter_provider();
        let mut workload = Workload::new(small_config(None), &provider.meter("workload-test"));

        workload.run_batch();
        workload.run_batch();
        provider.force_flush().unwrap();

        let exported = exporter.get_finished_metrics().unwrap();
        let records: Vec<_> = exported.iter().flat_map(metric_records).collect();
        let find = |name: &str| {
            records
                .iter()
                .rev()
                .find(|r| r.name == name)
                .map(|r| r.points[0].value.clone())
        };

        assert!(matches!(
            find("data_packets.generated"),
            Some(PointValue::Value { value }) if value == 10.0
        ));
        assert!(matches!(
            find("data_packets.batches"),
            Some(PointValue::Value { value }) if value == 2.0
        ));
        assert!(matches!(
            find("data_packets.batch.duration"),
            Some(PointValue::Histogram { count: 2, .. })
        ));
    }

    #[test]
    fn process_span_is_parented_through_headers() {
        propagation::install();
        let spans = InMemorySpanExporter::default();
        let tracer_provider = SdkTracerProvider::builder()
            .with_simple_exporter(spans.clone())
            .build();
        let subscriber =
            tracing_subscriber::registry().with(build_otel_layer(&tracer_provider, "workload-test"));
        let (meter_provider, _) = meter_provider();
        let mut workload =
            Workload::new(small_config(None), &meter_provider.meter("workload-test"));

        tracing::subscriber::with_default(subscriber, || {
            workload.run_batch();
        });

        let finished = spans.get_finished_spans().unwrap();
        let generate = finished
            .iter()
            .find(|s| s.name == "generate_data_packets")
            .unwrap();
        let process = finished
            .iter()
            .find(|s| s.name == "process_data_packets")
            .unwrap();

        assert_eq!(
            process.span_context.trace_id(),
            generate.span_context.trace_id()
        );
        assert_eq!(process.parent_span_id, generate.span_context.span_id());
    }

    #[test]
    fn headers_are_empty_without_active_trace() {
        let batch = DataBatch {
            packets: generate(0, 2),
            headers: propagation::inject(&opentelemetry::Context::new()),
        };

        assert!(batch.headers.is_empty());
        assert!(!propagation::extract(&batch.headers).span().span_context().is_valid());
        assert_eq!(process_batch(&batch), 1);
    }

    #[test]
    fn sequence_restarts_when_exhausted() {
        let (provider, _) = meter_provider();
        let mut workload = Workload::new(small_config(None), &provider.meter("workload-test"));
        workload.next_sequence = u64::MAX - 1;

        let last = workload.run_batch();
        let restarted = workload.run_batch();

        assert_eq!(last.packets, 2);
        assert_eq!(workload.next_sequence, 5);
        assert_eq!(restarted.packets, 5);
        assert_eq!(restarted.checksum, 10);
    }

    #[tokio::test]
    async fn run_stops_after_max_batches() {
        let (provider, _) = meter_provider();
        let mut workload = Workload::new(small_config(Some(3)), &provider.meter("workload-test"));

        let batches = workload.run().await;

        assert_eq!(batches, 3);
        assert_eq!(workload.batches_run(), 3);
    }
}
