use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Instruments recorded by the workload.
#[derive(Debug, Clone)]
pub struct WorkloadMetrics {
    /// Packets created so far.
    pub generated: Counter<u64>,
    /// Batches completed so far.
    pub batches: Counter<u64>,
    /// Wall time of one generate and process cycle, in seconds.
    pub batch_duration: Histogram<f64>,
}

impl WorkloadMetrics {
    pub fn new(meter: &Meter) -> Self {
        Self {
            generated: meter
                .u64_counter("data_packets.generated")
                .with_description("Data packets generated")
                .with_unit("{packet}")
                .build(),
            batches: meter
                .u64_counter("data_packets.batches")
                .with_description("Data packet batches processed")
                .with_unit("{batch}")
                .build(),
            batch_duration: meter
                .f64_histogram("data_packets.batch.duration")
                .with_description("Time to generate and process one batch")
                .with_unit("s")
                .build(),
        }
    }
}
