use std::collections::BTreeMap;
use std::fmt;

use opentelemetry::trace::{SpanId, SpanKind, Status};
use opentelemetry::KeyValue;
use opentelemetry_sdk::metrics::data::{AggregatedMetrics, Metric, MetricData, ResourceMetrics};
use opentelemetry_sdk::trace::SpanData;
use serde::Serialize;

/// How exported telemetry is rendered into a log message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordFormat {
    /// One human-readable line
    #[default]
    Text,
    /// One JSON object
    Json,
}

impl RecordFormat {
    pub fn render<R>(&self, record: &R) -> Result<String, serde_json::Error>
    where
        R: Serialize + fmt::Display,
    {
        match self {
            Self::Text => Ok(record.to_string()),
            Self::Json => serde_json::to_string(record),
        }
    }
}

fn attribute_map<'a>(attrs: impl Iterator<Item = &'a KeyValue>) -> BTreeMap<String, String> {
    attrs
        .map(|kv| (kv.key.as_str().to_string(), kv.value.to_string()))
        .collect()
}

struct Attributes<'a>(&'a BTreeMap<String, String>);

impl fmt::Display for Attributes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str("}")
    }
}

/// A finished span, flattened for logging
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanRecord {
    pub name: String,
    pub trace_id: String,
    pub span_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,
    pub kind: &'static str,
    pub duration_ms: f64,
    pub status: String,
    pub scope: String,
    pub attributes: BTreeMap<String, String>,
}

fn kind_name(kind: &SpanKind) -> &'static str {
    match kind {
        SpanKind::Client => "CLIENT",
        SpanKind::Server => "SERVER",
        SpanKind::Producer => "PRODUCER",
        SpanKind::Consumer => "CONSUMER",
        SpanKind::Internal => "INTERNAL",
    }
}

fn status_text(status: &Status) -> String {
    match status {
        Status::Unset => "UNSET".to_string(),
        Status::Ok => "OK".to_string(),
        Status::Error { description } => format!("ERROR({description})"),
    }
}

impl From<&SpanData> for SpanRecord {
    fn from(span: &SpanData) -> Self {
        let scope = &span.instrumentation_scope;
        let duration = span
            .end_time
            .duration_since(span.start_time)
            .unwrap_or_default();

        Self {
            name: span.name.to_string(),
            trace_id: span.span_context.trace_id().to_string(),
            span_id: span.span_context.span_id().to_string(),
            parent_span_id: (span.parent_span_id != SpanId::INVALID)
                .then(|| span.parent_span_id.to_string()),
            kind: kind_name(&span.span_kind),
            duration_ms: duration.as_secs_f64() * 1_000.0,
            status: status_text(&span.status),
            scope: match scope.version() {
                Some(version) => format!("{}:{}", scope.name(), version),
                None => scope.name().to_string(),
            },
            attributes: attribute_map(span.attributes.iter()),
        }
    }
}

impl fmt::Display for SpanRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' : {} {} {} {:.3}ms {} [tracer: {}]",
            self.name,
            self.trace_id,
            self.span_id,
            self.kind,
            self.duration_ms,
            self.status,
            self.scope
        )?;
        if let Some(parent) = &self.parent_span_id {
            write!(f, " parent={parent}")?;
        }
        write!(f, " {}", Attributes(&self.attributes))
    }
}

/// One aggregated data point
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointValue {
    Value {
        value: f64,
    },
    Histogram {
        count: u64,
        sum: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
}

impl fmt::Display for PointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value { value } => write!(f, "{value}"),
            Self::Histogram {
                count,
                sum,
                min,
                max,
            } => {
                write!(f, "count={count} sum={sum}")?;
                if let (Some(min), Some(max)) = (min, max) {
                    write!(f, " min={min} max={max}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointRecord {
    pub attributes: BTreeMap<String, String>,
    #[serde(flatten)]
    pub value: PointValue,
}

/// A metric stream, flattened for logging
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    pub scope: String,
    pub name: String,
    pub unit: String,
    pub kind: &'static str,
    pub points: Vec<PointRecord>,
}

impl fmt::Display for MetricRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {} [meter: {}]", self.name, self.kind, self.scope)?;
        if !self.unit.is_empty() {
            write!(f, " unit={}", self.unit)?;
        }
        for point in &self.points {
            write!(f, " {} {}", Attributes(&point.attributes), point.value)?;
        }
        Ok(())
    }
}

trait AsF64: Copy {
    fn as_f64(self) -> f64;
}

impl AsF64 for f64 {
    fn as_f64(self) -> f64 {
        self
    }
}

impl AsF64 for u64 {
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl AsF64 for i64 {
    fn as_f64(self) -> f64 {
        self as f64
    }
}

fn value_point<'a, T: AsF64>(
    attrs: impl Iterator<Item = &'a KeyValue>,
    value: T,
) -> PointRecord {
    PointRecord {
        attributes: attribute_map(attrs),
        value: PointValue::Value {
            value: value.as_f64(),
        },
    }
}

fn histogram_point<'a, T: AsF64, C: TryInto<u64>>(
    attrs: impl Iterator<Item = &'a KeyValue>,
    count: C,
    sum: T,
    min: Option<T>,
    max: Option<T>,
) -> PointRecord {
    PointRecord {
        attributes: attribute_map(attrs),
        value: PointValue::Histogram {
            count: count.try_into().unwrap_or(u64::MAX),
            sum: sum.as_f64(),
            min: min.map(AsF64::as_f64),
            max: max.map(AsF64::as_f64),
        },
    }
}

fn points_of<T: AsF64>(data: &MetricData<T>) -> (&'static str, Vec<PointRecord>) {
    #[allow(unreachable_patterns)]
    match data {
        MetricData::Gauge(gauge) => (
            "gauge",
            gauge
                .data_points()
                .map(|p| value_point(p.attributes(), p.value()))
                .collect(),
        ),
        MetricData::Sum(sum) => (
            if sum.is_monotonic() {
                "counter"
            } else {
                "up_down_counter"
            },
            sum.data_points()
                .map(|p| value_point(p.attributes(), p.value()))
                .collect(),
        ),
        MetricData::Histogram(histogram) => (
            "histogram",
            histogram
                .data_points()
                .map(|p| histogram_point(p.attributes(), p.count(), p.sum(), p.min(), p.max()))
                .collect(),
        ),
        MetricData::ExponentialHistogram(histogram) => (
            "exponential_histogram",
            histogram
                .data_points()
                .map(|p| histogram_point(p.attributes(), p.count(), p.sum(), p.min(), p.max()))
                .collect(),
        ),
        _ => ("unknown", Vec::new()),
    }
}

impl MetricRecord {
    pub fn new(scope: &str, metric: &Metric) -> Self {
        #[allow(unreachable_patterns)]
        let (kind, points) = match metric.data() {
            AggregatedMetrics::F64(data) => points_of(data),
            AggregatedMetrics::U64(data) => points_of(data),
            AggregatedMetrics::I64(data) => points_of(data),
            _ => ("unknown", Vec::new()),
        };

        Self {
            scope: scope.to_string(),
            name: metric.name().to_string(),
            unit: metric.unit().to_string(),
            kind,
            points,
        }
    }
}

/// Flatten one collection cycle into per-metric records
pub fn metric_records(metrics: &ResourceMetrics) -> Vec<MetricRecord> {
    metrics
        .scope_metrics()
        .flat_map(|scope| {
            let name = scope.scope().name();
            scope
                .metrics()
                .map(move |metric| MetricRecord::new(name, metric))
        })
        .collect()
}
