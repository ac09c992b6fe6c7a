use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::Subscriber;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::telemetry::config::{LogFormat, TelemetryConfig};
use crate::telemetry::error::TelemetryError;

const DEFAULT_DIRECTIVES: &str = "info";

/// Build the OpenTelemetry tracing layer
pub fn build_otel_layer<S>(provider: &SdkTracerProvider, service_name: &str) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let tracer = provider.tracer(service_name.to_string());
    tracing_opentelemetry::layer().with_tracer(tracer)
}

/// JSON lines formatter: one object per event with `level`, `timestamp`,
/// `target`, the current span and the event fields at root level
struct JsonLineFormat;

fn json_string(value: &str) -> Result<String, std::fmt::Error> {
    serde_json::to_string(value).map_err(|_| std::fmt::Error)
}

impl<S, N> FormatEvent<S, N> for JsonLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();

        write!(writer, r#"{{"level":"{}""#, metadata.level())?;
        write!(
            writer,
            r#","timestamp":"{}""#,
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
        )?;
        write!(writer, r#","target":{}"#, json_string(metadata.target())?)?;

        if let Some(span) = ctx.lookup_current() {
            write!(writer, r#","span":{{"name":{}"#, json_string(span.name())?)?;
            let ext = span.extensions();
            if let Some(fields) = ext.get::<tracing_subscriber::fmt::FormattedFields<N>>() {
                if !fields.is_empty() {
                    write!(writer, r#","fields":{}"#, json_string(fields.as_str())?)?;
                }
            }
            write!(writer, "}}")?;
        }

        let mut fields = serde_json::Map::new();
        event.record(&mut JsonVisitor(&mut fields));
        for (key, value) in fields.iter() {
            let json = serde_json::to_string(value).map_err(|_| std::fmt::Error)?;
            write!(writer, r#",{}:{}"#, json_string(key)?, json)?;
        }

        writeln!(writer, "}}")
    }
}

/// Visitor to collect event fields into a JSON map
struct JsonVisitor<'a>(&'a mut serde_json::Map<String, serde_json::Value>);

impl tracing::field::Visit for JsonVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(
            field.name().to_string(),
            serde_json::Value::String(format!("{:?}", value)),
        );
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(
            field.name().to_string(),
            serde_json::Value::String(value.to_string()),
        );
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0
            .insert(field.name().to_string(), serde_json::Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0
            .insert(field.name().to_string(), serde_json::Value::Number(value.into()));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        let value = serde_json::Number::from_f64(value)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null);
        self.0.insert(field.name().to_string(), value);
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0
            .insert(field.name().to_string(), serde_json::Value::Bool(value));
    }
}

/// JSON lines layer writing to `make_writer`, without ANSI escapes
pub fn json_layer<S, W>(make_writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .event_format(JsonLineFormat)
        .with_ansi(false)
        .with_writer(make_writer)
}

/// Build the JSON fmt layer for structured logging
pub fn build_json_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    json_layer(std::io::stdout)
}

/// Build the pretty fmt layer for human-readable output (local dev)
pub fn build_pretty_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
}

/// Build the filter from the configured directives (`RUST_LOG` is already
/// folded into `log_level`). Unparseable directives fall back to `info`.
pub fn build_filter(config: &TelemetryConfig) -> EnvFilter {
    EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global tracing subscriber.
///
/// The OpenTelemetry layer is only added when a tracer provider is given, so
/// with the SDK disabled events still reach the console.
pub fn init_subscriber(
    provider: Option<&SdkTracerProvider>,
    config: &TelemetryConfig,
) -> Result<(), TelemetryError> {
    let otel_layer = provider.map(|p| build_otel_layer(p, &config.service_name));
    let filter = build_filter(config);

    let result = match config.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(otel_layer)
            .with(build_pretty_layer())
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(otel_layer)
            .with(build_json_layer())
            .try_init(),
    };

    result.map_err(|e| TelemetryError::Init(e.to_string()))
}
