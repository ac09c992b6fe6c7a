use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::settings::{self, InvalidSetting};
use crate::telemetry::error::TelemetryError;

/// Service name reported when neither `OTEL_SERVICE_NAME` nor a `service.name`
/// resource attribute is set
pub const DEFAULT_SERVICE_NAME: &str = "manual-instrumentation-server";

/// Default collector address for OTLP/gRPC
pub const DEFAULT_GRPC_ENDPOINT: &str = "http://localhost:4317";

/// Default collector address for OTLP/HTTP
pub const DEFAULT_HTTP_ENDPOINT: &str = "http://localhost:4318";

/// Resource key naming the service
pub const SERVICE_NAME_KEY: &str = "service.name";

pub const TRACES_PATH: &str = "/v1/traces";
pub const METRICS_PATH: &str = "/v1/metrics";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Pretty human-readable format with colors (for local dev)
    #[default]
    Pretty,
    /// JSON lines
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format {other:?}, expected pretty or json")),
        }
    }
}

/// Where a signal's telemetry goes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExporterKind {
    /// Written through the logging facade
    #[default]
    Logging,
    /// Sent to an OTLP collector
    Otlp,
    /// Recorded but never exported
    None,
}

impl ExporterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Logging => "logging",
            Self::Otlp => "otlp",
            Self::None => "none",
        }
    }
}

impl fmt::Display for ExporterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExporterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "logging" | "console" => Ok(Self::Logging),
            "otlp" => Ok(Self::Otlp),
            "none" => Ok(Self::None),
            other => Err(format!(
                "unknown exporter {other:?}, expected logging, console, otlp or none"
            )),
        }
    }
}

/// OTLP wire transport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OtlpProtocol {
    #[default]
    Grpc,
    HttpProtobuf,
    HttpJson,
}

impl OtlpProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grpc => "grpc",
            Self::HttpProtobuf => "http/protobuf",
            Self::HttpJson => "http/json",
        }
    }

    pub fn is_http(&self) -> bool {
        !matches!(self, Self::Grpc)
    }
}

impl fmt::Display for OtlpProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OtlpProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grpc" => Ok(Self::Grpc),
            "http/protobuf" => Ok(Self::HttpProtobuf),
            "http/json" => Ok(Self::HttpJson),
            other => Err(format!(
                "unknown protocol {other:?}, expected grpc, http/protobuf or http/json"
            )),
        }
    }
}

/// Which HTTP client carries OTLP/HTTP requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpSender {
    /// The client the OTLP exporter builds for itself
    #[default]
    Default,
    /// A client built here with its own connection settings and an
    /// `x-otlp-sender: custom` header
    Custom,
}

impl HttpSender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for HttpSender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "custom" => Ok(Self::Custom),
            other => Err(format!("unknown sender {other:?}, expected default or custom")),
        }
    }
}

/// OTLP exporter settings shared by traces and metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtlpConfig {
    /// Collector base URL; `None` means the protocol's default address
    pub endpoint: Option<String>,
    pub protocol: OtlpProtocol,
    pub sender: HttpSender,
    pub timeout: Duration,
    pub headers: Vec<(String, String)>,
}

impl Default for OtlpConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            protocol: OtlpProtocol::default(),
            sender: HttpSender::default(),
            timeout: Duration::from_secs(10),
            headers: Vec::new(),
        }
    }
}

impl OtlpConfig {
    fn from_lookup<L>(lookup: &L) -> Result<Self, InvalidSetting>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT"),
            protocol: settings::parsed(lookup, "OTEL_EXPORTER_OTLP_PROTOCOL")?
                .unwrap_or(defaults.protocol),
            sender: settings::parsed(lookup, "OTEL_EXPORTER_OTLP_HTTP_SENDER")?
                .unwrap_or(defaults.sender),
            timeout: settings::millis(lookup, "OTEL_EXPORTER_OTLP_TIMEOUT")?
                .unwrap_or(defaults.timeout),
            headers: settings::key_value_list(lookup, "OTEL_EXPORTER_OTLP_HEADERS")?,
        })
    }

    /// Collector base URL, falling back to the protocol's default port
    pub fn base_endpoint(&self) -> &str {
        match (&self.endpoint, self.protocol) {
            (Some(endpoint), _) => endpoint,
            (None, OtlpProtocol::Grpc) => DEFAULT_GRPC_ENDPOINT,
            (None, _) => DEFAULT_HTTP_ENDPOINT,
        }
    }

    pub fn traces_endpoint(&self) -> String {
        self.signal_endpoint(TRACES_PATH)
    }

    pub fn metrics_endpoint(&self) -> String {
        self.signal_endpoint(METRICS_PATH)
    }

    /// gRPC multiplexes signals over one address; HTTP posts each signal to its own path.
    /// A base that already names a signal path has it replaced.
    fn signal_endpoint(&self, path: &str) -> String {
        let base = self.base_endpoint().trim_end_matches('/');
        if !self.protocol.is_http() {
            return base.to_string();
        }
        let base = [TRACES_PATH, METRICS_PATH]
            .iter()
            .find_map(|known| base.strip_suffix(known))
            .unwrap_or(base);
        format!("{base}{path}")
    }
}

fn attribute_value(attributes: &[(String, String)], key: &str) -> Option<String> {
    attributes
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// Batch span processor settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSettings {
    pub scheduled_delay: Duration,
    pub max_queue_size: usize,
    pub max_export_batch_size: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            scheduled_delay: Duration::from_millis(5_000),
            max_queue_size: 2_048,
            max_export_batch_size: 512,
        }
    }
}

impl BatchSettings {
    fn from_lookup<L>(lookup: &L) -> Result<Self, InvalidSetting>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            scheduled_delay: settings::millis(lookup, "OTEL_BSP_SCHEDULE_DELAY")?
                .unwrap_or(defaults.scheduled_delay),
            max_queue_size: settings::parsed(lookup, "OTEL_BSP_MAX_QUEUE_SIZE")?
                .unwrap_or(defaults.max_queue_size),
            max_export_batch_size: settings::parsed(lookup, "OTEL_BSP_MAX_EXPORT_BATCH_SIZE")?
                .unwrap_or(defaults.max_export_batch_size),
        })
    }
}

/// Main telemetry configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub log_format: LogFormat,
    pub traces_exporter: ExporterKind,
    pub metrics_exporter: ExporterKind,
    pub otlp: OtlpConfig,
    pub batch: BatchSettings,
    pub metric_export_interval: Duration,
    pub sampling_ratio: f64,
    /// Install logging only, no telemetry SDK
    pub sdk_disabled: bool,
    pub resource_attributes: Vec<(String, String)>,
}

impl TelemetryConfig {
    /// Create config from environment variables.
    /// Exporters default to OTLP when a collector endpoint is set and to
    /// logging otherwise.
    pub fn from_env() -> Result<Self, TelemetryError> {
        Self::from_lookup(settings::env_lookup)
    }

    /// Same as [`TelemetryConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, TelemetryError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let otlp = OtlpConfig::from_lookup(&lookup)?;
        let resource_attributes = settings::key_value_list(&lookup, "OTEL_RESOURCE_ATTRIBUTES")?;
        let default_exporter = if otlp.endpoint.is_some() {
            ExporterKind::Otlp
        } else {
            ExporterKind::Logging
        };

        let config = Self {
            service_name: lookup("OTEL_SERVICE_NAME")
                .or_else(|| attribute_value(&resource_attributes, SERVICE_NAME_KEY))
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
            service_version: lookup("OTEL_SERVICE_VERSION")
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_format: settings::parsed(&lookup, "LOG_FORMAT")?.unwrap_or_default(),
            traces_exporter: settings::parsed(&lookup, "OTEL_TRACES_EXPORTER")?
                .unwrap_or(default_exporter),
            metrics_exporter: settings::parsed(&lookup, "OTEL_METRICS_EXPORTER")?
                .unwrap_or(default_exporter),
            otlp,
            batch: BatchSettings::from_lookup(&lookup)?,
            metric_export_interval: settings::millis(&lookup, "OTEL_METRIC_EXPORT_INTERVAL")?
                .unwrap_or(DEFAULT_METRIC_EXPORT_INTERVAL),
            sampling_ratio: settings::parsed(&lookup, "OTEL_TRACES_SAMPLER_ARG")?.unwrap_or(1.0),
            sdk_disabled: settings::flag(&lookup, "OTEL_SDK_DISABLED")?.unwrap_or(false),
            resource_attributes,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create a new config with explicit values
    pub fn new(service_name: impl Into<String>, service_version: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            service_version: service_version.into(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            traces_exporter: ExporterKind::Logging,
            metrics_exporter: ExporterKind::Logging,
            otlp: OtlpConfig::default(),
            batch: BatchSettings::default(),
            metric_export_interval: DEFAULT_METRIC_EXPORT_INTERVAL,
            sampling_ratio: 1.0,
            sdk_disabled: false,
            resource_attributes: Vec::new(),
        }
    }

    pub fn builder() -> TelemetryConfigBuilder {
        TelemetryConfigBuilder::default()
    }

    /// Reject combinations the SDK would silently misbehave with
    pub fn validate(&self) -> Result<(), InvalidSetting> {
        if !(0.0..=1.0).contains(&self.sampling_ratio) {
            return Err(InvalidSetting::new(
                "OTEL_TRACES_SAMPLER_ARG",
                self.sampling_ratio.to_string(),
                "ratio must be between 0 and 1",
            ));
        }
        if self.batch.max_queue_size == 0 {
            return Err(InvalidSetting::new(
                "OTEL_BSP_MAX_QUEUE_SIZE",
                "0",
                "queue size must be positive",
            ));
        }
        if self.batch.max_export_batch_size == 0 {
            return Err(InvalidSetting::new(
                "OTEL_BSP_MAX_EXPORT_BATCH_SIZE",
                "0",
                "batch size must be positive",
            ));
        }
        if self.batch.max_export_batch_size > self.batch.max_queue_size {
            return Err(InvalidSetting::new(
                "OTEL_BSP_MAX_EXPORT_BATCH_SIZE",
                self.batch.max_export_batch_size.to_string(),
                format!(
                    "batch size exceeds queue size {}",
                    self.batch.max_queue_size
                ),
            ));
        }
        if self.metric_export_interval.is_zero() {
            return Err(InvalidSetting::new(
                "OTEL_METRIC_EXPORT_INTERVAL",
                "0",
                "interval must be positive",
            ));
        }
        Ok(())
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_exporter(mut self, kind: ExporterKind) -> Self {
        self.traces_exporter = kind;
        self.metrics_exporter = kind;
        self
    }

    pub fn with_otlp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_otlp_protocol(mut self, protocol: OtlpProtocol) -> Self {
        self.otlp.protocol = protocol;
        self
    }

    pub fn with_http_sender(mut self, sender: HttpSender) -> Self {
        self.otlp.sender = sender;
        self
    }

    pub fn with_metric_export_interval(mut self, interval: Duration) -> Self {
        self.metric_export_interval = interval;
        self
    }
}

/// Matches the SDK's periodic reader default
pub const DEFAULT_METRIC_EXPORT_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Default)]
pub struct TelemetryConfigBuilder {
    service_name: Option<String>,
    service_version: Option<String>,
    log_level: Option<String>,
    log_format: Option<LogFormat>,
    traces_exporter: Option<ExporterKind>,
    metrics_exporter: Option<ExporterKind>,
    otlp: OtlpConfig,
    batch: Option<BatchSettings>,
    metric_export_interval: Option<Duration>,
    sampling_ratio: Option<f64>,
    sdk_disabled: bool,
    resource_attributes: Vec<(String, String)>,
}

impl TelemetryConfigBuilder {
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    pub fn service_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = Some(version.into());
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = Some(format);
        self
    }

    pub fn json(self) -> Self {
        self.log_format(LogFormat::Json)
    }

    pub fn pretty(self) -> Self {
        self.log_format(LogFormat::Pretty)
    }

    pub fn traces_exporter(mut self, kind: ExporterKind) -> Self {
        self.traces_exporter = Some(kind);
        self
    }

    pub fn metrics_exporter(mut self, kind: ExporterKind) -> Self {
        self.metrics_exporter = Some(kind);
        self
    }

    pub fn otlp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp.endpoint = Some(endpoint.into());
        self
    }

    pub fn otlp_protocol(mut self, protocol: OtlpProtocol) -> Self {
        self.otlp.protocol = protocol;
        self
    }

    pub fn http_sender(mut self, sender: HttpSender) -> Self {
        self.otlp.sender = sender;
        self
    }

    pub fn otlp_timeout(mut self, timeout: Duration) -> Self {
        self.otlp.timeout = timeout;
        self
    }

    pub fn otlp_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.otlp.headers.push((key.into(), value.into()));
        self
    }

    pub fn batch(mut self, batch: BatchSettings) -> Self {
        self.batch = Some(batch);
        self
    }

    pub fn metric_export_interval(mut self, interval: Duration) -> Self {
        self.metric_export_interval = Some(interval);
        self
    }

    pub fn sampling_ratio(mut self, ratio: f64) -> Self {
        self.sampling_ratio = Some(ratio);
        self
    }

    pub fn sdk_disabled(mut self, disabled: bool) -> Self {
        self.sdk_disabled = disabled;
        self
    }

    pub fn resource_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.resource_attributes.push((key.into(), value.into()));
        self
    }

    pub fn build(self) -> TelemetryConfig {
        TelemetryConfig {
            service_name: self
                .service_name
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
            service_version: self
                .service_version
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            log_level: self.log_level.unwrap_or_else(|| "info".to_string()),
            log_format: self.log_format.unwrap_or_default(),
            traces_exporter: self.traces_exporter.unwrap_or_default(),
            metrics_exporter: self.metrics_exporter.unwrap_or_default(),
            otlp: self.otlp,
            batch: self.batch.unwrap_or_default(),
            metric_export_interval: self
                .metric_export_interval
                .unwrap_or(DEFAULT_METRIC_EXPORT_INTERVAL),
            sampling_ratio: self.sampling_ratio.unwrap_or(1.0),
            sdk_disabled: self.sdk_disabled,
            resource_attributes: self.resource_attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::map_lookup;

    #[test]
    fn log_format_default_is_pretty() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }

    #[test]
    fn exporter_kind_accepts_console_alias() {
        assert_eq!("console".parse::<ExporterKind>(), Ok(ExporterKind::Logging));
        assert_eq!("LOGGING".parse::<ExporterKind>(), Ok(ExporterKind::Logging));
        assert_eq!("otlp".parse::<ExporterKind>(), Ok(ExporterKind::Otlp));
        assert_eq!("none".parse::<ExporterKind>(), Ok(ExporterKind::None));
        assert!("jaeger".parse::<ExporterKind>().is_err());
    }

    #[test]
    fn protocol_parses_otel_names() {
        assert_eq!("grpc".parse::<OtlpProtocol>(), Ok(OtlpProtocol::Grpc));
        assert_eq!(
            "http/protobuf".parse::<OtlpProtocol>(),
            Ok(OtlpProtocol::HttpProtobuf)
        );
        assert_eq!("http/json".parse::<OtlpProtocol>(), Ok(OtlpProtocol::HttpJson));
        assert!("http".parse::<OtlpProtocol>().is_err());
    }

    #[test]
    fn config_new_sets_defaults() {
        let config = TelemetryConfig::new("test-service", "1.0.0");

        assert_eq!(config.service_name, "test-service");
        assert_eq!(config.service_version, "1.0.0");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.traces_exporter, ExporterKind::Logging);
        assert_eq!(config.metrics_exporter, ExporterKind::Logging);
        assert!(config.otlp.endpoint.is_none());
        assert_eq!(config.metric_export_interval, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_with_methods_chain() {
        let config = TelemetryConfig::new("svc", "1.0")
            .with_log_level("debug")
            .with_log_format(LogFormat::Json)
            .with_exporter(ExporterKind::Otlp)
            .with_otlp_endpoint("http://localhost:4318")
            .with_otlp_protocol(OtlpProtocol::HttpProtobuf)
            .with_http_sender(HttpSender::Custom);

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.traces_exporter, ExporterKind::Otlp);
        assert_eq!(config.metrics_exporter, ExporterKind::Otlp);
        assert_eq!(config.otlp.endpoint.as_deref(), Some("http://localhost:4318"));
        assert_eq!(config.otlp.sender, HttpSender::Custom);
    }

    #[test]
    fn builder_sets_all_fields() {
        let config = TelemetryConfigBuilder::default()
            .service_name("my-service")
            .service_version("2.0.0")
            .log_level("warn")
            .otlp_endpoint("http://collector:4317")
            .otlp_header("api-key", "secret")
            .traces_exporter(ExporterKind::Otlp)
            .metrics_exporter(ExporterKind::None)
            .sampling_ratio(0.25)
            .resource_attribute("deployment.environment", "test")
            .json()
            .build();

        assert_eq!(config.service_name, "my-service");
        assert_eq!(config.service_version, "2.0.0");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.traces_exporter, ExporterKind::Otlp);
        assert_eq!(config.metrics_exporter, ExporterKind::None);
        assert_eq!(config.sampling_ratio, 0.25);
        assert_eq!(
            config.otlp.headers,
            vec![("api-key".to_string(), "secret".to_string())]
        );
        assert_eq!(config.resource_attributes.len(), 1);
    }

    #[test]
    fn builder_uses_defaults_when_not_set() {
        let config = TelemetryConfig::builder().build();

        assert_eq!(config.service_name, DEFAULT_SERVICE_NAME);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.traces_exporter, ExporterKind::Logging);
        assert_eq!(config.batch, BatchSettings::default());
        assert!(!config.sdk_disabled);
    }

    #[test]
    fn from_lookup_without_endpoint_uses_logging() {
        let config = TelemetryConfig::from_lookup(map_lookup(&[])).unwrap();

        assert_eq!(config.service_name, DEFAULT_SERVICE_NAME);
        assert_eq!(config.traces_exporter, ExporterKind::Logging);
        assert_eq!(config.metrics_exporter, ExporterKind::Logging);
        assert_eq!(config.otlp.protocol, OtlpProtocol::Grpc);
    }

    #[test]
    fn from_lookup_with_endpoint_uses_otlp() {
        let config = TelemetryConfig::from_lookup(map_lookup(&[(
            "OTEL_EXPORTER_OTLP_ENDPOINT",
            "http://collector:4317",
        )]))
        .unwrap();

        assert_eq!(config.traces_exporter, ExporterKind::Otlp);
        assert_eq!(config.metrics_exporter, ExporterKind::Otlp);
    }

    #[test]
    fn from_lookup_explicit_exporters_win() {
        let config = TelemetryConfig::from_lookup(map_lookup(&[
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4317"),
            ("OTEL_TRACES_EXPORTER", "none"),
            ("OTEL_METRICS_EXPORTER", "logging"),
        ]))
        .unwrap();

        assert_eq!(config.traces_exporter, ExporterKind::None);
        assert_eq!(config.metrics_exporter, ExporterKind::Logging);
    }

    #[test]
    fn from_lookup_reads_http_transport() {
        let config = TelemetryConfig::from_lookup(map_lookup(&[
            ("OTEL_EXPORTER_OTLP_PROTOCOL", "http/json"),
            ("OTEL_EXPORTER_OTLP_HTTP_SENDER", "custom"),
            ("OTEL_EXPORTER_OTLP_TIMEOUT", "2500"),
            ("OTEL_EXPORTER_OTLP_HEADERS", "x-tenant=demo"),
        ]))
        .unwrap();

        assert_eq!(config.otlp.protocol, OtlpProtocol::HttpJson);
        assert_eq!(config.otlp.sender, HttpSender::Custom);
        assert_eq!(config.otlp.timeout, Duration::from_millis(2500));
        assert_eq!(
            config.otlp.headers,
            vec![("x-tenant".to_string(), "demo".to_string())]
        );
    }

    #[test]
    fn from_lookup_reads_resource_attributes() {
        let config = TelemetryConfig::from_lookup(map_lookup(&[(
            "OTEL_RESOURCE_ATTRIBUTES",
            "deployment.environment=demo,team=obs",
        )]))
        .unwrap();

        assert_eq!(
            config.resource_attributes,
            vec![
                ("deployment.environment".to_string(), "demo".to_string()),
                ("team".to_string(), "obs".to_string()),
            ]
        );
    }

    #[test]
    fn from_lookup_reads_batch_and_interval() {
        let config = TelemetryConfig::from_lookup(map_lookup(&[
            ("OTEL_BSP_SCHEDULE_DELAY", "1000"),
            ("OTEL_BSP_MAX_QUEUE_SIZE", "100"),
            ("OTEL_BSP_MAX_EXPORT_BATCH_SIZE", "10"),
            ("OTEL_METRIC_EXPORT_INTERVAL", "5000"),
            ("OTEL_SDK_DISABLED", "true"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.batch.scheduled_delay, Duration::from_secs(1));
        assert_eq!(config.batch.max_queue_size, 100);
        assert_eq!(config.batch.max_export_batch_size, 10);
        assert_eq!(config.metric_export_interval, Duration::from_secs(5));
        assert!(config.sdk_disabled);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn from_lookup_rejects_unknown_exporter() {
        let err = TelemetryConfig::from_lookup(map_lookup(&[("OTEL_TRACES_EXPORTER", "zipkin")]))
            .unwrap_err();

        assert!(err.to_string().contains("OTEL_TRACES_EXPORTER"));
    }

    #[test]
    fn from_lookup_rejects_bad_number() {
        let err =
            TelemetryConfig::from_lookup(map_lookup(&[("OTEL_BSP_MAX_QUEUE_SIZE", "many")]))
                .unwrap_err();

        assert!(matches!(err, TelemetryError::Setting(ref s) if s.key == "OTEL_BSP_MAX_QUEUE_SIZE"));
    }

    #[test]
    fn validate_rejects_ratio_out_of_range() {
        let err = TelemetryConfig::from_lookup(map_lookup(&[("OTEL_TRACES_SAMPLER_ARG", "1.5")]))
            .unwrap_err();

        assert!(err.to_string().contains("OTEL_TRACES_SAMPLER_ARG"));
    }

    #[test]
    fn validate_rejects_batch_larger_than_queue() {
        let config = TelemetryConfig::builder()
            .batch(BatchSettings {
                max_queue_size: 10,
                max_export_batch_size: 20,
                ..BatchSettings::default()
            })
            .build();

        let err = config.validate().unwrap_err();

        assert_eq!(err.key, "OTEL_BSP_MAX_EXPORT_BATCH_SIZE");
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let config = TelemetryConfig::new("svc", "1.0").with_metric_export_interval(Duration::ZERO);

        assert!(config.validate().is_err());
    }

    #[test]
    fn grpc_endpoint_has_no_signal_path() {
        let otlp = OtlpConfig::default();

        assert_eq!(otlp.traces_endpoint(), DEFAULT_GRPC_ENDPOINT);
        assert_eq!(otlp.metrics_endpoint(), DEFAULT_GRPC_ENDPOINT);
    }

    #[test]
    fn http_endpoint_appends_signal_path() {
        let otlp = OtlpConfig {
            protocol: OtlpProtocol::HttpProtobuf,
            ..OtlpConfig::default()
        };

        assert_eq!(otlp.traces_endpoint(), "http://localhost:4318/v1/traces");
        assert_eq!(otlp.metrics_endpoint(), "http://localhost:4318/v1/metrics");
    }

    #[test]
    fn http_endpoint_keeps_existing_path_and_trims_slash() {
        let with_path = OtlpConfig {
            endpoint: Some("http://collector:4318/v1/traces".to_string()),
            protocol: OtlpProtocol::HttpJson,
            ..OtlpConfig::default()
        };
        let with_slash = OtlpConfig {
            endpoint: Some("http://collector:4318/".to_string()),
            protocol: OtlpProtocol::HttpJson,
            ..OtlpConfig::default()
        };

        assert_eq!(with_path.traces_endpoint(), "http://collector:4318/v1/traces");
        assert_eq!(with_slash.metrics_endpoint(), "http://collector:4318/v1/metrics");
    }

    #[test]
    fn signal_path_in_base_is_replaced_for_other_signal() {
        let otlp = OtlpConfig {
            endpoint: Some("http://collector:4318/v1/traces/".to_string()),
            protocol: OtlpProtocol::HttpProtobuf,
            ..OtlpConfig::default()
        };

        assert_eq!(otlp.traces_endpoint(), "http://collector:4318/v1/traces");
        assert_eq!(otlp.metrics_endpoint(), "http://collector:4318/v1/metrics");
    }

    #[test]
    fn from_lookup_reads_service_identity() {
        let config = TelemetryConfig::from_lookup(map_lookup(&[
            ("OTEL_SERVICE_NAME", "from-service-name"),
            ("OTEL_SERVICE_VERSION", "9.9.9"),
        ]))
        .unwrap();

        assert_eq!(config.service_name, "from-service-name");
        assert_eq!(config.service_version, "9.9.9");
    }

    #[test]
    fn service_name_variable_wins_over_resource_attribute() {
        let config = TelemetryConfig::from_lookup(map_lookup(&[
            ("OTEL_SERVICE_NAME", "from-service-name"),
            ("OTEL_RESOURCE_ATTRIBUTES", "service.name=from-attrs"),
        ]))
        .unwrap();

        assert_eq!(config.service_name, "from-service-name");
    }

    #[test]
    fn service_name_falls_back_to_resource_attribute() {
        let config = TelemetryConfig::from_lookup(map_lookup(&[(
            "OTEL_RESOURCE_ATTRIBUTES",
            "team=obs,service.name=from-attrs",
        )]))
        .unwrap();

        assert_eq!(config.service_name, "from-attrs");
    }
}
