use std::collections::HashMap;

use opentelemetry_otlp::{
    MetricExporter, Protocol, SpanExporter, WithExportConfig, WithHttpConfig, WithTonicConfig,
};
use tonic::metadata::{Ascii, MetadataKey, MetadataMap, MetadataValue};
use tracing::info;

use crate::telemetry::config::{HttpSender, OtlpConfig, OtlpProtocol};
use crate::telemetry::error::TelemetryError;

/// Map our protocol setting onto the exporter's
pub fn wire_protocol(protocol: OtlpProtocol) -> Protocol {
    match protocol {
        OtlpProtocol::Grpc => Protocol::Grpc,
        OtlpProtocol::HttpProtobuf => Protocol::HttpBinary,
        OtlpProtocol::HttpJson => Protocol::HttpJson,
    }
}

/// Convert configured headers into gRPC metadata
pub fn grpc_metadata(headers: &[(String, String)]) -> Result<MetadataMap, TelemetryError> {
    let mut metadata = MetadataMap::new();
    for (name, value) in headers {
        let key = MetadataKey::<Ascii>::from_bytes(name.to_ascii_lowercase().as_bytes())
            .map_err(|e| TelemetryError::Config(format!("Invalid header name {name:?}: {e}")))?;
        let value = MetadataValue::try_from(value.as_str())
            .map_err(|e| TelemetryError::Config(format!("Invalid value for header {name}: {e}")))?;
        metadata.insert(key, value);
    }
    Ok(metadata)
}

fn http_headers(headers: &[(String, String)]) -> HashMap<String, String> {
    headers.iter().cloned().collect()
}

/// Attach the configured HTTP sender to an OTLP/HTTP builder
fn with_sender<B>(builder: B, otlp: &OtlpConfig) -> Result<B, TelemetryError>
where
    B: WithHttpConfig,
{
    match otlp.sender {
        HttpSender::Default => Ok(builder),
        #[cfg(feature = "otlp-custom-sender")]
        HttpSender::Custom => Ok(builder.with_http_client(super::sender::custom_http_client(otlp)?)),
        #[cfg(not(feature = "otlp-custom-sender"))]
        HttpSender::Custom => Err(TelemetryError::Config(
            "custom HTTP sender requires the `otlp-custom-sender` feature".to_string(),
        )),
    }
}

/// Build the OTLP span exporter for the configured transport
pub fn build_span_exporter(otlp: &OtlpConfig) -> Result<SpanExporter, TelemetryError> {
    let endpoint = otlp.traces_endpoint();

    let exporter = match otlp.protocol {
        OtlpProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint.clone())
            .with_timeout(otlp.timeout)
            .with_metadata(grpc_metadata(&otlp.headers)?)
            .build()?,
        protocol => {
            let builder = SpanExporter::builder()
                .with_http()
                .with_endpoint(endpoint.clone())
                .with_protocol(wire_protocol(protocol))
                .with_timeout(otlp.timeout)
                .with_headers(http_headers(&otlp.headers));
            with_sender(builder, otlp)?.build()?
        }
    };

    info!(
        endpoint = %endpoint,
        protocol = otlp.protocol.as_str(),
        sender = otlp.sender.as_str(),
        "OTLP span exporter configured"
    );
    Ok(exporter)
}

/// Build the OTLP metric exporter for the configured transport
pub fn build_metric_exporter(otlp: &OtlpConfig) -> Result<MetricExporter, TelemetryError> {
    let endpoint = otlp.metrics_endpoint();

    let exporter = match otlp.protocol {
        OtlpProtocol::Grpc => MetricExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint.clone())
            .with_timeout(otlp.timeout)
            .with_metadata(grpc_metadata(&otlp.headers)?)
            .build()?,
        protocol => {
            let builder = MetricExporter::builder()
                .with_http()
                .with_endpoint(endpoint.clone())
                .with_protocol(wire_protocol(protocol))
                .with_timeout(otlp.timeout)
                .with_headers(http_headers(&otlp.headers));
            with_sender(builder, otlp)?.build()?
        }
    };

    info!(
        endpoint = %endpoint,
        protocol = otlp.protocol.as_str(),
        sender = otlp.sender.as_str(),
        "OTLP metric exporter configured"
    );
    Ok(exporter)
}
