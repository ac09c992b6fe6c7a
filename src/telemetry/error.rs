use thiserror::Error;

use crate::settings::InvalidSetting;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Exporter error: {0}")]
    Exporter(String),
    #[error("Initialization error: {0}")]
    Init(String),
    #[error("Shutdown error: {0}")]
    Shutdown(String),
    #[error(transparent)]
    Setting(#[from] InvalidSetting),
}

impl From<opentelemetry_otlp::ExporterBuildError> for TelemetryError {
    fn from(err: opentelemetry_otlp::ExporterBuildError) -> Self {
        Self::Exporter(err.to_string())
    }
}

impl From<opentelemetry_sdk::error::OTelSdkError> for TelemetryError {
    fn from(err: opentelemetry_sdk::error::OTelSdkError) -> Self {
        Self::Shutdown(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_error_is_transparent() {
        let err: TelemetryError =
            InvalidSetting::new("LOG_FORMAT", "xml", "unknown log format").into();

        assert_eq!(
            err.to_string(),
            r#"invalid value "xml" for LOG_FORMAT: unknown log format"#
        );
    }

    #[test]
    fn exporter_error_display() {
        let err = TelemetryError::Exporter("no endpoint".to_string());

        assert_eq!(err.to_string(), "Exporter error: no endpoint");
    }
}
