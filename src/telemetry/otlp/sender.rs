use std::thread;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::telemetry::config::OtlpConfig;
use crate::telemetry::error::TelemetryError;

/// Header stamped on every request sent through the custom sender. The
/// exporter overwrites `User-Agent`, so identification travels here.
pub const SENDER_HEADER: &str = "x-otlp-sender";
pub const SENDER_HEADER_VALUE: &str = "custom";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const TCP_KEEPALIVE: Duration = Duration::from_secs(30);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Headers attached by the custom sender to every request
pub fn sender_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(SENDER_HEADER),
        HeaderValue::from_static(SENDER_HEADER_VALUE),
    );
    headers
}

/// Build the alternate OTLP/HTTP sender: a blocking client with its own
/// connection handling (connect timeout, keep-alive, idle pool expiry) and
/// the [`SENDER_HEADER`] default header.
///
/// The blocking client owns an internal runtime, so it is built on a plain
/// thread; constructing it on an async worker thread panics.
pub fn custom_http_client(otlp: &OtlpConfig) -> Result<reqwest::blocking::Client, TelemetryError> {
    let timeout = otlp.timeout;

    thread::spawn(move || {
        reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .tcp_keepalive(TCP_KEEPALIVE)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .default_headers(sender_headers())
            .build()
    })
    .join()
    .map_err(|_| TelemetryError::Exporter("HTTP client builder thread panicked".to_string()))?
    .map_err(|e| TelemetryError::Exporter(format!("Failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_headers_identify_custom_sender() {
        let headers = sender_headers();

        assert_eq!(
            headers.get(SENDER_HEADER).and_then(|v| v.to_str().ok()),
            Some("custom")
        );
    }

    #[test]
    fn custom_client_builds() {
        let result = custom_http_client(&OtlpConfig::default());

        assert!(result.is_ok());
    }

    #[test]
    fn custom_client_builds_with_short_timeout() {
        let otlp = OtlpConfig {
            timeout: Duration::from_millis(100),
            ..OtlpConfig::default()
        };

        assert!(custom_http_client(&otlp).is_ok());
    }
}
