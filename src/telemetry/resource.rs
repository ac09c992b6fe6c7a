use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource::{PROCESS_PID, SERVICE_NAME, SERVICE_VERSION};

use crate::telemetry::config::TelemetryConfig;

/// Get base attributes for any resource
pub fn base_attributes(config: &TelemetryConfig) -> Vec<KeyValue> {
    vec![
        KeyValue::new(SERVICE_NAME, config.service_name.clone()),
        KeyValue::new(SERVICE_VERSION, config.service_version.clone()),
        KeyValue::new(PROCESS_PID, i64::from(std::process::id())),
    ]
}

/// Build the resource shared by the tracer and meter providers.
///
/// Configured extras go first so the base attributes win on a key clash:
/// `service.name` always reflects the resolved service name.
pub fn build_resource(config: &TelemetryConfig) -> Resource {
    let mut attrs: Vec<KeyValue> = config
        .resource_attributes
        .iter()
        .map(|(key, value)| KeyValue::new(key.clone(), value.clone()))
        .collect();
    attrs.extend(base_attributes(config));
    Resource::builder().with_attributes(attrs).build()
}
