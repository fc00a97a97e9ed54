//! Tracing initialization and subscriber setup.
//!
//! The pipeline runs from `tracing` macros through an `EnvFilter` and the
//! OpenTelemetry layer into the file exporter:
//!
//! ```text
//! tracing → EnvFilter(trace_level) → tracing-opentelemetry → OtlpFileExporter → JSON file
//! ```

use super::export;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const TRACE_FILE_NAME: &str = "cinematch-otlp.json";

/// Installs the global subscriber writing to
/// `~/.local/share/zellij/cinematch/cinematch-otlp.json`.
///
/// Tracing is optional: if the data directory cannot be created nothing is
/// installed. Later calls are no-ops.
pub fn init_tracing(config: &Config) {
    let data_dir = crate::infrastructure::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", "CineMatch")]);
    let provider = export::create_tracer_provider(data_dir.join(TRACE_FILE_NAME), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(export::SCOPE_NAME));

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new(&config.trace_level))
        .with(otel_layer);

    let _ = subscriber.try_init();
}
