//! OpenTelemetry-based observability with file-based trace export.
//!
//! Spans recorded with `tracing` are bridged into OpenTelemetry and written as
//! OTLP JSON to `~/.local/share/zellij/cinematch/cinematch-otlp.json`, rotating
//! at 10 MB and keeping three backups. The filter directive comes from the
//! `trace_level` plugin option (default `info`).
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`export`]: OTLP JSON encoding and the span exporter
//! - [`file_writer`]: Rotating file writer

mod export;
mod file_writer;
mod init;

pub use init::init_tracing;
