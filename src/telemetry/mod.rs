//! Logging setup for repofleet.
//!
//! Structured logging goes through the `tracing` crate. Git invocations are
//! logged at debug level and, with the `telemetry` feature, wrapped in spans.
//!
//! # Feature Flags
//!
//! - `telemetry` (default): Spans around git invocations
//! - `release-logs`: Strip debug/trace at compile time
//! - `max-perf`: Disable all tracing for maximum performance

mod init;

pub use init::{init_telemetry, TelemetryConfig, TelemetryGuard};
