//! Telemetry initialization.
//!
//! Provides configuration and initialization for the tracing subscriber.

use std::ffi::OsString;

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Configuration for telemetry initialization.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Level used when `RUST_LOG` is not set
    pub default_level: Level,
    /// Whether to include the target (module path)
    pub include_target: bool,
    /// Whether to use ANSI colors
    pub ansi_colors: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_level: Level::WARN,
            include_target: false,
            ansi_colors: true,
        }
    }
}

impl TelemetryConfig {
    /// Configuration for `--verbose`: every git invocation is logged.
    pub fn verbose() -> Self {
        Self {
            default_level: Level::DEBUG,
            include_target: true,
            ..Self::default()
        }
    }

    /// Pick the configuration for the CLI flags and environment
    pub fn for_cli(verbose: bool) -> Self {
        let config = if verbose {
            Self::verbose()
        } else {
            Self::default()
        };
        Self {
            ansi_colors: ansi_enabled(std::env::var_os("NO_COLOR")),
            ..config
        }
    }

    /// Directives applied when `RUST_LOG` is unset or empty
    pub fn default_directives(&self) -> String {
        let level = self.default_level.as_str().to_ascii_lowercase();
        format!("warn,repofleet={}", level)
    }
}

/// Colors stay on unless `NO_COLOR` is set to a non-empty value.
fn ansi_enabled(no_color: Option<OsString>) -> bool {
    no_color.map_or(true, |value| value.is_empty())
}

/// Build the event filter. Non-empty `env_directives` (the value of
/// `RUST_LOG`) replace the configured defaults entirely.
pub fn build_filter(
    config: &TelemetryConfig,
    env_directives: Option<&str>,
) -> anyhow::Result<EnvFilter> {
    let directives = match env_directives.map(str::trim) {
        Some(env) if !env.is_empty() => env.to_string(),
        _ => config.default_directives(),
    };
    Ok(EnvFilter::try_new(directives)?)
}

/// Guard that keeps the telemetry subscriber active.
pub struct TelemetryGuard {
    #[allow(dead_code)]
    _private: (),
}

/// Initialize telemetry with the given configuration.
///
/// Events are written to stderr; stdout is reserved for reports. `RUST_LOG`,
/// when set, takes precedence over the configured level.
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(config, env.as_deref())?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .compact();

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(TelemetryGuard { _private: () })
}
