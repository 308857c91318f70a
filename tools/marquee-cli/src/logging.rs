//! Tracing subscriber setup.

use anyhow::{anyhow, Result};
use tracing_subscriber::{
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber. Logs go to stderr so command output stays
/// clean on stdout.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    match config.format {
        LogFormat::Compact => init_with_layer(
            config,
            verbose,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(true),
        ),
        LogFormat::Json => init_with_layer(
            config,
            verbose,
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_target(true),
        ),
    }
}

fn build_env_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { config.level.as_str() };
        EnvFilter::new(format!("{},hyper=warn,reqwest=warn,rustls=warn", level))
    })
}

fn init_with_layer<L>(config: &LoggingConfig, verbose: bool, fmt_layer: L) -> Result<()>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_env_filter(config, verbose))
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
}
