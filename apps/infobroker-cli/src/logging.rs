use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs the global subscriber, writing to stderr so stdout carries only answers.
///
/// `-v` raises the configured level to `debug`, `-vv` to `trace`; `RUST_LOG`
/// overrides both.
///
/// # Errors
/// Fails if a global subscriber is already set.
pub fn init(config: &LoggingConfig, verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => config.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
    .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))
}
