//! Log output for the binary.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter from `RUST_LOG`, or `default_level` when it is unset.
pub fn env_filter(default_level: &str) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(default_level)?),
    }
}

/// Install the global subscriber. Logs go to stderr so answers on stdout stay clean.
pub fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(default_level)?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()?;
    Ok(())
}
