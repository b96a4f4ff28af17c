use anyhow::Context;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info";

/// Pick the log filter: `RUST_LOG`, then the config value, then [`DEFAULT_FILTER`].
pub fn filter(configured: Option<&str>) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directives = configured.unwrap_or(DEFAULT_FILTER);
    EnvFilter::try_new(directives).with_context(|| format!("invalid logging.filter: {directives}"))
}

/// Install the global `fmt` subscriber. Call once, before serving.
pub fn init(configured: Option<&str>) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(configured)?)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
