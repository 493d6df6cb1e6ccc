pub mod plan;
pub mod sync;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use mdnotion_client::NotionClient;
use mdnotion_core::Config;

/// Read the environment and install logging. Nothing touches the network
/// before this succeeds.
pub(crate) fn setup() -> Result<Config> {
    let config = Config::from_env().context("invalid configuration")?;
    init_tracing(config.debug);
    Ok(config)
}

/// `RUST_LOG` wins; otherwise `DEBUG` selects between `debug` and `info`.
/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub(crate) fn client(config: &Config) -> NotionClient {
    match config.api_url.as_deref() {
        Some(url) => NotionClient::with_base_url(url, config.token.clone()),
        None => NotionClient::new(config.token.clone()),
    }
}
