use ferrous_shield_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

/// Logged once the subscriber exists, so the summary is not lost.
pub fn log_config(config_path: Option<&str>, config: &Config) {
    info!(
        config_file = config_path.unwrap_or("default"),
        tunnel = %config.tunnel.name,
        upstream = %config.upstream.address,
        workers = config.upstream.workers,
        database = %config.database.path,
        "Configuration loaded"
    );
}
