use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

// sqlx logs every statement at info.
const QUIET_DIRECTIVES: &str = "sqlx=warn";

/// `RUST_LOG` wins over the configured level when both are set.
pub fn init_logging(default_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!("{default_level},{QUIET_DIRECTIVES}"))
            .unwrap_or_else(|_| EnvFilter::new(format!("info,{QUIET_DIRECTIVES}"))),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init blog-server logging: {e}"))?;

    Ok(())
}
