//! Tracing subscriber setup.
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Settings;

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn init_tracing(settings: &Settings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);
    if settings.log_json {
        registry.with(fmt::layer().json()).try_init()?;
    } else {
        registry.with(fmt::layer()).try_init()?;
    }
    Ok(())
}

/// Log the settings that are insecure out of the box
pub fn warn_insecure_defaults(settings: &Settings) {
    if settings.uses_default_secret() {
        tracing::warn!(
            "token.secret is the compiled-in default; anyone can forge tokens. \
             Set JOBBOARD_TOKEN__SECRET before exposing this server"
        );
    }
    if settings.uses_default_superuser() {
        tracing::warn!(
            email = %settings.superuser.email,
            "superuser password is the compiled-in default"
        );
    }
}
