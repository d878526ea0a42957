use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use crate::infrastructure::config::Environment;

const DEFAULT_DIRECTIVES: &str = "info,wl_server=debug";

/// `RUST_LOG` when it parses, the crate default otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Installs the global subscriber: JSON lines in prod, human-readable in dev.
pub fn init_logging(environment: Environment) -> anyhow::Result<()> {
    let filter = log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    match environment {
        Environment::Prod => tracing::subscriber::set_global_default(builder.json().finish()),
        Environment::Dev => tracing::subscriber::set_global_default(builder.compact().finish()),
    }
    .context("a global tracing subscriber is already installed")
}
