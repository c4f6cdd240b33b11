//! Logging setup.
//!
//! The subscriber is built into an explicit [`Dispatch`] owned by the
//! caller instead of being installed as the process-wide default. The
//! listener runs under it and attaches it to every connection task it spawns.

use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Builds the fmt dispatcher. `RUST_LOG` wins over `cfg.level` when set.
pub fn dispatch(cfg: &LoggingConfig) -> Dispatch {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .finish();

    Dispatch::new(subscriber)
}
