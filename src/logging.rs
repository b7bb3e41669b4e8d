//! Logging setup for the miner
//!
//! `RUST_LOG` takes precedence; otherwise the level follows the configured
//! verbosity.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map a config verbosity to a default filter directive
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber
///
/// An already installed subscriber is kept and a warning is emitted through it.
pub fn init(verbosity: u8) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(true))
        .try_init();

    if let Err(e) = installed {
        tracing::warn!(error = %e, "logging already initialized, keeping existing subscriber");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        assert_eq!(level_for(0), "error");
        assert_eq!(level_for(2), "info");
        assert_eq!(level_for(9), "trace");
    }

    #[test]
    fn test_init_twice_keeps_first_subscriber() {
        init(2);
        init(4);
        tracing::info!("still logging");
    }
}
