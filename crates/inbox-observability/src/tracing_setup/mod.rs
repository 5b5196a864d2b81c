//! Tracing setup: structured logging with span definitions.

pub mod spans;

use std::sync::Once;

use inbox_core::config::ObservabilityConfig;
use inbox_core::constants::LOG_ENV_VAR;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the tracing subscriber with human-readable output.
///
/// Respects the `INBOX_LOG` environment variable for filtering.
/// Defaults to `inbox=info` if not set. Idempotent.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("inbox=info"));
        install(filter, false);
    });
}

/// Initialize tracing with a custom filter string (for testing or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    let filter = EnvFilter::new(filter);
    INIT.call_once(|| install(filter, false));
}

/// Initialize tracing from the observability config section.
///
/// `INBOX_LOG` still wins over `log_level` when set.
pub fn init_from_config(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
        install(filter, config.json);
    });
}

fn install(filter: EnvFilter, json: bool) {
    let registry = tracing_subscriber::registry().with(filter);
    // try_init: another subscriber may already be set by the embedding process.
    let result = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init()
    };
    if let Err(e) = result {
        tracing::debug!(error = %e, "tracing subscriber already installed");
    }
}
