//! Tracing initialization for the harness.

use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lowshot_core::config::defaults;

static INIT: Once = Once::new();

/// Install the global subscriber. `LOWSHOT_LOG` wins over the `level`
/// flag, which wins over the compiled default. Safe to call more than
/// once; later calls are no-ops.
pub fn init_tracing(level: Option<&str>) {
    INIT.call_once(|| {
        let fallback = level.unwrap_or(defaults::DEFAULT_LOG_LEVEL);
        let filter =
            EnvFilter::try_from_env("LOWSHOT_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(filter)
            .init();
    });
}
