use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Reads per-target log levels from `LIGHTHOUSE_LOG`, e.g.
/// `LIGHTHOUSE_LOG=lighthouse::services::simulation=debug`. Falls back to
/// `lighthouse=warn`. Logs go to stderr, reports stay on stdout.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("LIGHTHOUSE_LOG")
            .unwrap_or_else(|_| EnvFilter::new("lighthouse=warn"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init();
    });
}
