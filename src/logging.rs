//! Tracing subscriber setup for the command-line tool.

use std::sync::Once;

use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` is used. Later calls
/// are ignored.
pub fn init_tracing(default_level: &str, json: bool) {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        let registry = tracing_subscriber::registry().with(env_filter);
        if json {
            registry
                .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
                .init();
        } else {
            registry
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .init();
        }

        debug!(json, "tracing initialized");
    });
}
