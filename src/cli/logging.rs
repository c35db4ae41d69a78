//! Logging bootstrap

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Default filter directive for a configured level
pub fn default_directive(level: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { level };
    format!("voice_timeline={},warn", level)
}

/// Initialize stderr logging. `RUST_LOG` wins over the configured level.
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init_logging(level: &str, verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level, verbose)));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_thread_ids(false)
        .with_filter(env_filter);

    if tracing_subscriber::registry()
        .with(stderr_layer)
        .try_init()
        .is_ok()
    {
        tracing::debug!(level, verbose, "logging initialized");
    }
}
