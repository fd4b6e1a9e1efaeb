use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber.
///
/// Events go to stderr so that stdout carries only the CSV result. The level
/// comes from `RUST_LOG` and defaults to `warn`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
