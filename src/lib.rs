pub mod api;
pub mod config;
pub mod intelligence;
pub mod interview;
pub mod models;
pub mod pipeline;
pub mod session;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// built-in filter. Diagnostics go to stderr so stdout stays clean for
/// the interview and `analyze` output.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
