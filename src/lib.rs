pub mod config;
pub mod engine;
pub mod extraction;
pub mod interactions;
pub mod knowledge;
pub mod labs;
pub mod models;
pub mod resolver;

use tracing_subscriber::EnvFilter;

pub use engine::InteractionEngine;

/// Install the global tracing subscriber, honouring `RUST_LOG`.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let result = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();

    if result.is_ok() {
        tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_twice_is_harmless() {
        init_tracing();
        init_tracing();
    }
}
