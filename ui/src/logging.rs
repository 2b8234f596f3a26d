// Logging setup
use crate::config::Config;

/// Installs the process-wide logger. Safe to call more than once.
///
/// Native and server builds get a `tracing` subscriber filtered by
/// `RUST_LOG`, or by the configured filter when it is unset. Browser builds
/// only install the panic hook.
pub fn init_logging(config: &Config) {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = config;
        console_error_panic_hook::set_once();
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| config.log_filter.as_str().into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .try_init();
    }
}
