use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "camera_finalize=debug";

/// Installs the compact stdout subscriber used by the plugin shells.
///
/// `RUST_LOG` overrides the default filter. Calling this more than once, or
/// after the host installed its own subscriber, is a no-op; returns whether
/// this call installed the subscriber.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false)
        .with_ansi(true)
        .with_writer(std::io::stdout)
        .compact()
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("Logging initialized");
    }
    installed
}
