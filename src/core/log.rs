use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is not set. Only `xrate` spans and events are
/// raised to debug; dependencies stay at warn.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "warn,xrate=debug" } else { "warn,xrate=warn" }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Installs the global subscriber writing compact, timeless lines to stderr.
pub fn init_logging(verbose: bool) {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .without_time()
                .with_target(verbose)
                .with_writer(std::io::stderr),
        )
        .with(env_filter(verbose))
        .init();
}
