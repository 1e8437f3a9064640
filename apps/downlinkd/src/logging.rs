//! Tracing subscriber setup

/// Initialize tracing for console output.
///
/// `RUST_LOG` takes precedence when set; the `--debug` flag raises the
/// default filter for this binary's crates without touching dependencies.
pub fn init_tracing(debug_enabled: bool) {
    let default_filter = if debug_enabled {
        "info,downlink=debug,downlinkd=debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}
