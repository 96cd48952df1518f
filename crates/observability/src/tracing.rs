//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Default directive: the domain crates log at info, everything else is
/// quiet unless `RUST_LOG` says otherwise.
const DEFAULT_FILTER: &str = "info";

/// Initialize tracing/logging for the process, honoring `RUST_LOG`.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with(DEFAULT_FILTER);
}

/// Like [`init`], with an explicit fallback filter for when `RUST_LOG` is
/// unset (e.g. `"tallyworks_mail=debug,info"` to watch mail dispatch).
pub fn init_with(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    // JSON lines with targets kept, so per-crate directives stay usable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(true)
        .try_init();
}
