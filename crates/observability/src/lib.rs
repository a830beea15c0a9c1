//! Process-wide logging setup shared by the binaries.

/// Initialize tracing with the default `info` filter.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    subscriber::init("info");
}

/// Initialize tracing with `default_filter` when `RUST_LOG` is unset.
pub fn init_with_default(default_filter: &str) {
    subscriber::init(default_filter);
}

/// Subscriber configuration (filters, layers).
pub mod subscriber;
