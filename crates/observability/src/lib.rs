//! Tracing and logging (shared setup).

/// Initialize process-wide logging with an `info` default, in the format
/// named by `SIMPLEREST_LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    init_with_default("info");
}

/// Initialize with an explicit default filter directive (e.g. `"debug"`),
/// still overridable through `RUST_LOG`.
pub fn init_with_default(directive: &str) {
    tracing::install(directive, tracing::LogFormat::from_env());
}

pub mod tracing;

pub use tracing::LogFormat;
