//! Tracing and logging (shared setup).

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize with human-readable output instead of JSON, for CLIs.
pub fn init_pretty() {
    tracing::init_pretty();
}

/// Tracing configuration (filters, formatting).
pub mod tracing;
