//! Library surface behind the `crs` binary: configuration loading and
//! logging initialization, kept separate from `main.rs` so both are unit
//! testable without spawning a process.

pub mod config;

pub use config::Config;

/// Initialize the global `tracing` subscriber from `RUST_LOG`, defaulting to
/// `info` when unset. Safe to call once per process; a second call is a
/// no-op rather than a panic.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
