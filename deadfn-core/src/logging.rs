//! Structured logging setup using **tracing**.
//!
//! All engine logs go to stderr so stdout stays clean for the diagnostic
//! stream. The JSON subscriber gives machine-readable events; `RUST_LOG`
//! controls filtering (e.g. `RUST_LOG=deadfn_core=debug` to see each TU's
//! Defs/Uses/ExternalUses sets).

/// Initializes the global tracing collector (subscriber).
///
/// Call once at the beginning of the process. Safe to call before any
/// parallel work starts; the subscriber is shared by all worker threads.
pub fn init_structured_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
