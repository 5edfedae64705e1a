//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered
//! by `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run      # load/mutation milestones
//! RUST_LOG=debug cargo run     # every command, ticket and payload
//! ```
//!
//! Log lines carry structured fields (`ticket`, `reason`, `page`, `id`) so a
//! single reload can be followed from the command that caused it to the
//! moment its result was committed or discarded as stale.

/// Initializes structured logging for the whole process.
///
/// Safe to call more than once; later calls are no-ops.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
