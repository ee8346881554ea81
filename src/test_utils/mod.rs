//! Test utilities for BWC.
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration test target.
//!
//! - [`MockRunner`]: an in-memory [`ProcessRunner`](crate::process::ProcessRunner)
//!   that records every invocation and replays scripted outputs
//! - [`init_test_logging`]: one-time tracing setup for tests

pub mod mock_runner;

pub use mock_runner::{MockRunner, RecordedCall};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging stays
/// off. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=mcp=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
