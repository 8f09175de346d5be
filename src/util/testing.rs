//! Tracing setup shared by unit and integration tests.

use std::sync::Once;

use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TEST_SETUP: Once = Once::new();

/// Install a test subscriber once per process.
///
/// Honors `RUST_LOG`, defaults to `dtree=trace`. Output goes through the
/// test writer so it is captured unless `--nocapture` is given.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dtree=trace"));

        let layer = fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_filter(env_filter);

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            eprintln!("tracing subscriber already installed");
        }
        debug!("test setup complete");
    });
}
