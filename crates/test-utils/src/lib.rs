pub mod builders;
pub mod fake_supervisor;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

/// Upper bound for any single async test step. Escalation tests wait out
/// their grace window, so this is well above the longest one.
pub const TEST_DEADLINE: Duration = Duration::from_secs(30);

static TRACING: Once = Once::new();

/// Route `tracing` output into the test harness capture.
///
/// `RUST_LOG` picks the filter; without it the crate logs at debug so a
/// failing test shows the phase transitions that led there.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,cronwrap=debug"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .init();
    });
}

/// Await `f`, panicking if it outlives [`TEST_DEADLINE`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_DEADLINE, f).await {
        Ok(value) => value,
        Err(_) => panic!("test step exceeded {TEST_DEADLINE:?}"),
    }
}
