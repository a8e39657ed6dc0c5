pub mod nodes;

pub use nodes::disperser::{DisperserMode, FakeDisperser};
pub use nodes::proxy::ProxyNode;

// std
use std::time::Duration;

/// Scale a timeout for slow CI machines, see `SLOW_TEST_ENV`.
pub fn adjust_timeout(d: Duration) -> Duration {
    if std::env::var("SLOW_TEST_ENV").is_ok_and(|s| s == "true") {
        d.saturating_mul(2)
    } else {
        d
    }
}
