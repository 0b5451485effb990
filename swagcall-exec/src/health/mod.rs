mod feed;
mod monitor;

pub use feed::{build_snapshot, feed_operation_id, HealthSnapshot, StatusRecord};
pub use monitor::HealthMonitor;
