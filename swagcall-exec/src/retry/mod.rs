mod config;
mod decision;
mod lockout;

pub use config::{ErrorLimitConfig, RetryConfig};
pub use decision::{backoff_delay, classify_failure, FailureClass};
pub use lockout::{Lockout, LOCKOUT_MESSAGE, MAX_LOCKOUT};
