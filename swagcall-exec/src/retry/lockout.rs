use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::Instant;

use crate::error::CallError;
use crate::retry::config::ErrorLimitConfig;
use crate::transport::get_header_ci;

pub const LOCKOUT_MESSAGE: &str = "Too many errors. Upstream is locked for";

const EXCEEDED_SIGNATURE: &str = "This software has exceeded the error limit for ESI";

/// Upper bound on any lockout window, whatever the reset header claims.
pub const MAX_LOCKOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Instance-wide backpressure window armed when the upstream error budget runs out.
///
/// Every call checks it before touching the network. The deadline is a whole value
/// that is overwritten, never adjusted, so concurrent callers only race on which
/// write lands last.
#[derive(Debug)]
pub struct Lockout {
    cfg: ErrorLimitConfig,
    until: Mutex<Option<Instant>>,
}

impl Lockout {
    pub fn new(cfg: ErrorLimitConfig) -> Self {
        Self {
            cfg,
            until: Mutex::new(None),
        }
    }

    /// Fails while the lockout is active; clears it once the deadline has passed.
    pub fn check(&self) -> Result<(), CallError> {
        let mut until = self.until.lock().unwrap_or_else(|e| e.into_inner());
        let Some(deadline) = *until else {
            return Ok(());
        };
        let now = Instant::now();
        if deadline <= now {
            *until = None;
            return Ok(());
        }
        let minutes = (deadline - now).as_secs().div_ceil(60).max(1);
        Err(CallError::error(format!("{LOCKOUT_MESSAGE} {minutes} min")))
    }

    /// Arms the lockout when the remaining budget header is at or below the threshold.
    pub fn observe_headers(&self, headers: &BTreeMap<String, String>) -> bool {
        let Some(remain) = get_header_ci(headers, &self.cfg.remain_header)
            .and_then(|v| v.trim().parse::<u64>().ok())
        else {
            return false;
        };
        if remain > self.cfg.threshold {
            return false;
        }
        let reset_minutes = get_header_ci(headers, &self.cfg.reset_header)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0);
        self.arm_for(Duration::from_secs(reset_minutes.saturating_mul(60)));
        true
    }

    /// Arms the fixed lockout when the error text says the budget was exceeded.
    pub fn observe_message(&self, message: &str) -> bool {
        if !message.contains(EXCEEDED_SIGNATURE) {
            return false;
        }
        self.arm_for(self.cfg.signature_lockout);
        true
    }

    /// Locks for `window`, capped at [`MAX_LOCKOUT`].
    pub fn arm_for(&self, window: Duration) {
        let mut until = self.until.lock().unwrap_or_else(|e| e.into_inner());
        *until = Some(Instant::now() + window.min(MAX_LOCKOUT));
    }

    pub fn clear(&self) {
        let mut until = self.until.lock().unwrap_or_else(|e| e.into_inner());
        *until = None;
    }

    pub fn is_active(&self) -> bool {
        self.remaining().is_some()
    }

    pub fn remaining(&self) -> Option<Duration> {
        let until = self.until.lock().unwrap_or_else(|e| e.into_inner());
        let deadline = (*until)?;
        let now = Instant::now();
        (deadline > now).then(|| deadline - now)
    }

    /// Deadline as epoch seconds, if a lockout is active.
    pub fn locked_until(&self) -> Option<u64> {
        let remaining = self.remaining()?;
        let deadline = SystemTime::now() + remaining;
        deadline.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(remain: &str, reset: &str) -> BTreeMap<String, String> {
        let mut h = BTreeMap::new();
        h.insert("X-Esi-Error-Limit-Remain".to_string(), remain.to_string());
        h.insert("X-Esi-Error-Limit-Reset".to_string(), reset.to_string());
        h
    }

    #[test]
    fn healthy_budget_does_not_arm() {
        let lockout = Lockout::new(ErrorLimitConfig::default());
        assert!(!lockout.observe_headers(&headers("100", "30")));
        assert!(!lockout.observe_headers(&headers("abc", "30")));
        assert!(lockout.check().is_ok());
    }

    #[test]
    fn low_budget_arms_for_reset_minutes() {
        let lockout = Lockout::new(ErrorLimitConfig::default());
        assert!(lockout.observe_headers(&headers("2", "3")));
        let err = lockout.check().unwrap_err();
        assert!(err.message.starts_with(LOCKOUT_MESSAGE));
        assert!(err.message.ends_with("3 min"), "{}", err.message);
        assert!(lockout.locked_until().is_some());
    }

    #[test]
    fn exceeded_signature_arms_fixed_window() {
        let lockout = Lockout::new(ErrorLimitConfig::default());
        assert!(lockout.observe_message(
            "This software has exceeded the error limit for ESI. If you are a user, please contact the maintainer"
        ));
        let remaining = lockout.remaining().unwrap();
        assert!(remaining <= Duration::from_secs(60) && remaining > Duration::from_secs(55));
    }

    #[test]
    fn oversized_reset_is_capped() {
        let lockout = Lockout::new(ErrorLimitConfig::default());
        assert!(lockout.observe_headers(&headers("0", "300000000000000000")));
        assert!(lockout.remaining().unwrap() <= MAX_LOCKOUT);

        assert!(lockout.observe_headers(&headers("1", &u64::MAX.to_string())));
        let err = lockout.check().unwrap_err();
        assert!(err.message.ends_with("1440 min"), "{}", err.message);
    }

    #[test]
    fn zero_reset_expires_immediately() {
        let lockout = Lockout::new(ErrorLimitConfig::default());
        assert!(lockout.observe_headers(&headers("0", "0")));
        assert!(lockout.check().is_ok());
        assert!(!lockout.is_active());
    }
}
