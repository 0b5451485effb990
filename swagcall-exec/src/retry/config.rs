use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts per call, the first one included.
    pub max_attempts: usize,
    /// Delay unit; the wait before attempt `n + 1` is `(n - 1) * backoff_step`.
    pub backoff_step: Duration,
    pub error_limit: ErrorLimitConfig,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_millis(500),
            error_limit: ErrorLimitConfig::default(),
        }
    }
}

/// How the upstream advertises its error budget.
#[derive(Debug, Clone)]
pub struct ErrorLimitConfig {
    /// Errors left in the current window.
    pub remain_header: String,
    /// Minutes until the window resets.
    pub reset_header: String,
    /// Arm the lockout once the remaining budget drops to this value or below.
    pub threshold: u64,
    /// Lockout applied when the error text says the limit was exceeded.
    pub signature_lockout: Duration,
}

impl Default for ErrorLimitConfig {
    fn default() -> Self {
        Self {
            remain_header: "x-esi-error-limit-remain".to_string(),
            reset_header: "x-esi-error-limit-reset".to_string(),
            threshold: 2,
            signature_lockout: Duration::from_secs(60),
        }
    }
}
