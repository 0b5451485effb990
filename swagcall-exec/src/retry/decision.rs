use std::time::Duration;

use crate::retry::config::RetryConfig;
use crate::transport::{TransportError, TransportErrorKind};

const TERMINAL_SIGNATURES: &[&str] = &["Invalid body", "failed to coerce value"];

const RETRYABLE_SIGNATURES: &[&str] = &[
    "Timeout",
    "ENOTFOUND",
    "ECONNRESET",
    "EAI_AGAIN",
    "Bad Gateway",
    "Service Unavailable",
    "Failed to fetch access data",
    JWK_SIGNATURE,
];

/// SSO failure that rarely clears on repetition.
const JWK_SIGNATURE: &str = "no JWK available for datasource";

/// Legacy upstream defect around the `star_id` field.
const STAR_ID_SIGNATURE: &str = "'star_id'";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Caller bug; retrying cannot help.
    Terminal,
    /// Known upstream defect; answer with the payload embedded in the error.
    StarIdWorkaround,
    /// Transient; `single_retry` caps the budget at one retry.
    Retryable { single_retry: bool },
    /// Anything else; surfaced as is.
    Unrecognized,
}

pub fn classify_failure(err: &TransportError) -> FailureClass {
    let msg = err.message.as_str();
    if TERMINAL_SIGNATURES.iter().any(|s| msg.contains(s)) {
        return FailureClass::Terminal;
    }
    if msg.contains(STAR_ID_SIGNATURE) {
        return FailureClass::StarIdWorkaround;
    }

    let transient_kind = matches!(
        err.kind,
        TransportErrorKind::Timeout
            | TransportErrorKind::DnsNotFound
            | TransportErrorKind::DnsRetry
            | TransportErrorKind::ConnectionReset
            | TransportErrorKind::Status(502)
            | TransportErrorKind::Status(503)
    );
    if transient_kind || RETRYABLE_SIGNATURES.iter().any(|s| msg.contains(s)) {
        return FailureClass::Retryable {
            single_retry: msg.contains(JWK_SIGNATURE),
        };
    }
    FailureClass::Unrecognized
}

/// Wait before the attempt following `attempt` (1-based): nothing before the first retry.
pub fn backoff_delay(cfg: &RetryConfig, attempt: usize) -> Duration {
    cfg.backoff_step * (attempt.saturating_sub(1) as u32)
}
