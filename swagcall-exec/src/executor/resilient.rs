use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::error::CallError;
use crate::executor::{Event, EventSink, LogLevel, LogSink};
use crate::retry::{backoff_delay, classify_failure, FailureClass, Lockout, RetryConfig};
use crate::transport::{RequestDescriptor, Response, Transport, TransportError};

/// Expiry stamped on responses synthesized by the `star_id` workaround.
const STAR_ID_EXPIRY: Duration = Duration::from_secs(60 * 60);

/// Sends one logical call with bounded retries and the shared error-limit lockout.
///
/// Dropping the returned future stops further attempts at the next await point,
/// but a request already handed to the transport is not recalled.
pub struct ResilientTransport {
    transport: Arc<dyn Transport>,
    events: Arc<dyn EventSink>,
    log: Arc<dyn LogSink>,
    lockout: Arc<Lockout>,
    cfg: RetryConfig,
}

impl ResilientTransport {
    pub fn new(
        transport: Arc<dyn Transport>,
        events: Arc<dyn EventSink>,
        log: Arc<dyn LogSink>,
        lockout: Arc<Lockout>,
        cfg: RetryConfig,
    ) -> Self {
        Self {
            transport,
            events,
            log,
            lockout,
            cfg,
        }
    }

    pub fn lockout(&self) -> &Arc<Lockout> {
        &self.lockout
    }

    pub async fn execute(
        &self,
        operation_id: &str,
        req: &RequestDescriptor,
    ) -> Result<Response, CallError> {
        let mut max_attempts = self.cfg.max_attempts.max(1);
        let mut attempt = 1usize;

        loop {
            // Lockout rejections never reach the network and are not reported.
            self.lockout.check()?;

            self.events
                .emit(Event::Direct {
                    operation_id: operation_id.to_string(),
                })
                .await;

            let err = match self.transport.send(req.clone()).await {
                Ok(resp) => {
                    self.lockout.observe_headers(&resp.headers);
                    return Ok(resp);
                }
                Err(err) => err,
            };

            self.events
                .emit(Event::Error {
                    operation_id: operation_id.to_string(),
                })
                .await;

            if let Some(headers) = &err.headers {
                self.lockout.observe_headers(headers);
            }
            let failure = self.surface(&err);
            self.lockout.observe_message(&failure.message);

            match classify_failure(&err) {
                FailureClass::Terminal | FailureClass::Unrecognized => return Err(failure),
                FailureClass::StarIdWorkaround => {
                    self.log.log(
                        LogLevel::Warning,
                        &format!("star_id workaround applied for {operation_id}: {}", err.message),
                    );
                    return Ok(star_id_response(&err));
                }
                FailureClass::Retryable { single_retry } => {
                    if single_retry {
                        max_attempts = max_attempts.min(attempt + 1);
                    }
                    if attempt >= max_attempts {
                        return Err(failure);
                    }
                    let delay = backoff_delay(&self.cfg, attempt);
                    tracing::debug!(
                        operation_id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err.message,
                        "retrying transient failure"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// Caller-facing error, with the remaining error budget appended when known.
    fn surface(&self, err: &TransportError) -> CallError {
        match err.header(&self.cfg.error_limit.remain_header) {
            Some(remain) => CallError::server(format!("{} [Error limit left: {remain}]", err.message)),
            None => CallError::server(err.message.clone()),
        }
    }
}

fn star_id_response(err: &TransportError) -> Response {
    let body = err
        .body
        .as_ref()
        .and_then(|b| b.get("response"))
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    let mut headers = BTreeMap::new();
    headers.insert(
        "expires".to_string(),
        httpdate::fmt_http_date(SystemTime::now() + STAR_ID_EXPIRY),
    );
    Response {
        status: 200,
        headers,
        body,
    }
}
