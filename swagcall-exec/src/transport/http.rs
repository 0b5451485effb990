use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::transport::types::{RequestDescriptor, Response, TransportError, TransportErrorKind};

/// Appended to the caller's `User-Agent` on every outgoing request.
pub const CLIENT_MARKER: &str = concat!("swagcall/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, req: RequestDescriptor) -> Result<Response, TransportError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::new(TransportErrorKind::Other, e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, req: RequestDescriptor) -> Result<Response, TransportError> {
        let method: reqwest::Method = req.method.as_str().parse().map_err(
            |e: <reqwest::Method as std::str::FromStr>::Err| {
                TransportError::new(TransportErrorKind::Other, e.to_string())
            },
        )?;
        let mut rb = self.client.request(method, req.url);

        let mut has_agent = false;
        for (k, v) in req.headers {
            if k.eq_ignore_ascii_case("user-agent") {
                has_agent = true;
                rb = rb.header(k, format!("{v} ({CLIENT_MARKER})"));
            } else {
                rb = rb.header(k, v);
            }
        }
        if !has_agent {
            rb = rb.header(reqwest::header::USER_AGENT, CLIENT_MARKER);
        }
        if let Some(body) = &req.body {
            rb = rb.json(body);
        }

        let resp = rb.send().await.map_err(map_reqwest_error)?;
        let status = resp.status();

        let mut headers = BTreeMap::new();
        for (k, v) in resp.headers().iter() {
            if let Ok(s) = v.to_str() {
                headers.insert(k.to_string(), s.to_string());
            }
        }

        let text = resp.text().await.map_err(map_reqwest_error)?;
        let body = parse_body(&text);

        // The upstream reports some failures as `{"error": "..."}` with a 2xx status.
        let body_error = body.get("error").and_then(|v| v.as_str()).map(str::to_string);
        if !status.is_success() || body_error.is_some() {
            let kind = if status.is_success() {
                TransportErrorKind::Other
            } else {
                TransportErrorKind::Status(status.as_u16())
            };
            let message = body_error.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
            });
            return Err(TransportError::new(kind, message)
                .with_headers(headers)
                .with_body(body));
        }

        Ok(Response {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

fn parse_body(text: &str) -> serde_json::Value {
    if text.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    let chain = error_chain(&e);
    if e.is_timeout() {
        return TransportError::new(TransportErrorKind::Timeout, format!("Timeout: {chain}"));
    }
    if has_io_kind(&e, std::io::ErrorKind::ConnectionReset) {
        return TransportError::new(TransportErrorKind::ConnectionReset, chain);
    }
    let lower = chain.to_ascii_lowercase();
    if lower.contains("dns error") || lower.contains("failed to lookup address") {
        let kind = if lower.contains("temporary failure") || lower.contains("try again") {
            TransportErrorKind::DnsRetry
        } else {
            TransportErrorKind::DnsNotFound
        };
        return TransportError::new(kind, chain);
    }
    TransportError::new(TransportErrorKind::Other, chain)
}

fn error_chain(e: &dyn std::error::Error) -> String {
    let mut out = e.to_string();
    let mut source = e.source();
    while let Some(s) = source {
        out.push_str(": ");
        out.push_str(&s.to_string());
        source = s.source();
    }
    out
}

fn has_io_kind(e: &dyn std::error::Error, kind: std::io::ErrorKind) -> bool {
    let mut source = e.source();
    while let Some(s) = source {
        if let Some(io) = s.downcast_ref::<std::io::Error>() {
            if io.kind() == kind {
                return true;
            }
        }
        source = s.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_json_body_is_kept_as_string() {
        assert_eq!(parse_body(""), serde_json::Value::Null);
        assert_eq!(parse_body("{\"a\":1}")["a"], 1);
        assert_eq!(
            parse_body("<h1>502 Bad Gateway</h1>"),
            serde_json::Value::String("<h1>502 Bad Gateway</h1>".to_string())
        );
    }
}
