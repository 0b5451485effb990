#![forbid(unsafe_code)]

//! Resilient execution of operations compiled by `swagcall-core`.
//!
//! [`Client`] is the entry point: load a spec, then call operations by id. Each call
//! passes a health gate and a scope gate, is bound into a request, and goes out
//! through a retrying transport that honors the upstream error-limit lockout.

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod health;
pub mod retry;
pub mod transport;

pub use crate::client::{Client, ClientBuilder};
pub use crate::config::ClientConfig;
pub use crate::error::{CallError, ClientError, ErrorKind};
pub use crate::executor::{CallArgs, Event, EventSink, LogLevel, LogSink, Scopes};
pub use crate::transport::{RequestDescriptor, Response, Transport, TransportError, TransportErrorKind};
