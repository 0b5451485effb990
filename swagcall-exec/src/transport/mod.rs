mod http;
mod types;

pub use http::{ReqwestTransport, Transport, CLIENT_MARKER};
pub use types::{get_header_ci, RequestDescriptor, Response, TransportError, TransportErrorKind};
