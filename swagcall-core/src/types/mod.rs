mod document;
mod operation;
mod status;

pub use document::SpecDocument;
pub use operation::{HttpMethod, OperationDescriptor, ParamLocation, ParamSpec};
pub use status::HealthStatus;
