#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod normalize;
pub mod parser;
pub mod types;

pub use crate::catalog::{Catalog, Listing, ListingEntry};
pub use crate::error::ParseError;
pub use crate::normalize::{normalize, Diagnostic, NormalizeOptions, NormalizedSpec, Severity};
pub use crate::parser::{parse_spec_str, parse_spec_value, SpecFormat};
pub use crate::types::{HealthStatus, HttpMethod, OperationDescriptor, ParamLocation, ParamSpec, SpecDocument};
