use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    /// Anything outside the four expected verbs; kept so the call still goes out.
    Other(String),
}

impl HttpMethod {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "get" => HttpMethod::Get,
            "post" => HttpMethod::Post,
            "put" => HttpMethod::Put,
            "delete" => HttpMethod::Delete,
            _ => HttpMethod::Other(s.to_ascii_uppercase()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Other(m) => m,
        }
    }

    pub fn is_expected(&self) -> bool {
        !matches!(self, HttpMethod::Other(_))
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Header,
    Path,
    Query,
    Body,
    Unknown(String),
}

impl ParamLocation {
    pub fn parse(s: &str) -> Self {
        match s {
            "header" => ParamLocation::Header,
            "path" => ParamLocation::Path,
            "query" => ParamLocation::Query,
            "body" => ParamLocation::Body,
            other => ParamLocation::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ParamLocation::Header => "header",
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
            ParamLocation::Body => "body",
            ParamLocation::Unknown(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub required: bool,
    pub location: ParamLocation,
}

/// One callable operation, fixed at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub operation_id: String,
    pub method: HttpMethod,
    /// Path template relative to the base URL, e.g. `/characters/{character_id}/`.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub parameters: BTreeMap<String, ParamSpec>,
    pub tags: Vec<String>,
}

impl OperationDescriptor {
    pub fn requires_scope(&self) -> bool {
        self.scope.is_some()
    }
}
