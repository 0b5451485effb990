use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Swagger 2.0 document, kept loose below the top level.
///
/// Path items and operations stay as raw JSON so that irregular shapes can be
/// reported as diagnostics instead of failing the whole load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecDocument {
    pub host: String,
    pub schemes: Vec<String>,
    #[serde(rename = "basePath", default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    pub paths: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<serde_json::Value>,
}

impl SpecDocument {
    /// `https` wins whenever the document offers it.
    pub fn preferred_scheme(&self) -> &'static str {
        if self.schemes.iter().any(|s| s == "https") {
            "https"
        } else {
            "http"
        }
    }

    pub fn origin(&self) -> String {
        format!("{}://{}", self.preferred_scheme(), self.host)
    }

    pub fn base_url(&self) -> String {
        let base_path = self.base_path.as_deref().unwrap_or("").trim_end_matches('/');
        format!("{}{}", self.origin(), base_path)
    }
}
