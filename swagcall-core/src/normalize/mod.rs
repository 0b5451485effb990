mod diagnostic;
mod operation;
mod refs;

use std::collections::BTreeSet;

pub use diagnostic::{Diagnostic, Severity};
pub use refs::RefError;

use crate::types::{OperationDescriptor, SpecDocument};

/// Security scheme whose scopes are modeled when none is configured.
pub const DEFAULT_SECURITY_SCHEME: &str = "evesso";

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Name of the security definition whose first scope becomes the operation scope.
    pub security_scheme: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            security_scheme: DEFAULT_SECURITY_SCHEME.to_string(),
        }
    }
}

/// Flat operation list extracted from a document, plus everything needed to address it.
#[derive(Debug, Clone)]
pub struct NormalizedSpec {
    /// `scheme://host`, used for side channels such as the status feed.
    pub origin: String,
    /// `scheme://host[basePath]`, prefixed to every operation path.
    pub base_url: String,
    pub info: Option<serde_json::Value>,
    pub operations: Vec<OperationDescriptor>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn normalize(doc: &SpecDocument, options: &NormalizeOptions) -> NormalizedSpec {
    let mut diagnostics = Vec::new();
    let mut operations = Vec::new();
    let mut seen = BTreeSet::<String>::new();

    for (path, item) in &doc.paths {
        let Some(item_obj) = item.as_object() else {
            diagnostics.push(Diagnostic::warning(
                None,
                format!("path item {path} is not an object"),
            ));
            continue;
        };

        let path_params = item_obj.get("parameters");
        for (method, op) in item_obj {
            if method == "parameters" || method.starts_with("x-") {
                continue;
            }
            let Some(descriptor) = operation::extract_operation(
                doc,
                options,
                path,
                method,
                op,
                path_params,
                &mut diagnostics,
            ) else {
                continue;
            };
            if !seen.insert(descriptor.operation_id.clone()) {
                diagnostics.push(Diagnostic::warning(
                    Some(&descriptor.operation_id),
                    format!("duplicate operationId at {method} {path}, keeping the first"),
                ));
                continue;
            }
            operations.push(descriptor);
        }
    }

    NormalizedSpec {
        origin: doc.origin(),
        base_url: doc.base_url(),
        info: doc.info.clone(),
        operations,
        diagnostics,
    }
}
