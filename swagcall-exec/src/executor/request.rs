use std::collections::BTreeMap;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;
use swagcall_core::{OperationDescriptor, ParamLocation};

use crate::error::CallError;
use crate::transport::RequestDescriptor;

pub struct RequestBuildResult {
    pub request: RequestDescriptor,
    /// Spec inconsistencies noticed while binding; the request is still usable.
    pub warnings: Vec<String>,
}

/// Binds caller parameters into a request for `op`.
///
/// `params` must already contain the implicit defaults. Only parameters the
/// operation declares are bound; anything else is ignored.
pub fn build_request(
    base_url: &str,
    op: &OperationDescriptor,
    params: &BTreeMap<String, JsonValue>,
    user_agent: &str,
    token: Option<&SecretString>,
) -> Result<RequestBuildResult, CallError> {
    let mut headers = BTreeMap::<String, String>::new();
    headers.insert("User-Agent".to_string(), user_agent.to_string());

    // Nothing to authorize without a scope requirement.
    if let (Some(token), true) = (token, op.requires_scope()) {
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", token.expose_secret()),
        );
    }

    let mut path = op.path.clone();
    let mut query = Vec::<String>::new();
    let mut body: Option<JsonValue> = None;
    let mut warnings = Vec::new();

    for (name, spec) in &op.parameters {
        let value = match params.get(name) {
            None | Some(JsonValue::Null) => {
                if spec.required {
                    return Err(CallError::error(format!("Parameter {name} must be specified.")));
                }
                continue;
            }
            Some(v) => v,
        };

        match &spec.location {
            ParamLocation::Header => {
                headers.insert(name.clone(), value_to_string(value));
            }
            ParamLocation::Path => {
                let placeholder = format!("{{{name}}}");
                if path.contains(&placeholder) {
                    path = path.replace(&placeholder, &urlencoding::encode(&value_to_string(value)));
                }
            }
            ParamLocation::Query => {
                query.push(format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(&value_to_string(value))
                ));
            }
            ParamLocation::Body => {
                if body.is_some() {
                    warnings.push(format!(
                        "Body was set multiple times for {}/{name}; keeping the last one",
                        op.operation_id
                    ));
                }
                body = Some(value.clone());
            }
            ParamLocation::Unknown(_) => {}
        }
    }

    let mut raw = format!("{base_url}{path}");
    if !query.is_empty() {
        raw.push('?');
        raw.push_str(&query.join("&"));
    }
    let url = url::Url::parse(&raw)
        .map_err(|e| CallError::error(format!("invalid request URL {raw}: {e}")))?;

    Ok(RequestBuildResult {
        request: RequestDescriptor {
            method: op.method.clone(),
            url,
            headers,
            body,
        },
        warnings,
    })
}

/// Scalars render bare; arrays render comma-joined, which is what list-valued query
/// parameters expect.
fn value_to_string(v: &JsonValue) -> String {
    match v {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        JsonValue::Array(items) => items.iter().map(value_to_string).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays_join_with_commas() {
        assert_eq!(value_to_string(&serde_json::json!([1, 2, 3])), "1,2,3");
        assert_eq!(value_to_string(&serde_json::json!("a b")), "a b");
        assert_eq!(value_to_string(&serde_json::json!(true)), "true");
    }
}
