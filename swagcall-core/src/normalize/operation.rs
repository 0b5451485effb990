use std::collections::BTreeMap;

use crate::normalize::diagnostic::Diagnostic;
use crate::normalize::refs::resolve_parameter_ref;
use crate::normalize::NormalizeOptions;
use crate::types::{HttpMethod, OperationDescriptor, ParamLocation, ParamSpec, SpecDocument};

pub(crate) fn extract_operation(
    doc: &SpecDocument,
    options: &NormalizeOptions,
    path: &str,
    method: &str,
    op: &serde_json::Value,
    path_params: Option<&serde_json::Value>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<OperationDescriptor> {
    let Some(op_obj) = op.as_object() else {
        diagnostics.push(Diagnostic::warning(
            None,
            format!("{method} {path} is not an operation object"),
        ));
        return None;
    };
    let Some(operation_id) = op_obj.get("operationId").and_then(|v| v.as_str()) else {
        diagnostics.push(Diagnostic::warning(
            None,
            format!("{method} {path} has no operationId"),
        ));
        return None;
    };

    let http_method = HttpMethod::parse(method);
    if !http_method.is_expected() {
        diagnostics.push(Diagnostic::info(Some(operation_id), "has an unexpected method"));
    }

    let tags: Vec<String> = op_obj
        .get("tags")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|t| t.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    if tags.is_empty() {
        diagnostics.push(Diagnostic::info(
            Some(operation_id),
            "has no tags and will not be listed under any category",
        ));
    }

    let scope = extract_scope(op_obj.get("security"), &options.security_scheme, operation_id, diagnostics);

    // Path-level parameters first; operation-level entries override by name.
    let mut parameters = BTreeMap::new();
    for list in [path_params, op_obj.get("parameters")].into_iter().flatten() {
        extract_parameters(doc, operation_id, list, &mut parameters, diagnostics);
    }

    Some(OperationDescriptor {
        operation_id: operation_id.to_string(),
        method: http_method,
        path: path.to_string(),
        scope,
        parameters,
        tags,
    })
}

fn extract_scope(
    security: Option<&serde_json::Value>,
    scheme: &str,
    operation_id: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<String> {
    let scopes = security?.as_array()?.first()?.get(scheme)?.as_array()?;
    if scopes.len() > 1 {
        diagnostics.push(Diagnostic::info(
            Some(operation_id),
            format!(
                "has an unexpected number of scopes: {}",
                serde_json::Value::Array(scopes.clone())
            ),
        ));
    }
    scopes.first()?.as_str().map(str::to_string)
}

fn extract_parameters(
    doc: &SpecDocument,
    operation_id: &str,
    list: &serde_json::Value,
    out: &mut BTreeMap<String, ParamSpec>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(arr) = list.as_array() else {
        diagnostics.push(Diagnostic::warning(
            Some(operation_id),
            "parameters is not a list",
        ));
        return;
    };

    for p in arr {
        let param = match p.get("$ref").and_then(|v| v.as_str()) {
            Some(r) => match resolve_parameter_ref(&doc.parameters, r) {
                Ok(v) => v,
                Err(e) => {
                    diagnostics.push(Diagnostic::info(Some(operation_id), e.to_string()));
                    continue;
                }
            },
            None => p,
        };

        let Some(name) = param.get("name").and_then(|v| v.as_str()) else {
            diagnostics.push(Diagnostic::warning(
                Some(operation_id),
                "parameter without a name was dropped",
            ));
            continue;
        };
        let location = ParamLocation::parse(param.get("in").and_then(|v| v.as_str()).unwrap_or(""));
        if let ParamLocation::Unknown(loc) = &location {
            diagnostics.push(Diagnostic::info(
                Some(operation_id),
                format!("unexpected parameter location: {loc:?}"),
            ));
        }
        let required = param.get("required").and_then(|v| v.as_bool()).unwrap_or(false);

        out.insert(name.to_string(), ParamSpec { required, location });
    }
}
