use std::collections::BTreeMap;

const SHARED_PARAMETERS_PREFIX: &str = "#/parameters/";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefError {
    #[error("{0} is an unexpected reference")]
    Foreign(String),
    #[error("{0} does not resolve to a shared parameter")]
    NotFound(String),
}

/// Resolves a `#/parameters/<name>` reference against the shared parameter table.
pub(crate) fn resolve_parameter_ref<'a>(
    shared: &'a BTreeMap<String, serde_json::Value>,
    ref_str: &str,
) -> Result<&'a serde_json::Value, RefError> {
    let name = ref_str
        .strip_prefix(SHARED_PARAMETERS_PREFIX)
        .ok_or_else(|| RefError::Foreign(ref_str.to_string()))?;
    shared
        .get(name)
        .ok_or_else(|| RefError::NotFound(ref_str.to_string()))
}
