use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::normalize::NormalizedSpec;
use crate::types::{HealthStatus, OperationDescriptor};

/// Compiled, read-only view of a spec.
///
/// A catalog is never mutated after [`Catalog::compile`]; reloading builds a new
/// one and swaps it in, so holders of an older `Arc<Catalog>` keep a consistent
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    origin: String,
    base_url: String,
    info: Option<serde_json::Value>,
    operations: BTreeMap<String, Arc<OperationDescriptor>>,
    categories: BTreeMap<String, BTreeMap<String, Arc<OperationDescriptor>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub scope: Option<String>,
    pub status: HealthStatus,
}

pub type Listing = BTreeMap<String, BTreeMap<String, ListingEntry>>;

impl Catalog {
    pub fn compile(spec: NormalizedSpec) -> Self {
        let mut operations = BTreeMap::new();
        let mut categories: BTreeMap<String, BTreeMap<String, Arc<OperationDescriptor>>> =
            BTreeMap::new();

        for op in spec.operations {
            let op = Arc::new(op);
            for tag in &op.tags {
                categories
                    .entry(tag.clone())
                    .or_default()
                    .insert(op.operation_id.clone(), Arc::clone(&op));
            }
            operations.insert(op.operation_id.clone(), op);
        }

        Self {
            origin: spec.origin,
            base_url: spec.base_url,
            info: spec.info,
            operations,
            categories,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn info(&self) -> Option<&serde_json::Value> {
        self.info.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Category names in lexicographic order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn category(&self, name: &str) -> Option<&BTreeMap<String, Arc<OperationDescriptor>>> {
        self.categories.get(name)
    }

    pub fn lookup(&self, category: &str, operation_id: &str) -> Option<&Arc<OperationDescriptor>> {
        self.categories.get(category)?.get(operation_id)
    }

    /// Finds an operation regardless of category, including untagged ones.
    pub fn operation(&self, operation_id: &str) -> Option<&Arc<OperationDescriptor>> {
        self.operations.get(operation_id)
    }

    pub fn operations(&self) -> impl Iterator<Item = &Arc<OperationDescriptor>> {
        self.operations.values()
    }

    /// Builds the descriptive listing, reading each status through `status` at call time.
    pub fn listing(&self, status: impl Fn(&str) -> HealthStatus) -> Listing {
        self.categories
            .iter()
            .map(|(cat, ops)| {
                let entries = ops
                    .iter()
                    .map(|(id, op)| {
                        (
                            id.clone(),
                            ListingEntry {
                                scope: op.scope.clone(),
                                status: status(id),
                            },
                        )
                    })
                    .collect();
                (cat.clone(), entries)
            })
            .collect()
    }
}
