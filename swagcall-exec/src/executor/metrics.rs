use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::executor::{Event, EventSink};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationCounts {
    pub direct: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CallMetrics {
    pub per_operation: BTreeMap<String, OperationCounts>,
}

impl CallMetrics {
    pub fn record(&mut self, event: &Event) {
        let counts = self
            .per_operation
            .entry(event.operation_id().to_string())
            .or_default();
        match event {
            Event::Direct { .. } => counts.direct += 1,
            Event::Error { .. } => counts.errors += 1,
        }
    }

    pub fn total_direct(&self) -> usize {
        self.per_operation.values().map(|c| c.direct).sum()
    }

    pub fn total_errors(&self) -> usize {
        self.per_operation.values().map(|c| c.errors).sum()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let ops: serde_json::Map<String, serde_json::Value> = self
            .per_operation
            .iter()
            .map(|(op, c)| {
                (
                    op.clone(),
                    serde_json::json!({ "direct": c.direct, "errors": c.errors }),
                )
            })
            .collect();
        serde_json::json!({
            "direct": self.total_direct(),
            "errors": self.total_errors(),
            "operations": ops,
        })
    }
}

#[derive(Default)]
pub struct MetricsCollector {
    metrics: Mutex<CallMetrics>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, event: &Event) {
        self.metrics.lock().await.record(event);
    }

    pub async fn get_metrics(&self) -> CallMetrics {
        self.metrics.lock().await.clone()
    }
}

/// Counts events, then forwards them to `base`.
pub struct MetricsEventSink {
    collector: Arc<MetricsCollector>,
    base: Arc<dyn EventSink>,
}

impl MetricsEventSink {
    pub fn new(collector: Arc<MetricsCollector>, base: Arc<dyn EventSink>) -> Self {
        Self { collector, base }
    }
}

#[async_trait]
impl EventSink for MetricsEventSink {
    async fn emit(&self, event: Event) {
        self.collector.record(&event).await;
        self.base.emit(event).await;
    }
}
