use async_trait::async_trait;
use serde_json::json;

/// Call accounting. A call that retries reports `Direct` once per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// An attempt is about to hit the network.
    Direct { operation_id: String },
    /// An attempt failed at the transport or upstream.
    Error { operation_id: String },
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Direct { .. } => "direct",
            Event::Error { .. } => "error",
        }
    }

    pub fn operation_id(&self) -> &str {
        match self {
            Event::Direct { operation_id } | Event::Error { operation_id } => operation_id,
        }
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct CompositeEventSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.emit(event.clone()).await;
        }
    }
}

pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        let json = json!({ "type": event.as_str(), "operation_id": event.operation_id() });
        println!("{}", serde_json::to_string(&json).unwrap_or_default());
    }
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}
