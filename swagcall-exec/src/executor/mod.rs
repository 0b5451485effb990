mod args;
mod call;
pub mod events;
mod gate;
pub mod log;
pub mod metrics;
mod request;
mod resilient;

pub use args::{CallArgs, Scopes};
pub use call::{CallExecutor, ImplicitParams};
pub use events::{CompositeEventSink, Event, EventSink, NoOpEventSink, StdoutEventSink};
pub use gate::{health_gate, scope_gate, HealthTolerance};
pub use log::{LogLevel, LogSink, TracingLogSink};
pub use metrics::{CallMetrics, MetricsCollector, MetricsEventSink, OperationCounts};
pub use request::{build_request, RequestBuildResult};
pub use resilient::ResilientTransport;
