#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Warning,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
        }
    }
}

/// Receives the client's human-readable notices: spec irregularities, health
/// refreshes, deprecation warnings and workaround hits.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

/// Default sink; forwards to `tracing` under the `swagcall` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => tracing::info!(target: "swagcall", "{message}"),
            LogLevel::Warning => tracing::warn!(target: "swagcall", "{message}"),
        }
    }
}
