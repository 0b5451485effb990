use std::sync::{Arc, RwLock};
use std::time::Duration;

use swagcall_core::HealthStatus;
use tokio::time::Instant;

use crate::executor::{LogLevel, LogSink};
use crate::health::feed::{build_snapshot, HealthSnapshot, StatusRecord};
use crate::transport::{RequestDescriptor, Transport};

#[derive(Default)]
struct HealthState {
    /// Bumped on every reset; a fetch started under an older generation is discarded.
    generation: u64,
    feed_url: Option<url::Url>,
    snapshot: Arc<HealthSnapshot>,
    last_refreshed: Option<Instant>,
}

/// Per-operation status map fed from the upstream status feed.
///
/// Refreshes are lazy: [`HealthMonitor::refresh`] fetches only once the TTL has
/// run out, and a refresh that finds a fetch in flight waits for it. Status reads
/// never wait.
pub struct HealthMonitor {
    transport: Arc<dyn Transport>,
    log: Arc<dyn LogSink>,
    user_agent: String,
    ttl: Duration,
    state: RwLock<HealthState>,
    in_flight: tokio::sync::Mutex<()>,
}

impl HealthMonitor {
    pub fn new(
        transport: Arc<dyn Transport>,
        log: Arc<dyn LogSink>,
        user_agent: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            transport,
            log,
            user_agent: user_agent.into(),
            ttl,
            state: RwLock::new(HealthState::default()),
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Feed location for a spec served from `origin` at `version`.
    pub fn feed_url(origin: &str, version: &str) -> Result<url::Url, url::ParseError> {
        let version = version.strip_prefix('_').unwrap_or(version);
        url::Url::parse(&format!(
            "{}/status.json?version={}",
            origin.trim_end_matches('/'),
            urlencoding::encode(version)
        ))
    }

    /// Drops all known statuses and points the monitor at a new feed.
    ///
    /// A fetch already in flight finishes but its result is thrown away.
    pub fn reset(&self, feed_url: Option<url::Url>) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let generation = state.generation.wrapping_add(1);
        *state = HealthState {
            generation,
            feed_url,
            ..Default::default()
        };
    }

    pub async fn refresh(&self) {
        let _guard = self.in_flight.lock().await;
        let (url, generation) = {
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            if let Some(at) = state.last_refreshed {
                if at.elapsed() < self.ttl {
                    return;
                }
            }
            let Some(url) = state.feed_url.clone() else {
                return;
            };
            // Stamped before fetching; a failed fetch clears it again.
            state.last_refreshed = Some(Instant::now());
            (url, state.generation)
        };

        match self.fetch(url).await {
            Ok(records) => {
                let snapshot = build_snapshot(&records);
                let score = snapshot.score;
                {
                    let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
                    if state.generation != generation {
                        return;
                    }
                    state.snapshot = Arc::new(snapshot);
                }
                self.log.log(LogLevel::Info, &format!("Upstream health is {score}%"));
            }
            Err(message) => {
                self.log.log(LogLevel::Info, &format!("Upstream health fetch error: {message}"));
                {
                    // Assume full health and retry on the next call.
                    let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
                    if state.generation != generation {
                        return;
                    }
                    let statuses = state.snapshot.statuses.clone();
                    state.snapshot = Arc::new(HealthSnapshot { statuses, score: 100 });
                    state.last_refreshed = None;
                }
                self.log.log(LogLevel::Info, "Upstream health is unknown");
            }
        }
    }

    async fn fetch(&self, url: url::Url) -> Result<Vec<StatusRecord>, String> {
        let mut req = RequestDescriptor::get(url);
        req.headers.insert("User-Agent".to_string(), self.user_agent.clone());
        let resp = self.transport.send(req).await.map_err(|e| e.to_string())?;
        serde_json::from_value::<Vec<StatusRecord>>(resp.body)
            .map_err(|e| format!("unexpected feed shape: {e}"))
    }

    /// Last known status; `Unknown` when no refresh has reported on `operation_id`.
    pub fn status(&self, operation_id: &str) -> HealthStatus {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state
            .snapshot
            .statuses
            .get(operation_id)
            .copied()
            .unwrap_or(HealthStatus::Unknown)
    }

    pub fn score(&self) -> u8 {
        self.snapshot().score
    }

    pub fn snapshot(&self) -> Arc<HealthSnapshot> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&state.snapshot)
    }

    /// True while the last refresh is within the TTL.
    pub fn is_fresh(&self) -> bool {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.last_refreshed.is_some_and(|at| at.elapsed() < self.ttl)
    }
}
