#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use swagcall_exec::{
    Client, ClientConfig, Event, EventSink, LogLevel, LogSink, RequestDescriptor, Response,
    Transport, TransportError, TransportErrorKind,
};
use tokio::time::Instant;

pub const SPEC: &str = r##"{
  "swagger": "2.0",
  "host": "esi.test",
  "schemes": ["https"],
  "basePath": "/latest",
  "info": { "title": "Test API", "version": "1.0" },
  "parameters": {
    "datasource": { "name": "datasource", "in": "query", "required": false },
    "Accept-Language": { "name": "Accept-Language", "in": "header", "required": false },
    "character_id": { "name": "character_id", "in": "path", "required": true }
  },
  "paths": {
    "/status/": {
      "get": {
        "operationId": "get_status",
        "tags": ["Status"],
        "parameters": [{ "$ref": "#/parameters/datasource" }]
      }
    },
    "/search/": {
      "get": {
        "operationId": "get_search",
        "tags": ["Search"],
        "parameters": [
          { "$ref": "#/parameters/datasource" },
          { "$ref": "#/parameters/Accept-Language" },
          { "name": "search", "in": "query", "required": true },
          { "name": "categories", "in": "query", "required": false },
          { "name": "X-Trace", "in": "header", "required": false }
        ]
      }
    },
    "/characters/{character_id}/wallet/": {
      "get": {
        "operationId": "get_characters_character_id_wallet",
        "tags": ["Wallet"],
        "security": [{ "evesso": ["esi-wallet.read_character_wallet.v1"] }],
        "parameters": [
          { "$ref": "#/parameters/character_id" },
          { "$ref": "#/parameters/datasource" }
        ]
      }
    },
    "/ui/autopilot/waypoint/": {
      "post": {
        "operationId": "post_ui_autopilot_waypoint",
        "tags": ["User Interface"],
        "parameters": [
          { "name": "first", "in": "body", "required": false },
          { "name": "second", "in": "body", "required": false }
        ]
      }
    }
  }
}"##;

pub type Scripted = Result<Response, TransportError>;

/// Transport that answers the status feed from `feed` and everything else from a script.
pub struct MockTransport {
    feed: Mutex<Result<serde_json::Value, TransportError>>,
    feed_delay: Mutex<Duration>,
    script: Mutex<VecDeque<Scripted>>,
    pub calls: Mutex<Vec<(Instant, RequestDescriptor)>>,
    pub feed_calls: AtomicUsize,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            feed: Mutex::new(Ok(json!([]))),
            feed_delay: Mutex::new(Duration::ZERO),
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            feed_calls: AtomicUsize::new(0),
        }
    }
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_feed(&self, feed: serde_json::Value) {
        *self.feed.lock().unwrap() = Ok(feed);
    }

    /// Makes every feed fetch take `delay` before answering.
    pub fn set_feed_delay(&self, delay: Duration) {
        *self.feed_delay.lock().unwrap() = delay;
    }

    pub fn fail_feed(&self) {
        *self.feed.lock().unwrap() = Err(TransportError::new(TransportErrorKind::Timeout, "Timeout"));
    }

    pub fn push(&self, outcome: Scripted) {
        self.script.lock().unwrap().push_back(outcome);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn feed_count(&self) -> usize {
        self.feed_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> RequestDescriptor {
        self.calls.lock().unwrap().last().expect("at least one call").1.clone()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, req: RequestDescriptor) -> Result<Response, TransportError> {
        if req.url.path().ends_with("/status.json") {
            self.feed_calls.fetch_add(1, Ordering::SeqCst);
            let delay = *self.feed_delay.lock().unwrap();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let feed = self.feed.lock().unwrap().clone();
            return feed.map(|body| ok_json(body));
        }
        self.calls.lock().unwrap().push((Instant::now(), req));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ok_json(json!({"ok": true}))))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn count(&self, kind: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.as_str() == kind)
            .count()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn emit(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

#[derive(Default)]
pub struct RecordingLog {
    pub lines: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLog {
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().unwrap().iter().any(|(_, l)| l.contains(needle))
    }
}

impl LogSink for RecordingLog {
    fn log(&self, level: LogLevel, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_string()));
    }
}

pub struct Harness {
    pub client: Client,
    pub transport: Arc<MockTransport>,
    pub events: Arc<RecordingSink>,
    pub log: Arc<RecordingLog>,
}

pub fn harness(config: ClientConfig) -> Harness {
    let transport = MockTransport::new();
    let events = Arc::new(RecordingSink::default());
    let log = Arc::new(RecordingLog::default());
    let client = Client::builder(config)
        .transport(transport.clone())
        .events(events.clone())
        .log(log.clone())
        .build()
        .expect("client");
    client.load_str(SPEC).expect("spec loads");
    Harness {
        client,
        transport,
        events,
        log,
    }
}

pub fn config() -> ClientConfig {
    ClientConfig::new("swagcall tests (by nobody)")
}

pub fn ok_json(body: serde_json::Value) -> Response {
    Response {
        status: 200,
        headers: BTreeMap::new(),
        body,
    }
}

pub fn with_headers(mut resp: Response, headers: &[(&str, &str)]) -> Response {
    for (k, v) in headers {
        resp.headers.insert(k.to_string(), v.to_string());
    }
    resp
}

pub fn failure(kind: TransportErrorKind, message: &str) -> Scripted {
    Err(TransportError::new(kind, message))
}

pub fn feed_entry(method: &str, route: &str, status: &str) -> serde_json::Value {
    json!({ "method": method, "route": route, "status": status, "tags": ["Tag"] })
}
