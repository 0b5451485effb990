use std::path::Path;
use std::sync::{Arc, RwLock};

use swagcall_core::{
    normalize, parse_spec_str, parse_spec_value, Catalog, HealthStatus, Listing, NormalizeOptions,
    Severity, SpecDocument, SpecFormat,
};

use crate::config::ClientConfig;
use crate::error::{CallError, ClientError};
use crate::executor::{
    CallArgs, CallExecutor, EventSink, ImplicitParams, LogLevel, LogSink, NoOpEventSink,
    ResilientTransport, TracingLogSink,
};
use crate::health::HealthMonitor;
use crate::retry::Lockout;
use crate::transport::{ReqwestTransport, RequestDescriptor, Response, Transport};

/// Loads a spec and calls its operations.
///
/// Cloning is cheap and every clone shares the same catalog, health map and
/// lockout.
///
/// ```no_run
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// use swagcall_exec::{CallArgs, Client, ClientConfig};
///
/// let client = Client::new(ClientConfig::new("My project (by Someone)"))?;
/// client.load_remote().await?;
/// let resp = client.invoke("Status", "get_status", CallArgs::new()).await?;
/// println!("players online: {}", resp.body["players"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    catalog: RwLock<Arc<Catalog>>,
    health: Arc<HealthMonitor>,
    lockout: Arc<Lockout>,
    executor: CallExecutor,
    transport: Arc<dyn Transport>,
    log: Arc<dyn LogSink>,
}

pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    events: Arc<dyn EventSink>,
    log: Arc<dyn LogSink>,
}

impl ClientBuilder {
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn log(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = log;
        self
    }

    pub fn build(self) -> Result<Client, ClientError> {
        self.config.validate()?;
        let config = self.config;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                ReqwestTransport::new(config.request_timeout)
                    .map_err(|e| ClientError::Config(format!("http client: {e}")))?,
            ),
        };

        let lockout = Arc::new(Lockout::new(config.retry.error_limit.clone()));
        let health = Arc::new(HealthMonitor::new(
            Arc::clone(&transport),
            Arc::clone(&self.log),
            config.user_agent.clone(),
            config.status_ttl,
        ));
        let resilient = ResilientTransport::new(
            Arc::clone(&transport),
            self.events,
            Arc::clone(&self.log),
            Arc::clone(&lockout),
            config.retry.clone(),
        );
        let executor = CallExecutor::new(
            Arc::clone(&health),
            resilient,
            Arc::clone(&self.log),
            config.tolerance(),
            ImplicitParams {
                datasource: config.datasource.clone(),
                language: config.language.clone(),
            },
            config.user_agent.clone(),
            config.changelog_url.clone(),
        );

        Ok(Client {
            inner: Arc::new(ClientInner {
                config,
                catalog: RwLock::new(Arc::new(Catalog::default())),
                health,
                lockout,
                executor,
                transport,
                log: self.log,
            }),
        })
    }
}

impl Client {
    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder {
            config,
            transport: None,
            events: Arc::new(NoOpEventSink),
            log: Arc::new(TracingLogSink),
        }
    }

    /// Client with the reqwest transport, `tracing` logging and no event sink.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Self::builder(config).build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn load_str(&self, input: &str) -> Result<(), ClientError> {
        let doc = parse_spec_str(input, SpecFormat::Auto)?;
        self.load_document(&doc);
        Ok(())
    }

    pub fn load_value(&self, value: serde_json::Value) -> Result<(), ClientError> {
        let doc = parse_spec_value(value)?;
        self.load_document(&doc);
        Ok(())
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<(), ClientError> {
        let content = std::fs::read_to_string(path)?;
        self.load_str(&content)
    }

    /// Downloads `{host}/{version}/swagger.json` through the configured transport.
    pub async fn load_remote(&self) -> Result<(), ClientError> {
        let cfg = &self.inner.config;
        self.inner.log.log(LogLevel::Info, "Loading specs from a remote resource...");
        let raw = format!(
            "{}/{}/swagger.json?datasource={}",
            cfg.host.trim_end_matches('/'),
            cfg.version,
            urlencoding::encode(&cfg.datasource)
        );
        let url = url::Url::parse(&raw)
            .map_err(|e| ClientError::Config(format!("invalid spec URL {raw}: {e}")))?;
        let mut req = RequestDescriptor::get(url);
        req.headers.insert("User-Agent".to_string(), cfg.user_agent.clone());
        let resp = self
            .inner
            .transport
            .send(req)
            .await
            .map_err(|e| CallError::server(e.message))?;
        self.load_value(resp.body)
    }

    /// Compiles `doc` and swaps it in.
    ///
    /// Clears any lockout and forgets all health data. Unless
    /// [`ClientConfig::eager_health_refresh`] is off, a health refresh is started
    /// without waiting for it when running inside a tokio runtime; later refreshes
    /// wait for it to land.
    pub fn load_document(&self, doc: &SpecDocument) {
        let options = NormalizeOptions {
            security_scheme: self.inner.config.security_scheme.clone(),
        };
        let mut spec = normalize(doc, &options);
        for d in spec.diagnostics.drain(..) {
            let level = match d.severity {
                Severity::Info => LogLevel::Info,
                Severity::Warning => LogLevel::Warning,
            };
            self.inner.log.log(level, &d.to_string());
        }

        let feed_url = match HealthMonitor::feed_url(&spec.origin, &self.inner.config.version) {
            Ok(u) => Some(u),
            Err(e) => {
                self.inner
                    .log
                    .log(LogLevel::Warning, &format!("status feed disabled: {e}"));
                None
            }
        };
        let catalog = Arc::new(Catalog::compile(spec));
        {
            let mut slot = self.inner.catalog.write().unwrap_or_else(|e| e.into_inner());
            *slot = catalog;
        }

        self.inner.lockout.clear();
        self.inner.health.reset(feed_url);
        if !self.inner.config.eager_health_refresh {
            return;
        }
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let health = Arc::clone(&self.inner.health);
            handle.spawn(async move {
                health.refresh().await;
            });
        }
    }

    /// Current catalog snapshot; unaffected by later reloads.
    pub fn catalog(&self) -> Arc<Catalog> {
        let slot = self.inner.catalog.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&slot)
    }

    pub fn info(&self) -> Option<serde_json::Value> {
        self.catalog().info().cloned()
    }

    pub fn base_url(&self) -> String {
        self.catalog().base_url().to_string()
    }

    /// Category -> operation -> {scope, status}, with statuses read now.
    pub fn listing(&self) -> Listing {
        let health = &self.inner.health;
        self.catalog().listing(|op| health.status(op))
    }

    pub async fn invoke(
        &self,
        category: &str,
        operation_id: &str,
        args: CallArgs,
    ) -> Result<Response, CallError> {
        let catalog = self.catalog();
        let op = catalog.lookup(category, operation_id).ok_or_else(|| {
            CallError::error(format!("Unknown operation {category}.{operation_id}"))
        })?;
        self.inner
            .executor
            .invoke(catalog.base_url(), op, args)
            .await
    }

    /// Like [`Client::invoke`], without naming the category.
    pub async fn call(&self, operation_id: &str, args: CallArgs) -> Result<Response, CallError> {
        let catalog = self.catalog();
        let op = catalog
            .operation(operation_id)
            .ok_or_else(|| CallError::error(format!("Unknown operation {operation_id}")))?;
        self.inner
            .executor
            .invoke(catalog.base_url(), op, args)
            .await
    }

    /// Refreshes if stale, then reports the status of `operation_id`.
    pub async fn health(&self, operation_id: &str) -> HealthStatus {
        self.inner.health.refresh().await;
        self.inner.health.status(operation_id)
    }

    /// Point-in-time status; never triggers a fetch.
    pub fn health_status(&self, operation_id: &str) -> HealthStatus {
        self.inner.health.status(operation_id)
    }

    pub fn health_score(&self) -> u8 {
        self.inner.health.score()
    }

    pub async fn refresh_health(&self) {
        self.inner.health.refresh().await;
    }

    pub fn health_monitor(&self) -> &Arc<HealthMonitor> {
        &self.inner.health
    }

    /// Epoch seconds until which calls are refused, if locked out.
    pub fn locked_until(&self) -> Option<u64> {
        self.inner.lockout.locked_until()
    }

    pub fn clear_lockout(&self) {
        self.inner.lockout.clear();
    }
}
