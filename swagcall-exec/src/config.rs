use std::time::Duration;

use crate::error::ClientError;
use crate::executor::HealthTolerance;
use crate::retry::RetryConfig;

pub const DEFAULT_HOST: &str = "https://esi.evetech.net";
pub const DEFAULT_CHANGELOG_URL: &str = "https://github.com/esi/esi-issues/blob/master/changelog.md";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Sent with every request; the upstream expects contact details here.
    pub user_agent: String,
    /// Allow calls to operations whose status is yellow.
    pub allow_yellow: bool,
    /// Allow calls to operations whose status is red.
    pub allow_red: bool,
    /// How long a fetched status feed stays valid.
    pub status_ttl: Duration,
    /// Start a status fetch as soon as a spec is loaded. When off, the first call
    /// or explicit refresh fetches it.
    pub eager_health_refresh: bool,
    /// Where remote specs are downloaded from. Replaced by the spec's own host for calls.
    pub host: String,
    pub version: String,
    pub datasource: String,
    pub language: String,
    /// Security definition name whose scopes are enforced.
    pub security_scheme: String,
    /// Per-request timeout of the default transport.
    pub request_timeout: Duration,
    /// Linked from deprecation warnings.
    pub changelog_url: String,
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            allow_yellow: true,
            allow_red: false,
            status_ttl: Duration::from_secs(300),
            eager_health_refresh: true,
            host: DEFAULT_HOST.to_string(),
            version: "latest".to_string(),
            datasource: "tranquility".to_string(),
            language: "en-us".to_string(),
            security_scheme: swagcall_core::normalize::DEFAULT_SECURITY_SCHEME.to_string(),
            request_timeout: Duration::from_secs(30),
            changelog_url: DEFAULT_CHANGELOG_URL.to_string(),
            retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..Default::default()
        }
    }

    pub fn with_allow_yellow(mut self, allow: bool) -> Self {
        self.allow_yellow = allow;
        self
    }

    pub fn with_allow_red(mut self, allow: bool) -> Self {
        self.allow_red = allow;
        self
    }

    pub fn with_status_ttl(mut self, ttl: Duration) -> Self {
        self.status_ttl = ttl;
        self
    }

    pub fn with_eager_health_refresh(mut self, eager: bool) -> Self {
        self.eager_health_refresh = eager;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_datasource(mut self, datasource: impl Into<String>) -> Self {
        self.datasource = datasource.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn tolerance(&self) -> HealthTolerance {
        HealthTolerance {
            allow_yellow: self.allow_yellow,
            allow_red: self.allow_red,
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.user_agent.trim().is_empty() {
            return Err(ClientError::Config("user_agent must be specified".to_string()));
        }
        if self.retry.max_attempts == 0 {
            return Err(ClientError::Config("retry.max_attempts must be at least 1".to_string()));
        }
        Ok(())
    }
}
