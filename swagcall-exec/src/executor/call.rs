use std::collections::BTreeMap;
use std::sync::Arc;

use swagcall_core::OperationDescriptor;

use crate::error::CallError;
use crate::executor::gate::{health_gate, scope_gate, HealthTolerance};
use crate::executor::request::build_request;
use crate::executor::{CallArgs, LogLevel, LogSink, ResilientTransport};
use crate::health::HealthMonitor;
use crate::transport::Response;

/// Values merged in front of every call's parameters; callers may override them.
#[derive(Debug, Clone)]
pub struct ImplicitParams {
    pub datasource: String,
    pub language: String,
}

impl ImplicitParams {
    fn seed(&self) -> BTreeMap<String, serde_json::Value> {
        let mut params = BTreeMap::new();
        params.insert("datasource".to_string(), self.datasource.clone().into());
        params.insert("Accept-Language".to_string(), self.language.clone().into());
        params
    }
}

pub struct CallExecutor {
    health: Arc<HealthMonitor>,
    transport: ResilientTransport,
    log: Arc<dyn LogSink>,
    tolerance: HealthTolerance,
    implicit: ImplicitParams,
    user_agent: String,
    changelog_url: String,
}

impl CallExecutor {
    pub fn new(
        health: Arc<HealthMonitor>,
        transport: ResilientTransport,
        log: Arc<dyn LogSink>,
        tolerance: HealthTolerance,
        implicit: ImplicitParams,
        user_agent: impl Into<String>,
        changelog_url: impl Into<String>,
    ) -> Self {
        Self {
            health,
            transport,
            log,
            tolerance,
            implicit,
            user_agent: user_agent.into(),
            changelog_url: changelog_url.into(),
        }
    }

    pub fn transport(&self) -> &ResilientTransport {
        &self.transport
    }

    pub async fn invoke(
        &self,
        base_url: &str,
        op: &OperationDescriptor,
        mut args: CallArgs,
    ) -> Result<Response, CallError> {
        self.health.refresh().await;
        health_gate(self.health.status(&op.operation_id), &self.tolerance)?;
        scope_gate(op.scope.as_deref(), args.scopes.as_ref())?;

        args.take_legacy_token();
        let mut params = self.implicit.seed();
        params.append(&mut args.params);

        let built = build_request(base_url, op, &params, &self.user_agent, args.token.as_ref())?;
        for w in &built.warnings {
            self.log.log(LogLevel::Info, w);
        }

        let resp = self.transport.execute(&op.operation_id, &built.request).await?;
        if let Some(warning) = resp.header("warning") {
            self.log.log(
                LogLevel::Warning,
                &format!(
                    "(note) {}: {warning} See {} for details",
                    op.operation_id, self.changelog_url
                ),
            );
        }
        Ok(resp)
    }
}
