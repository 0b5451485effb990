use swagcall_core::HealthStatus;

use crate::error::{CallError, ErrorKind};
use crate::executor::Scopes;

/// Which degraded statuses still let a call through. Green and unknown always pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthTolerance {
    pub allow_yellow: bool,
    pub allow_red: bool,
}

impl Default for HealthTolerance {
    fn default() -> Self {
        Self {
            allow_yellow: true,
            allow_red: false,
        }
    }
}

impl HealthTolerance {
    pub fn permits(&self, status: HealthStatus) -> bool {
        match status {
            HealthStatus::Unknown | HealthStatus::Green => true,
            HealthStatus::Yellow => self.allow_yellow,
            HealthStatus::Red => self.allow_red,
        }
    }
}

pub fn health_gate(status: HealthStatus, tolerance: &HealthTolerance) -> Result<(), CallError> {
    if tolerance.permits(status) {
        return Ok(());
    }
    Err(CallError::new(ErrorKind::EsiStatus, format!("Status {status}")))
}

/// Skipped when the operation needs no scope or the caller did not say what it holds.
pub fn scope_gate(required: Option<&str>, supplied: Option<&Scopes>) -> Result<(), CallError> {
    let (Some(required), Some(supplied)) = (required, supplied) else {
        return Ok(());
    };
    if supplied.contains(required) {
        return Ok(());
    }
    Err(CallError::new(
        ErrorKind::ScopeMissing,
        format!("Scope {required} is missing from token"),
    ))
}
