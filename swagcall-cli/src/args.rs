use std::path::PathBuf;

use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// Where the spec comes from and how the client talks to the upstream.
#[derive(Debug, Args, Clone)]
pub struct ClientArgs {
    /// Local JSON or YAML spec; fetched from `--host` when omitted.
    #[arg(long)]
    pub spec: Option<PathBuf>,
    /// Identifies the caller to the upstream; required.
    #[arg(long, env = "SWAGCALL_USER_AGENT")]
    pub user_agent: Option<String>,
    #[arg(long)]
    pub host: Option<String>,
    #[arg(long = "spec-version", default_value = "latest")]
    pub spec_version: String,
    #[arg(long, default_value = "tranquility")]
    pub datasource: String,
    #[arg(long, default_value = "en-us")]
    pub language: String,
    /// Refuse operations whose status is yellow.
    #[arg(long)]
    pub deny_yellow: bool,
    /// Allow operations whose status is red.
    #[arg(long)]
    pub allow_red: bool,
    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

#[derive(Debug, Args, Clone)]
pub struct EventArgs {
    /// Print one JSON line per attempt and failure on stdout.
    #[arg(long)]
    pub events: bool,
    /// Print per-operation attempt counts on stderr when done.
    #[arg(long)]
    pub metrics: bool,
}
