use std::sync::Arc;
use std::time::Duration;

use swagcall_exec::executor::EventSink;
use swagcall_exec::{Client, ClientConfig, ClientError};

use crate::exit_codes;
use crate::output::print_error;
use crate::{ClientArgs, OutputArgs};

/// Builds a client from the flags and loads the spec, printing any failure.
///
/// With `eager_health` off nothing touches the status feed until asked to.
/// Returns the exit code to use on failure.
pub async fn connect(
    args: &ClientArgs,
    events: Option<Arc<dyn EventSink>>,
    eager_health: bool,
    output: &OutputArgs,
) -> Result<Client, i32> {
    let Some(user_agent) = args.user_agent.clone() else {
        print_error(
            output.format,
            output.quiet,
            "a user agent is required: pass --user-agent or set SWAGCALL_USER_AGENT",
        );
        return Err(exit_codes::INVALID_INPUT);
    };

    let mut config = ClientConfig::new(user_agent)
        .with_version(args.spec_version.clone())
        .with_datasource(args.datasource.clone())
        .with_language(args.language.clone())
        .with_allow_yellow(!args.deny_yellow)
        .with_allow_red(args.allow_red)
        .with_eager_health_refresh(eager_health);
    config.request_timeout = Duration::from_secs(args.timeout);
    if let Some(host) = &args.host {
        config = config.with_host(host.clone());
    }

    let mut builder = Client::builder(config);
    if let Some(events) = events {
        builder = builder.events(events);
    }
    let client = match builder.build() {
        Ok(c) => c,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return Err(exit_code_for(&e));
        }
    };

    let loaded = match &args.spec {
        Some(path) => client.load_file(path),
        None => client.load_remote().await,
    };
    if let Err(e) = loaded {
        print_error(output.format, output.quiet, &e.to_string());
        return Err(exit_code_for(&e));
    }
    Ok(client)
}

fn exit_code_for(err: &ClientError) -> i32 {
    match err {
        ClientError::Config(_) | ClientError::Parse(_) => exit_codes::INVALID_INPUT,
        ClientError::Io(_) | ClientError::Fetch(_) => exit_codes::RUNTIME_ERROR,
    }
}

/// Splits `NAME=VALUE`; the value is read as JSON when it parses, else kept as a string.
pub fn parse_param(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {raw:?}"))?;
    if name.is_empty() {
        return Err(format!("missing parameter name in {raw:?}"));
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn params_prefer_json_values() {
        assert_eq!(parse_param("id=42").unwrap(), ("id".to_string(), json!(42)));
        assert_eq!(
            parse_param("ids=[1,2]").unwrap(),
            ("ids".to_string(), json!([1, 2]))
        );
        assert_eq!(
            parse_param("search=jita 4-4").unwrap(),
            ("search".to_string(), json!("jita 4-4"))
        );
        assert_eq!(parse_param("q=a=b").unwrap(), ("q".to_string(), json!("a=b")));
    }

    #[test]
    fn params_need_a_name_and_a_value() {
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=1").is_err());
    }
}
