use std::sync::Arc;

use swagcall_exec::executor::{
    CompositeEventSink, EventSink, MetricsCollector, MetricsEventSink, StdoutEventSink,
};
use swagcall_exec::{CallArgs, ErrorKind};

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::utils::{connect, parse_param};
use crate::{ClientArgs, EventArgs, OutputArgs};

#[allow(clippy::too_many_arguments)]
pub async fn call_cmd(
    operation: &str,
    category: Option<&str>,
    raw_params: &[String],
    token: Option<String>,
    scopes: Option<String>,
    args: &ClientArgs,
    reporting: EventArgs,
    output: OutputArgs,
) -> i32 {
    let mut call_args = CallArgs::new();
    for raw in raw_params {
        match parse_param(raw) {
            Ok((name, value)) => call_args = call_args.param(name, value),
            Err(e) => {
                print_error(output.format, output.quiet, &e);
                return exit_codes::INVALID_INPUT;
            }
        }
    }
    if let Some(token) = token {
        call_args = call_args.token(token);
    }
    if let Some(scopes) = scopes {
        call_args = call_args.scopes(scopes);
    }

    let mut sinks = CompositeEventSink::new();
    if reporting.events {
        sinks.add(Box::new(StdoutEventSink));
    }
    let collector = Arc::new(MetricsCollector::new());
    let events: Arc<dyn EventSink> = Arc::new(MetricsEventSink::new(
        Arc::clone(&collector),
        Arc::new(sinks),
    ));

    let client = match connect(args, Some(events), true, &output).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    let catalog = client.catalog();
    let known = match category {
        Some(cat) => catalog.lookup(cat, operation).is_some(),
        None => catalog.operation(operation).is_some(),
    };
    if !known {
        let name = match category {
            Some(cat) => format!("{cat}.{operation}"),
            None => operation.to_string(),
        };
        print_error(output.format, output.quiet, &format!("unknown operation {name}"));
        return exit_codes::INVALID_INPUT;
    }

    let result = match category {
        Some(cat) => client.invoke(cat, operation, call_args).await,
        None => client.call(operation, call_args).await,
    };

    if reporting.metrics {
        let metrics = collector.get_metrics().await;
        eprintln!("{}", metrics.to_json());
    }

    match result {
        Ok(resp) => {
            print_result(output.format, output.quiet, &resp.body);
            exit_codes::SUCCESS
        }
        Err(e) => {
            if output.format == OutputFormat::Json && !output.quiet {
                eprintln!("{}", serde_json::to_string(&e).unwrap_or_default());
            } else {
                print_error(output.format, output.quiet, &e.to_string());
            }
            match e.kind {
                // Missing parameters are the caller's mistake.
                ErrorKind::Error if e.message.ends_with("must be specified.") => {
                    exit_codes::INVALID_INPUT
                }
                _ => exit_codes::CALL_FAILED,
            }
        }
    }
}
