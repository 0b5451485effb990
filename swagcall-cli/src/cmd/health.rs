use std::collections::BTreeMap;

use serde::Serialize;
use swagcall_core::HealthStatus;

use crate::exit_codes;
use crate::output::{print_result, OutputFormat};
use crate::utils::connect;
use crate::{ClientArgs, OutputArgs};

#[derive(Serialize)]
struct HealthResult {
    score: u8,
    statuses: BTreeMap<String, HealthStatus>,
}

#[derive(Serialize)]
struct OperationHealth<'a> {
    operation: &'a str,
    status: HealthStatus,
}

pub async fn health_cmd(operation: Option<&str>, args: &ClientArgs, output: OutputArgs) -> i32 {
    let client = match connect(args, None, true, &output).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Some(operation) = operation {
        let status = client.health(operation).await;
        if output.format == OutputFormat::Text && !output.quiet {
            println!("{operation}: {status}");
        } else {
            print_result(output.format, output.quiet, &OperationHealth { operation, status });
        }
        return exit_codes::SUCCESS;
    }

    client.refresh_health().await;
    let snapshot = client.health_monitor().snapshot();
    let result = HealthResult {
        score: snapshot.score,
        statuses: snapshot.statuses.clone(),
    };

    if output.format == OutputFormat::Text && !output.quiet {
        println!("health: {}%", result.score);
        for (op, status) in &result.statuses {
            if *status != HealthStatus::Green {
                println!("  - {op}: {status}");
            }
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }

    exit_codes::SUCCESS
}
