use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod output;
mod utils;

pub use args::*;
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "swagcall", version, about = "Call Swagger operations with retries and health gating")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(run_command(cli.command));
    std::process::exit(exit_code);
}

fn init_tracing() {
    let filter = std::env::var("SWAGCALL_LOG").unwrap_or_else(|_| "info".to_string());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("warning: tracing subscriber already initialized");
    }
}

async fn run_command(command: Command) -> i32 {
    match command {
        Command::List {
            no_health,
            client,
            output,
        } => cmd::list::list_cmd(&client, no_health, output).await,
        Command::Call {
            operation,
            category,
            params,
            token,
            scopes,
            client,
            reporting,
            output,
        } => {
            cmd::call::call_cmd(
                &operation,
                category.as_deref(),
                &params,
                token,
                scopes,
                &client,
                reporting,
                output,
            )
            .await
        }
        Command::Health {
            operation,
            client,
            output,
        } => cmd::health::health_cmd(operation.as_deref(), &client, output).await,
        Command::Info { client, output } => cmd::info::info_cmd(&client, output).await,
    }
}
