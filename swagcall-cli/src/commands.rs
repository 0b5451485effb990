use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List operations by category with their scope and status.
    List {
        /// Never fetch the status feed; every status shows as unknown.
        #[arg(long)]
        no_health: bool,
        #[command(flatten)]
        client: ClientArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Call one operation.
    Call {
        operation: String,
        /// Look the operation up in this category only.
        #[arg(long)]
        category: Option<String>,
        /// Parameter value; parsed as JSON when possible, otherwise taken as a string.
        #[arg(long = "param", short = 'p', value_name = "NAME=VALUE")]
        params: Vec<String>,
        #[arg(long, env = "SWAGCALL_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// Space-separated scopes granted to the token.
        #[arg(long)]
        scopes: Option<String>,
        #[command(flatten)]
        client: ClientArgs,
        #[command(flatten)]
        reporting: EventArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show the health score, or one operation's status.
    Health {
        operation: Option<String>,
        #[command(flatten)]
        client: ClientArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show the loaded spec's info block and base URL.
    Info {
        #[command(flatten)]
        client: ClientArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}
