use crate::exit_codes;
use crate::output::{print_result, OutputFormat};
use crate::utils::connect;
use crate::{ClientArgs, OutputArgs};

pub async fn list_cmd(args: &ClientArgs, no_health: bool, output: OutputArgs) -> i32 {
    let client = match connect(args, None, !no_health, &output).await {
        Ok(c) => c,
        Err(code) => return code,
    };
    if !no_health {
        client.refresh_health().await;
    }

    let listing = client.listing();
    if output.format == OutputFormat::Text && !output.quiet {
        for (category, ops) in &listing {
            println!("{category}:");
            for (op, entry) in ops {
                match &entry.scope {
                    Some(scope) => println!("  - {op} [{}] ({scope})", entry.status),
                    None => println!("  - {op} [{}]", entry.status),
                }
            }
        }
    } else {
        print_result(output.format, output.quiet, &listing);
    }

    exit_codes::SUCCESS
}
