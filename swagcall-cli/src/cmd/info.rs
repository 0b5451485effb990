use serde::Serialize;

use crate::exit_codes;
use crate::output::{print_result, OutputFormat};
use crate::utils::connect;
use crate::{ClientArgs, OutputArgs};

#[derive(Serialize)]
struct InfoResult {
    base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    info: Option<serde_json::Value>,
    categories: Vec<String>,
    operations: usize,
}

pub async fn info_cmd(args: &ClientArgs, output: OutputArgs) -> i32 {
    let client = match connect(args, None, false, &output).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    let catalog = client.catalog();
    let result = InfoResult {
        base_url: catalog.base_url().to_string(),
        info: catalog.info().cloned(),
        categories: catalog.categories().map(str::to_string).collect(),
        operations: catalog.operations().count(),
    };

    if output.format == OutputFormat::Text && !output.quiet {
        let title = result
            .info
            .as_ref()
            .and_then(|i| i.get("title"))
            .and_then(|t| t.as_str())
            .unwrap_or("(untitled)");
        let version = result
            .info
            .as_ref()
            .and_then(|i| i.get("version"))
            .and_then(|v| v.as_str())
            .unwrap_or("?");
        println!("{title} {version}");
        println!("base url: {}", result.base_url);
        println!(
            "{} operations in {} categories",
            result.operations,
            result.categories.len()
        );
    } else {
        print_result(output.format, output.quiet, &result);
    }

    exit_codes::SUCCESS
}
