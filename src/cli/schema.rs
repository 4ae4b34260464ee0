//! Schema CLI command

use qrule_logic::*;

pub fn cmd_schema(args: &[String]) -> Result<()> {
    let schema_name = args.first().map(|s| s.as_str()).unwrap_or("list");

    match schema_name {
        "list" => {
            println!("Available schemas: report, rule, config");
            Ok(())
        }
        "report" => print_schema::<AnalysisReport>(),
        "rule" => print_schema::<Rule>(),
        "config" => print_schema::<AnalyzerConfig>(),
        _ => Err(format!("Unknown schema: {}", schema_name).into()),
    }
}

fn print_schema<T: schemars::JsonSchema>() -> Result<()> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
