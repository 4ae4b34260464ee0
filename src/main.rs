//! QRule CLI - Command-line interface
//!
//! Commands:
//!   check    - Analyze a rule for logical defects
//!   show     - Print a rule's test tree
//!   schema   - Print JSON schemas
//!   version  - Print the version

mod cli;

use cli::*;
use qrule_logic::VERSION;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "check" => cmd_check(&args[2..]),
        "show" => cmd_show(&args[2..]),
        "schema" => cmd_schema(&args[2..]),
        "version" | "--version" | "-v" => {
            println!("qrule {}", VERSION);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            Err("Unknown command".into())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default `warn` level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_usage() {
    println!(
        r#"
QRule - Logical consistency analysis for qualification rules

USAGE:
    qrule <COMMAND> [OPTIONS]

COMMANDS:
    check <rule.yaml|rule.json>      Report contradictions, redundancies,
                                     tautologies and exception defects
    show <rule.yaml|rule.json>       Print the rule's test tree
    schema [name]                    Print JSON schema (report, rule, config)
    version                          Print version

OPTIONS:
    --config <file>                  Analyzer configuration (YAML)
    --json                           JSON output format (check)
    --strict                         Fail on warnings as well as errors (check)

ENVIRONMENT:
    RUST_LOG                         Log filter, e.g. RUST_LOG=qrule_logic=debug

EXAMPLES:
    qrule check rules/q-1041.yaml
    qrule check rules/q-1041.yaml --config analyzer.yaml --json
    qrule schema report > report.schema.json
"#
    );
}
