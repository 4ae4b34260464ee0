//! Rule analysis CLI commands

use super::util::{load_config, parse_config_arg, read_rule};
use qrule_logic::*;

pub fn cmd_check(args: &[String]) -> Result<()> {
    if args.is_empty() {
        return Err("Usage: qrule check <rule.yaml> [--config <file>] [--json] [--strict]".into());
    }

    let rule_path = &args[0];
    let json_output = args.contains(&"--json".to_string());
    let strict = args.contains(&"--strict".to_string());
    let config = load_config(parse_config_arg(args).as_deref())?;

    let rule = read_rule(rule_path)?;
    let report = analyze_rule(&rule, &config);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&rule, &report);
    }

    if report.error_count > 0 {
        return Err(format!("{} error(s) in rule {}", report.error_count, report.rule_id).into());
    }
    if strict && report.warning_count > 0 {
        return Err(format!(
            "{} warning(s) in rule {} (strict mode)",
            report.warning_count, report.rule_id
        )
        .into());
    }
    Ok(())
}

fn print_report(rule: &Rule, report: &AnalysisReport) {
    let title = match &rule.name {
        Some(name) => format!("{} ({})", rule.id, name),
        None => rule.id.clone(),
    };

    if report.is_consistent {
        println!("✓ {}: no logical defects found", title);
        return;
    }

    println!("{}", title);
    for diagnostic in &report.diagnostics {
        let prefix = match diagnostic.severity() {
            Severity::Error => "✗",
            Severity::Warning => "⚠",
        };
        println!("  {} {}", prefix, diagnostic);
    }

    println!();
    if report.error_count > 0 {
        println!(
            "✗ {} error(s), {} warning(s)",
            report.error_count, report.warning_count
        );
    } else {
        println!("✓ {} warning(s) (no errors)", report.warning_count);
    }
}

pub fn cmd_show(args: &[String]) -> Result<()> {
    if args.is_empty() {
        return Err("Usage: qrule show <rule.yaml>".into());
    }

    let rule = read_rule(&args[0])?;
    println!("{}", rule);

    let exceptions: Vec<_> = rule.exceptions().collect();
    if !exceptions.is_empty() {
        println!();
        println!("Exceptions:");
        for exception in exceptions {
            println!("  {}", exception);
        }
    }
    Ok(())
}
