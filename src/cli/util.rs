//! CLI utility helpers

use qrule_logic::{AnalyzerConfig, Error, Result, Rule};
use std::fs;
use std::path::{Path, PathBuf};

/// Value following a flag such as `--config`
pub fn parse_flag_value(args: &[String], flags: &[&str]) -> Option<String> {
    for (i, arg) in args.iter().enumerate() {
        if flags.contains(&arg.as_str()) {
            return args.get(i + 1).cloned();
        }
    }
    None
}

/// Parse --config argument to determine the configuration file
pub fn parse_config_arg(args: &[String]) -> Option<PathBuf> {
    parse_flag_value(args, &["--config", "-c"]).map(PathBuf::from)
}

/// Load the configuration file if given, defaults otherwise
pub fn load_config(path: Option<&Path>) -> Result<AnalyzerConfig> {
    match path {
        Some(p) => AnalyzerConfig::load(p),
        None => Ok(AnalyzerConfig::default()),
    }
}

/// Read and parse a YAML or JSON rule file
pub fn read_rule(path: &str) -> Result<Rule> {
    let content = fs::read_to_string(path).map_err(Error::Io)?;
    Rule::parse(&content)
}
