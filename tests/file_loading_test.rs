//! Rules and configuration read from disk

use qrule_logic::{analyze_rule, AnalyzerConfig, DiagnosticKind, Error, Rule};
use std::fs;
use tempfile::TempDir;

const CONFIG_YAML: &str = r#"
entity_identifiers: [ContractID]
domains:
  Priority: { kind: integer, min: 1, max: 20 }
  DODAAC:
    kind: string
    initial: { chars: "FHNSW" }
    max_length: 6
"#;

const RULE_YAML: &str = r#"
id: Q-1041
name: Preferred vendor
test:
  op: AND
  operands:
    - left: { name: Priority, type: Integer }
      operator: ">="
      right: { integer: 1 }
    - left: { name: DODAAC, type: DODAACType }
      operator: eq
      right: { string: "A12345" }
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_analyze_with_config_file() {
    let dir = TempDir::new().unwrap();
    let config_path = write(&dir, "analyzer.yaml", CONFIG_YAML);
    let rule_path = write(&dir, "q-1041.yaml", RULE_YAML);

    let config = AnalyzerConfig::load(&config_path).unwrap();
    let rule = Rule::parse(&fs::read_to_string(&rule_path).unwrap()).unwrap();
    let report = analyze_rule(&rule, &config);

    let kinds: Vec<_> = report.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        [DiagnosticKind::Tautology, DiagnosticKind::DomainViolation]
    );
    assert_eq!(report.diagnostics[0].attribute.as_deref(), Some("Priority"));
    assert_eq!(report.diagnostics[1].attribute.as_deref(), Some("DODAAC"));
}

#[test]
fn test_same_rule_without_domains_is_clean() {
    let rule = Rule::from_yaml(RULE_YAML).unwrap();
    let report = analyze_rule(&rule, &AnalyzerConfig::default());
    assert!(report.is_consistent);
}

#[test]
fn test_json_rule_file() {
    let dir = TempDir::new().unwrap();
    let rule = Rule::from_yaml(RULE_YAML).unwrap();
    let path = write(&dir, "q-1041.json", &rule.to_json().unwrap());

    let loaded = Rule::parse(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded, rule);
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let err = AnalyzerConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_malformed_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.yaml", "domains:\n  Priority: { kind: nonsense }\n");
    let err = AnalyzerConfig::load(&path).unwrap_err();
    match err {
        Error::Config(message) => {
            assert!(message.contains("bad.yaml"));
            assert!(!message.contains("Configuration error"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_report_serializes() {
    let rule = Rule::from_yaml(RULE_YAML).unwrap();
    let config = AnalyzerConfig::from_yaml(CONFIG_YAML).unwrap();
    let report = analyze_rule(&rule, &config);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["rule_id"], "Q-1041");
    assert_eq!(json["error_count"], 1);
    assert_eq!(json["warning_count"], 1);
    assert_eq!(json["diagnostics"][0]["kind"], "tautology");
    assert_eq!(json["diagnostics"][0]["scope"]["clause"], "main");
}
