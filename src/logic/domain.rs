//! Whole-rule analysis: the main clause, its exceptions, and how the
//! exceptions relate to each other

use super::clause::ConditionClause;
use super::diagnostic::{Diagnostic, DiagnosticKind, Scope, Severity};
use super::factory::RangeFactory;
use crate::config::AnalyzerConfig;
use crate::rule::Rule;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A rule split into its main clause and exception clauses
#[derive(Debug, Clone)]
pub struct LogicalDomain {
    rule_id: String,
    main: ConditionClause,
    exceptions: Vec<ConditionClause>,
}

impl LogicalDomain {
    pub fn new(rule: &Rule, config: &AnalyzerConfig) -> Self {
        let factory = RangeFactory::new(config);
        let main = ConditionClause::new(&rule.test, &factory);
        let exceptions: Vec<_> = rule
            .exceptions()
            .map(|test| ConditionClause::new(test, &factory))
            .collect();
        debug!(rule = %rule.id, exceptions = exceptions.len(), "built logical domain");
        Self {
            rule_id: rule.id.clone(),
            main,
            exceptions,
        }
    }

    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    pub fn main_clause(&self) -> &ConditionClause {
        &self.main
    }

    pub fn exceptions(&self) -> &[ConditionClause] {
        &self.exceptions
    }

    /// Run all three passes: the main clause alone, each exception against
    /// the main clause, then every ordered pair of exceptions.
    pub fn analyze(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self.main.is_consistent(None);
        for exception in &self.exceptions {
            diagnostics.extend(exception.is_consistent(Some(&self.main)));
        }
        for (i, ex) in self.exceptions.iter().enumerate() {
            for (j, fx) in self.exceptions.iter().enumerate() {
                if i != j && ex.contains(fx) {
                    diagnostics.push(Diagnostic::new(
                        Scope::Rule,
                        DiagnosticKind::ExceptionImplies,
                        format!("{} implies {}", appellation(fx), appellation(ex)),
                    ));
                }
            }
        }
        debug!(rule = %self.rule_id, diagnostics = diagnostics.len(), "analysis complete");
        diagnostics
    }

    /// Diagnostics rendered with their clause prefixes
    pub fn messages(&self) -> Vec<String> {
        self.analyze().iter().map(ToString::to_string).collect()
    }
}

fn appellation(clause: &ConditionClause) -> String {
    match clause.name() {
        Some(name) => format!("exception \"{}\"", name),
        None => "unnamed exception".to_string(),
    }
}

/// Outcome of analyzing one rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "AnalysisReport", description = "Logical consistency findings for one rule")]
pub struct AnalysisReport {
    pub rule_id: String,

    /// True when the analysis found nothing at all
    pub is_consistent: bool,

    pub error_count: usize,
    pub warning_count: usize,

    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisReport {
    fn new(rule_id: String, diagnostics: Vec<Diagnostic>) -> Self {
        let error_count = diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Error)
            .count();
        Self {
            rule_id,
            is_consistent: diagnostics.is_empty(),
            error_count,
            warning_count: diagnostics.len() - error_count,
            diagnostics,
        }
    }
}

/// Analyze a rule under the given configuration
pub fn analyze_rule(rule: &Rule, config: &AnalyzerConfig) -> AnalysisReport {
    let domain = LogicalDomain::new(rule, config);
    AnalysisReport::new(rule.id.clone(), domain.analyze())
}
