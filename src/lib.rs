// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # QRule Logic
//!
//! Logical consistency analysis for qualification rules.
//!
//! ## Core Concept
//!
//! A qualification rule is a conjunction of comparisons between typed
//! attributes and literals, plus exception clauses (`NAND` subtrees) that
//! block the rule when they hold. For each attribute the analyzer builds the
//! set of values the conditions admit, then reports:
//!
//! - **Contradictions**: no value satisfies an attribute's conditions
//! - **Redundancies**: some condition narrows nothing
//! - **Tautologies**: a condition always holds within the attribute's domain
//! - **Domain violations**: literals the attribute can never take
//! - **Exception defects**: exceptions implied by, precluded by, or
//!   irrelevant to the main conditions, and exceptions implying each other
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use qrule_logic::{analyze_rule, AnalyzerConfig, Rule};
//!
//! let rule = Rule::from_yaml(r#"
//!   id: Q-1041
//!   test:
//!     op: AND
//!     operands:
//!       - left: { name: Priority, type: Integer }
//!         operator: ">="
//!         right: { integer: 1 }
//!       - left: { name: Priority, type: Integer }
//!         operator: "<="
//!         right: { integer: 15 }
//!       - op: NAND
//!         name: Urgent
//!         operands:
//!           - left: { name: Priority, type: Integer }
//!             operator: ">="
//!             right: { integer: 20 }
//! "#)?;
//!
//! let report = analyze_rule(&rule, &AnalyzerConfig::default());
//! for diagnostic in &report.diagnostics {
//!     println!("{}", diagnostic);
//! }
//! // In exception "Urgent":  the constraints on "Priority" are precluded by the main conditions
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                             │
//! │  Rule ──► LogicalDomain                                     │
//! │              │                                              │
//! │              ├──► main ConditionClause                      │
//! │              └──► exception ConditionClause (per NAND)      │
//! │                        │                                    │
//! │                        └──► RangeFactory ──► AttributeRange │
//! │                                                             │
//! │  analyze() ──► Vec<Diagnostic> ──► AnalysisReport           │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod logic;
pub mod rule;

// Re-exports
pub use config::{AnalyzerConfig, AttributeDomain, OperatorVocabulary, TypeTags, ValueType};
pub use error::{Error, Result};
pub use logic::{
    analyze_rule, AnalysisReport, AttributeRange, ConditionClause, Diagnostic, DiagnosticKind,
    LogicalDomain, RangeFactory, RangeFlags, RangeValues, Scope, Severity,
};
pub use rule::{AttributeRef, Comparison, Literal, LogicalOp, LogicalTest, Operand, Rule, Test};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
