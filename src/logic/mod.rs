//! Logical consistency analysis
//!
//! - `range`: per-attribute value sets and their flags
//! - `factory`: type tag to range variant
//! - `clause`: main conditions or one exception, grouped by attribute
//! - `domain`: the whole rule, including exception-to-exception checks
//! - `diagnostic`: structured findings

pub mod clause;
pub mod diagnostic;
pub mod domain;
pub mod factory;
pub mod range;

pub use clause::ConditionClause;
pub use diagnostic::{Diagnostic, DiagnosticKind, Scope, Severity};
pub use domain::{analyze_rule, AnalysisReport, LogicalDomain};
pub use factory::RangeFactory;
pub use range::{AttributeRange, RangeFlags, RangeValues};
