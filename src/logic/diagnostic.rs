//! Diagnostics produced by the logical analysis

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where in the rule a diagnostic applies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "clause", content = "name", rename_all = "snake_case")]
pub enum Scope {
    /// The rule's main conditions
    Main,
    /// An exception clause, by name when it has one
    Exception(Option<String>),
    /// Relations between clauses
    Rule,
}

/// The defect a diagnostic reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An entity identifier category pinned by more than one attribute
    DuplicateIdentifier,
    /// The main clause has nothing analyzable; the rule always fires
    NoConditions,
    /// An exception with nothing analyzable blocks the rule always
    UnqualifiedException,
    Contradiction,
    Redundancy,
    Tautology,
    DomainViolation,
    /// An attribute whose declared type has no range; its conditions were skipped
    UnsupportedType,
    /// Exception constraints on an entity the main clause already pins down
    IrrelevantToMain,
    /// Constraints on an attribute of an entity the same clause pins down
    IrrelevantToEntity,
    ImpliedByMain,
    PrecludedByMain,
    /// One exception can only apply when another does
    ExceptionImplies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl DiagnosticKind {
    /// Errors make the rule wrong; warnings make it sloppy
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::DuplicateIdentifier
            | DiagnosticKind::UnqualifiedException
            | DiagnosticKind::Contradiction
            | DiagnosticKind::DomainViolation
            | DiagnosticKind::PrecludedByMain => Severity::Error,
            DiagnosticKind::NoConditions
            | DiagnosticKind::Redundancy
            | DiagnosticKind::Tautology
            | DiagnosticKind::UnsupportedType
            | DiagnosticKind::IrrelevantToMain
            | DiagnosticKind::IrrelevantToEntity
            | DiagnosticKind::ImpliedByMain
            | DiagnosticKind::ExceptionImplies => Severity::Warning,
        }
    }
}

/// One finding about a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Diagnostic {
    pub scope: Scope,
    pub kind: DiagnosticKind,

    /// Internal name of the attribute concerned, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,

    /// Human-readable description, without the scope prefix
    pub message: String,
}

impl Diagnostic {
    pub fn new(scope: Scope, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            scope,
            kind,
            attribute: None,
            message: message.into(),
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Scope::Main => write!(f, "In the main clause:  {}", self.message),
            Scope::Exception(Some(name)) => write!(f, "In exception \"{}\":  {}", name, self.message),
            Scope::Exception(None) => write!(f, "In unnamed exception:  {}", self.message),
            Scope::Rule => write!(f, "{}", self.message),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}
