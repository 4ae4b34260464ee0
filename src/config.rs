//! Analyzer configuration
//!
//! Everything the analyzer knows about the surrounding rule engine comes in
//! through [`AnalyzerConfig`]: which attributes identify an entity, how each
//! rule-engine encoding spells its comparison operators, which declared type
//! tags map to which kind of range, and optional per-attribute domains.
//!
//! All fields have defaults, so an empty YAML document is a valid config:
//!
//! ```yaml
//! entity_identifiers: [ContractID, NSN, MfgCAGEPN]
//! operators:
//!   numeric: { equal: "=", not_equal: "<>", greater_than: ">", less_than: "<",
//!              greater_or_equal: ">=", less_or_equal: "<=" }
//! types:
//!   group_types: [CustomerType, ItemType]
//! domains:
//!   Priority: { kind: integer, min: 1, max: 20 }
//!   Markup: { kind: decimal, min: 0.0, min_inclusive: false }
//!   DODAAC: { kind: string, initial: { chars: "FHNSW" }, max_length: 6 }
//! ```

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Complete analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzerConfig {
    /// Attributes whose equality constraint pins down one entity instance
    #[serde(default = "default_entity_identifiers")]
    pub entity_identifiers: Vec<String>,

    /// Operator spellings, per kind of range
    #[serde(default)]
    pub operators: OperatorVocabulary,

    /// Declared type tags beyond the built-in ones
    #[serde(default)]
    pub types: TypeTags,

    /// Value domains, keyed by attribute internal name
    #[serde(default)]
    pub domains: HashMap<String, AttributeDomain>,
}

fn default_entity_identifiers() -> Vec<String> {
    vec!["ContractID".into(), "NSN".into(), "MfgCAGEPN".into()]
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            entity_identifiers: default_entity_identifiers(),
            operators: OperatorVocabulary::default(),
            types: TypeTags::default(),
            domains: HashMap::new(),
        }
    }
}

impl AnalyzerConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_norway::from_str(yaml).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_norway::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Is this attribute one of the configured entity identifiers?
    pub fn is_entity_identifier(&self, attribute: &str) -> bool {
        self.entity_identifiers.iter().any(|id| id == attribute)
    }

    /// Declare a value domain for an attribute
    pub fn with_domain(mut self, attribute: impl Into<String>, domain: AttributeDomain) -> Self {
        self.domains.insert(attribute.into(), domain);
        self
    }

    pub fn domain_for(&self, attribute: &str) -> Option<&AttributeDomain> {
        self.domains.get(attribute)
    }
}

// ============================================================================
// Operator vocabularies
// ============================================================================

/// Operator names recognized by each kind of range
///
/// The same logical relation may be spelled differently per rule-engine
/// encoding (`eq` for strings, `=` for numbers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OperatorVocabulary {
    pub boolean: BooleanOperators,
    pub numeric: NumericOperators,
    pub string: StringOperators,
    pub date: DateOperators,
    pub group: MembershipOperators,
    pub geographic: MembershipOperators,
}

impl Default for OperatorVocabulary {
    fn default() -> Self {
        Self {
            boolean: BooleanOperators::default(),
            numeric: NumericOperators::default(),
            string: StringOperators::default(),
            date: DateOperators::default(),
            group: MembershipOperators {
                member: "inGroup".into(),
                not_member: "notInGroup".into(),
            },
            geographic: MembershipOperators {
                member: "inRegion".into(),
                not_member: "notInRegion".into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BooleanOperators {
    pub is: String,
    pub is_not: Option<String>,
}

impl Default for BooleanOperators {
    fn default() -> Self {
        Self {
            is: "eq".into(),
            is_not: Some("neq".into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NumericOperators {
    pub equal: String,
    pub not_equal: String,
    pub greater_than: String,
    pub less_than: String,
    pub greater_or_equal: String,
    pub less_or_equal: String,
}

impl Default for NumericOperators {
    fn default() -> Self {
        Self {
            equal: "=".into(),
            not_equal: "<>".into(),
            greater_than: ">".into(),
            less_than: "<".into(),
            greater_or_equal: ">=".into(),
            less_or_equal: "<=".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StringOperators {
    pub equal: String,
    pub not_equal: String,
    pub member: String,
    pub not_member: String,
}

impl Default for StringOperators {
    fn default() -> Self {
        Self {
            equal: "eq".into(),
            not_equal: "neq".into(),
            member: "isMember".into(),
            not_member: "isNotMember".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DateOperators {
    pub same_day: String,
    pub after: String,
    pub before: String,
}

impl Default for DateOperators {
    fn default() -> Self {
        Self {
            same_day: "dateSameDay".into(),
            after: "dateAfter".into(),
            before: "dateBefore".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MembershipOperators {
    pub member: String,
    pub not_member: String,
}

/// Boolean relations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Is,
    IsNot,
}

/// Numeric relations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

/// String relations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringOp {
    Eq,
    Ne,
    In,
    NotIn,
}

/// Calendar-day relations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOp {
    SameDay,
    After,
    Before,
}

/// Set membership relations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOp {
    In,
    NotIn,
}

impl BooleanOperators {
    pub fn resolve(&self, name: &str) -> Option<BooleanOp> {
        if name == self.is {
            Some(BooleanOp::Is)
        } else if self.is_not.as_deref() == Some(name) {
            Some(BooleanOp::IsNot)
        } else {
            None
        }
    }
}

impl NumericOperators {
    pub fn resolve(&self, name: &str) -> Option<NumericOp> {
        [
            (&self.equal, NumericOp::Eq),
            (&self.not_equal, NumericOp::Ne),
            (&self.greater_than, NumericOp::Gt),
            (&self.less_than, NumericOp::Lt),
            (&self.greater_or_equal, NumericOp::Ge),
            (&self.less_or_equal, NumericOp::Le),
        ]
        .into_iter()
        .find(|(spelling, _)| spelling.as_str() == name)
        .map(|(_, op)| op)
    }
}

impl StringOperators {
    pub fn resolve(&self, name: &str) -> Option<StringOp> {
        [
            (&self.equal, StringOp::Eq),
            (&self.not_equal, StringOp::Ne),
            (&self.member, StringOp::In),
            (&self.not_member, StringOp::NotIn),
        ]
        .into_iter()
        .find(|(spelling, _)| spelling.as_str() == name)
        .map(|(_, op)| op)
    }
}

impl DateOperators {
    pub fn resolve(&self, name: &str) -> Option<DateOp> {
        if name == self.same_day {
            Some(DateOp::SameDay)
        } else if name == self.after {
            Some(DateOp::After)
        } else if name == self.before {
            Some(DateOp::Before)
        } else {
            None
        }
    }
}

impl MembershipOperators {
    pub fn resolve(&self, name: &str) -> Option<MembershipOp> {
        if name == self.member {
            Some(MembershipOp::In)
        } else if name == self.not_member {
            Some(MembershipOp::NotIn)
        } else {
            None
        }
    }
}

// ============================================================================
// Type tags
// ============================================================================

/// The kinds of attribute the analyzer can reason about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Boolean,
    Integer,
    Decimal,
    String { max_length: Option<usize> },
    Date,
    DiscreteGroup,
    Geographic,
}

/// Domain-specific type tags and the kind of range each one gets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TypeTags {
    /// Tags whose values are plain strings
    pub string_types: Vec<String>,

    /// Tags whose values are named groups
    pub group_types: Vec<String>,

    /// Tags whose values are `geography:region` pairs
    pub geographic_types: Vec<String>,
}

impl Default for TypeTags {
    fn default() -> Self {
        Self {
            string_types: [
                "DODAACType",
                "PrimeVendorType",
                "HazMatCodeType",
                "UIType",
                "AdviceCodeType",
                "DebarredStatus",
                "DeliveryDaysCode",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            group_types: vec!["CustomerType".into(), "ItemType".into()],
            geographic_types: vec!["PhysicalAddressType".into()],
        }
    }
}

impl TypeTags {
    /// Map a declared type tag onto a value type, or `None` if unsupported
    pub fn resolve(&self, tag: &str) -> Option<ValueType> {
        let tag = tag.trim();
        if tag == "boolean" {
            return Some(ValueType::Boolean);
        }
        if tag == "Float" || tag == "Currency" {
            return Some(ValueType::Decimal);
        }
        if tag == "Date" {
            return Some(ValueType::Date);
        }
        if tag.starts_with("Integer") {
            return Some(ValueType::Integer);
        }
        if let Some(rest) = tag.strip_prefix("String") {
            let max_length = rest
                .strip_prefix('(')
                .and_then(|r| r.strip_suffix(')'))
                .and_then(|n| n.trim().parse().ok());
            return Some(ValueType::String { max_length });
        }
        if self.string_types.iter().any(|t| t == tag) {
            return Some(ValueType::String { max_length: None });
        }
        if self.group_types.iter().any(|t| t == tag) {
            return Some(ValueType::DiscreteGroup);
        }
        if self.geographic_types.iter().any(|t| t == tag) {
            return Some(ValueType::Geographic);
        }
        None
    }
}

// ============================================================================
// Attribute domains
// ============================================================================

/// The set of values an attribute can ever take
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AttributeDomain {
    Integer(IntegerDomain),
    Decimal(DecimalDomain),
    String(StringDomain),
}

/// Inclusive integer bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct IntegerDomain {
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
}

/// Real interval, each end open or closed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DecimalDomain {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default = "default_true")]
    pub min_inclusive: bool,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default = "default_true")]
    pub max_inclusive: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DecimalDomain {
    fn default() -> Self {
        Self {
            min: None,
            min_inclusive: true,
            max: None,
            max_inclusive: true,
        }
    }
}

/// Character-level restrictions on string values
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct StringDomain {
    /// Characters allowed (or, inverted, forbidden) in first position
    #[serde(default)]
    pub initial: Option<CharSet>,

    /// Characters allowed (or forbidden) after the first
    #[serde(default)]
    pub rest: Option<CharSet>,

    #[serde(default)]
    pub max_length: Option<usize>,
}

/// A set of characters, possibly inverted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CharSet {
    pub chars: String,
    #[serde(default)]
    pub inverted: bool,
}

impl CharSet {
    pub fn new(chars: impl Into<String>) -> Self {
        Self {
            chars: chars.into(),
            inverted: false,
        }
    }

    pub fn inverted(chars: impl Into<String>) -> Self {
        Self {
            chars: chars.into(),
            inverted: true,
        }
    }

    pub fn admits(&self, c: char) -> bool {
        self.chars.contains(c) != self.inverted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = AnalyzerConfig::from_yaml("{}").unwrap();
        assert!(config.is_entity_identifier("ContractID"));
        assert!(config.is_entity_identifier("NSN"));
        assert!(!config.is_entity_identifier("Priority"));
        assert_eq!(config.operators.numeric.greater_or_equal, ">=");
        assert_eq!(config.operators.string.member, "isMember");
    }

    #[test]
    fn test_standard_vocabulary() {
        let vocab = OperatorVocabulary::default();
        assert_eq!(vocab.group.resolve("inGroup"), Some(MembershipOp::In));
        assert_eq!(
            vocab.geographic.resolve("notInRegion"),
            Some(MembershipOp::NotIn)
        );
        assert_eq!(vocab.numeric.resolve("<>"), Some(NumericOp::Ne));
        assert_eq!(vocab.numeric.resolve("=="), None);
        assert_eq!(vocab.boolean.resolve("neq"), Some(BooleanOp::IsNot));
        assert_eq!(vocab.date.resolve("dateAfter"), Some(DateOp::After));
        assert_eq!(vocab.string.resolve("isNotMember"), Some(StringOp::NotIn));
    }

    #[test]
    fn test_resolve_type_tags() {
        let tags = TypeTags::default();
        assert_eq!(tags.resolve("boolean"), Some(ValueType::Boolean));
        assert_eq!(tags.resolve("Integer"), Some(ValueType::Integer));
        assert_eq!(tags.resolve("Integer(4)"), Some(ValueType::Integer));
        assert_eq!(tags.resolve("Float"), Some(ValueType::Decimal));
        assert_eq!(tags.resolve("Currency"), Some(ValueType::Decimal));
        assert_eq!(tags.resolve("Date"), Some(ValueType::Date));
        assert_eq!(
            tags.resolve("String(30)"),
            Some(ValueType::String {
                max_length: Some(30)
            })
        );
        assert_eq!(
            tags.resolve("String"),
            Some(ValueType::String { max_length: None })
        );
        assert_eq!(
            tags.resolve("DODAACType"),
            Some(ValueType::String { max_length: None })
        );
        assert_eq!(tags.resolve("CustomerType"), Some(ValueType::DiscreteGroup));
        assert_eq!(
            tags.resolve("PhysicalAddressType"),
            Some(ValueType::Geographic)
        );
        assert_eq!(tags.resolve("Blob"), None);
    }

    #[test]
    fn test_domains_from_yaml() {
        let config = AnalyzerConfig::from_yaml(
            r#"
entity_identifiers: [ContractID]
domains:
  Priority: { kind: integer, min: 1, max: 20 }
  Markup: { kind: decimal, min: 0.0, min_inclusive: false }
  DODAAC:
    kind: string
    initial: { chars: "FHNSW" }
    rest: { chars: " ", inverted: true }
"#,
        )
        .unwrap();

        assert!(!config.is_entity_identifier("NSN"));
        assert_eq!(
            config.domain_for("Priority"),
            Some(&AttributeDomain::Integer(IntegerDomain {
                min: Some(1),
                max: Some(20)
            }))
        );
        match config.domain_for("Markup") {
            Some(AttributeDomain::Decimal(d)) => {
                assert_eq!(d.min, Some(0.0));
                assert!(!d.min_inclusive);
                assert!(d.max.is_none());
                assert!(d.max_inclusive);
            }
            other => panic!("unexpected domain {:?}", other),
        }
        match config.domain_for("DODAAC") {
            Some(AttributeDomain::String(s)) => {
                let initial = s.initial.as_ref().unwrap();
                assert!(initial.admits('F'));
                assert!(!initial.admits('A'));
                let rest = s.rest.as_ref().unwrap();
                assert!(rest.admits('A'));
                assert!(!rest.admits(' '));
            }
            other => panic!("unexpected domain {:?}", other),
        }
    }

    #[test]
    fn test_bad_yaml_is_config_error() {
        let err = AnalyzerConfig::from_yaml("entity_identifiers: 7").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
