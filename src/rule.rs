//! Rule types: the analyzer's input model
//!
//! A `Rule` is a tree of tests rooted in a conjunction. Each leaf is an
//! atomic comparison between an attribute and a literal (or, less usefully,
//! another attribute). A `NAND` test directly beneath the root is an
//! exception clause: when all of its conditions hold, the rule is blocked.
//!
//! ## Example Rule
//!
//! ```yaml
//! id: Q-1041
//! name: "Preferred vendor for priority orders"
//! test:
//!   op: AND
//!   operands:
//!     - left: { name: Priority, ui_name: Priority, ui_category: Order, type: Integer }
//!       operator: ">="
//!       right: { integer: 1 }
//!     - left: { name: Priority, ui_name: Priority, ui_category: Order, type: Integer }
//!       operator: "<="
//!       right: { integer: 15 }
//!     - op: NAND
//!       name: "Remote depots"
//!       operands:
//!         - left: { name: Region, type: "String(20)" }
//!           operator: isMember
//!           right: { list: ["Pacific", "Alaska"] }
//! ```

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A qualification rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "QRule", description = "Qualification rule test tree")]
pub struct Rule {
    /// Unique identifier
    pub id: String,

    /// Human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Root of the test tree; analyzed as a conjunction
    pub test: LogicalTest,
}

/// Logical connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOp {
    #[default]
    And,
    Or,
    Nand,
    Nor,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::And => write!(f, "AND"),
            LogicalOp::Or => write!(f, "OR"),
            LogicalOp::Nand => write!(f, "NAND"),
            LogicalOp::Nor => write!(f, "NOR"),
        }
    }
}

/// A test combining subordinate tests with a logical connective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LogicalTest {
    pub op: LogicalOp,

    /// User-assigned name (meaningful for exception clauses)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub operands: Vec<Test>,
}

/// A node in the test tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Test {
    Logical(LogicalTest),
    Comparison(Comparison),
}

/// An atomic comparison: `left operator right`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Comparison {
    pub left: Operand,

    /// Internal operator name, interpreted per attribute type through the
    /// configured operator vocabulary
    pub operator: String,

    pub right: Operand,
}

/// One side of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Operand {
    Attribute(AttributeRef),
    Literal(Literal),
}

/// Reference to a named, typed attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct AttributeRef {
    /// Internal name; comparisons are grouped by it
    pub name: String,

    /// Name shown to users
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_name: Option<String>,

    /// UI category; for entity identifiers, the kind of entity identified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_category: Option<String>,

    /// Declared value type, e.g. `Integer`, `String(30)`, `Float`, `boolean`
    #[serde(rename = "type")]
    pub type_tag: String,
}

/// A typed literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Literal {
    Integer(i64),
    Decimal(f64),
    String(String),
    Boolean(bool),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    List(Vec<String>),
}

impl Rule {
    /// Create a rule from a root test
    pub fn new(id: impl Into<String>, test: LogicalTest) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            test,
        }
    }

    /// Set the human-readable name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parse rule from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_norway::from_str(yaml).map_err(|e| Error::RuleParse(e.to_string()))
    }

    /// Serialize rule to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_norway::to_string(self)?)
    }

    /// Parse rule from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::RuleParse(e.to_string()))
    }

    /// Serialize rule to JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a rule, choosing JSON when the text looks like a JSON object
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim_start().starts_with('{') {
            Self::from_json(text)
        } else {
            Self::from_yaml(text)
        }
    }

    /// Exception clauses: the `NAND` tests immediately under the root
    pub fn exceptions(&self) -> impl Iterator<Item = &LogicalTest> {
        self.test
            .operands
            .iter()
            .filter_map(Test::logical)
            .filter(|t| t.op == LogicalOp::Nand)
    }
}

impl LogicalTest {
    pub fn new(op: LogicalOp, operands: Vec<Test>) -> Self {
        Self {
            op,
            name: None,
            operands,
        }
    }

    /// A conjunction of the given tests
    pub fn and(operands: Vec<Test>) -> Self {
        Self::new(LogicalOp::And, operands)
    }

    /// An exception clause
    pub fn nand(name: Option<&str>, operands: Vec<Test>) -> Self {
        Self {
            op: LogicalOp::Nand,
            name: name.map(str::to_string),
            operands,
        }
    }

    /// Atomic comparisons among the immediate operands
    pub fn comparisons(&self) -> impl Iterator<Item = &Comparison> {
        self.operands.iter().filter_map(Test::comparison)
    }
}

impl Test {
    pub fn comparison(&self) -> Option<&Comparison> {
        match self {
            Test::Comparison(c) => Some(c),
            Test::Logical(_) => None,
        }
    }

    pub fn logical(&self) -> Option<&LogicalTest> {
        match self {
            Test::Logical(t) => Some(t),
            Test::Comparison(_) => None,
        }
    }
}

impl From<Comparison> for Test {
    fn from(c: Comparison) -> Self {
        Test::Comparison(c)
    }
}

impl From<LogicalTest> for Test {
    fn from(t: LogicalTest) -> Self {
        Test::Logical(t)
    }
}

impl Comparison {
    /// Compare an attribute with a literal
    pub fn new(attribute: AttributeRef, operator: impl Into<String>, value: Literal) -> Self {
        Self {
            left: Operand::Attribute(attribute),
            operator: operator.into(),
            right: Operand::Literal(value),
        }
    }

    /// Compare two attributes with each other
    pub fn between(left: AttributeRef, operator: impl Into<String>, right: AttributeRef) -> Self {
        Self {
            left: Operand::Attribute(left),
            operator: operator.into(),
            right: Operand::Attribute(right),
        }
    }

    /// The attribute and literal, if this comparison has the
    /// attribute-vs-literal shape the analyzer understands
    pub fn analyzable(&self) -> Option<(&AttributeRef, &Literal)> {
        match (&self.left, &self.right) {
            (Operand::Attribute(a), Operand::Literal(l)) => Some((a, l)),
            _ => None,
        }
    }

    /// The literal on the right, if any
    pub fn literal(&self) -> Option<&Literal> {
        match &self.right {
            Operand::Literal(l) => Some(l),
            Operand::Attribute(_) => None,
        }
    }
}

impl AttributeRef {
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ui_name: None,
            ui_category: None,
            type_tag: type_tag.into(),
        }
    }

    /// Attach the UI name and category
    pub fn with_ui(mut self, ui_name: impl Into<String>, ui_category: impl Into<String>) -> Self {
        self.ui_name = Some(ui_name.into());
        self.ui_category = Some(ui_category.into());
        self
    }

    /// Name for messages: the UI name when known
    pub fn display_name(&self) -> &str {
        self.ui_name.as_deref().unwrap_or(&self.name)
    }

    /// The UI category, falling back to the display name
    pub fn category(&self) -> &str {
        self.ui_category
            .as_deref()
            .unwrap_or_else(|| self.display_name())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({}): {}", self.id, name, self.test),
            None => write!(f, "{}: {}", self.id, self.test),
        }
    }
}

impl fmt::Display for LogicalTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joiner = match self.op {
            LogicalOp::And | LogicalOp::Nand => " AND ",
            LogicalOp::Or | LogicalOp::Nor => " OR ",
        };
        let inner: Vec<String> = self.operands.iter().map(|t| t.to_string()).collect();
        let body = format!("({})", inner.join(joiner));
        if let Some(name) = &self.name {
            write!(f, "[{}] ", name)?;
        }
        match self.op {
            LogicalOp::And | LogicalOp::Or => write!(f, "{}", body),
            LogicalOp::Nand | LogicalOp::Nor => write!(f, "NOT {}", body),
        }
    }
}

impl fmt::Display for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Test::Logical(t) => write!(f, "{}", t),
            Test::Comparison(c) => write!(f, "{}", c),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator, self.right)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Attribute(a) => write!(f, "{}", a.display_name()),
            Operand::Literal(l) => write!(f, "{}", l),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Decimal(d) => write!(f, "{}", d),
            Literal::String(s) => write!(f, "\"{}\"", s),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Date(d) => write!(f, "{}", d),
            Literal::Timestamp(t) => write!(f, "{}", t),
            Literal::List(items) => {
                let strs: Vec<_> = items.iter().map(|i| format!("\"{}\"", i)).collect();
                write!(f, "[{}]", strs.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULE_YAML: &str = r#"
id: Q-7
name: "Priority band"
test:
  op: AND
  operands:
    - left: { name: Priority, ui_name: Priority, ui_category: Order, type: Integer }
      operator: ">="
      right: { integer: 1 }
    - left: { name: Shipped, type: Date }
      operator: dateAfter
      right: { date: "2024-03-01" }
    - left: { name: Cost, type: Float }
      operator: "<"
      right: { name: Budget, type: Float }
    - op: NAND
      name: Remote
      operands:
        - left: { name: Region, type: "String(20)" }
          operator: isMember
          right: { list: ["Pacific", "Alaska"] }
"#;

    #[test]
    fn test_parse_yaml() {
        let rule = Rule::from_yaml(RULE_YAML).unwrap();
        assert_eq!(rule.id, "Q-7");
        assert_eq!(rule.test.op, LogicalOp::And);
        assert_eq!(rule.test.operands.len(), 4);
        assert_eq!(rule.test.comparisons().count(), 3);

        let first = rule.test.operands[0].comparison().unwrap();
        let (attr, lit) = first.analyzable().unwrap();
        assert_eq!(attr.name, "Priority");
        assert_eq!(*lit, Literal::Integer(1));

        let shipped = rule.test.operands[1].comparison().unwrap();
        assert_eq!(
            shipped.literal(),
            Some(&Literal::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()))
        );
    }

    #[test]
    fn test_attribute_vs_attribute_not_analyzable() {
        let rule = Rule::from_yaml(RULE_YAML).unwrap();
        let cost = rule.test.operands[2].comparison().unwrap();
        assert!(cost.analyzable().is_none());
        assert!(cost.literal().is_none());
    }

    #[test]
    fn test_exceptions() {
        let rule = Rule::from_yaml(RULE_YAML).unwrap();
        let exceptions: Vec<_> = rule.exceptions().collect();
        assert_eq!(exceptions.len(), 1);
        assert_eq!(exceptions[0].name.as_deref(), Some("Remote"));
    }

    #[test]
    fn test_json_roundtrip() {
        let rule = Rule::from_yaml(RULE_YAML).unwrap();
        let json = rule.to_json().unwrap();
        let back = Rule::parse(&json).unwrap();
        assert_eq!(rule, back);
    }

    #[test]
    fn test_parse_error() {
        let err = Rule::from_yaml("id: [").unwrap_err();
        assert!(matches!(err, Error::RuleParse(_)));
    }

    #[test]
    fn test_display() {
        let priority = AttributeRef::new("Priority", "Integer").with_ui("Priority", "Order");
        let region = AttributeRef::new("Region", "String");
        let rule = Rule::new(
            "R1",
            LogicalTest::and(vec![
                Comparison::new(priority, ">=", Literal::Integer(5)).into(),
                LogicalTest::nand(
                    Some("West"),
                    vec![Comparison::new(region, "eq", Literal::String("West".into())).into()],
                )
                .into(),
            ]),
        );
        assert_eq!(
            rule.to_string(),
            "R1: (Priority >= 5 AND [West] NOT (Region eq \"West\"))"
        );

        let named = rule.with_name("Western stock");
        assert_eq!(
            named.to_string(),
            "R1 (Western stock): (Priority >= 5 AND [West] NOT (Region eq \"West\"))"
        );
    }

    #[test]
    fn test_display_name_and_category_fallbacks() {
        let bare = AttributeRef::new("NSN", "String(13)");
        assert_eq!(bare.display_name(), "NSN");
        assert_eq!(bare.category(), "NSN");

        let full = AttributeRef::new("NSN", "String(13)").with_ui("Stock Number", "Item");
        assert_eq!(full.display_name(), "Stock Number");
        assert_eq!(full.category(), "Item");
    }
}
