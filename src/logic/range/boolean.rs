use super::RangeFlags;
use crate::config::{BooleanOp, BooleanOperators};
use crate::rule::{Comparison, Literal};
use tracing::trace;

/// A boolean attribute: either free or pinned to one value
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BooleanRange {
    pub(super) flags: RangeFlags,
    pub(super) required: Option<bool>,
}

impl BooleanRange {
    pub(crate) fn unconstrained() -> Self {
        Self::default()
    }

    pub(crate) fn from_comparisons(ops: &BooleanOperators, comparisons: &[&Comparison]) -> Self {
        let mut range = Self::unconstrained();
        for c in comparisons {
            let value = match c.literal() {
                Some(Literal::Boolean(b)) => *b,
                other => {
                    trace!(literal = ?other, "non-boolean literal for boolean attribute");
                    range.flags.violates_domain = true;
                    continue;
                }
            };
            match ops.resolve(&c.operator) {
                Some(BooleanOp::Is) => range.note_value(value),
                Some(BooleanOp::IsNot) => range.note_value(!value),
                None => trace!(operator = %c.operator, "operator ignored for boolean range"),
            }
        }
        range
    }

    fn note_value(&mut self, value: bool) {
        match self.required {
            Some(current) if current == value => self.flags.redundant = true,
            Some(_) => self.flags.contradictory = true,
            None => self.required = Some(value),
        }
    }

    /// The value every satisfying entity has, if pinned
    pub fn required(&self) -> Option<bool> {
        self.required
    }

    pub(super) fn contains(&self, other: &BooleanRange) -> bool {
        match (self.required, other.required) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(ours), Some(theirs)) => ours == theirs,
        }
    }

    pub(super) fn excludes(&self, other: &BooleanRange) -> bool {
        matches!((self.required, other.required), (Some(a), Some(b)) if a != b)
    }
}
