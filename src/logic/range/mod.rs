//! Attribute ranges: the set of values one attribute may take under a list
//! of comparisons
//!
//! Each value type gets its own canonical representation:
//!
//! - `boolean` - a single required value
//! - `integer` - a union of disjoint closed intervals
//! - `decimal` - one interval with open/closed ends and excluded points
//! - `string` - an inclusion set or an exclusion set
//! - `date` - a calendar-day interval
//! - `group` - required and forbidden group names, plus any-of lists
//! - `geographic` - required and forbidden `geography:region` pairs, plus
//!   any-of lists
//!
//! A range is built once from its comparisons and never changes afterwards.
//! While ingesting, it raises four flags the moment a comparison fails to
//! narrow the set (redundant), empties it (contradictory), can never fail
//! within the attribute's domain (tautology), or carries a literal the
//! attribute can't hold (domain violation).

mod boolean;
mod date;
mod decimal;
mod geographic;
mod group;
mod integer;
mod string;

pub use boolean::BooleanRange;
pub use date::DateRange;
pub use decimal::{DecimalBound, DecimalRange};
pub use geographic::{GeoRegion, GeographicRange};
pub use group::GroupRange;
pub use integer::{IntegerRange, Interval};
pub use string::{StringRange, StringSet};

use crate::rule::AttributeRef;

/// Defects noticed while a range ingested its comparisons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeFlags {
    pub redundant: bool,
    pub contradictory: bool,
    pub tautology: bool,
    pub violates_domain: bool,
}

/// The canonical value set, one variant per value type
#[derive(Debug, Clone, PartialEq)]
pub enum RangeValues {
    Boolean(BooleanRange),
    Integer(IntegerRange),
    Decimal(DecimalRange),
    String(StringRange),
    Date(DateRange),
    Group(GroupRange),
    Geographic(GeographicRange),
}

impl RangeValues {
    pub fn flags(&self) -> &RangeFlags {
        match self {
            RangeValues::Boolean(r) => &r.flags,
            RangeValues::Integer(r) => &r.flags,
            RangeValues::Decimal(r) => &r.flags,
            RangeValues::String(r) => &r.flags,
            RangeValues::Date(r) => &r.flags,
            RangeValues::Group(r) => &r.flags,
            RangeValues::Geographic(r) => &r.flags,
        }
    }

    /// Neither side may be contradictory here; `AttributeRange` settles
    /// those cases before dispatching.
    fn contains(&self, other: &RangeValues) -> bool {
        match (self, other) {
            (RangeValues::Boolean(a), RangeValues::Boolean(b)) => a.contains(b),
            (RangeValues::Integer(a), RangeValues::Integer(b)) => a.contains(b),
            (RangeValues::Decimal(a), RangeValues::Decimal(b)) => a.contains(b),
            (RangeValues::String(a), RangeValues::String(b)) => a.contains(b),
            (RangeValues::Date(a), RangeValues::Date(b)) => a.contains(b),
            (RangeValues::Group(a), RangeValues::Group(b)) => a.contains(b),
            (RangeValues::Geographic(a), RangeValues::Geographic(b)) => a.contains(b),
            _ => false,
        }
    }

    fn excludes(&self, other: &RangeValues) -> bool {
        match (self, other) {
            (RangeValues::Boolean(a), RangeValues::Boolean(b)) => a.excludes(b),
            (RangeValues::Integer(a), RangeValues::Integer(b)) => a.excludes(b),
            (RangeValues::Decimal(a), RangeValues::Decimal(b)) => a.excludes(b),
            (RangeValues::String(a), RangeValues::String(b)) => a.excludes(b),
            (RangeValues::Date(a), RangeValues::Date(b)) => a.excludes(b),
            (RangeValues::Group(a), RangeValues::Group(b)) => a.excludes(b),
            (RangeValues::Geographic(a), RangeValues::Geographic(b)) => a.excludes(b),
            _ => true,
        }
    }
}

/// All the constraints one clause places on one attribute
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRange {
    attribute: AttributeRef,
    unique: bool,
    values: RangeValues,
}

impl AttributeRange {
    pub(crate) fn new(attribute: AttributeRef, unique: bool, values: RangeValues) -> Self {
        Self {
            attribute,
            unique,
            values,
        }
    }

    pub fn attribute(&self) -> &AttributeRef {
        &self.attribute
    }

    pub fn values(&self) -> &RangeValues {
        &self.values
    }

    pub fn flags(&self) -> &RangeFlags {
        self.values.flags()
    }

    /// True for entity-identifier attributes pinned by an equality
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn is_redundant(&self) -> bool {
        self.flags().redundant
    }

    pub fn is_contradictory(&self) -> bool {
        self.flags().contradictory
    }

    pub fn has_tautology(&self) -> bool {
        self.flags().tautology
    }

    pub fn violates_domain(&self) -> bool {
        self.flags().violates_domain
    }

    /// True iff every value satisfying `other` also satisfies this range,
    /// i.e. `other` implies `self`.
    pub fn contains(&self, other: &AttributeRange) -> bool {
        if other.is_contradictory() {
            return true;
        }
        if self.is_contradictory() {
            return false;
        }
        self.values.contains(&other.values)
    }

    /// True iff no value satisfies both ranges
    pub fn excludes(&self, other: &AttributeRange) -> bool {
        if self.is_contradictory() || other.is_contradictory() {
            return true;
        }
        self.values.excludes(&other.values)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn boolean(value: Option<bool>, contradictory: bool) -> AttributeRange {
        let mut range = BooleanRange::unconstrained();
        range.required = value;
        range.flags.contradictory = contradictory;
        AttributeRange::new(
            AttributeRef::new("Flag", "boolean"),
            false,
            RangeValues::Boolean(range),
        )
    }

    fn integer_range() -> AttributeRange {
        AttributeRange::new(
            AttributeRef::new("Count", "Integer"),
            false,
            RangeValues::Integer(IntegerRange::unconstrained(Default::default())),
        )
    }

    #[test]
    fn test_contradictory_other_is_contained_vacuously() {
        let empty = boolean(None, true);
        let yes = boolean(Some(true), false);
        assert!(yes.contains(&empty));
        assert!(!empty.contains(&yes));
        assert!(empty.contains(&empty));
    }

    #[test]
    fn test_contradictory_excludes_everything() {
        let empty = boolean(None, true);
        let yes = boolean(Some(true), false);
        assert!(empty.excludes(&yes));
        assert!(yes.excludes(&empty));
    }

    #[test]
    fn test_mismatched_variants() {
        let yes = boolean(Some(true), false);
        let count = integer_range();
        assert!(!yes.contains(&count));
        assert!(yes.excludes(&count));
    }
}
