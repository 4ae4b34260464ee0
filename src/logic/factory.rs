//! Range factory: picks the range variant for an attribute's declared type
//! and feeds it the comparisons made against that attribute.

use super::range::{
    AttributeRange, BooleanRange, DateRange, DecimalRange, GeographicRange, GroupRange,
    IntegerRange, RangeValues, StringRange,
};
use crate::config::{
    AnalyzerConfig, AttributeDomain, DecimalDomain, IntegerDomain, StringDomain, ValueType,
};
use crate::error::{Error, Result};
use crate::rule::{AttributeRef, Comparison};
use tracing::{trace, warn};

/// Builds [`AttributeRange`]s under one analyzer configuration
#[derive(Debug, Clone, Copy)]
pub struct RangeFactory<'a> {
    config: &'a AnalyzerConfig,
}

impl<'a> RangeFactory<'a> {
    pub fn new(config: &'a AnalyzerConfig) -> Self {
        Self { config }
    }

    /// The value type for an attribute, if its type tag is supported
    pub fn value_type(&self, attribute: &AttributeRef) -> Option<ValueType> {
        self.config.types.resolve(&attribute.type_tag)
    }

    /// Build the range for `attribute` from every comparison made against it.
    ///
    /// Fails with [`Error::UnsupportedType`] when the declared type tag has
    /// no range variant.
    pub fn make_range_for(
        &self,
        attribute: &AttributeRef,
        comparisons: &[&Comparison],
    ) -> Result<AttributeRange> {
        let value_type = self
            .value_type(attribute)
            .ok_or_else(|| Error::UnsupportedType {
                attribute: attribute.name.clone(),
                type_tag: attribute.type_tag.clone(),
            })?;
        trace!(attribute = %attribute.name, ?value_type, count = comparisons.len(), "building range");

        let ops = &self.config.operators;
        let (values, equality) = match value_type {
            ValueType::Boolean => (
                RangeValues::Boolean(BooleanRange::from_comparisons(&ops.boolean, comparisons)),
                Some(ops.boolean.is.as_str()),
            ),
            ValueType::Integer => (
                RangeValues::Integer(IntegerRange::from_comparisons(
                    &ops.numeric,
                    self.integer_domain(attribute),
                    comparisons,
                )),
                Some(ops.numeric.equal.as_str()),
            ),
            ValueType::Decimal => (
                RangeValues::Decimal(DecimalRange::from_comparisons(
                    &ops.numeric,
                    self.decimal_domain(attribute),
                    comparisons,
                )),
                Some(ops.numeric.equal.as_str()),
            ),
            ValueType::String { max_length } => (
                RangeValues::String(StringRange::from_comparisons(
                    &ops.string,
                    self.string_domain(attribute, max_length),
                    comparisons,
                )),
                Some(ops.string.equal.as_str()),
            ),
            ValueType::Date => (
                RangeValues::Date(DateRange::from_comparisons(&ops.date, comparisons)),
                Some(ops.date.same_day.as_str()),
            ),
            ValueType::DiscreteGroup => (
                RangeValues::Group(GroupRange::from_comparisons(&ops.group, comparisons)),
                None,
            ),
            ValueType::Geographic => (
                RangeValues::Geographic(GeographicRange::from_comparisons(
                    &ops.geographic,
                    comparisons,
                )),
                None,
            ),
        };

        let unique = self.config.is_entity_identifier(&attribute.name)
            && equality.is_some_and(|eq| comparisons.iter().any(|c| c.operator == eq));
        Ok(AttributeRange::new(attribute.clone(), unique, values))
    }

    fn integer_domain(&self, attribute: &AttributeRef) -> IntegerDomain {
        match self.config.domain_for(&attribute.name) {
            Some(AttributeDomain::Integer(d)) => *d,
            Some(other) => {
                mismatched_domain(attribute, other);
                IntegerDomain::default()
            }
            None => IntegerDomain::default(),
        }
    }

    fn decimal_domain(&self, attribute: &AttributeRef) -> DecimalDomain {
        match self.config.domain_for(&attribute.name) {
            Some(AttributeDomain::Decimal(d)) => *d,
            Some(AttributeDomain::Integer(d)) => DecimalDomain {
                min: d.min.map(|n| n as f64),
                max: d.max.map(|n| n as f64),
                ..DecimalDomain::default()
            },
            Some(other) => {
                mismatched_domain(attribute, other);
                DecimalDomain::default()
            }
            None => DecimalDomain::default(),
        }
    }

    /// The configured string domain, with the type tag's length limit
    /// filling in when none is configured
    fn string_domain(&self, attribute: &AttributeRef, max_length: Option<usize>) -> StringDomain {
        let mut domain = match self.config.domain_for(&attribute.name) {
            Some(AttributeDomain::String(d)) => d.clone(),
            Some(other) => {
                mismatched_domain(attribute, other);
                StringDomain::default()
            }
            None => StringDomain::default(),
        };
        domain.max_length = domain.max_length.or(max_length);
        domain
    }
}

fn mismatched_domain(attribute: &AttributeRef, domain: &AttributeDomain) {
    warn!(
        attribute = %attribute.name,
        type_tag = %attribute.type_tag,
        ?domain,
        "configured domain does not fit the attribute's type; ignoring it"
    );
}
