use super::RangeFlags;
use crate::config::{IntegerDomain, NumericOp, NumericOperators};
use crate::rule::{Comparison, Literal};
use tracing::trace;

/// A closed interval; `None` ends are unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl Interval {
    pub const UNBOUNDED: Interval = Interval {
        min: None,
        max: None,
    };

    pub fn point(n: i64) -> Self {
        Self {
            min: Some(n),
            max: Some(n),
        }
    }

    pub fn contains_value(&self, n: i64) -> bool {
        self.min.is_none_or(|m| m <= n) && self.max.is_none_or(|m| n <= m)
    }

    fn contains(&self, other: &Interval) -> bool {
        let low = match (self.min, other.min) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(a), Some(b)) => a <= b,
        };
        let high = match (self.max, other.max) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(a), Some(b)) => b <= a,
        };
        low && high
    }

    fn disjoint(&self, other: &Interval) -> bool {
        matches!((self.min, other.max), (Some(a), Some(b)) if a > b)
            || matches!((self.max, other.min), (Some(a), Some(b)) if a < b)
    }
}

/// An integer attribute as a union of disjoint intervals, sorted by
/// ascending endpoints. Empty means no value satisfies the conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerRange {
    pub(super) flags: RangeFlags,
    intervals: Vec<Interval>,
    domain: IntegerDomain,
}

/// Integers, and whole decimals that fit in an `i64`
fn as_integer(literal: &Literal) -> Option<i64> {
    match literal {
        Literal::Integer(n) => Some(*n),
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        Literal::Decimal(d)
            if d.fract() == 0.0 && *d >= i64::MIN as f64 && *d < i64::MAX as f64 =>
        {
            Some(*d as i64)
        }
        _ => None,
    }
}

impl IntegerRange {
    pub(crate) fn unconstrained(domain: IntegerDomain) -> Self {
        Self {
            flags: RangeFlags::default(),
            intervals: vec![Interval::UNBOUNDED],
            domain,
        }
    }

    pub(crate) fn from_comparisons(
        ops: &NumericOperators,
        domain: IntegerDomain,
        comparisons: &[&Comparison],
    ) -> Self {
        let mut range = Self::unconstrained(domain);
        for c in comparisons {
            let Some(n) = c.literal().and_then(as_integer) else {
                trace!(literal = ?c.literal(), "non-integer literal for integer attribute");
                range.flags.violates_domain = true;
                continue;
            };
            match ops.resolve(&c.operator) {
                Some(NumericOp::Eq) => range.note_equals(n),
                Some(NumericOp::Ne) => range.note_not_equals(n),
                Some(NumericOp::Ge) => range.note_min(Some(n)),
                Some(NumericOp::Le) => range.note_max(Some(n)),
                Some(NumericOp::Gt) => range.note_min(n.checked_add(1)),
                Some(NumericOp::Lt) => range.note_max(n.checked_sub(1)),
                None => trace!(operator = %c.operator, "operator ignored for integer range"),
            }
        }
        range
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn contains_value(&self, n: i64) -> bool {
        self.intervals.iter().any(|i| i.contains_value(n))
    }

    fn is_full(&self) -> bool {
        self.intervals == [Interval::UNBOUNDED]
    }

    fn check_domain(&mut self, n: i64) {
        if self.domain.min.is_some_and(|lb| n < lb) || self.domain.max.is_some_and(|ub| n > ub) {
            self.flags.violates_domain = true;
        }
    }

    fn collapse(&mut self) {
        self.intervals.clear();
        self.flags.contradictory = true;
    }

    /// `n` of `None` is a lower bound past `i64::MAX`
    fn note_min(&mut self, n: Option<i64>) {
        let Some(n) = n else {
            self.flags.redundant |= self.flags.contradictory;
            self.collapse();
            return;
        };
        self.check_domain(n);
        if self.domain.min.is_some_and(|lb| n <= lb) {
            self.flags.tautology = true;
        }
        if self.flags.contradictory {
            self.flags.redundant = true;
            return;
        }
        let bounded_below = self.intervals[0].min.is_some();
        let hole_below = self
            .intervals
            .get(1)
            .and_then(|i| i.min)
            .is_some_and(|m| m <= n);
        if bounded_below || hole_below {
            self.flags.redundant = true;
        }

        self.intervals.retain(|i| i.max.is_none_or(|m| m >= n));
        match self.intervals.first_mut() {
            Some(first) => {
                if first.min.is_none_or(|m| m < n) {
                    first.min = Some(n);
                }
            }
            None => self.flags.contradictory = true,
        }
    }

    /// `n` of `None` is an upper bound below `i64::MIN`
    fn note_max(&mut self, n: Option<i64>) {
        let Some(n) = n else {
            self.flags.redundant |= self.flags.contradictory;
            self.collapse();
            return;
        };
        self.check_domain(n);
        if self.domain.max.is_some_and(|ub| n >= ub) {
            self.flags.tautology = true;
        }
        if self.flags.contradictory {
            self.flags.redundant = true;
            return;
        }
        let count = self.intervals.len();
        let bounded_above = self.intervals[count - 1].max.is_some();
        let hole_above = count >= 2 && self.intervals[count - 2].max.is_some_and(|m| m >= n);
        if bounded_above || hole_above {
            self.flags.redundant = true;
        }

        self.intervals.retain(|i| i.min.is_none_or(|m| m <= n));
        match self.intervals.last_mut() {
            Some(last) => {
                if last.max.is_none_or(|m| m > n) {
                    last.max = Some(n);
                }
            }
            None => self.flags.contradictory = true,
        }
    }

    fn note_equals(&mut self, n: i64) {
        self.check_domain(n);
        if self.flags.contradictory {
            self.flags.redundant = true;
            return;
        }
        let satisfiable = self.contains_value(n);
        if !self.is_full() {
            if satisfiable {
                self.flags.redundant = true;
            } else {
                self.flags.contradictory = true;
            }
        }
        self.intervals = if satisfiable {
            vec![Interval::point(n)]
        } else {
            Vec::new()
        };
    }

    fn note_not_equals(&mut self, n: i64) {
        self.check_domain(n);
        if self.flags.contradictory {
            self.flags.redundant = true;
            return;
        }
        let Some(idx) = self.intervals.iter().position(|i| i.contains_value(n)) else {
            self.flags.redundant = true;
            return;
        };

        let split = self.intervals[idx];
        let mut pieces = Vec::with_capacity(2);
        if let Some(below) = n.checked_sub(1) {
            if split.min.is_none_or(|m| m <= below) {
                pieces.push(Interval {
                    min: split.min,
                    max: Some(below),
                });
            }
        }
        if let Some(above) = n.checked_add(1) {
            if split.max.is_none_or(|m| m >= above) {
                pieces.push(Interval {
                    min: Some(above),
                    max: split.max,
                });
            }
        }
        self.intervals.splice(idx..=idx, pieces);
        if self.intervals.is_empty() {
            self.flags.contradictory = true;
        }
    }

    pub(super) fn contains(&self, other: &IntegerRange) -> bool {
        other
            .intervals
            .iter()
            .all(|theirs| self.intervals.iter().any(|ours| ours.contains(theirs)))
    }

    pub(super) fn excludes(&self, other: &IntegerRange) -> bool {
        self.intervals
            .iter()
            .all(|ours| other.intervals.iter().all(|theirs| ours.disjoint(theirs)))
    }
}
