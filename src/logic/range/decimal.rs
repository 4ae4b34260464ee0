use super::RangeFlags;
use crate::config::{DecimalDomain, NumericOp, NumericOperators};
use crate::rule::{Comparison, Literal};
use tracing::trace;

/// One end of a real interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecimalBound {
    pub value: f64,
    pub closed: bool,
}

impl DecimalBound {
    fn new(value: f64, closed: bool) -> Self {
        Self { value, closed }
    }
}

/// A real attribute as one interval with individually excluded points.
/// Excluded points always lie strictly inside the interval.
#[derive(Debug, Clone, PartialEq)]
pub struct DecimalRange {
    pub(super) flags: RangeFlags,
    min: Option<DecimalBound>,
    max: Option<DecimalBound>,
    excluded: Vec<f64>,
    domain: DecimalDomain,
}

impl DecimalRange {
    pub(crate) fn unconstrained(domain: DecimalDomain) -> Self {
        Self {
            flags: RangeFlags::default(),
            min: None,
            max: None,
            excluded: Vec::new(),
            domain,
        }
    }

    pub(crate) fn from_comparisons(
        ops: &NumericOperators,
        domain: DecimalDomain,
        comparisons: &[&Comparison],
    ) -> Self {
        let mut range = Self::unconstrained(domain);
        for c in comparisons {
            let n = match c.literal() {
                Some(Literal::Decimal(d)) if d.is_finite() => *d,
                Some(Literal::Integer(i)) => *i as f64,
                other => {
                    trace!(literal = ?other, "non-numeric literal for decimal attribute");
                    range.flags.violates_domain = true;
                    continue;
                }
            };
            match ops.resolve(&c.operator) {
                Some(NumericOp::Eq) => range.note_equals(n),
                Some(NumericOp::Ne) => range.note_not_equals(n),
                Some(NumericOp::Ge) => range.note_min(n, true),
                Some(NumericOp::Gt) => range.note_min(n, false),
                Some(NumericOp::Le) => range.note_max(n, true),
                Some(NumericOp::Lt) => range.note_max(n, false),
                None => trace!(operator = %c.operator, "operator ignored for decimal range"),
            }
        }
        range
    }

    pub fn min(&self) -> Option<DecimalBound> {
        self.min
    }

    pub fn max(&self) -> Option<DecimalBound> {
        self.max
    }

    pub fn excluded_points(&self) -> &[f64] {
        &self.excluded
    }

    pub fn contains_value(&self, n: f64) -> bool {
        let above_min = self
            .min
            .is_none_or(|lo| n > lo.value || (n == lo.value && lo.closed));
        let below_max = self
            .max
            .is_none_or(|hi| n < hi.value || (n == hi.value && hi.closed));
        above_min && below_max && !self.excluded.contains(&n)
    }

    /// A bound (or point, when `closed`) at `n` reaches outside the domain
    fn check_domain(&mut self, n: f64, closed: bool) {
        let d = self.domain;
        let below = d
            .min
            .is_some_and(|lb| n < lb || (n == lb && !d.min_inclusive && closed));
        let above = d
            .max
            .is_some_and(|ub| n > ub || (n == ub && !d.max_inclusive && closed));
        if below || above {
            self.flags.violates_domain = true;
        }
    }

    fn check_empty(&mut self) {
        if let (Some(lo), Some(hi)) = (self.min, self.max) {
            if lo.value > hi.value || (lo.value == hi.value && !(lo.closed && hi.closed)) {
                self.flags.contradictory = true;
            }
        }
    }

    /// Drop excluded points the bounds have made moot; a point sitting on a
    /// closed end opens that end instead.
    fn absorb_excluded(&mut self) {
        let mut kept = Vec::with_capacity(self.excluded.len());
        for &x in &self.excluded {
            match (self.min, self.max) {
                (Some(lo), _) if x == lo.value && lo.closed => {
                    self.min = Some(DecimalBound::new(x, false));
                }
                (_, Some(hi)) if x == hi.value && hi.closed => {
                    self.max = Some(DecimalBound::new(x, false));
                }
                (Some(lo), _) if x <= lo.value => self.flags.redundant = true,
                (_, Some(hi)) if x >= hi.value => self.flags.redundant = true,
                _ => kept.push(x),
            }
        }
        self.excluded = kept;
    }

    fn note_min(&mut self, n: f64, closed: bool) {
        self.check_domain(n, closed);
        if self.flags.contradictory {
            self.flags.redundant = true;
            return;
        }
        let bound = match self.min {
            Some(cur) => {
                self.flags.redundant = true;
                if n > cur.value {
                    DecimalBound::new(n, closed)
                } else if n == cur.value {
                    DecimalBound::new(n, cur.closed && closed)
                } else {
                    cur
                }
            }
            None => DecimalBound::new(n, closed),
        };
        self.min = Some(bound);
        self.absorb_excluded();
        self.check_empty();

        if let (Some(lb), Some(bound)) = (self.domain.min, self.min) {
            if bound.value < lb
                || (bound.value == lb && (bound.closed || !self.domain.min_inclusive))
            {
                self.flags.tautology = true;
            }
        }
    }

    fn note_max(&mut self, n: f64, closed: bool) {
        self.check_domain(n, closed);
        if self.flags.contradictory {
            self.flags.redundant = true;
            return;
        }
        let bound = match self.max {
            Some(cur) => {
                self.flags.redundant = true;
                if n < cur.value {
                    DecimalBound::new(n, closed)
                } else if n == cur.value {
                    DecimalBound::new(n, cur.closed && closed)
                } else {
                    cur
                }
            }
            None => DecimalBound::new(n, closed),
        };
        self.max = Some(bound);
        self.absorb_excluded();
        self.check_empty();

        if let (Some(ub), Some(bound)) = (self.domain.max, self.max) {
            if bound.value > ub
                || (bound.value == ub && (bound.closed || !self.domain.max_inclusive))
            {
                self.flags.tautology = true;
            }
        }
    }

    fn note_equals(&mut self, n: f64) {
        self.check_domain(n, true);
        if self.flags.contradictory {
            self.flags.redundant = true;
            return;
        }
        let constrained = self.min.is_some() || self.max.is_some() || !self.excluded.is_empty();
        if constrained {
            if self.contains_value(n) {
                self.flags.redundant = true;
            } else {
                self.flags.contradictory = true;
                return;
            }
        }
        self.min = Some(DecimalBound::new(n, true));
        self.max = Some(DecimalBound::new(n, true));
        self.excluded.clear();
    }

    fn note_not_equals(&mut self, n: f64) {
        self.check_domain(n, true);
        if self.flags.contradictory {
            self.flags.redundant = true;
            return;
        }
        if !self.contains_value(n) {
            self.flags.redundant = true;
            return;
        }
        let mut on_edge = false;
        if let Some(lo) = self.min.filter(|lo| lo.value == n) {
            self.min = Some(DecimalBound::new(lo.value, false));
            on_edge = true;
        }
        if let Some(hi) = self.max.filter(|hi| hi.value == n) {
            self.max = Some(DecimalBound::new(hi.value, false));
            on_edge = true;
        }
        if !on_edge {
            self.excluded.push(n);
        }
        self.check_empty();
    }

    pub(super) fn contains(&self, other: &DecimalRange) -> bool {
        if self.excluded.iter().any(|&x| other.contains_value(x)) {
            return false;
        }
        if let Some(lo) = self.min {
            match other.min {
                None => return false,
                Some(theirs) => {
                    if lo.value > theirs.value
                        || (lo.value == theirs.value && !lo.closed && other.contains_value(lo.value))
                    {
                        return false;
                    }
                }
            }
        }
        if let Some(hi) = self.max {
            match other.max {
                None => return false,
                Some(theirs) => {
                    if hi.value < theirs.value
                        || (hi.value == theirs.value && !hi.closed && other.contains_value(hi.value))
                    {
                        return false;
                    }
                }
            }
        }
        true
    }

    pub(super) fn excludes(&self, other: &DecimalRange) -> bool {
        let lo = match (self.min, other.min) {
            (Some(a), Some(b)) => a.value.max(b.value),
            (Some(a), None) | (None, Some(a)) => a.value,
            (None, None) => return false,
        };
        let hi = match (self.max, other.max) {
            (Some(a), Some(b)) => a.value.min(b.value),
            (Some(a), None) | (None, Some(a)) => a.value,
            (None, None) => return false,
        };
        if lo > hi {
            true
        } else if lo == hi {
            !(self.contains_value(lo) && other.contains_value(lo))
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{comparisons, refs};
    use super::*;

    fn build_in(domain: DecimalDomain, items: Vec<(&str, f64)>) -> DecimalRange {
        let cs = comparisons(
            "Float",
            items
                .into_iter()
                .map(|(op, n)| (op, Literal::Decimal(n)))
                .collect(),
        );
        DecimalRange::from_comparisons(&NumericOperators::default(), domain, &refs(&cs))
    }

    fn build(items: Vec<(&str, f64)>) -> DecimalRange {
        build_in(DecimalDomain::default(), items)
    }

    #[test]
    fn test_half_open_interval() {
        let range = build(vec![(">", 0.0), ("<=", 1.5)]);
        assert_eq!(range.min(), Some(DecimalBound::new(0.0, false)));
        assert_eq!(range.max(), Some(DecimalBound::new(1.5, true)));
        assert!(!range.contains_value(0.0));
        assert!(range.contains_value(1.5));
        assert_eq!(range.flags, RangeFlags::default());
    }

    #[test]
    fn test_point_then_open_end_contradicts() {
        let range = build(vec![(">=", 2.0), ("<", 2.0)]);
        assert!(range.flags.contradictory);
    }

    #[test]
    fn test_closed_point_is_satisfiable() {
        let range = build(vec![(">=", 2.0), ("<=", 2.0)]);
        assert!(!range.flags.contradictory);
        assert!(range.contains_value(2.0));
    }

    #[test]
    fn test_not_equals_inside_adds_hole() {
        let range = build(vec![(">=", 0.0), ("<=", 10.0), ("<>", 5.0)]);
        assert_eq!(range.excluded_points(), &[5.0]);
        assert!(!range.contains_value(5.0));
        assert!(!range.flags.redundant);
    }

    #[test]
    fn test_not_equals_at_closed_end_opens_it() {
        let range = build(vec![(">=", 0.0), ("<>", 0.0)]);
        assert_eq!(range.min(), Some(DecimalBound::new(0.0, false)));
        assert!(range.excluded_points().is_empty());
        assert!(!range.flags.redundant);
    }

    #[test]
    fn test_not_equals_outside_is_redundant() {
        let range = build(vec![(">", 0.0), ("<>", 0.0)]);
        assert!(range.flags.redundant);
    }

    #[test]
    fn test_hole_below_new_min_is_redundant() {
        let range = build(vec![("<>", 1.0), (">=", 2.0)]);
        assert!(range.flags.redundant);
        assert!(range.excluded_points().is_empty());
    }

    #[test]
    fn test_hole_on_new_closed_min_opens_it() {
        let range = build(vec![("<>", 2.0), (">=", 2.0)]);
        assert_eq!(range.min(), Some(DecimalBound::new(2.0, false)));
        assert!(range.excluded_points().is_empty());
        assert!(!range.flags.redundant);
    }

    #[test]
    fn test_equals_and_not_equals_contradict() {
        let range = build(vec![("=", 3.25), ("<>", 3.25)]);
        assert!(range.flags.contradictory);
    }

    #[test]
    fn test_tighter_bound_replaces_and_flags_redundant() {
        let range = build(vec![(">", 1.0), (">=", 1.0)]);
        assert_eq!(range.min(), Some(DecimalBound::new(1.0, false)));
        assert!(range.flags.redundant);
    }

    #[test]
    fn test_domain_edges() {
        let domain = DecimalDomain {
            min: Some(0.0),
            min_inclusive: false,
            max: None,
            max_inclusive: true,
        };
        let open_edge = build_in(domain, vec![(">", 0.0)]);
        assert!(open_edge.flags.tautology);
        assert!(!open_edge.flags.violates_domain);

        let closed_edge = build_in(domain, vec![(">=", 0.0)]);
        assert!(closed_edge.flags.tautology);
        assert!(closed_edge.flags.violates_domain);

        let equals_edge = build_in(domain, vec![("=", 0.0)]);
        assert!(equals_edge.flags.violates_domain);

        let inside = build_in(domain, vec![(">", 0.5)]);
        assert!(!inside.flags.tautology);
        assert!(!inside.flags.violates_domain);
    }

    #[test]
    fn test_containment() {
        let wide = build(vec![(">=", 0.0), ("<=", 10.0)]);
        let open = build(vec![(">", 0.0), ("<", 10.0)]);
        let holed = build(vec![(">=", 0.0), ("<=", 10.0), ("<>", 5.0)]);

        assert!(wide.contains(&open));
        assert!(!open.contains(&wide));
        assert!(wide.contains(&holed));
        assert!(!holed.contains(&wide));
        assert!(holed.contains(&build(vec![(">=", 6.0), ("<=", 7.0)])));
    }

    #[test]
    fn test_exclusion() {
        let low = build(vec![("<", 5.0)]);
        let high = build(vec![(">=", 5.0)]);
        let touching = build(vec![(">=", 0.0), ("<=", 5.0)]);
        assert!(low.excludes(&high));
        assert!(!touching.excludes(&high));
        assert!(!low.excludes(&touching));

        let holed = build(vec![("<>", 5.0)]);
        let five = build(vec![("=", 5.0)]);
        assert!(holed.excludes(&five));
    }
}
