use super::RangeFlags;
use crate::config::{StringDomain, StringOp, StringOperators};
use crate::rule::{Comparison, Literal};
use indexmap::IndexSet;
use tracing::trace;

/// The permitted values of a string attribute
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StringSet {
    #[default]
    Unconstrained,
    /// Only these values
    Including(IndexSet<String>),
    /// Anything but these values
    Excluding(IndexSet<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringRange {
    pub(super) flags: RangeFlags,
    set: StringSet,
    domain: StringDomain,
}

impl StringRange {
    pub(crate) fn unconstrained(domain: StringDomain) -> Self {
        Self {
            flags: RangeFlags::default(),
            set: StringSet::Unconstrained,
            domain,
        }
    }

    pub(crate) fn from_comparisons(
        ops: &StringOperators,
        domain: StringDomain,
        comparisons: &[&Comparison],
    ) -> Self {
        let mut range = Self::unconstrained(domain);
        for c in comparisons {
            let Some(op) = ops.resolve(&c.operator) else {
                trace!(operator = %c.operator, "operator ignored for string range");
                continue;
            };
            let values = match (op, c.literal()) {
                (StringOp::Eq | StringOp::Ne, Some(Literal::String(s))) => vec![s.clone()],
                (StringOp::In | StringOp::NotIn, Some(Literal::List(items))) => items.clone(),
                (_, other) => {
                    trace!(literal = ?other, operator = %c.operator, "literal does not fit string operator");
                    range.flags.violates_domain = true;
                    continue;
                }
            };
            match op {
                StringOp::Eq | StringOp::In => range.note_inclusion(values),
                StringOp::Ne | StringOp::NotIn => range.note_exclusion(values),
            }
        }
        range
    }

    pub fn set(&self) -> &StringSet {
        &self.set
    }

    pub fn inclusions(&self) -> Option<&IndexSet<String>> {
        match &self.set {
            StringSet::Including(values) => Some(values),
            _ => None,
        }
    }

    pub fn exclusions(&self) -> Option<&IndexSet<String>> {
        match &self.set {
            StringSet::Excluding(values) => Some(values),
            _ => None,
        }
    }

    pub fn contains_string(&self, s: &str) -> bool {
        match &self.set {
            StringSet::Unconstrained => true,
            StringSet::Including(values) => values.contains(s),
            StringSet::Excluding(values) => !values.contains(s),
        }
    }

    fn is_unconstrained(&self) -> bool {
        match &self.set {
            StringSet::Unconstrained => true,
            StringSet::Excluding(values) => values.is_empty(),
            StringSet::Including(_) => false,
        }
    }

    fn check_domain(&mut self, values: &[String]) {
        if values.iter().any(|v| !self.admits(v)) {
            self.flags.violates_domain = true;
        }
    }

    fn admits(&self, value: &str) -> bool {
        if self
            .domain
            .max_length
            .is_some_and(|max| value.chars().count() > max)
        {
            return false;
        }
        let mut chars = value.chars();
        if let Some(initial) = &self.domain.initial {
            if let Some(first) = chars.next() {
                if !initial.admits(first) {
                    return false;
                }
            }
        }
        match &self.domain.rest {
            Some(rest) => chars.all(|c| rest.admits(c)),
            None => true,
        }
    }

    fn note_inclusion(&mut self, values: Vec<String>) {
        self.check_domain(&values);
        if self.flags.contradictory {
            self.flags.redundant = true;
            return;
        }
        let listed = values.len();
        let incoming: IndexSet<String> = values.into_iter().collect();
        if incoming.len() < listed {
            self.flags.redundant = true;
        }

        let next = match std::mem::take(&mut self.set) {
            StringSet::Unconstrained => incoming,
            StringSet::Including(current) => {
                let kept: IndexSet<String> = current
                    .iter()
                    .filter(|v| incoming.contains(*v))
                    .cloned()
                    .collect();
                if kept.len() == current.len() || kept.len() == incoming.len() {
                    self.flags.redundant = true;
                }
                kept
            }
            StringSet::Excluding(excluded) => {
                if incoming.iter().all(|v| !excluded.contains(v)) {
                    self.flags.redundant = true;
                }
                incoming
                    .into_iter()
                    .filter(|v| !excluded.contains(v))
                    .collect()
            }
        };
        if next.is_empty() {
            self.flags.contradictory = true;
        }
        self.set = StringSet::Including(next);
    }

    fn note_exclusion(&mut self, values: Vec<String>) {
        self.check_domain(&values);
        if values.is_empty() {
            self.flags.tautology = true;
            return;
        }
        if self.flags.contradictory {
            self.flags.redundant = true;
            return;
        }
        if self.set == StringSet::Unconstrained {
            self.set = StringSet::Excluding(IndexSet::new());
        }
        match &mut self.set {
            StringSet::Including(included) => {
                let before = included.len();
                included.retain(|v| !values.contains(v));
                if included.len() == before {
                    self.flags.redundant = true;
                }
                if included.is_empty() {
                    self.flags.contradictory = true;
                }
            }
            StringSet::Excluding(excluded) => {
                for v in values {
                    if !excluded.insert(v) {
                        self.flags.redundant = true;
                    }
                }
            }
            StringSet::Unconstrained => {}
        }
    }

    pub(super) fn contains(&self, other: &StringRange) -> bool {
        if self.is_unconstrained() {
            return true;
        }
        match (&self.set, &other.set) {
            (_, StringSet::Including(theirs)) => theirs.iter().all(|v| self.contains_string(v)),
            (StringSet::Excluding(ours), StringSet::Excluding(theirs)) => ours.is_subset(theirs),
            _ => false,
        }
    }

    pub(super) fn excludes(&self, other: &StringRange) -> bool {
        match (&self.set, &other.set) {
            (_, StringSet::Including(theirs)) => !theirs.iter().any(|v| self.contains_string(v)),
            (StringSet::Including(ours), _) => !ours.iter().any(|v| other.contains_string(v)),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{comparisons, refs};
    use super::*;
    use crate::config::CharSet;
    use pretty_assertions::assert_eq;

    fn s(v: &str) -> Literal {
        Literal::String(v.into())
    }

    fn list(vs: &[&str]) -> Literal {
        Literal::List(vs.iter().map(|v| v.to_string()).collect())
    }

    fn build_in(domain: StringDomain, items: Vec<(&str, Literal)>) -> StringRange {
        let cs = comparisons("String", items);
        StringRange::from_comparisons(&StringOperators::default(), domain, &refs(&cs))
    }

    fn build(items: Vec<(&str, Literal)>) -> StringRange {
        build_in(StringDomain::default(), items)
    }

    fn set(vs: &[&str]) -> IndexSet<String> {
        vs.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_intersecting_inclusions() {
        let range = build(vec![
            ("isMember", list(&["A", "B", "C"])),
            ("isMember", list(&["B", "C", "D"])),
        ]);
        assert_eq!(range.inclusions(), Some(&set(&["B", "C"])));
        assert!(!range.flags.redundant);
        assert!(!range.flags.contradictory);
    }

    #[test]
    fn test_subset_inclusion_is_redundant() {
        let range = build(vec![("isMember", list(&["A", "B"])), ("eq", s("A"))]);
        assert_eq!(range.inclusions(), Some(&set(&["A"])));
        assert!(range.flags.redundant);
    }

    #[test]
    fn test_disjoint_inclusions_contradict() {
        let range = build(vec![("eq", s("A")), ("eq", s("B"))]);
        assert!(range.flags.contradictory);
    }

    #[test]
    fn test_excluding_included_value() {
        let range = build(vec![("isMember", list(&["A", "B"])), ("neq", s("A"))]);
        assert_eq!(range.inclusions(), Some(&set(&["B"])));
        assert!(!range.flags.redundant);

        let absent = build(vec![("isMember", list(&["A", "B"])), ("neq", s("Z"))]);
        assert!(absent.flags.redundant);

        let all = build(vec![("eq", s("A")), ("neq", s("A"))]);
        assert!(all.flags.contradictory);
    }

    #[test]
    fn test_inclusion_after_exclusion() {
        let range = build(vec![("neq", s("A")), ("isMember", list(&["A", "B"]))]);
        assert_eq!(range.inclusions(), Some(&set(&["B"])));
        assert!(!range.flags.redundant);

        let untouched = build(vec![("neq", s("A")), ("eq", s("B"))]);
        assert!(untouched.flags.redundant);
    }

    #[test]
    fn test_repeated_exclusion_is_redundant() {
        let range = build(vec![("neq", s("A")), ("isNotMember", list(&["A", "B"]))]);
        assert_eq!(range.exclusions(), Some(&set(&["A", "B"])));
        assert!(range.flags.redundant);
    }

    #[test]
    fn test_empty_lists() {
        let empty_in = build(vec![("isMember", list(&[]))]);
        assert!(empty_in.flags.contradictory);

        let empty_out = build(vec![("isNotMember", list(&[]))]);
        assert!(empty_out.flags.tautology);
        assert!(!empty_out.flags.contradictory);
    }

    #[test]
    fn test_wrong_literal_shape() {
        let range = build(vec![("eq", list(&["A"])), ("isMember", s("A"))]);
        assert!(range.flags.violates_domain);
        assert_eq!(range.set(), &StringSet::Unconstrained);
    }

    #[test]
    fn test_character_domain() {
        let domain = StringDomain {
            initial: Some(CharSet::new("FHNSW")),
            rest: Some(CharSet::inverted(" ")),
            max_length: Some(6),
        };
        let good = build_in(domain.clone(), vec![("eq", s("F12345"))]);
        assert!(!good.flags.violates_domain);

        let bad_initial = build_in(domain.clone(), vec![("eq", s("A12345"))]);
        assert!(bad_initial.flags.violates_domain);

        let bad_rest = build_in(domain.clone(), vec![("eq", s("F1 345"))]);
        assert!(bad_rest.flags.violates_domain);

        let too_long = build_in(domain, vec![("eq", s("F123456"))]);
        assert!(too_long.flags.violates_domain);
    }

    #[test]
    fn test_containment() {
        let abc = build(vec![("isMember", list(&["A", "B", "C"]))]);
        let ab = build(vec![("isMember", list(&["A", "B"]))]);
        let not_a = build(vec![("neq", s("A"))]);
        let not_ab = build(vec![("isNotMember", list(&["A", "B"]))]);
        let free = build(vec![]);

        assert!(abc.contains(&ab));
        assert!(!ab.contains(&abc));
        assert!(not_a.contains(&not_ab));
        assert!(!not_ab.contains(&not_a));
        assert!(!not_a.contains(&ab));
        assert!(free.contains(&abc));
        assert!(!abc.contains(&free));
        assert!(!abc.contains(&not_a));
    }

    #[test]
    fn test_exclusion() {
        let ab = build(vec![("isMember", list(&["A", "B"]))]);
        let cd = build(vec![("isMember", list(&["C", "D"]))]);
        let not_ab = build(vec![("isNotMember", list(&["A", "B"]))]);
        let not_c = build(vec![("neq", s("C"))]);

        assert!(ab.excludes(&cd));
        assert!(ab.excludes(&not_ab));
        assert!(not_ab.excludes(&ab));
        assert!(!ab.excludes(&not_c));
        assert!(!not_ab.excludes(&not_c));
    }
}
