use super::RangeFlags;
use crate::config::{MembershipOp, MembershipOperators};
use crate::rule::{Comparison, Literal};
use indexmap::IndexSet;
use tracing::trace;

/// Membership in named groups. An entity may belong to several groups at
/// once, so required memberships accumulate rather than intersect. A list of
/// groups on `inGroup` requires membership in at least one of them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupRange {
    pub(super) flags: RangeFlags,
    included: IndexSet<String>,
    excluded: IndexSet<String>,
    alternatives: Vec<IndexSet<String>>,
}

impl GroupRange {
    pub(crate) fn from_comparisons(ops: &MembershipOperators, comparisons: &[&Comparison]) -> Self {
        let mut range = Self::default();
        for c in comparisons {
            let groups = match c.literal() {
                Some(Literal::String(s)) => vec![s.clone()],
                Some(Literal::List(items)) => items.clone(),
                other => {
                    trace!(literal = ?other, "non-string literal for group attribute");
                    range.flags.violates_domain = true;
                    continue;
                }
            };
            if groups.is_empty() || groups.iter().any(|g| g.trim().is_empty()) {
                range.flags.violates_domain = true;
            }
            let listed = groups.iter().filter(|g| !g.trim().is_empty()).count();
            let groups: IndexSet<String> = groups
                .into_iter()
                .filter(|g| !g.trim().is_empty())
                .collect();
            if groups.len() < listed {
                range.flags.redundant = true;
            }
            match ops.resolve(&c.operator) {
                Some(MembershipOp::In) if groups.len() > 1 => range.alternatives.push(groups),
                Some(MembershipOp::In) => groups.into_iter().for_each(|g| range.note_member(g)),
                Some(MembershipOp::NotIn) => {
                    groups.into_iter().for_each(|g| range.note_non_member(g))
                }
                None => trace!(operator = %c.operator, "operator ignored for group range"),
            }
        }
        range.settle_alternatives();
        range
    }

    /// Groups the entity must belong to
    pub fn included(&self) -> &IndexSet<String> {
        &self.included
    }

    /// Groups the entity must not belong to
    pub fn excluded(&self) -> &IndexSet<String> {
        &self.excluded
    }

    /// Lists of groups of which the entity must belong to at least one
    pub fn alternatives(&self) -> &[IndexSet<String>] {
        &self.alternatives
    }

    /// Would an entity in exactly these groups satisfy the range?
    pub fn admits(&self, groups: &IndexSet<String>) -> bool {
        self.included.iter().all(|g| groups.contains(g))
            && self.excluded.iter().all(|g| !groups.contains(g))
            && self
                .alternatives
                .iter()
                .all(|a| a.iter().any(|g| groups.contains(g)))
    }

    fn note_member(&mut self, group: String) {
        if self.excluded.contains(&group) {
            self.flags.contradictory = true;
        }
        if !self.included.insert(group) {
            self.flags.redundant = true;
        }
    }

    fn note_non_member(&mut self, group: String) {
        if self.included.contains(&group) {
            self.flags.contradictory = true;
        }
        if !self.excluded.insert(group) {
            self.flags.redundant = true;
        }
    }

    /// An alternative is redundant once a required group or a narrower
    /// alternative already satisfies it.
    fn settle_alternatives(&mut self) {
        let superfluous = self.alternatives.iter().enumerate().any(|(i, a)| {
            a.iter().any(|g| self.included.contains(g))
                || self
                    .alternatives
                    .iter()
                    .enumerate()
                    .any(|(j, b)| i != j && b.is_subset(a))
        });
        if superfluous {
            self.flags.redundant = true;
        }
        let satisfiable = Conditions::of(self).satisfiable();
        if !satisfiable {
            self.flags.contradictory = true;
        }
    }

    /// Every constraint here follows from `other`: denying any one of them
    /// leaves `other` unsatisfiable.
    pub(super) fn contains(&self, other: &GroupRange) -> bool {
        self.included
            .iter()
            .all(|g| !Conditions::of(other).excluding([g]).satisfiable())
            && self
                .excluded
                .iter()
                .all(|g| !Conditions::of(other).including(g).satisfiable())
            && self
                .alternatives
                .iter()
                .all(|a| !Conditions::of(other).excluding(a).satisfiable())
    }

    pub(super) fn excludes(&self, other: &GroupRange) -> bool {
        !Conditions::of(self).and(other).satisfiable()
    }
}

/// The combined constraints of one or more ranges
struct Conditions<'a> {
    included: Vec<&'a str>,
    excluded: Vec<&'a str>,
    alternatives: Vec<&'a IndexSet<String>>,
}

impl<'a> Conditions<'a> {
    fn of(range: &'a GroupRange) -> Self {
        Self {
            included: Vec::new(),
            excluded: Vec::new(),
            alternatives: Vec::new(),
        }
        .and(range)
    }

    fn and(mut self, range: &'a GroupRange) -> Self {
        self.included.extend(range.included.iter().map(String::as_str));
        self.excluded.extend(range.excluded.iter().map(String::as_str));
        self.alternatives.extend(range.alternatives.iter());
        self
    }

    fn including(mut self, group: &'a str) -> Self {
        self.included.push(group);
        self
    }

    fn excluding(mut self, groups: impl IntoIterator<Item = &'a String>) -> Self {
        self.excluded.extend(groups.into_iter().map(String::as_str));
        self
    }

    /// Memberships are independent, so the only conflicts are a group both
    /// required and forbidden, or an alternative whose every group is
    /// forbidden.
    fn satisfiable(&self) -> bool {
        !self.included.iter().any(|g| self.excluded.contains(g))
            && self
                .alternatives
                .iter()
                .all(|a| a.iter().any(|g| !self.excluded.contains(&g.as_str())))
    }
}
