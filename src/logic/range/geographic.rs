use super::RangeFlags;
use crate::config::{MembershipOp, MembershipOperators};
use crate::rule::{Comparison, Literal};
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// A region within a geography, written `geography:region`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeoRegion {
    pub geography: String,
    pub region: String,
}

impl GeoRegion {
    /// Split at the first colon; both halves must be non-empty
    pub fn parse(token: &str) -> Option<Self> {
        let (geography, region) = token.split_once(':')?;
        if geography.is_empty() || region.is_empty() {
            return None;
        }
        Some(Self {
            geography: geography.to_string(),
            region: region.to_string(),
        })
    }
}

impl fmt::Display for GeoRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.geography, self.region)
    }
}

/// Location constraints. Every location lies in exactly one region of each
/// geography, so at most one region per geography can be required. A list
/// of regions on `inRegion` requires the location to lie in at least one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeographicRange {
    pub(super) flags: RangeFlags,
    included: Vec<GeoRegion>,
    excluded: Vec<GeoRegion>,
    alternatives: Vec<Vec<GeoRegion>>,
}

fn in_geography<'a>(geography: &'a str, regions: &'a [GeoRegion]) -> Vec<&'a GeoRegion> {
    regions
        .iter()
        .filter(|r| r.geography == geography)
        .collect()
}

impl GeographicRange {
    pub(crate) fn from_comparisons(ops: &MembershipOperators, comparisons: &[&Comparison]) -> Self {
        let mut range = Self::default();
        for c in comparisons {
            let tokens = match c.literal() {
                Some(Literal::String(s)) => vec![s.as_str()],
                Some(Literal::List(items)) => items.iter().map(String::as_str).collect(),
                other => {
                    trace!(literal = ?other, "non-string literal for geographic attribute");
                    range.flags.violates_domain = true;
                    continue;
                }
            };
            if tokens.is_empty() {
                range.flags.violates_domain = true;
            }
            let mut regions: Vec<GeoRegion> = Vec::new();
            for token in tokens {
                let Some(region) = GeoRegion::parse(token) else {
                    trace!(token, "malformed geography:region token");
                    range.flags.violates_domain = true;
                    continue;
                };
                if regions.contains(&region) {
                    range.flags.redundant = true;
                } else {
                    regions.push(region);
                }
            }
            match ops.resolve(&c.operator) {
                Some(MembershipOp::In) if regions.len() > 1 => range.alternatives.push(regions),
                Some(MembershipOp::In) => regions.into_iter().for_each(|r| range.note_inclusion(r)),
                Some(MembershipOp::NotIn) => {
                    regions.into_iter().for_each(|r| range.note_exclusion(r))
                }
                None => trace!(operator = %c.operator, "operator ignored for geographic range"),
            }
        }
        range.settle_alternatives();
        range
    }

    /// Regions the location must lie in
    pub fn included(&self) -> &[GeoRegion] {
        &self.included
    }

    /// Regions the location must not lie in
    pub fn excluded(&self) -> &[GeoRegion] {
        &self.excluded
    }

    /// Lists of regions of which the location must lie in at least one
    pub fn alternatives(&self) -> &[Vec<GeoRegion>] {
        &self.alternatives
    }

    /// Would a location in exactly these regions, one per geography listed,
    /// satisfy the range? Geographies missing from `location` lie in some
    /// region the range never names.
    pub fn admits(&self, location: &HashMap<String, String>) -> bool {
        let lies_in =
            |r: &GeoRegion| location.get(&r.geography).is_some_and(|region| *region == r.region);
        self.included.iter().all(lies_in)
            && !self.excluded.iter().any(lies_in)
            && self.alternatives.iter().all(|a| a.iter().any(lies_in))
    }

    fn note_inclusion(&mut self, region: GeoRegion) {
        let same_in = in_geography(&region.geography, &self.included);
        let same_out = in_geography(&region.geography, &self.excluded);

        let already = same_in.contains(&&region);
        let other_required = !same_in.is_empty() && !already;
        let excluded_here = same_out.contains(&&region);
        let other_excluded = !same_out.is_empty() && !excluded_here;

        if already || other_excluded {
            self.flags.redundant = true;
        }
        if other_required || excluded_here {
            self.flags.contradictory = true;
        }
        if !already {
            self.included.push(region);
        }
    }

    fn note_exclusion(&mut self, region: GeoRegion) {
        let same_in = in_geography(&region.geography, &self.included);
        let same_out = in_geography(&region.geography, &self.excluded);

        let already = same_out.contains(&&region);
        let required_here = same_in.contains(&&region);
        let other_required = same_in.len() > 1 || (same_in.len() == 1 && !required_here);

        if already || other_required {
            self.flags.redundant = true;
        }
        if required_here {
            self.flags.contradictory = true;
        }
        if !already {
            self.excluded.push(region);
        }
    }

    /// An alternative is redundant once a required region or a narrower
    /// alternative already satisfies it.
    fn settle_alternatives(&mut self) {
        let superfluous = self.alternatives.iter().enumerate().any(|(i, a)| {
            a.iter().any(|r| self.included.contains(r))
                || self
                    .alternatives
                    .iter()
                    .enumerate()
                    .any(|(j, b)| i != j && b.iter().all(|r| a.contains(r)))
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
    pub(super) fn contains(&self, other: &GeographicRange) -> bool {
        self.included
            .iter()
            .all(|r| !Conditions::of(other).excluding([r]).satisfiable())
            && self
                .excluded
                .iter()
                .all(|r| !Conditions::of(other).including(r).satisfiable())
            && self
                .alternatives
                .iter()
                .all(|a| !Conditions::of(other).excluding(a).satisfiable())
    }

    pub(super) fn excludes(&self, other: &GeographicRange) -> bool {
        !Conditions::of(self).and(other).satisfiable()
    }
}

/// The combined constraints of one or more ranges
struct Conditions<'a> {
    included: Vec<&'a GeoRegion>,
    excluded: Vec<&'a GeoRegion>,
    alternatives: Vec<&'a [GeoRegion]>,
}

impl<'a> Conditions<'a> {
    fn of(range: &'a GeographicRange) -> Self {
        Self {
            included: Vec::new(),
            excluded: Vec::new(),
            alternatives: Vec::new(),
        }
        .and(range)
    }

    fn and(mut self, range: &'a GeographicRange) -> Self {
        self.included.extend(range.included.iter());
        self.excluded.extend(range.excluded.iter());
        self.alternatives
            .extend(range.alternatives.iter().map(Vec::as_slice));
        self
    }

    fn including(mut self, region: &'a GeoRegion) -> Self {
        self.included.push(region);
        self
    }

    fn excluding(mut self, regions: impl IntoIterator<Item = &'a GeoRegion>) -> Self {
        self.excluded.extend(regions);
        self
    }

    /// Is there a location meeting every condition? Required regions fix
    /// their geographies; each alternative then needs one region that is
    /// neither excluded nor in a geography already fixed elsewhere.
    fn satisfiable(&self) -> bool {
        let mut fixed: HashMap<&str, &str> = HashMap::new();
        for &r in &self.included {
            if self.excluded.contains(&r) {
                return false;
            }
            match fixed.insert(&r.geography, &r.region) {
                Some(previous) if previous != r.region => return false,
                _ => {}
            }
        }
        self.choose(&self.alternatives, &mut fixed)
    }

    fn choose(
        &self,
        alternatives: &[&'a [GeoRegion]],
        fixed: &mut HashMap<&'a str, &'a str>,
    ) -> bool {
        let Some((&first, rest)) = alternatives.split_first() else {
            return true;
        };
        first.iter().any(|r| {
            if self.excluded.contains(&r) {
                return false;
            }
            match fixed.get(r.geography.as_str()) {
                Some(region) if *region == r.region => self.choose(rest, fixed),
                Some(_) => false,
                None => {
                    fixed.insert(&r.geography, &r.region);
                    let found = self.choose(rest, fixed);
                    fixed.remove(r.geography.as_str());
                    found
                }
            }
        })
    }
}
