//! Condition clauses: the main conditions of a rule, or one exception
//!
//! A clause groups the comparisons directly beneath one logical test by
//! attribute and turns each group into an [`AttributeRange`]. Analysis then
//! reads the ranges' flags and, for exceptions, compares each range with the
//! main clause's range for the same attribute.

use super::diagnostic::{Diagnostic, DiagnosticKind, Scope};
use super::factory::RangeFactory;
use super::range::AttributeRange;
use crate::rule::{AttributeRef, Comparison, LogicalTest};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, warn};

/// The conjunction of comparisons beneath one logical test
#[derive(Debug, Clone)]
pub struct ConditionClause {
    name: Option<String>,
    ranges: IndexMap<String, AttributeRange>,
    detritus: Vec<Comparison>,
    unsupported: Vec<AttributeRef>,
    analyzable: usize,
}

impl ConditionClause {
    pub fn new(test: &LogicalTest, factory: &RangeFactory<'_>) -> Self {
        let mut groups: IndexMap<&str, (&AttributeRef, Vec<&Comparison>)> = IndexMap::new();
        let mut detritus = Vec::new();
        let mut analyzable = 0;

        for comparison in test.comparisons() {
            match comparison.analyzable() {
                Some((attribute, _)) => {
                    analyzable += 1;
                    groups
                        .entry(attribute.name.as_str())
                        .or_insert_with(|| (attribute, Vec::new()))
                        .1
                        .push(comparison);
                }
                None => detritus.push(comparison.clone()),
            }
        }

        let mut ranges = IndexMap::with_capacity(groups.len());
        let mut unsupported = Vec::new();
        for (name, (attribute, comparisons)) in groups {
            match factory.make_range_for(attribute, &comparisons) {
                Ok(range) => {
                    ranges.insert(name.to_string(), range);
                }
                Err(e) => {
                    warn!(error = %e, "conditions skipped");
                    unsupported.push(attribute.clone());
                }
            }
        }

        debug!(
            clause = test.name.as_deref().unwrap_or("<unnamed>"),
            ranges = ranges.len(),
            detritus = detritus.len(),
            unsupported = unsupported.len(),
            "built condition clause"
        );

        Self {
            name: test.name.clone(),
            ranges,
            detritus,
            unsupported,
            analyzable,
        }
    }

    /// User-assigned name of the underlying test
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn range(&self, attribute: &str) -> Option<&AttributeRange> {
        self.ranges.get(attribute)
    }

    /// Ranges in order of first mention
    pub fn ranges(&self) -> impl Iterator<Item = &AttributeRange> {
        self.ranges.values()
    }

    /// Comparisons the analysis cannot use, such as attribute-to-attribute
    pub fn detritus(&self) -> &[Comparison] {
        &self.detritus
    }

    /// Attributes whose declared type has no range
    pub fn unsupported(&self) -> &[AttributeRef] {
        &self.unsupported
    }

    /// Categories of the entities this clause pins down
    fn unique_categories(&self) -> Vec<&str> {
        self.ranges
            .values()
            .filter(|r| r.is_unique())
            .map(|r| r.attribute().category())
            .collect()
    }

    /// True iff every entity satisfying `other` satisfies this clause: each
    /// attribute constrained here is constrained in `other` at least as
    /// tightly.
    pub fn contains(&self, other: &ConditionClause) -> bool {
        self.ranges.iter().all(|(name, ours)| {
            other
                .range(name)
                .is_some_and(|theirs| ours.contains(theirs))
        })
    }

    /// Report this clause's defects. With `context` (the main clause), the
    /// clause is analyzed as an exception to it.
    pub fn is_consistent(&self, context: Option<&ConditionClause>) -> Vec<Diagnostic> {
        let scope = match context {
            None => Scope::Main,
            Some(_) => Scope::Exception(self.name.clone()),
        };
        let mut out = Vec::new();
        let report = |kind, message: String| Diagnostic::new(scope.clone(), kind, message);

        let uids = self.unique_categories();
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for &category in &uids {
            let count = seen.entry(category).or_default();
            *count += 1;
            if *count == 2 {
                out.push(report(
                    DiagnosticKind::DuplicateIdentifier,
                    format!("Entity \"{}\" is uniquely specified more than once", category),
                ));
            }
        }

        if self.analyzable == 0 {
            out.push(match context {
                None => report(
                    DiagnosticKind::NoConditions,
                    "no conditions found in the rule".to_string(),
                ),
                Some(_) => report(
                    DiagnosticKind::UnqualifiedException,
                    "unqualified exception--rule is rendered completely ineffective".to_string(),
                ),
            });
        }

        for attribute in &self.unsupported {
            out.push(
                report(
                    DiagnosticKind::UnsupportedType,
                    format!(
                        "conditions on {} were not examined; type \"{}\" is not supported",
                        attribute.display_name(),
                        attribute.type_tag
                    ),
                )
                .with_attribute(&attribute.name),
            );
        }

        for range in self.ranges.values() {
            let attribute = range.attribute();
            let ui = attribute.display_name();
            if range.is_contradictory() {
                out.push(
                    report(
                        DiagnosticKind::Contradiction,
                        format!("{} never satisfies these conditions", ui),
                    )
                    .with_attribute(&attribute.name),
                );
            } else if range.is_redundant() {
                out.push(
                    report(
                        DiagnosticKind::Redundancy,
                        format!("some conditions on {} are redundant", ui),
                    )
                    .with_attribute(&attribute.name),
                );
            }
            if range.has_tautology() {
                out.push(
                    report(
                        DiagnosticKind::Tautology,
                        format!("{} always satisfies some of these conditions", ui),
                    )
                    .with_attribute(&attribute.name),
                );
            }
            if range.violates_domain() {
                out.push(
                    report(
                        DiagnosticKind::DomainViolation,
                        format!("found inappropriate or malformed values for {}", ui),
                    )
                    .with_attribute(&attribute.name),
                );
            }
        }

        if let Some(main) = context {
            let main_uids = main.unique_categories();
            for range in self.ranges.values() {
                if range.is_contradictory() || range.violates_domain() {
                    continue;
                }
                let attribute = range.attribute();
                let ui = attribute.display_name();
                let category = attribute.category();
                if main_uids.contains(&category) {
                    out.push(
                        report(
                            DiagnosticKind::IrrelevantToMain,
                            format!(
                                "the constraints on \"{}\" are irrelevant since the \"{}\" is uniquely specified by the main conditions",
                                ui, category
                            ),
                        )
                        .with_attribute(&attribute.name),
                    );
                }
                let Some(theirs) = main.range(&attribute.name) else {
                    continue;
                };
                if theirs.is_contradictory() {
                    continue;
                }
                if range.contains(theirs) {
                    out.push(
                        report(
                            DiagnosticKind::ImpliedByMain,
                            format!("the constraints on \"{}\" are implied by the main conditions", ui),
                        )
                        .with_attribute(&attribute.name),
                    );
                } else if range.excludes(theirs) {
                    out.push(
                        report(
                            DiagnosticKind::PrecludedByMain,
                            format!("the constraints on \"{}\" are precluded by the main conditions", ui),
                        )
                        .with_attribute(&attribute.name),
                    );
                }
            }
        }

        for range in self.ranges.values().filter(|r| !r.is_unique()) {
            let attribute = range.attribute();
            let category = attribute.category();
            if uids.contains(&category) {
                out.push(
                    report(
                        DiagnosticKind::IrrelevantToEntity,
                        format!(
                            "conditions on {} are irrelevant; the {} is uniquely specified",
                            attribute.display_name(),
                            category
                        ),
                    )
                    .with_attribute(&attribute.name),
                );
            }
        }

        out
    }
}
