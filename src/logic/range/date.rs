use super::RangeFlags;
use crate::config::{DateOp, DateOperators};
use crate::rule::{Comparison, Literal};
use chrono::NaiveDate;
use tracing::trace;

/// A date attribute as an inclusive span of calendar days. Timestamps are
/// compared by their day alone.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DateRange {
    pub(super) flags: RangeFlags,
    earliest: Option<NaiveDate>,
    latest: Option<NaiveDate>,
}

impl DateRange {
    pub(crate) fn from_comparisons(ops: &DateOperators, comparisons: &[&Comparison]) -> Self {
        let mut range = Self::default();
        for c in comparisons {
            let day = match c.literal() {
                Some(Literal::Date(d)) => *d,
                Some(Literal::Timestamp(t)) => t.date(),
                other => {
                    trace!(literal = ?other, "non-date literal for date attribute");
                    range.flags.violates_domain = true;
                    continue;
                }
            };
            match ops.resolve(&c.operator) {
                Some(DateOp::SameDay) => {
                    range.note_earliest(Some(day));
                    range.note_latest(Some(day));
                }
                Some(DateOp::After) => range.note_earliest(day.succ_opt()),
                Some(DateOp::Before) => range.note_latest(day.pred_opt()),
                None => trace!(operator = %c.operator, "operator ignored for date range"),
            }
        }
        range
    }

    pub fn earliest(&self) -> Option<NaiveDate> {
        self.earliest
    }

    pub fn latest(&self) -> Option<NaiveDate> {
        self.latest
    }

    /// `None` is a day past the end of the calendar
    fn note_earliest(&mut self, day: Option<NaiveDate>) {
        if self.flags.contradictory {
            self.flags.redundant = true;
            return;
        }
        let Some(day) = day else {
            self.flags.contradictory = true;
            return;
        };
        self.earliest = match self.earliest {
            Some(current) => {
                self.flags.redundant = true;
                Some(current.max(day))
            }
            None => Some(day),
        };
        self.check_empty();
    }

    fn note_latest(&mut self, day: Option<NaiveDate>) {
        if self.flags.contradictory {
            self.flags.redundant = true;
            return;
        }
        let Some(day) = day else {
            self.flags.contradictory = true;
            return;
        };
        self.latest = match self.latest {
            Some(current) => {
                self.flags.redundant = true;
                Some(current.min(day))
            }
            None => Some(day),
        };
        self.check_empty();
    }

    fn check_empty(&mut self) {
        if let (Some(early), Some(late)) = (self.earliest, self.latest) {
            if early > late {
                self.flags.contradictory = true;
            }
        }
    }

    pub(super) fn contains(&self, other: &DateRange) -> bool {
        let early = match (self.earliest, other.earliest) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(ours), Some(theirs)) => theirs >= ours,
        };
        let late = match (self.latest, other.latest) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(ours), Some(theirs)) => theirs <= ours,
        };
        early && late
    }

    pub(super) fn excludes(&self, other: &DateRange) -> bool {
        matches!((self.earliest, other.latest), (Some(e), Some(l)) if e > l)
            || matches!((self.latest, other.earliest), (Some(l), Some(e)) if l < e)
    }
}
