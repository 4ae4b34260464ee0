//! Property-based tests for numeric ranges
//!
//! Uses proptest to generate random comparison lists and checks the ranges
//! built from them against brute-force evaluation over sample values.

use proptest::prelude::*;
use qrule_logic::logic::range::{DecimalRange, IntegerRange};
use qrule_logic::{
    AnalyzerConfig, AttributeRange, AttributeRef, Comparison, Literal, RangeFactory, RangeValues,
};

const OPS: [&str; 6] = ["=", "<>", ">", "<", ">=", "<="];

fn satisfies(op: &str, x: f64, n: f64) -> bool {
    match op {
        "=" => x == n,
        "<>" => x != n,
        ">" => x > n,
        "<" => x < n,
        ">=" => x >= n,
        "<=" => x <= n,
        _ => unreachable!(),
    }
}

fn any_conditions() -> impl Strategy<Value = Vec<(&'static str, i64)>> {
    prop::collection::vec((prop::sample::select(OPS.to_vec()), -20i64..=20), 0..6)
}

fn build(type_tag: &str, conditions: &[(&str, i64)], decimal: bool) -> AttributeRange {
    let attribute = AttributeRef::new("X", type_tag);
    let comparisons: Vec<Comparison> = conditions
        .iter()
        .map(|(op, n)| {
            let literal = if decimal {
                Literal::Decimal(*n as f64)
            } else {
                Literal::Integer(*n)
            };
            Comparison::new(attribute.clone(), *op, literal)
        })
        .collect();
    let refs: Vec<&Comparison> = comparisons.iter().collect();
    let config = AnalyzerConfig::default();
    RangeFactory::new(&config)
        .make_range_for(&attribute, &refs)
        .unwrap()
}

fn integer(range: &AttributeRange) -> &IntegerRange {
    match range.values() {
        RangeValues::Integer(r) => r,
        other => panic!("expected integer range, got {:?}", other),
    }
}

fn decimal(range: &AttributeRange) -> &DecimalRange {
    match range.values() {
        RangeValues::Decimal(r) => r,
        other => panic!("expected decimal range, got {:?}", other),
    }
}

fn brute(conditions: &[(&str, i64)], x: f64) -> bool {
    conditions
        .iter()
        .all(|(op, n)| satisfies(op, x, *n as f64))
}

proptest! {
    #[test]
    fn test_integer_range_matches_brute_force(conditions in any_conditions()) {
        let range = build("Integer", &conditions, false);
        let values = integer(&range);
        let mut any = false;
        for x in -30i64..=30 {
            let expected = brute(&conditions, x as f64);
            any |= expected;
            prop_assert_eq!(values.contains_value(x), expected, "x = {}", x);
        }
        prop_assert_eq!(range.is_contradictory(), !any);
    }

    #[test]
    fn test_decimal_range_matches_brute_force(conditions in any_conditions()) {
        let range = build("Float", &conditions, true);
        let values = decimal(&range);
        for half in -60i64..=60 {
            let x = half as f64 / 2.0;
            let expected = brute(&conditions, x);
            if range.is_contradictory() {
                prop_assert!(!expected, "contradictory range admits x = {}", x);
            } else {
                prop_assert_eq!(values.contains_value(x), expected, "x = {}", x);
            }
        }
    }

    #[test]
    fn test_repeated_condition_is_flagged(
        conditions in any_conditions(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!conditions.is_empty());
        let mut repeated = conditions.clone();
        repeated.push(conditions[pick.index(conditions.len())]);

        for (tag, decimal) in [("Integer", false), ("Float", true)] {
            let range = build(tag, &repeated, decimal);
            prop_assert!(range.is_redundant() || range.is_contradictory());
        }
    }

    #[test]
    fn test_integer_containment_is_sound(a in any_conditions(), b in any_conditions()) {
        let ra = build("Integer", &a, false);
        let rb = build("Integer", &b, false);
        if ra.contains(&rb) {
            for x in -30..=30 {
                let x = x as f64;
                prop_assert!(!brute(&b, x) || brute(&a, x), "x = {}", x);
            }
        }
        if ra.excludes(&rb) {
            for x in -30..=30 {
                let x = x as f64;
                prop_assert!(!(brute(&a, x) && brute(&b, x)), "x = {}", x);
            }
        }
    }

    #[test]
    fn test_decimal_containment_is_sound(a in any_conditions(), b in any_conditions()) {
        let ra = build("Float", &a, true);
        let rb = build("Float", &b, true);
        for half in -60i64..=60 {
            let x = half as f64 / 2.0;
            if ra.contains(&rb) {
                prop_assert!(!brute(&b, x) || brute(&a, x), "x = {}", x);
            }
            if ra.excludes(&rb) {
                prop_assert!(!(brute(&a, x) && brute(&b, x)), "x = {}", x);
            }
        }
    }

    #[test]
    fn test_every_range_contains_itself(conditions in any_conditions()) {
        let range = build("Integer", &conditions, false);
        prop_assert!(range.contains(&range));
        let range = build("Float", &conditions, true);
        prop_assert!(range.contains(&range));
    }
}
