//! Property tests for solver invariants: negation pairs are complementary,
//! length/emptiness agree, and block paths aggregate the same with or
//! without an explicit wildcard.

use attrcheck::graph::Vertex;
use attrcheck::solvers::{compile, Aggregation, RuleDefinition};
use proptest::prelude::*;
use serde_json::{json, Value};

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-1000i64..1000).prop_map(Value::from),
        "[a-c]{0,4}".prop_map(Value::from),
        prop_oneof![Just("true"), Just("FALSE"), Just("42"), Just("")].prop_map(Value::from),
    ]
}

fn attribute_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-c]", inner, 0..3)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn vertex_with(attributes: Value) -> Vertex {
    Vertex::new("test_resource", "r").with_attributes_json(attributes)
}

const PAIRS: &[(&str, &str)] = &[
    ("exists", "not_exists"),
    ("equals", "not_equals"),
    ("regex_match", "not_regex_match"),
    ("starting_with", "not_starting_with"),
    ("ending_with", "not_ending_with"),
    ("contains", "not_contains"),
    ("subset", "not_subset"),
    ("is_empty", "is_not_empty"),
    ("length_equals", "length_not_equals"),
];

fn expected_for(operator: &str, scalar: &Value) -> Value {
    match operator {
        "exists" | "is_empty" => Value::Null,
        "subset" => json!([scalar.clone()]),
        "length_equals" => json!(2),
        "regex_match" => json!("a"),
        "starting_with" | "ending_with" => json!("a"),
        _ => scalar.clone(),
    }
}

const PATHS: &[&str] = &["a", "a.b", "a.*", "a.*.b", "a[0]", "b.c", "missing"];

proptest! {
    #[test]
    fn negation_pairs_are_complementary(
        a in attribute_value(),
        b in attribute_value(),
        scalar in leaf().prop_filter("needs a value", |v| !v.is_null()),
        path_idx in 0..PATHS.len(),
        agg in prop_oneof![
            Just(None),
            Just(Some(Aggregation::Any)),
            Just(Some(Aggregation::All)),
            Just(Some(Aggregation::Collection)),
        ],
    ) {
        let vertex = vertex_with(json!({"a": a, "b": b}));
        let path = PATHS[path_idx];

        for (positive, negative) in PAIRS {
            let value = expected_for(positive, &scalar);
            let mut pos = RuleDefinition::new(positive, path, value.clone());
            let mut neg = RuleDefinition::new(negative, path, value);
            pos.aggregation = agg;
            neg.aggregation = agg;

            let pos = compile(&pos).unwrap();
            let neg = compile(&neg).unwrap();
            prop_assert_eq!(
                pos.evaluate(&vertex),
                !neg.evaluate(&vertex),
                "{} vs {} on {}", positive, negative, path
            );
        }
    }

    #[test]
    fn length_zero_iff_empty(value in attribute_value(), present in any::<bool>()) {
        let attributes = if present { json!({"v": value}) } else { json!({}) };
        let vertex = vertex_with(attributes);

        let length_zero = compile(&RuleDefinition::new("length_equals", "v", json!(0))).unwrap();
        let empty = compile(&RuleDefinition::new("is_empty", "v", Value::Null)).unwrap();

        // Numbers and booleans have no length and are never empty, so the
        // equivalence holds for every shape.
        prop_assert_eq!(length_zero.evaluate(&vertex), empty.evaluate(&vertex));
    }

    #[test]
    fn empty_subset_always_passes(value in attribute_value(), path_idx in 0..PATHS.len()) {
        let vertex = vertex_with(json!({"a": value}));
        let solver = compile(&RuleDefinition::new("subset", PATHS[path_idx], json!([]))).unwrap();
        prop_assert!(solver.evaluate(&vertex));
    }

    #[test]
    fn implicit_and_wildcard_block_paths_agree(
        blocks in prop::collection::vec(
            prop::option::of(attribute_value()).prop_map(|b| match b {
                Some(value) => json!({"b": value}),
                None => json!({"c": 1}),
            }),
            0..4,
        ),
        scalar in leaf().prop_filter("needs a value", |v| !v.is_null()),
        count in 0u64..4,
    ) {
        let vertex = vertex_with(json!({"a": blocks}));
        let rules = [
            ("length_equals", json!(count)),
            ("length_greater_than", json!(count)),
            ("subset", json!([scalar])),
            ("not_subset", json!([scalar])),
        ];
        for (operator, value) in rules {
            let implicit = compile(&RuleDefinition::new(operator, "a.b", value.clone())).unwrap();
            let wildcard = compile(&RuleDefinition::new(operator, "a.*.b", value)).unwrap();
            prop_assert_eq!(
                implicit.evaluate(&vertex),
                wildcard.evaluate(&vertex),
                "{}", operator
            );
        }
    }

    #[test]
    fn resolution_never_panics(value in attribute_value(), raw in "[a-c.*\\[\\]0-9]{0,12}") {
        let vertex = vertex_with(json!({"a": value}));
        let exists = compile(&RuleDefinition::new("exists", &raw, Value::Null));
        // Blank paths are rejected at compile time; everything else evaluates.
        if let Ok(solver) = exists {
            let _ = solver.evaluate(&vertex);
        }
    }
}
