// Copyright (c) Microsoft. All rights reserved.

//! Structural matching of instance parameter bags.
//!
//! Objects match when they have the same key set and every value matches,
//! arrays when they have the same length and match element-wise in order.
//! Integers are compared exactly; any other pair of numbers is compared as
//! `f64`, so `1` matches `1.0`. Values of different JSON kinds never match.

use osb_api::Parameters;
use serde_json::{Number, Value};

#[must_use]
pub fn parameters_match(left: &Parameters, right: &Parameters) -> bool {
    left.len() == right.len()
        && left.iter().all(|(key, value)| {
            right
                .get(key)
                .map_or(false, |other| values_match(value, other))
        })
}

#[must_use]
pub fn values_match(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(left), Value::Bool(right)) => left == right,
        (Value::String(left), Value::String(right)) => left == right,
        (Value::Number(left), Value::Number(right)) => numbers_match(left, right),
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right.iter())
                    .all(|(left, right)| values_match(left, right))
        }
        (Value::Object(left), Value::Object(right)) => parameters_match(left, right),
        _ => false,
    }
}

fn numbers_match(left: &Number, right: &Number) -> bool {
    let is_integer = |n: &Number| n.is_i64() || n.is_u64();

    if is_integer(left) && is_integer(right) {
        (left.as_i64(), left.as_u64()) == (right.as_i64(), right.as_u64())
    } else {
        left.as_f64() == right.as_f64()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn bag(value: Value) -> Parameters {
        match value {
            Value::Object(map) => map,
            _ => panic!("test parameters must be an object"),
        }
    }

    #[test]
    fn empty_bags_match() {
        assert!(parameters_match(&Parameters::new(), &Parameters::new()));
    }

    #[test]
    fn key_order_is_irrelevant() {
        let left = bag(json!({ "a": 1, "b": "two" }));
        let right = bag(json!({ "b": "two", "a": 1 }));

        assert!(parameters_match(&left, &right));
    }

    #[test]
    fn extra_key_does_not_match() {
        let left = bag(json!({ "a": 1 }));
        let right = bag(json!({ "a": 1, "b": null }));

        assert!(!parameters_match(&left, &right));
        assert!(!parameters_match(&right, &left));
    }

    #[test]
    fn nested_structures() {
        let left = bag(json!({ "color": "Grey", "tags": ["x", "y"], "size": { "cpu": 2 } }));
        let same = bag(json!({ "size": { "cpu": 2 }, "tags": ["x", "y"], "color": "Grey" }));
        let reordered_list = bag(json!({ "color": "Grey", "tags": ["y", "x"], "size": { "cpu": 2 } }));
        let nested_change = bag(json!({ "color": "Grey", "tags": ["x", "y"], "size": { "cpu": 3 } }));

        assert!(parameters_match(&left, &same));
        assert!(!parameters_match(&left, &reordered_list));
        assert!(!parameters_match(&left, &nested_change));
    }

    #[test]
    fn numbers() {
        assert!(values_match(&json!(1), &json!(1.0)));
        assert!(values_match(&json!(-7), &json!(-7)));
        assert!(values_match(&json!(u64::MAX), &json!(u64::MAX)));
        assert!(!values_match(&json!(-1), &json!(u64::MAX)));
        assert!(!values_match(&json!(1.5), &json!(1)));
        assert!(values_match(&json!(0.25), &json!(0.25)));
    }

    #[test]
    fn different_kinds_never_match() {
        assert!(!values_match(&json!("1"), &json!(1)));
        assert!(!values_match(&json!(null), &json!(false)));
        assert!(!values_match(&json!([]), &json!({})));
    }
}
