//! Shared helpers: structural equality and cross-type numeric comparison.
use num_cmp::NumCmp;
use serde_json::{Map, Number, Value};

/// Structural equality: arrays ordered, objects unordered, numbers compared
/// across representations so `1 == 1.0`.
pub(crate) fn equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(left), Value::Bool(right)) => left == right,
        (Value::String(left), Value::String(right)) => left == right,
        (Value::Number(left), Value::Number(right)) => equal_numbers(left, right),
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len() && left.iter().zip(right.iter()).all(|(l, r)| equal(l, r))
        }
        (Value::Object(left), Value::Object(right)) => equal_objects(left, right),
        (_, _) => false,
    }
}

fn equal_objects(left: &Map<String, Value>, right: &Map<String, Value>) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .all(|(key, value)| right.get(key).is_some_and(|other| equal(value, other)))
}

pub(crate) fn equal_numbers(left: &Number, right: &Number) -> bool {
    if let (Some(left), Some(right)) = (left.as_u64(), right.as_u64()) {
        return left == right;
    }
    if let (Some(left), Some(right)) = (left.as_i64(), right.as_i64()) {
        return left == right;
    }
    if left.is_f64() && right.is_f64() {
        return left.as_f64() == right.as_f64();
    }
    // Mixed integer/float, or integers of opposite signedness
    if let Some(left) = left.as_u64() {
        return right.as_f64().is_some_and(|right| NumCmp::num_eq(left, right));
    }
    if let Some(left) = left.as_i64() {
        return right.as_f64().is_some_and(|right| NumCmp::num_eq(left, right));
    }
    if let Some(right) = right.as_u64() {
        return left.as_f64().is_some_and(|left| NumCmp::num_eq(left, right));
    }
    if let Some(right) = right.as_i64() {
        return left.as_f64().is_some_and(|left| NumCmp::num_eq(left, right));
    }
    false
}

macro_rules! comparison {
    ($name:ident, $op:tt) => {
        pub(crate) fn $name(instance: &Number, limit: &Number) -> bool {
            if let (Some(instance), Some(limit)) = (instance.as_u64(), limit.as_u64()) {
                return instance $op limit;
            }
            if let (Some(instance), Some(limit)) = (instance.as_i64(), limit.as_i64()) {
                return instance $op limit;
            }
            if let Some(instance) = instance.as_u64() {
                NumCmp::$name(instance, limit.as_f64().expect("A JSON number"))
            } else if let Some(instance) = instance.as_i64() {
                NumCmp::$name(instance, limit.as_f64().expect("A JSON number"))
            } else {
                let instance = instance.as_f64().expect("A JSON number");
                if let Some(limit) = limit.as_u64() {
                    NumCmp::$name(instance, limit)
                } else if let Some(limit) = limit.as_i64() {
                    NumCmp::$name(instance, limit)
                } else {
                    NumCmp::$name(instance, limit.as_f64().expect("A JSON number"))
                }
            }
        }
    };
}

comparison!(num_le, <=);
comparison!(num_lt, <);
comparison!(num_ge, >=);
comparison!(num_gt, >);

#[cfg(test)]
mod tests {
    use super::{equal, num_le, num_lt};
    use serde_json::json;
    use test_case::test_case;

    #[test_case(&json!(1), &json!(1.0), true)]
    #[test_case(&json!(1), &json!(1), true)]
    #[test_case(&json!(1.5), &json!(1.5), true)]
    #[test_case(&json!(1), &json!(2), false)]
    #[test_case(&json!([1, 2]), &json!([1.0, 2.0]), true)]
    #[test_case(&json!([1, 2]), &json!([2, 1]), false; "arrays are ordered")]
    #[test_case(&json!({"a": 1, "b": 2}), &json!({"b": 2.0, "a": 1.0}), true; "objects are unordered")]
    #[test_case(&json!({"a": 1}), &json!({"a": 1, "b": 2}), false)]
    #[test_case(&json!("1"), &json!(1), false)]
    #[test_case(&json!(null), &json!(null), true)]
    fn equality(left: &serde_json::Value, right: &serde_json::Value, expected: bool) {
        assert_eq!(equal(left, right), expected);
        assert_eq!(equal(right, left), expected);
    }

    #[test]
    fn comparisons_cross_representations() {
        let one = serde_json::Number::from(1);
        let one_and_a_half = serde_json::Number::from_f64(1.5).expect("finite");
        assert!(num_lt(&one, &one_and_a_half));
        assert!(num_le(&one, &one));
        assert!(!num_lt(&one_and_a_half, &one));
    }

    #[test]
    fn large_u64_does_not_equal_nearby_f64() {
        let large = serde_json::Number::from(u64::MAX);
        let close = serde_json::Number::from_f64(u64::MAX as f64).expect("finite");
        assert!(!super::equal_numbers(&large, &close));
    }
}
