//! Tests for the assertion engine.

use super::*;
use serde_json::{Map, Value, json};

fn output(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn assertion(kind: &str, field: &str, expected: Value) -> Assertion {
    Assertion {
        id: format!("a-{kind}"),
        kind: kind.to_string(),
        field: field.to_string(),
        expected_value: expected,
    }
}

fn grade(out: Value, a: Assertion) -> AssertionResult {
    let mut results = run(&output(out), &[a]);
    assert_eq!(results.len(), 1);
    results.remove(0)
}

// =========================================================================
// Result shape
// =========================================================================

#[test]
fn test_one_result_per_assertion_in_order() {
    let out = output(json!({"summary": "ok", "confidence": 0.8}));
    let assertions = vec![
        assertion("lessThan", "confidence", json!(0.5)),
        assertion("bogus", "summary", json!("ok")),
        assertion("equalTo", "summary", json!("ok")),
    ];
    let assertions: Vec<Assertion> = assertions
        .into_iter()
        .enumerate()
        .map(|(i, mut a)| {
            a.id = format!("a{i}");
            a
        })
        .collect();

    let results = run(&out, &assertions);

    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a0", "a1", "a2"]);
    let passed: Vec<bool> = results.iter().map(|r| r.passed).collect();
    assert_eq!(passed, vec![false, false, true]);
}

#[test]
fn test_no_assertions_no_results() {
    assert!(run(&output(json!({"a": 1})), &[]).is_empty());
}

#[test]
fn test_result_serializes_camel_case() {
    let result = grade(json!({"n": 3}), assertion("equalTo", "n", json!(3)));
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["actualValue"], json!(3));
    assert_eq!(value["passed"], json!(true));
}

#[test]
fn test_absent_actual_value_is_omitted() {
    let result = grade(json!({}), assertion("equalTo", "missing", json!(1)));
    assert_eq!(result.actual_value, None);
    let value = serde_json::to_value(&result).unwrap();
    assert!(value.get("actualValue").is_none());
}

// =========================================================================
// equalTo / notEqualTo
// =========================================================================

#[test]
fn test_equal_to_pass_message() {
    let result = grade(json!({"status": "ok"}), assertion("equalTo", "status", json!("ok")));
    assert!(result.passed);
    assert_eq!(result.message, "Field \"status\" correctly equals \"ok\".");
    assert_eq!(result.actual_value, Some(json!("ok")));
}

#[test]
fn test_equal_to_fail_message() {
    let result = grade(json!({"status": "bad"}), assertion("equalTo", "status", json!("ok")));
    assert!(!result.passed);
    assert_eq!(
        result.message,
        "Expected field \"status\" to equal \"ok\", but got \"bad\"."
    );
}

#[test]
fn test_equal_to_missing_field_reports_undefined() {
    let result = grade(json!({}), assertion("equalTo", "status", json!("ok")));
    assert!(!result.passed);
    assert_eq!(
        result.message,
        "Expected field \"status\" to equal \"ok\", but got \"undefined\"."
    );
}

#[test]
fn test_equal_to_absent_never_equals_null() {
    let result = grade(json!({}), assertion("equalTo", "x", Value::Null));
    assert!(!result.passed);

    let result = grade(json!({"x": null}), assertion("equalTo", "x", Value::Null));
    assert!(result.passed);
}

#[test]
fn test_equal_to_is_type_strict() {
    let result = grade(json!({"n": 5}), assertion("equalTo", "n", json!("5")));
    assert!(!result.passed);
}

#[test]
fn test_equal_to_numbers_compare_by_value() {
    let result = grade(json!({"n": 5}), assertion("equalTo", "n", json!(5.0)));
    assert!(result.passed);
    assert_eq!(result.message, "Field \"n\" correctly equals \"5\".");
}

#[test]
fn test_equal_to_nested_path() {
    let out = json!({"meta": {"tags": ["a", "b"]}});
    assert!(grade(out.clone(), assertion("equalTo", "meta.tags.1", json!("b"))).passed);
    assert!(grade(out, assertion("equalTo", "meta.tags[0]", json!("a"))).passed);
}

#[test]
fn test_not_equal_to_messages() {
    let result = grade(json!({"s": "x"}), assertion("notEqualTo", "s", json!("y")));
    assert!(result.passed);
    assert_eq!(result.message, "Field \"s\" correctly does not equal \"y\".");

    let result = grade(json!({"s": "y"}), assertion("notEqualTo", "s", json!("y")));
    assert!(!result.passed);
    assert_eq!(
        result.message,
        "Expected field \"s\" not to equal \"y\", but it did."
    );
}

#[test]
fn test_not_equal_to_absent_passes() {
    let result = grade(json!({}), assertion("notEqualTo", "s", json!("y")));
    assert!(result.passed);
}

// =========================================================================
// contains
// =========================================================================

#[test]
fn test_contains_pass_and_fail() {
    let out = json!({"summary": "The policy covers retention."});
    let result = grade(out.clone(), assertion("contains", "summary", json!("retention")));
    assert!(result.passed);
    assert_eq!(result.message, "Field \"summary\" correctly contains \"retention\".");

    let result = grade(out, assertion("contains", "summary", json!("GDPR")));
    assert!(!result.passed);
    assert_eq!(
        result.message,
        "Expected field \"summary\" to contain \"GDPR\", but it did not."
    );
}

#[test]
fn test_contains_uses_string_form_of_expected() {
    let result = grade(json!({"s": "version 42"}), assertion("contains", "s", json!(42)));
    assert!(result.passed);
}

#[test]
fn test_contains_requires_string_actual() {
    let result = grade(json!({"tags": ["a"]}), assertion("contains", "tags", json!("a")));
    assert!(!result.passed);
}

// =========================================================================
// greaterThan / lessThan
// =========================================================================

#[test]
fn test_greater_than_messages() {
    let result = grade(json!({"c": 0.9}), assertion("greaterThan", "c", json!(0.5)));
    assert!(result.passed);
    assert_eq!(
        result.message,
        "Field \"c\" (0.9) is correctly greater than \"0.5\"."
    );

    let result = grade(json!({"c": 0.2}), assertion("greaterThan", "c", json!(0.5)));
    assert!(!result.passed);
    assert_eq!(
        result.message,
        "Expected field \"c\" (0.2) to be greater than \"0.5\", but it was not."
    );
}

#[test]
fn test_less_than_messages() {
    let result = grade(json!({"n": 3}), assertion("lessThan", "n", json!(10)));
    assert!(result.passed);
    assert_eq!(result.message, "Field \"n\" (3) is correctly less than \"10\".");

    let result = grade(json!({}), assertion("lessThan", "n", json!(10)));
    assert!(!result.passed);
    assert_eq!(
        result.message,
        "Expected field \"n\" (undefined) to be less than \"10\", but it was not."
    );
}

#[test]
fn test_ordering_requires_numbers_on_both_sides() {
    assert!(!grade(json!({"n": "9"}), assertion("greaterThan", "n", json!(1))).passed);
    assert!(!grade(json!({"n": 9}), assertion("greaterThan", "n", json!("1"))).passed);
    assert!(!grade(json!({"n": 1}), assertion("greaterThan", "n", json!(1))).passed);
}

// =========================================================================
// Unknown types
// =========================================================================

#[test]
fn test_unknown_type_fails() {
    let result = grade(json!({"s": "x"}), assertion("matchesRegex", "s", json!("x")));
    assert!(!result.passed);
    assert_eq!(result.message, "Unknown assertion type: \"matchesRegex\".");
    assert_eq!(result.actual_value, Some(json!("x")));
}

#[test]
fn test_unknown_type_survives_deserialization() {
    let a: Assertion = serde_json::from_value(json!({
        "id": "a1",
        "type": "startsWith",
        "field": "s"
    }))
    .unwrap();
    assert_eq!(a.kind, "startsWith");
    assert_eq!(a.expected_value, Value::Null);
    assert_eq!(a.parsed_kind(), None);
}

#[test]
fn test_kind_names_round_trip() {
    for kind in [
        AssertionKind::EqualTo,
        AssertionKind::NotEqualTo,
        AssertionKind::Contains,
        AssertionKind::GreaterThan,
        AssertionKind::LessThan,
    ] {
        assert_eq!(AssertionKind::from_str(kind.as_str()), Some(kind));
    }
    let built = Assertion::new("a", AssertionKind::Contains, "s", "x");
    assert_eq!(built.kind, "contains");
}

#[test]
fn test_render_value() {
    assert_eq!(render_value(None), "undefined");
    assert_eq!(render_value(Some(&json!("raw"))), "raw");
    assert_eq!(render_value(Some(&json!(7))), "7");
    assert_eq!(render_value(Some(&json!(2.5))), "2.5");
    assert_eq!(render_value(Some(&json!(true))), "true");
    assert_eq!(render_value(Some(&json!({"a": 1}))), "{\"a\":1}");
    assert_eq!(render_value(Some(&Value::Null)), "null");
}

#[test]
fn test_render_array_lists_elements() {
    assert_eq!(render_value(Some(&json!([1, 2]))), "1,2");
    assert_eq!(render_value(Some(&json!(["a", null, [3, 4.5]]))), "a,,3,4.5");
    assert_eq!(render_value(Some(&json!([]))), "");
}

#[test]
fn test_array_actual_in_failure_message() {
    let result = grade(json!({"tags": ["a", "b"]}), assertion("equalTo", "tags", json!("a")));
    assert!(!result.passed);
    assert_eq!(
        result.message,
        "Expected field \"tags\" to equal \"a\", but got \"a,b\"."
    );
}
