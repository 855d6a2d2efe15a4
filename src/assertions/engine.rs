//! Evaluation of assertions against an output.

use super::path::lookup;
use super::types::{Assertion, AssertionKind, AssertionResult};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Grade `output` against every assertion, preserving order.
///
/// Always returns exactly one result per assertion.
pub fn run(output: &Map<String, Value>, assertions: &[Assertion]) -> Vec<AssertionResult> {
    let root = Value::Object(output.clone());
    assertions.iter().map(|a| evaluate(&root, a)).collect()
}

fn evaluate(root: &Value, assertion: &Assertion) -> AssertionResult {
    let actual = lookup(root, &assertion.field);
    let field = &assertion.field;
    let expected = render_value(Some(&assertion.expected_value));
    let shown = render_value(actual);

    let (passed, message) = match assertion.parsed_kind() {
        Some(AssertionKind::EqualTo) => {
            let passed = equals(actual, &assertion.expected_value);
            let message = if passed {
                format!("Field \"{field}\" correctly equals \"{expected}\".")
            } else {
                format!("Expected field \"{field}\" to equal \"{expected}\", but got \"{shown}\".")
            };
            (passed, message)
        }
        Some(AssertionKind::NotEqualTo) => {
            let passed = !equals(actual, &assertion.expected_value);
            let message = if passed {
                format!("Field \"{field}\" correctly does not equal \"{expected}\".")
            } else {
                format!("Expected field \"{field}\" not to equal \"{expected}\", but it did.")
            };
            (passed, message)
        }
        Some(AssertionKind::Contains) => {
            let passed = matches!(actual, Some(Value::String(s)) if s.contains(expected.as_str()));
            let message = if passed {
                format!("Field \"{field}\" correctly contains \"{expected}\".")
            } else {
                format!("Expected field \"{field}\" to contain \"{expected}\", but it did not.")
            };
            (passed, message)
        }
        Some(AssertionKind::GreaterThan) => {
            let passed = compare(actual, &assertion.expected_value) == Some(Ordering::Greater);
            let message = if passed {
                format!("Field \"{field}\" ({shown}) is correctly greater than \"{expected}\".")
            } else {
                format!(
                    "Expected field \"{field}\" ({shown}) to be greater than \"{expected}\", but it was not."
                )
            };
            (passed, message)
        }
        Some(AssertionKind::LessThan) => {
            let passed = compare(actual, &assertion.expected_value) == Some(Ordering::Less);
            let message = if passed {
                format!("Field \"{field}\" ({shown}) is correctly less than \"{expected}\".")
            } else {
                format!(
                    "Expected field \"{field}\" ({shown}) to be less than \"{expected}\", but it was not."
                )
            };
            (passed, message)
        }
        None => (
            false,
            format!("Unknown assertion type: \"{}\".", assertion.kind),
        ),
    };

    tracing::debug!(id = %assertion.id, kind = %assertion.kind, passed, "assertion graded");

    AssertionResult {
        id: assertion.id.clone(),
        passed,
        message,
        actual_value: actual.cloned(),
    }
}

/// Display form used in assertion messages.
///
/// Strings are shown raw and an absent value as `undefined`. Integral
/// numbers have no fractional part. Arrays list their elements separated
/// by commas, with `null` elements left empty. Objects are compact JSON.
pub fn render_value(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(value) => render_present(value),
    }
}

fn render_present(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => render_present(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Strict equality, except that numbers compare by value (`5 == 5.0`).
fn equals(actual: Option<&Value>, expected: &Value) -> bool {
    actual.is_some_and(|actual| values_equal(actual, expected))
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

/// Numeric ordering of `actual` relative to `expected`; `None` unless both are numbers.
fn compare(actual: Option<&Value>, expected: &Value) -> Option<Ordering> {
    let actual = actual?.as_f64()?;
    let expected = expected.as_f64()?;
    actual.partial_cmp(&expected)
}
