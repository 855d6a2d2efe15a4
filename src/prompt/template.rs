//! Template substitution for task templates and command templates.
//!
//! Substitution is lenient: unknown placeholders are kept verbatim so a
//! second pass with the same inputs yields the same string.

use crate::blueprint::Inputs;
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z0-9_]+)\}").unwrap_or_else(|e| panic!("placeholder regex: {e}"))
});

/// Replace every `{name}` in `template` with the text form of `inputs[name]`.
///
/// # Examples
///
/// ```
/// use promptforge::prompt::{inputs, substitute};
///
/// let vars = inputs([("name", "Alice"), ("task", "coding")]);
/// let result = substitute("Hello {name}, your task is {task}. {missing}", &vars);
/// assert_eq!(result, "Hello Alice, your task is coding. {missing}");
/// ```
pub fn substitute(template: &str, inputs: &Inputs) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match inputs.get(&caps[1]) {
            Some(value) => value_text(value),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Text form of an input value: strings raw, everything else as compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Build an input map from key/value pairs.
pub fn inputs<I, K, V>(pairs: I) -> Inputs
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
