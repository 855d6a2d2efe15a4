//! Serde types for assertions and their graded results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The comparison an assertion performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionKind {
    EqualTo,
    NotEqualTo,
    Contains,
    GreaterThan,
    LessThan,
}

impl AssertionKind {
    /// Parse a wire name (`equalTo`, `notEqualTo`, ...). Unknown names yield `None`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "equalTo" => Some(AssertionKind::EqualTo),
            "notEqualTo" => Some(AssertionKind::NotEqualTo),
            "contains" => Some(AssertionKind::Contains),
            "greaterThan" => Some(AssertionKind::GreaterThan),
            "lessThan" => Some(AssertionKind::LessThan),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssertionKind::EqualTo => "equalTo",
            AssertionKind::NotEqualTo => "notEqualTo",
            AssertionKind::Contains => "contains",
            AssertionKind::GreaterThan => "greaterThan",
            AssertionKind::LessThan => "lessThan",
        }
    }
}

impl std::fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declarative expectation on one field of an output.
///
/// `kind` keeps the raw type name so that a file with an unsupported
/// assertion still loads; the engine grades it as a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assertion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub field: String,
    #[serde(default)]
    pub expected_value: Value,
}

impl Assertion {
    pub fn new(
        id: impl Into<String>,
        kind: AssertionKind,
        field: impl Into<String>,
        expected_value: impl Into<Value>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.as_str().to_string(),
            field: field.into(),
            expected_value: expected_value.into(),
        }
    }

    pub fn parsed_kind(&self) -> Option<AssertionKind> {
        AssertionKind::from_str(&self.kind)
    }
}

/// Outcome of one assertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResult {
    pub id: String,
    pub passed: bool,
    pub message: String,
    /// The value found at the assertion's path; omitted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<Value>,
}
