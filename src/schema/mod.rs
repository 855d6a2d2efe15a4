//! Runtime output contracts derived from a blueprint's `outputSchema`.
//!
//! The declared shape is a flat map from field name to a type tag. Tags
//! `string`, `number` and `boolean` are enforced; anything else (including a
//! non-string tag) accepts any value. Fields not named in the schema pass
//! through untouched.

use serde_json::{Map, Value};
use std::fmt;

/// Declared type of one output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Any,
}

impl FieldType {
    /// Interpret a schema tag. Unrecognized tags become `Any`.
    pub fn from_tag(tag: &Value) -> Self {
        match tag.as_str() {
            Some("string") => Self::String,
            Some("number") => Self::Number,
            Some("boolean") => Self::Boolean,
            _ => Self::Any,
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Any => true,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Any => "any",
        }
    }
}

/// A single validation problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// Field name; empty for problems with the document itself.
    pub path: String,
    pub message: String,
}

impl SchemaIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.path, self.message)
    }
}

/// Validator compiled from a blueprint's output schema.
///
/// Build once per blueprint and reuse for every attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputContract {
    fields: Vec<(String, FieldType)>,
    described: String,
}

impl OutputContract {
    /// Compile a contract from a field-name to type-tag map.
    pub fn from_schema(schema: &Map<String, Value>) -> Self {
        let fields = schema
            .iter()
            .map(|(name, tag)| (name.clone(), FieldType::from_tag(tag)))
            .collect();

        let described = serde_json::to_string_pretty(schema).unwrap_or_else(|_| "{}".to_string());

        Self { fields, described }
    }

    /// Machine-readable description of the required shape, for the model.
    pub fn describe(&self) -> String {
        self.described.clone()
    }

    /// Check a parsed output. An empty list means the output conforms.
    ///
    /// A typed field that is missing yields `Required`; `Any` fields may be
    /// absent.
    pub fn validate(&self, output: &Value) -> Vec<SchemaIssue> {
        let Some(object) = output.as_object() else {
            return vec![SchemaIssue::new(
                "",
                format!("Expected object, received {}", kind_of(output)),
            )];
        };

        let mut issues = Vec::new();
        for (name, field_type) in &self.fields {
            match object.get(name) {
                None if *field_type == FieldType::Any => {}
                None => issues.push(SchemaIssue::new(name, "Required")),
                Some(value) if field_type.accepts(value) => {}
                Some(value) => issues.push(SchemaIssue::new(
                    name,
                    format!(
                        "Expected {}, received {}",
                        field_type.name(),
                        kind_of(value)
                    ),
                )),
            }
        }
        issues
    }

    /// Validate and, on success, hand back the output as a JSON object.
    pub fn conform(&self, output: Value) -> Result<Map<String, Value>, Vec<SchemaIssue>> {
        let issues = self.validate(&output);
        match output {
            Value::Object(map) if issues.is_empty() => Ok(map),
            _ => Err(issues),
        }
    }
}

/// Runtime kind of a JSON value, as named in schema messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
