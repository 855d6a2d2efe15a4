//! Serde types for blueprints, rules, input slots and embedded tests.
//!
//! Field names serialize in camelCase (`taskTemplate`, `inputSlots`,
//! `outputSchema`, `expectedValue`) so that blueprint files and JSON
//! envelopes share one shape.

use crate::assertions::Assertion;
use crate::error::{ForgeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

/// Concrete input values for one execution, keyed by slot name.
pub type Inputs = Map<String, Value>;

/// Enforcement level of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleKind {
    /// Checked after every attempt; a violation blocks acceptance.
    Hard,
    /// Shown to the model only.
    Soft,
}

/// A behavioral rule attached to a blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RuleKind,
    pub value: String,
}

impl Rule {
    pub fn hard(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: RuleKind::Hard,
            value: value.into(),
        }
    }

    pub fn soft(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: RuleKind::Soft,
            value: value.into(),
        }
    }

    pub fn is_hard(&self) -> bool {
        self.kind == RuleKind::Hard
    }
}

/// Declared type of an input slot (informational; inputs are not coerced).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotType {
    String,
    Number,
    Date,
}

/// A named input slot referenced from the task template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSlot {
    pub name: String,
    #[serde(rename = "type")]
    pub slot_type: SlotType,
}

/// A regression test for a blueprint: inputs plus expectations on the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTest {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub inputs: Inputs,

    /// `null` and missing both mean "no assertions".
    #[serde(default)]
    pub assertions: Option<Vec<Assertion>>,

    /// Owning blueprint; implied when the test is embedded in a blueprint file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprint_id: Option<String>,
}

impl PromptTest {
    /// The test's assertions, treating `null` as empty.
    pub fn assertions(&self) -> &[Assertion] {
        self.assertions.as_deref().unwrap_or(&[])
    }
}

/// A named specification of an LLM task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    #[serde(default)]
    pub id: String,

    pub name: String,

    /// Persona the model is told to adopt (`ROLE: You are a <role>.`).
    pub role: String,

    /// Task text with `{slot}` placeholders.
    pub task_template: String,

    #[serde(default)]
    pub rules: Vec<Rule>,

    #[serde(default)]
    pub input_slots: BTreeMap<String, InputSlot>,

    /// Field name to type tag (`string`, `number`, `boolean`, or anything else).
    #[serde(default)]
    pub output_schema: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<PromptTest>,
}

impl Blueprint {
    /// Rules whose violation blocks acceptance.
    pub fn hard_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.is_hard())
    }

    /// Declared input slots that have no value in `inputs`.
    pub fn missing_inputs<'a>(&'a self, inputs: &Inputs) -> Vec<&'a str> {
        self.input_slots
            .keys()
            .filter(|key| !inputs.contains_key(key.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Find an embedded test by id.
    pub fn find_test(&self, test_id: &str) -> Option<&PromptTest> {
        self.tests.iter().find(|t| t.id == test_id)
    }

    /// Validate structural invariants of a loaded blueprint.
    ///
    /// Validation rules:
    /// - `name` and `role` must be non-empty
    /// - rule ids must be unique (empty ids are allowed and not compared)
    /// - embedded test ids must be non-empty and unique
    /// - an embedded test's `blueprintId`, if set, must match this blueprint
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ForgeError::UserError(
                "blueprint validation failed: name must not be empty".to_string(),
            ));
        }

        if self.role.trim().is_empty() {
            return Err(ForgeError::UserError(format!(
                "blueprint validation failed: '{}' has an empty role",
                self.name
            )));
        }

        let mut rule_ids = HashSet::new();
        for rule in &self.rules {
            if !rule.id.is_empty() && !rule_ids.insert(rule.id.as_str()) {
                return Err(ForgeError::UserError(format!(
                    "blueprint validation failed: duplicate rule id '{}' in '{}'",
                    rule.id, self.name
                )));
            }
        }

        let mut test_ids = HashSet::new();
        for test in &self.tests {
            if test.id.trim().is_empty() {
                return Err(ForgeError::UserError(format!(
                    "blueprint validation failed: a test in '{}' has an empty id",
                    self.name
                )));
            }
            if !test_ids.insert(test.id.as_str()) {
                return Err(ForgeError::UserError(format!(
                    "blueprint validation failed: duplicate test id '{}' in '{}'",
                    test.id, self.name
                )));
            }
            if let Some(owner) = &test.blueprint_id
                && owner != &self.id
            {
                return Err(ForgeError::UserError(format!(
                    "blueprint validation failed: test '{}' belongs to blueprint '{}', not '{}'",
                    test.id, owner, self.id
                )));
            }
        }

        Ok(())
    }
}
