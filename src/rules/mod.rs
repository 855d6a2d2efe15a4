//! HARD-rule enforcement.
//!
//! Only one rule shape is understood: a HARD rule whose text contains
//! `NEVER mention <word>`. Every other rule, and every SOFT rule, is shown
//! to the model but never checked here. Widening the rule language belongs
//! in this module, behind the same `RuleChecker::check` signature.

use crate::blueprint::Rule;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

static NEVER_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"NEVER mention ([A-Za-z0-9_]+)")
        .unwrap_or_else(|e| panic!("rule pattern regex: {e}"))
});

/// A forbidden word that appeared in a candidate output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub rule_id: String,
    pub word: String,
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Violation: Mentioned forbidden word \"{}\".", self.word)
    }
}

/// Forbidden words extracted from a blueprint's HARD rules.
///
/// Create once per blueprint; `check` is pure.
#[derive(Debug, Clone, Default)]
pub struct RuleChecker {
    forbidden: Vec<(String, String)>,
}

impl RuleChecker {
    pub fn new(rules: &[Rule]) -> Self {
        let forbidden = rules
            .iter()
            .filter(|rule| rule.is_hard())
            .filter_map(|rule| {
                let caps = NEVER_MENTION.captures(&rule.value)?;
                Some((rule.id.clone(), caps[1].to_string()))
            })
            .collect();

        Self { forbidden }
    }

    /// Number of rules this checker actually enforces.
    pub fn enforced(&self) -> usize {
        self.forbidden.len()
    }

    /// Scan the compact JSON text of `output` for forbidden words (case-sensitive).
    pub fn check<T: Serialize + ?Sized>(&self, output: &T) -> Vec<RuleViolation> {
        if self.forbidden.is_empty() {
            return Vec::new();
        }

        let text = serde_json::to_string(output).unwrap_or_default();
        self.forbidden
            .iter()
            .filter(|(_, word)| text.contains(word.as_str()))
            .map(|(rule_id, word)| RuleViolation {
                rule_id: rule_id.clone(),
                word: word.clone(),
            })
            .collect()
    }
}

/// Convenience wrapper returning violation messages directly.
pub fn check_rules(output: &Value, rules: &[Rule]) -> Vec<String> {
    RuleChecker::new(rules)
        .check(output)
        .iter()
        .map(ToString::to_string)
        .collect()
}
