//! System prompt rendering.

use crate::blueprint::{Blueprint, Rule};
use crate::schema::OutputContract;

/// Renders the system prompt for each attempt of one execution.
///
/// Everything that does not depend on previous violations is computed once.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    header: String,
}

impl PromptBuilder {
    /// Prepare the fixed part of the prompt from a blueprint and its contract.
    pub fn new(blueprint: &Blueprint, contract: &OutputContract) -> Self {
        Self::from_parts(&blueprint.role, &blueprint.rules, &contract.describe())
    }

    /// Prepare the fixed part of the prompt from its raw ingredients.
    ///
    /// All rules are listed, HARD and SOFT alike.
    pub fn from_parts(role: &str, rules: &[Rule], schema_text: &str) -> Self {
        let mut header = format!("ROLE: You are a {}.\n=== STRICT RULES ===\n", role);
        for rule in rules {
            header.push_str("- ");
            header.push_str(&rule.value);
            header.push('\n');
        }
        header.push_str("=== OUTPUT FORMAT ===\n");
        header.push_str(
            "You must respond with a JSON object that strictly adheres to the following schema:\n",
        );
        header.push_str(schema_text);

        Self { header }
    }

    /// Render the system prompt, appending previous violations when present.
    pub fn build(&self, violations: &[String]) -> String {
        let mut prompt = self.header.clone();

        if !violations.is_empty() {
            prompt.push_str("\n\n=== PREVIOUS VIOLATIONS ===\n- ");
            prompt.push_str(&violations.join("\n- "));
            prompt.push_str("\nFIX THESE ERRORS IMMEDIATELY.");
        }

        prompt
    }
}

/// The user message carrying the substituted task.
pub fn user_prompt(task: &str) -> String {
    format!("TASK: {}", task)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> PromptBuilder {
        let rules = vec![
            Rule::hard("r1", "NEVER mention GDPR"),
            Rule::soft("r2", "Be concise"),
        ];
        PromptBuilder::from_parts("legal analyst", &rules, "{\n  \"summary\": \"string\"\n}")
    }

    #[test]
    fn test_prompt_without_violations() {
        let prompt = builder().build(&[]);

        assert_eq!(
            prompt,
            "ROLE: You are a legal analyst.\n\
             === STRICT RULES ===\n\
             - NEVER mention GDPR\n\
             - Be concise\n\
             === OUTPUT FORMAT ===\n\
             You must respond with a JSON object that strictly adheres to the following schema:\n\
             {\n  \"summary\": \"string\"\n}"
        );
        assert!(!prompt.contains("PREVIOUS VIOLATIONS"));
    }

    #[test]
    fn test_prompt_lists_soft_rules_too() {
        let prompt = builder().build(&[]);
        assert!(prompt.contains("- Be concise"));
    }

    #[test]
    fn test_prompt_with_violations() {
        let violations = vec![
            "Response was not valid JSON.".to_string(),
            "Schema Violation: summary - Required".to_string(),
        ];
        let prompt = builder().build(&violations);

        assert!(prompt.ends_with(
            "\n\n=== PREVIOUS VIOLATIONS ===\n\
             - Response was not valid JSON.\n\
             - Schema Violation: summary - Required\n\
             FIX THESE ERRORS IMMEDIATELY."
        ));
    }

    #[test]
    fn test_retry_prompt_extends_first_prompt() {
        let b = builder();
        let first = b.build(&[]);
        let retry = b.build(&["x".to_string()]);
        assert!(retry.starts_with(&first));
        assert!(retry.len() > first.len());
    }

    #[test]
    fn test_user_prompt() {
        assert_eq!(user_prompt("Summarize it"), "TASK: Summarize it");
    }
}
