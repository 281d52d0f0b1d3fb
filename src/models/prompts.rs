use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

use super::schema::{Fields, SchemaViolation, Shape};

/// Follow-up prompts a client can use to refine a book search
#[derive(Debug, Clone, Default, Serialize, JsonSchema, PartialEq, Eq)]
pub struct PromptSuggestions {
    /// A list of prompts
    pub prompts: Vec<String>,
}

impl Shape for PromptSuggestions {
    const NAME: &'static str = "prompts";

    fn from_value_at(value: &Value, path: &str) -> Result<Self, SchemaViolation> {
        let f = Fields::of(value, path)?;
        Ok(Self {
            prompts: f.opt_strings("prompts")?.unwrap_or_default(),
        })
    }
}

crate::deserialize_via_shape!(PromptSuggestions);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_prompts_is_empty() {
        let parsed = PromptSuggestions::from_value(&json!({})).unwrap();
        assert!(parsed.prompts.is_empty());
    }

    #[test]
    fn test_prompts_must_be_strings() {
        let err = PromptSuggestions::from_value(&json!({ "prompts": ["ok", {"x": 1}] })).unwrap_err();
        assert_eq!(err.field, "prompts[1]");
    }
}
