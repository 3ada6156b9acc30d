use thiserror::Error;

/// One reason an argument object failed schema validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub field: String,
    pub reason: String,
}

impl SchemaViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

fn describe(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} ({})", v.field, v.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failures at the tool-call boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {}", describe(.violations))]
    InvalidArguments {
        tool: String,
        violations: Vec<SchemaViolation>,
    },

    #[error("Character not found: {0}")]
    CharacterNotFound(String),

    #[error("No active character")]
    NoActiveCharacter,

    #[error("Failed to fetch transcript: {0}")]
    TranscriptFetch(String),

    #[error("Subprompt failed.")]
    SubpromptFailed,

    #[error("Exception: {0}")]
    Action(String),
}

impl ToolError {
    /// Names of the offending parameters, for `InvalidArguments`.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Self::InvalidArguments { violations, .. } => {
                violations.iter().map(|v| v.field.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_arguments_names_every_field() {
        let err = ToolError::InvalidArguments {
            tool: "Remember".into(),
            violations: vec![
                SchemaViolation::new("chatId", "missing required field"),
                SchemaViolation::new("timestamp", "expected string, got number"),
            ],
        };
        assert_eq!(err.fields(), vec!["chatId", "timestamp"]);
        assert_eq!(
            err.to_string(),
            "Invalid arguments for Remember: chatId (missing required field); timestamp (expected string, got number)"
        );
    }

    #[test]
    fn action_error_reads_as_exception() {
        assert_eq!(
            ToolError::Action("boom".into()).to_string(),
            "Exception: boom"
        );
    }
}
