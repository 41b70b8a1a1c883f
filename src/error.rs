//! Error types for promptloom.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for prompt loading, lookup, and rendering.
///
/// Every error is local to one call: nothing is retried or recovered
/// internally, and a failed render produces no text at all.
#[derive(Error, Debug)]
pub enum LoomError {
    /// User provided invalid arguments (bad paths, malformed `--var` pairs).
    #[error("{0}")]
    UserError(String),

    /// A prompt document could not be read from disk.
    #[error("failed to read prompt document '{path}': {source}")]
    DocumentRead {
        /// Path of the unreadable document or directory.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A prompt document could not be parsed into a category.
    #[error("failed to parse prompt document '{path}': {message}")]
    DocumentParse {
        /// Path or name of the offending document.
        path: String,
        /// What went wrong.
        message: String,
    },

    /// The requested category is not registered in the catalog.
    #[error("unknown prompt category '{0}'")]
    UnknownCategory(String),

    /// The section half of a dotted prompt id does not exist.
    #[error("unknown section '{section}' in category '{category}'")]
    UnknownSection {
        /// The category that was searched.
        category: String,
        /// The section key that did not resolve.
        section: String,
    },

    /// The final key of a lookup does not resolve to anything.
    #[error("unknown prompt id '{prompt_id}' in category '{category}'")]
    UnknownPromptId {
        /// The category that was searched.
        category: String,
        /// The prompt id that did not resolve.
        prompt_id: String,
    },

    /// The resolved entry is not a leaf prompt config (it is a nested
    /// section or auxiliary data).
    #[error("entry '{prompt_id}' in category '{category}' is not a prompt config")]
    InvalidConfig {
        /// The category that was searched.
        category: String,
        /// The key that resolved to a non-leaf entry.
        prompt_id: String,
    },

    /// Required context variables were not bound by the caller.
    #[error("missing required variables: {}", .names.join(", "))]
    MissingVariables {
        /// Declared variables absent from the bindings, in declaration order.
        names: Vec<String>,
    },

    /// An opening directive has no matching closer.
    #[error("unclosed {{{{#{kind} {name}}}}} directive")]
    UnclosedDirective {
        /// Directive keyword: `if` or `each`.
        kind: &'static str,
        /// The variable name the directive is keyed by.
        name: String,
    },
}

impl LoomError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoomError::UserError(_) => exit_codes::USER_ERROR,
            LoomError::DocumentRead { .. } | LoomError::DocumentParse { .. } => {
                exit_codes::CONFIG_FAILURE
            }
            LoomError::UnknownCategory(_)
            | LoomError::UnknownSection { .. }
            | LoomError::UnknownPromptId { .. }
            | LoomError::InvalidConfig { .. } => exit_codes::LOOKUP_FAILURE,
            LoomError::MissingVariables { .. } | LoomError::UnclosedDirective { .. } => {
                exit_codes::RENDER_FAILURE
            }
        }
    }
}

/// Result type alias for promptloom operations.
pub type Result<T> = std::result::Result<T, LoomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = LoomError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn document_errors_have_config_exit_code() {
        let err = LoomError::DocumentParse {
            path: "prompts/story.yaml".to_string(),
            message: "not a mapping".to_string(),
        };
        assert_eq!(err.exit_code(), exit_codes::CONFIG_FAILURE);
    }

    #[test]
    fn lookup_errors_have_lookup_exit_code() {
        let err = LoomError::UnknownCategory("faqs".to_string());
        assert_eq!(err.exit_code(), exit_codes::LOOKUP_FAILURE);

        let err = LoomError::InvalidConfig {
            category: "faqs".to_string(),
            prompt_id: "section".to_string(),
        };
        assert_eq!(err.exit_code(), exit_codes::LOOKUP_FAILURE);
    }

    #[test]
    fn render_errors_have_render_exit_code() {
        let err = LoomError::MissingVariables {
            names: vec!["title".to_string()],
        };
        assert_eq!(err.exit_code(), exit_codes::RENDER_FAILURE);

        let err = LoomError::UnclosedDirective {
            kind: "if",
            name: "title".to_string(),
        };
        assert_eq!(err.exit_code(), exit_codes::RENDER_FAILURE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = LoomError::UnknownSection {
            category: "faqs".to_string(),
            section: "billing".to_string(),
        };
        assert_eq!(err.to_string(), "unknown section 'billing' in category 'faqs'");

        let err = LoomError::MissingVariables {
            names: vec!["title".to_string(), "genre".to_string()],
        };
        assert_eq!(err.to_string(), "missing required variables: title, genre");

        let err = LoomError::UnclosedDirective {
            kind: "each",
            name: "items".to_string(),
        };
        assert_eq!(err.to_string(), "unclosed {{#each items}} directive");
    }
}
