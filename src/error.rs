//! Grammar-validation diagnostics.
//!
//! Only structural failures of the deterministic path live here: a token
//! sequence that breaks the grammar's ordering rules. Probabilistic-path
//! problems are not errors; they surface as low confidence scores and hints
//! on the parsed command instead.

use miette::Diagnostic;
use thiserror::Error;

/// Why a token sequence is not a valid command.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum CommandError {
    #[error("empty command")]
    #[diagnostic(
        code(damlex::grammar::empty),
        help("type a verb such as \"select\", \"filter\", or \"tag\"")
    )]
    EmptyCommand,

    #[error("commands must start with a verb, found \"{found}\"")]
    #[diagnostic(
        code(damlex::grammar::missing_verb),
        help("start with a verb such as \"select\", \"filter\", or \"tag\"")
    )]
    MissingVerb { found: String },

    #[error("\"{word}\" cannot follow \"{previous}\"")]
    #[diagnostic(
        code(damlex::grammar::invalid_sequence),
        help("check the word order; e.g. \"filter by portrait\", \"tag selected as bridal\"")
    )]
    InvalidSequence { word: String, previous: String },

    #[error("\"{modifier}\" requires a value")]
    #[diagnostic(
        code(damlex::grammar::missing_value),
        help("follow the modifier with a category, tag, or team member name")
    )]
    MissingValue { modifier: String },
}

pub type ValidationResult = std::result::Result<(), CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_words() {
        let err = CommandError::InvalidSequence {
            word: "and".to_string(),
            previous: "filter".to_string(),
        };
        assert_eq!(err.to_string(), "\"and\" cannot follow \"filter\"");

        let err = CommandError::MissingValue {
            modifier: "by".to_string(),
        };
        assert_eq!(err.to_string(), "\"by\" requires a value");

        let err = CommandError::MissingVerb {
            found: "portrait".to_string(),
        };
        assert!(err.to_string().contains("portrait"));
    }
}
