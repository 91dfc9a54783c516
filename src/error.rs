//! Error types for grammar construction and configuration loading.
//!
//! Failure to match is not an error anywhere in this crate: matching returns
//! `Option`/empty collections. The only fatal condition is an invalid grammar,
//! which is reported at construction time and never at match time.

use std::fmt;

/// Errors raised while building a grammar.
///
/// All variants are construction-time failures. A grammar that builds
/// successfully can never fail at match time; "no match" is a normal outcome.
#[derive(Debug, Clone)]
pub enum GrammarError {
    /// A regex element was given a pattern that does not compile.
    InvalidPattern { pattern: String, message: String },
    /// A literal element was given empty or whitespace-only text.
    EmptyLiteral,
    /// A sequential or alternative composite was built with no children.
    EmptyComposite { kind: &'static str },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::InvalidPattern { pattern, message } => {
                write!(f, "invalid regex pattern `{}`: {}", pattern, message)
            }
            GrammarError::EmptyLiteral => {
                write!(f, "literal element requires non-empty text")
            }
            GrammarError::EmptyComposite { kind } => {
                write!(f, "{} element requires at least one child", kind)
            }
        }
    }
}

impl std::error::Error for GrammarError {}
