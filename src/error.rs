//! Compile error types for the WWE compiler
//!
//! This module defines [`CompileError`], which represents every fatal condition
//! detected between reading the source text and producing C code.
//!
//! All compile errors are fatal - the first one found aborts the compilation.
//! Lexical problems are not errors at lex time: an unrecognized lexeme becomes a
//! [`TokenKind::Unrecognized`](crate::parser::lexer::TokenKind) token and is
//! reported by the parser when it reaches it.

use thiserror::Error;

/// Result alias used across the frontend
pub type CompileResult<T> = Result<T, CompileError>;

/// Fatal frontend errors, each tagged with the source line it was found on
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A lexeme the automaton could not classify
    #[error("line {line}: '{lexeme}' is not a valid word")]
    UnrecognizedToken { lexeme: String, line: usize },

    /// Expected-token mismatch after a production committed
    #[error("line {line}: expected {expected}, found '{found}'")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
    },

    /// The token stream ran out in the middle of a production
    #[error("line {line}: expected {expected}, found end of input")]
    UnexpectedEnd { expected: String, line: usize },

    /// A statement began with a token that can never start one
    #[error("line {line}: a statement cannot start with '{lexeme}'")]
    MisplacedToken { lexeme: String, line: usize },

    /// Name declared twice in the same scope
    #[error("line {line}: variable '{name}' is already declared in this scope")]
    Redeclared { name: String, line: usize },

    /// Name not found in any scope on the stack
    #[error("line {line}: variable '{name}' is not declared")]
    Undeclared { name: String, line: usize },

    /// Indexing, accessor or push applied to a non-list variable
    #[error("line {line}: variable '{name}' is not a list")]
    NotAList { name: String, line: usize },

    /// List variable used where a scalar is required
    #[error("line {line}: list '{name}' must be indexed or used with an accessor")]
    ListWithoutIndex { name: String, line: usize },

    /// Constant list index that is negative or fractional
    #[error("line {line}: list index must be a non-negative integer, found '{lexeme}'")]
    InvalidIndex { lexeme: String, line: usize },

    /// Text literal assigned to a numeric variable
    #[error("line {line}: text can only be announced, it cannot be assigned to '{name}'")]
    TextAssignment { name: String, line: usize },

    /// Identifier that collides with a word the generated C relies on
    #[error("line {line}: '{name}' is a reserved word")]
    ReservedName { name: String, line: usize },
}

impl CompileError {
    /// Line the error was reported on
    pub fn line(&self) -> usize {
        match self {
            CompileError::UnrecognizedToken { line, .. }
            | CompileError::UnexpectedToken { line, .. }
            | CompileError::UnexpectedEnd { line, .. }
            | CompileError::MisplacedToken { line, .. }
            | CompileError::Redeclared { line, .. }
            | CompileError::Undeclared { line, .. }
            | CompileError::NotAList { line, .. }
            | CompileError::ListWithoutIndex { line, .. }
            | CompileError::InvalidIndex { line, .. }
            | CompileError::TextAssignment { line, .. }
            | CompileError::ReservedName { line, .. } => *line,
        }
    }

    /// Short category name used by the CLI when printing diagnostics
    pub fn category(&self) -> &'static str {
        match self {
            CompileError::UnrecognizedToken { .. } => "lexical error",
            CompileError::UnexpectedToken { .. }
            | CompileError::UnexpectedEnd { .. }
            | CompileError::MisplacedToken { .. } => "syntax error",
            _ => "semantic error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_message() {
        let err = CompileError::Undeclared {
            name: "x".to_string(),
            line: 7,
        };
        assert_eq!(err.line(), 7);
        assert_eq!(err.to_string(), "line 7: variable 'x' is not declared");
        assert_eq!(err.category(), "semantic error");
    }

    #[test]
    fn test_categories() {
        let lexical = CompileError::UnrecognizedToken {
            lexeme: "x=1".to_string(),
            line: 1,
        };
        let syntax = CompileError::UnexpectedEnd {
            expected: "'smackdown'".to_string(),
            line: 3,
        };
        assert_eq!(lexical.category(), "lexical error");
        assert_eq!(syntax.category(), "syntax error");
    }
}
