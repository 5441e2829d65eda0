//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, its helper methods and the
//! program entry point.
//!
//! # Parser Architecture
//!
//! One recursive-descent pass validates the program and builds the statement
//! tree at the same time:
//! - This module: Parser struct, token helpers, `raw ... smackdown` framing
//! - `statements`: statement alternatives, blocks and scope handling
//! - `expressions`: values, right-recursive expressions and comparisons
//!
//! Parser methods are split across files using `impl Parser` blocks, all
//! sharing the token stream and the symbol table held here.
//!
//! # Failure policy
//!
//! The first error aborts the parse. [`Parser::abort`] archives every live
//! scope before handing the error back, so the history stack is complete even
//! for failed programs.

use crate::error::{CompileError, CompileResult};
use crate::parser::ast::Program;
use crate::parser::lexer::{Lexer, Token, TokenKind};
use crate::parser::stream::TokenStream;
use crate::symbols::SymbolTable;
use tracing::debug;

/// Recursive descent parser for WWE programs
pub struct Parser {
    pub(crate) stream: TokenStream,
    pub(crate) symbols: SymbolTable,
    pub(crate) list_names: Vec<String>,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self::from_tokens(Lexer::new(source).tokenize())
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            symbols: SymbolTable::new(),
            list_names: Vec::new(),
        }
    }

    /// Parse the entire program
    pub fn parse_program(&mut self) -> CompileResult<Program> {
        match self.parse_framed_program() {
            Ok(program) => Ok(program),
            Err(err) => Err(self.abort(err)),
        }
    }

    /// Symbol table, including the history of archived scopes
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Give back the token vector and the symbol table once parsing is done
    pub fn into_parts(self) -> (Vec<Token>, SymbolTable) {
        (self.stream.into_tokens(), self.symbols)
    }

    /// Archive the live scopes and hand back the error that stopped the parse
    pub(crate) fn abort(&mut self, err: CompileError) -> CompileError {
        self.symbols.archive_all();
        debug!(line = err.line(), "parse aborted: {}", err);
        err
    }

    /// `raw` Statements `smackdown`, with blank lines allowed around the frame
    fn parse_framed_program(&mut self) -> CompileResult<Program> {
        self.skip_end_of_lines();
        self.expect_token(TokenKind::ProgramStart, "'raw'")?;

        let statements = self.parse_statements()?;
        self.expect_token(TokenKind::ProgramEnd, "'smackdown'")?;

        self.skip_end_of_lines();
        if !self.stream.is_at_end() {
            return Err(self.unexpected("end of input after 'smackdown'"));
        }

        self.symbols.archive_all();

        let mut program = Program::new();
        program.statements = statements;
        for name in &self.list_names {
            program.add_list_name(name);
        }

        debug!(
            statements = program.statements.len(),
            lists = program.list_names.len(),
            "parsed program"
        );
        Ok(program)
    }

    // ===== Helper methods =====

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.stream.peek_kind() == Some(kind)
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.stream.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn advance(&mut self) -> Option<Token> {
        self.stream.advance().cloned()
    }

    pub(crate) fn current_line(&self) -> usize {
        self.stream.line()
    }

    pub(crate) fn skip_end_of_lines(&mut self) {
        while self.match_token(TokenKind::EndOfLine) {}
    }

    /// Build the error for the token under the cursor not being `expected`
    pub(crate) fn unexpected(&self, expected: &str) -> CompileError {
        match self.stream.peek() {
            None => CompileError::UnexpectedEnd {
                expected: expected.to_string(),
                line: self.current_line(),
            },
            Some(token) if token.kind == TokenKind::Unrecognized => {
                CompileError::UnrecognizedToken {
                    lexeme: token.lexeme.clone(),
                    line: token.line,
                }
            }
            Some(token) => CompileError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.display_lexeme().to_string(),
                line: token.line,
            },
        }
    }

    pub(crate) fn expect_token(
        &mut self,
        kind: TokenKind,
        expected: &str,
    ) -> CompileResult<Token> {
        if self.check(kind) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(self.unexpected(expected))
    }

    pub(crate) fn expect_variable(&mut self) -> CompileResult<Token> {
        self.expect_token(TokenKind::Variable, "a variable name")
    }
}
