//! Statement parsing implementation
//!
//! This module handles every WWE statement form:
//!
//! - Declarations: `nxt a b`, `nexus L`
//! - Assignments: `x = expr`, `L[2] = expr`, `L[i] = expr`, `L <- expr`
//! - Input: `x = promo`, `L[i] = promo`, `L <- promo`
//! - Output: `anunciar -> "text" <-`, `anunciar -> expr <-`
//! - Control flow: `jeff ... matt ... hardy`, `randy ... orton`
//!
//! # Grammar
//!
//! ```text
//! statement ::= EOL | declare | declare_list | assign | announce | if | while
//! assign    ::= VARIABLE ( '=' rhs | '[' index ']' '=' rhs | '<-' rhs )
//! rhs       ::= 'promo' | STRING | expression
//! ```
//!
//! Alternatives are tried in that order. Each one is attempted from a saved
//! cursor mark and the cursor is reset when the alternative does not apply. Once
//! an alternative has consumed its first token any mismatch is fatal.

use crate::error::{CompileError, CompileResult};
use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::Parser;
use crate::symbols::{is_reserved, TypeTag};

/// Outcome of one statement alternative
pub(crate) enum Attempt {
    /// The alternative matched and produced a statement
    Matched(Statement),
    /// The alternative matched a blank line
    Blank,
    /// The leading token belongs to another alternative
    NoMatch,
}

type Production = fn(&mut Parser) -> CompileResult<Attempt>;

/// Statement alternatives in the order they are tried
const ALTERNATIVES: [Production; 7] = [
    Parser::parse_blank_line,
    Parser::parse_declare,
    Parser::parse_declare_list,
    Parser::parse_assignment,
    Parser::parse_announce,
    Parser::parse_if,
    Parser::parse_while,
];

/// Keywords that end a statement list
const CLOSERS: [TokenKind; 4] = [
    TokenKind::ProgramEnd,
    TokenKind::Else,
    TokenKind::EndIf,
    TokenKind::EndWhile,
];

/// Right-hand side of `=` or `<-`
enum Rhs {
    Promo,
    Expr(Expression),
}

impl Parser {
    /// Parse statements until a block-closing keyword or the end of input.
    ///
    /// The closer is left in the stream for the enclosing production to check.
    pub(crate) fn parse_statements(&mut self) -> CompileResult<Vec<Statement>> {
        let mut statements = Vec::new();

        while let Some(kind) = self.stream.peek_kind() {
            if CLOSERS.contains(&kind) {
                break;
            }
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
        }

        Ok(statements)
    }

    /// Parse one statement; `None` for a blank line
    pub(crate) fn parse_statement(&mut self) -> CompileResult<Option<Statement>> {
        for production in ALTERNATIVES {
            let mark = self.stream.mark();
            match production(self)? {
                Attempt::Matched(statement) => return Ok(Some(statement)),
                Attempt::Blank => return Ok(None),
                Attempt::NoMatch => self.stream.reset(mark),
            }
        }

        Err(self.misplaced())
    }

    /// Error for a token that cannot start any statement
    fn misplaced(&self) -> CompileError {
        match self.stream.peek() {
            Some(token) if token.kind != TokenKind::Unrecognized => CompileError::MisplacedToken {
                lexeme: token.display_lexeme().to_string(),
                line: token.line,
            },
            _ => self.unexpected("a statement"),
        }
    }

    fn parse_blank_line(&mut self) -> CompileResult<Attempt> {
        if self.match_token(TokenKind::EndOfLine) {
            Ok(Attempt::Blank)
        } else {
            Ok(Attempt::NoMatch)
        }
    }

    // ===== Declarations =====

    /// `nxt` VARIABLE+
    fn parse_declare(&mut self) -> CompileResult<Attempt> {
        if !self.match_token(TokenKind::Declare) {
            return Ok(Attempt::NoMatch);
        }
        let names = self.parse_declared_names(TypeTag::Untyped)?;
        Ok(Attempt::Matched(Statement::Declare { names }))
    }

    /// `nexus` VARIABLE+
    fn parse_declare_list(&mut self) -> CompileResult<Attempt> {
        if !self.match_token(TokenKind::DeclareList) {
            return Ok(Attempt::NoMatch);
        }
        let names = self.parse_declared_names(TypeTag::List)?;
        for name in &names {
            if !self.list_names.contains(name) {
                self.list_names.push(name.clone());
            }
        }
        Ok(Attempt::Matched(Statement::DeclareList { names }))
    }

    /// One or more names, each inserted into the innermost scope; yields their C bindings
    fn parse_declared_names(&mut self, tag: TypeTag) -> CompileResult<Vec<String>> {
        let mut names = vec![self.declare_name(tag)?];
        while self.check(TokenKind::Variable) {
            names.push(self.declare_name(tag)?);
        }
        Ok(names)
    }

    fn declare_name(&mut self, tag: TypeTag) -> CompileResult<String> {
        let token = self.expect_variable()?;
        if is_reserved(&token.lexeme) {
            return Err(CompileError::ReservedName {
                name: token.lexeme,
                line: token.line,
            });
        }
        self.symbols
            .declare(&token.lexeme, tag)
            .ok_or(CompileError::Redeclared {
                name: token.lexeme,
                line: token.line,
            })
    }

    // ===== Assignment and input =====

    /// VARIABLE followed by `=`, `[` or `<-`
    fn parse_assignment(&mut self) -> CompileResult<Attempt> {
        if !self.check(TokenKind::Variable) {
            return Ok(Attempt::NoMatch);
        }
        let Some(target) = self.advance() else {
            return Ok(Attempt::NoMatch);
        };
        let record = self.resolve(&target)?;
        let (is_list, binding) = (record.is_list(), record.binding.clone());

        let statement = match self.stream.peek_kind() {
            Some(TokenKind::Assign) => {
                if is_list {
                    return Err(CompileError::ListWithoutIndex {
                        name: target.lexeme,
                        line: target.line,
                    });
                }
                self.stream.advance();
                self.parse_scalar_assign(&target, binding)?
            }
            Some(TokenKind::LBracket) => {
                let slot = self.parse_list_slot(&target)?;
                self.expect_token(TokenKind::Assign, "'=' after list index")?;
                self.parse_slot_assign(&target, slot)?
            }
            Some(TokenKind::Arrow) => {
                if !is_list {
                    return Err(CompileError::NotAList {
                        name: target.lexeme,
                        line: target.line,
                    });
                }
                self.stream.advance();
                self.parse_list_push(&target, binding)?
            }
            _ => {
                let expected = format!("'=', '[' or '<-' after '{}'", target.lexeme);
                return Err(self.unexpected(&expected));
            }
        };

        Ok(Attempt::Matched(statement))
    }

    fn parse_scalar_assign(&mut self, target: &Token, binding: String) -> CompileResult<Statement> {
        self.symbols.clear_value(&target.lexeme);
        let value = Value::Variable(binding);

        match self.parse_rhs(target)? {
            Rhs::Promo => {
                self.symbols.record(&target.lexeme, TypeTag::Numeric, "promo");
                Ok(Statement::Read { target: value })
            }
            Rhs::Expr(expr) => {
                self.symbols
                    .record(&target.lexeme, TypeTag::Numeric, expr.to_string());
                Ok(Statement::Assign {
                    target: value,
                    expr,
                })
            }
        }
    }

    fn parse_slot_assign(&mut self, target: &Token, slot: Value) -> CompileResult<Statement> {
        self.symbols.clear_value(&target.lexeme);

        match self.parse_rhs(target)? {
            Rhs::Promo => {
                self.symbols
                    .record(&target.lexeme, TypeTag::List, format!("{} = promo", slot));
                Ok(Statement::Read { target: slot })
            }
            Rhs::Expr(expr) => {
                self.symbols
                    .record(&target.lexeme, TypeTag::List, format!("{} = {}", slot, expr));
                Ok(Statement::Assign { target: slot, expr })
            }
        }
    }

    fn parse_list_push(&mut self, target: &Token, list: String) -> CompileResult<Statement> {
        self.symbols.clear_value(&target.lexeme);

        match self.parse_rhs(target)? {
            Rhs::Promo => {
                self.symbols.record(&target.lexeme, TypeTag::List, "<- promo");
                Ok(Statement::ReadListPush { list })
            }
            Rhs::Expr(expr) => {
                self.symbols
                    .record(&target.lexeme, TypeTag::List, format!("<- {}", expr));
                Ok(Statement::AssignListPush { list, expr })
            }
        }
    }

    /// `promo`, or an arithmetic expression. Text is recorded, then rejected.
    fn parse_rhs(&mut self, target: &Token) -> CompileResult<Rhs> {
        if self.match_token(TokenKind::Promo) {
            return Ok(Rhs::Promo);
        }

        if self.check(TokenKind::String) {
            let line = self.current_line();
            if let Some(text) = self.advance() {
                if !self.symbols.lookup(&target.lexeme).is_some_and(|r| r.is_list()) {
                    self.symbols
                        .record(&target.lexeme, TypeTag::Text, text.lexeme);
                }
            }
            return Err(CompileError::TextAssignment {
                name: target.lexeme.clone(),
                line,
            });
        }

        Ok(Rhs::Expr(self.parse_expression()?))
    }

    // ===== Output =====

    /// `anunciar` `->` ( STRING | expression ) `<-`
    fn parse_announce(&mut self) -> CompileResult<Attempt> {
        if !self.match_token(TokenKind::Announce) {
            return Ok(Attempt::NoMatch);
        }
        self.expect_token(TokenKind::AnnounceOpen, "'->' after 'anunciar'")?;

        let arg = if self.check(TokenKind::String) {
            let text = self.expect_token(TokenKind::String, "a string")?;
            AnnounceArg::Literal(text.lexeme)
        } else {
            AnnounceArg::Expr(self.parse_expression()?)
        };

        self.expect_token(TokenKind::Arrow, "'<-' to close the announcement")?;
        Ok(Attempt::Matched(Statement::Announce(arg)))
    }

    // ===== Control flow =====

    /// `jeff` comparison statements [`matt` statements] `hardy`
    fn parse_if(&mut self) -> CompileResult<Attempt> {
        if !self.match_token(TokenKind::If) {
            return Ok(Attempt::NoMatch);
        }
        let condition = self.parse_comparison()?;

        // One scope covers both branches, up to `hardy`
        self.symbols.push_scope();
        let then_branch = self.parse_statements()?;
        let else_branch = if self.match_token(TokenKind::Else) {
            Some(self.parse_statements()?)
        } else {
            None
        };
        self.expect_token(TokenKind::EndIf, "'hardy' to close 'jeff'")?;
        self.symbols.pop_scope();

        Ok(Attempt::Matched(Statement::If {
            condition,
            then_branch,
            else_branch,
        }))
    }

    /// `randy` comparison statements `orton`
    fn parse_while(&mut self) -> CompileResult<Attempt> {
        if !self.match_token(TokenKind::While) {
            return Ok(Attempt::NoMatch);
        }
        let condition = self.parse_comparison()?;

        self.symbols.push_scope();
        let body = self.parse_statements()?;
        self.expect_token(TokenKind::EndWhile, "'orton' to close 'randy'")?;
        self.symbols.pop_scope();

        Ok(Attempt::Matched(Statement::While { condition, body }))
    }
}
