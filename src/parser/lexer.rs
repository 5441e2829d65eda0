//! Line scanner and token types
//!
//! The [`Lexer`] walks the source once, character by character, and groups
//! characters into lexeme candidates. Every candidate is handed to the
//! [automaton](super::automaton) which decides its [`TokenKind`].
//!
//! Grouping rules:
//! - whitespace separates candidates; a newline also produces an
//!   [`TokenKind::EndOfLine`] token
//! - `#` starts a comment that runs to the next newline or tab
//! - a double quote starts a string candidate that runs to the closing quote,
//!   spaces and punctuation included
//! - `[` and `]` are always candidates of their own
//! - a point right after a letter splits the candidate, so `L.size` becomes
//!   `L` and `.size`
//!
//! Unknown characters are not errors here. They classify as
//! [`TokenKind::Unrecognized`] and the parser rejects them when it reaches them.

use super::automaton::automaton;
use std::fmt;

/// Closed vocabulary of token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    ProgramStart,
    ProgramEnd,
    Declare,
    DeclareList,
    Announce,
    AnnounceOpen,
    /// `<-`: closes an announcement and pushes onto a list
    Arrow,
    Promo,
    If,
    Else,
    EndIf,
    While,
    EndWhile,
    First,
    Last,
    Size,
    Assign,
    Comparison,
    Arithmetic,
    Number,
    Float,
    String,
    LBracket,
    RBracket,
    EndOfLine,
    Variable,
    Unrecognized,
}

impl TokenKind {
    /// Numeric literal of either shape
    pub fn is_numeric(self) -> bool {
        matches!(self, TokenKind::Number | TokenKind::Float)
    }

    /// List accessor suffix
    pub fn is_accessor(self) -> bool {
        matches!(self, TokenKind::First | TokenKind::Last | TokenKind::Size)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::ProgramStart => "PROGRAM_START",
            TokenKind::ProgramEnd => "PROGRAM_END",
            TokenKind::Declare => "DECLARE",
            TokenKind::DeclareList => "DECLARE_LIST",
            TokenKind::Announce => "ANNOUNCE",
            TokenKind::AnnounceOpen => "ANNOUNCE_OPEN",
            TokenKind::Arrow => "ARROW",
            TokenKind::Promo => "PROMO",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::EndIf => "ENDIF",
            TokenKind::While => "WHILE",
            TokenKind::EndWhile => "ENDWHILE",
            TokenKind::First => "FIRST",
            TokenKind::Last => "LAST",
            TokenKind::Size => "SIZE",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Comparison => "COMPARISON",
            TokenKind::Arithmetic => "ARITHMETIC",
            TokenKind::Number => "NUMBER",
            TokenKind::Float => "FLOAT",
            TokenKind::String => "STRING",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::EndOfLine => "EOL",
            TokenKind::Variable => "VARIABLE",
            TokenKind::Unrecognized => "UNRECOGNIZED",
        };
        f.write_str(name)
    }
}

/// A classified lexeme and the line it started on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }

    /// Lexeme as it should appear in diagnostics
    pub fn display_lexeme(&self) -> &str {
        if self.kind == TokenKind::EndOfLine {
            "end of line"
        } else {
            &self.lexeme
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lexeme = if self.kind == TokenKind::EndOfLine {
            "\\n"
        } else {
            self.lexeme.as_str()
        };
        write!(f, "{} -> {}", lexeme, self.kind)
    }
}

/// Characters that may appear inside an ordinary word candidate
fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || "_+-*/%=<>!:,'\\".contains(ch)
}

/// Line scanner for WWE source text
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    pending: String,
    pending_line: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            pending: String::new(),
            pending_line: 1,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Vec<Token> {
        while let Some(ch) = self.peek() {
            match ch {
                '\n' => {
                    self.flush();
                    self.advance();
                    let line = self.line;
                    self.tokens.push(Token::new(TokenKind::EndOfLine, "\n", line));
                    self.line += 1;
                }
                ' ' | '\t' | '\r' => {
                    self.flush();
                    self.advance();
                }
                '#' => {
                    self.flush();
                    self.skip_comment();
                }
                '"' => {
                    self.flush();
                    self.string_candidate();
                }
                '.' => {
                    let after_letter = self
                        .pending
                        .ends_with(|c: char| c.is_ascii_alphabetic() || c == '_');
                    if after_letter {
                        self.flush();
                    }
                    self.advance();
                    self.extend('.');
                }
                c if is_word_char(c) => {
                    self.advance();
                    self.extend(c);
                }
                // Brackets and anything unknown stand alone
                _ => {
                    self.flush();
                    self.advance();
                    let line = self.line;
                    self.emit(ch.to_string(), line);
                }
            }
        }
        self.flush();

        std::mem::take(&mut self.tokens)
    }

    /// Append a character to the pending candidate
    fn extend(&mut self, ch: char) {
        if self.pending.is_empty() {
            self.pending_line = self.line;
        }
        self.pending.push(ch);
    }

    /// Classify and emit the pending candidate, if any
    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let lexeme = std::mem::take(&mut self.pending);
            let line = self.pending_line;
            self.emit(lexeme, line);
        }
    }

    fn emit(&mut self, lexeme: String, line: usize) {
        let kind = automaton().classify(&lexeme);
        self.tokens.push(Token { kind, lexeme, line });
    }

    /// Collect a quoted string, quotes included.
    ///
    /// Stops early at a newline or end of input; the automaton then rejects the
    /// unterminated candidate.
    fn string_candidate(&mut self) {
        let line = self.line;
        let mut lexeme = String::new();
        if let Some(quote) = self.advance() {
            lexeme.push(quote);
        }

        while let Some(ch) = self.peek() {
            match ch {
                '\n' => break,
                '"' => {
                    self.advance();
                    lexeme.push(ch);
                    break;
                }
                '\\' => {
                    self.advance();
                    lexeme.push(ch);
                    if let Some(escaped) = self.peek().filter(|c| *c != '\n') {
                        self.advance();
                        lexeme.push(escaped);
                    }
                }
                _ => {
                    self.advance();
                    lexeme.push(ch);
                }
            }
        }

        self.emit(lexeme, line);
    }

    /// Skip a `#` comment up to, not including, the next newline or tab
    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' || ch == '\t' {
                break;
            }
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }
}
