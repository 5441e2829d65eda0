//! Token stream with a backtracking cursor
//!
//! Tokens live in an owned vector; the cursor is an index into it. A [`Mark`]
//! is a saved index, so backtracking is an integer copy.

use super::lexer::{Token, TokenKind};

/// Saved cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Token under the cursor, `None` at the end
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    /// Kind of the token `offset` positions past the cursor
    pub fn peek_kind_at(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.cursor + offset).map(|t| t.kind)
    }

    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek_kind_at(0)
    }

    /// Consume the token under the cursor
    pub fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(token)
    }

    pub fn mark(&self) -> Mark {
        Mark(self.cursor)
    }

    pub fn reset(&mut self, mark: Mark) {
        self.cursor = mark.0.min(self.tokens.len());
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Line of the token under the cursor, or of the last token once exhausted
    pub fn line(&self) -> usize {
        self.peek()
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    #[test]
    fn test_mark_and_reset() {
        let mut stream = TokenStream::new(Lexer::new("x = 1 + 2").tokenize());
        let start = stream.mark();

        assert_eq!(stream.advance().map(|t| t.lexeme.as_str()), Some("x"));
        assert_eq!(stream.advance().map(|t| t.kind), Some(TokenKind::Assign));
        assert_eq!(stream.position(), 2);

        stream.reset(start);
        assert_eq!(stream.position(), 0);
        assert_eq!(stream.peek_kind(), Some(TokenKind::Variable));
        assert_eq!(stream.peek_kind_at(3), Some(TokenKind::Arithmetic));
    }

    #[test]
    fn test_end_of_stream() {
        let mut stream = TokenStream::new(Lexer::new("a\nb").tokenize());
        while stream.advance().is_some() {}

        assert!(stream.is_at_end());
        assert!(stream.peek().is_none());
        assert!(stream.advance().is_none());
        assert_eq!(stream.line(), 2);
    }

    #[test]
    fn test_empty_stream_line() {
        let stream = TokenStream::new(Vec::new());
        assert!(stream.is_empty());
        assert_eq!(stream.line(), 1);
    }
}
