//! Ordered store of lexed tokens with a forward-only cursor.
use std::fmt;

use crate::token::{Span, Token, TokenKind};

/// Tokens in source order, terminated by a single [`TokenKind::EndOfInput`]
/// once lexing completes.
///
/// The cursor is only used by the parser. It never moves backwards and at
/// most one token past it may be inspected.
#[derive(Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenStream {
    pub fn new() -> TokenStream {
        TokenStream::default()
    }

    pub fn with_capacity(capacity: usize) -> TokenStream {
        TokenStream {
            tokens: Vec::with_capacity(capacity),
            cursor: 0,
        }
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// All tokens, regardless of the cursor position.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Drops every token and rewinds the cursor, keeping the allocation.
    pub fn clear(&mut self) {
        self.tokens.clear();
        self.cursor = 0;
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Returns the token under the cursor without advancing.
    ///
    /// Past the end of the buffer this keeps returning the last token, which
    /// is the end-of-input marker for any stream produced by the lexer.
    ///
    /// # Panics
    ///
    /// If the stream is empty. The parser entry points check for that first.
    pub fn current(&self) -> &Token {
        self.nth(0)
    }

    /// Returns the token right after the cursor.
    pub fn peek_next(&self) -> &Token {
        self.nth(1)
    }

    fn nth(&self, offset: usize) -> &Token {
        let last = self
            .tokens
            .last()
            .expect("token stream must be lexed before parsing");
        self.tokens.get(self.cursor + offset).unwrap_or(last)
    }

    /// Checks whether the current token has the given kind.
    pub fn is(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Moves the cursor forward, returning the token it moved past.
    pub fn advance(&mut self) -> Result<Token, StreamError> {
        let current = self.current();
        if current.is_eoi() || self.cursor >= self.tokens.len() {
            return Err(StreamError::OutOfTokens {
                position: current.span(),
            });
        }
        let token = current.clone();
        self.cursor += 1;
        Ok(token)
    }

    /// Advances if the current token matches the provided kind, returning
    /// true. If not, returns false and doesn't advance.
    pub fn take(&mut self, kind: TokenKind) -> bool {
        if self.is(kind) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Advances if the current token matches the provided kind, returning the
    /// consumed token. If not, the cursor stays in place.
    ///
    /// Expecting [`TokenKind::EndOfInput`] checks for it without moving, since
    /// there is nothing to move past.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, StreamError> {
        let current = self.current();
        if current.kind == kind && current.is_eoi() {
            Ok(current.clone())
        } else if current.kind == kind {
            self.advance()
        } else {
            Err(StreamError::UnexpectedToken {
                expected: kind,
                found: current.kind,
                position: current.span(),
            })
        }
    }
}

impl fmt::Debug for TokenStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStream")
            .field("cursor", &self.cursor)
            .field("tokens", &self.tokens)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamError {
    OutOfTokens {
        position: Span,
    },
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        position: Span,
    },
}

impl std::error::Error for StreamError {}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::OutOfTokens { position } => {
                write!(f, "{position}: unexpected end of input")
            }
            StreamError::UnexpectedToken {
                expected,
                found,
                position,
            } => write!(f, "{position}: expected token {expected:?}, but got {found:?}"),
        }
    }
}
