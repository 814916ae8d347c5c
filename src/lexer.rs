use std::{iter::Peekable, str::CharIndices};

use log::{debug, trace};

use crate::{
    token::{Span, Token, TokenKind, KEYWORDS, OPERATORS, PROGRAM_DELIMITERS, TYPE_KEYWORDS},
    token_stream::TokenStream,
};

pub const SUGGESTED_TOKENS_CAPACITY: usize = 1_024;

/// Lexes the provided string, appending the tokens to the provided stream.
///
/// Lexing never fails: units no rule recognizes become identifiers, and are
/// reported by the parser instead.
pub fn lex(src: &str, tokens: &mut TokenStream) {
    assert!(tokens.is_empty(), "must pass clean token stream");
    for (text, span) in Units::new(src) {
        let kind = classify(text);
        trace!("{span}: {text:?} => {kind:?}");
        tokens.push(Token::new(kind, text, span));
    }
    tokens.push(Token::end_of_input(src.len()));
    debug!("lexed {} tokens", tokens.len());
}

/// A convenience function that allocates a new stream per lexed input and
/// returns it.
pub fn lex_in_new(src: &str) -> TokenStream {
    let mut tokens = TokenStream::with_capacity(SUGGESTED_TOKENS_CAPACITY);
    lex(src, &mut tokens);
    tokens
}

/// Returns the kind of the first rule that matches the raw unit.
pub fn classify(unit: &str) -> TokenKind {
    RULES
        .iter()
        .find_map(|rule| rule.matches(unit))
        .unwrap_or(TokenKind::VariableName)
}

/// A classification rule over a whole raw unit.
enum Rule {
    /// The unit must be one of the map's keys.
    Exact(&'static phf::Map<&'static str, TokenKind>),
    Predicate(fn(&str) -> bool, TokenKind),
}

impl Rule {
    fn matches(&self, unit: &str) -> Option<TokenKind> {
        match self {
            Rule::Exact(map) => map.get(unit).copied(),
            Rule::Predicate(predicate, kind) => predicate(unit).then_some(*kind),
        }
    }
}

/// Evaluated in order; the first match wins.
static RULES: &[Rule] = &[
    Rule::Exact(&PROGRAM_DELIMITERS),
    Rule::Exact(&TYPE_KEYWORDS),
    Rule::Exact(&KEYWORDS),
    Rule::Exact(&OPERATORS),
    Rule::Predicate(is_integer, TokenKind::IntegerLiteral),
    Rule::Predicate(is_double, TokenKind::DoubleLiteral),
    Rule::Predicate(is_string, TokenKind::StringLiteral),
    Rule::Predicate(is_semicolon, TokenKind::Semicolon),
    Rule::Predicate(is_left_paren, TokenKind::LeftParen),
    Rule::Predicate(is_right_paren, TokenKind::RightParen),
    Rule::Predicate(is_anything, TokenKind::VariableName),
];

fn unsigned(unit: &str) -> &str {
    unit.strip_prefix('-').unwrap_or(unit)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_integer(unit: &str) -> bool {
    is_digits(unsigned(unit))
}

fn is_double(unit: &str) -> bool {
    unsigned(unit)
        .split_once('.')
        .is_some_and(|(int, frac)| is_digits(int) && is_digits(frac))
}

fn is_string(unit: &str) -> bool {
    unit.len() >= 2 && unit.starts_with('"') && unit.ends_with('"')
}

fn is_semicolon(unit: &str) -> bool {
    unit == ";"
}

fn is_left_paren(unit: &str) -> bool {
    unit == "("
}

fn is_right_paren(unit: &str) -> bool {
    unit == ")"
}

fn is_anything(_: &str) -> bool {
    true
}

/// Characters which always form a unit of their own.
fn is_standalone(c: char) -> bool {
    matches!(c, ';' | '(' | ')')
}

/// Splits the source into raw units, yielding each with its span.
///
/// A quoted string closed on the same line is a single unit. Otherwise,
/// units are separated by whitespace, and standalone characters are cut from
/// their neighbours.
struct Units<'src> {
    src: &'src str,
    iter: Peekable<CharIndices<'src>>,
}

impl<'src> Units<'src> {
    fn new(src: &'src str) -> Units<'src> {
        Units {
            src,
            iter: src.char_indices().peekable(),
        }
    }

    /// Returns the byte offset of the next char, or the source length once
    /// exhausted.
    fn offset(&mut self) -> usize {
        self.iter.peek().map_or(self.src.len(), |&(i, _)| i)
    }

    fn peek(&mut self) -> Option<char> {
        self.iter.peek().map(|&(_, c)| c)
    }

    fn unit(&self, lo: usize, hi: usize) -> (&'src str, Span) {
        (&self.src[lo..hi], Span::new_of_bounds(lo..hi))
    }

    /// Finds the byte offset just past the closing quote of a string starting
    /// at `lo`, if it is closed on the same line.
    fn closing_quote(&self, lo: usize) -> Option<usize> {
        let rest = &self.src[lo + 1..];
        let end = rest.find(['"', '\n'])?;
        rest[end..]
            .starts_with('"')
            .then_some(lo + 1 + end + 1)
    }

    fn word(&mut self, lo: usize) -> (&'src str, Span) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || is_standalone(c) || c == '"' {
                break;
            }
            self.iter.next();
        }
        let hi = self.offset();
        self.unit(lo, hi)
    }
}

impl<'src> Iterator for Units<'src> {
    type Item = (&'src str, Span);

    fn next(&mut self) -> Option<Self::Item> {
        while self.peek().is_some_and(char::is_whitespace) {
            self.iter.next();
        }
        let (lo, first) = self.iter.next()?;

        if is_standalone(first) {
            return Some(self.unit(lo, lo + first.len_utf8()));
        }
        if first == '"' {
            if let Some(hi) = self.closing_quote(lo) {
                while self.offset() < hi {
                    self.iter.next();
                }
                return Some(self.unit(lo, hi));
            }
        }
        Some(self.word(lo))
    }
}
