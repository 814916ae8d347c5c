use std::{fmt, ops::Range};

/// A classified unit of source text.
///
/// Equality only considers the kind and the text; the span is positional
/// metadata used for diagnostics.
#[derive(Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Box<str>,
    lo: usize,
    len: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<Box<str>>, span: Span) -> Token {
        Token {
            kind,
            text: text.into(),
            lo: span.lo,
            len: span.len,
        }
    }

    /// The end-of-input marker for a source text of the given byte length.
    pub fn end_of_input(src_len: usize) -> Token {
        Token::new(TokenKind::EndOfInput, "", Span::new_of_length(src_len, 0))
    }

    pub fn span(&self) -> Span {
        Span {
            len: self.len,
            lo: self.lo,
        }
    }

    pub fn is_eoi(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.text == other.text
    }
}

impl Eq for Token {}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({:?}, {:?}, {})", self.kind, self.text, self.span())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub len: u32,
    pub lo: usize,
}

impl Span {
    pub fn new_of_bounds(Range { start: lo, end: hi }: Range<usize>) -> Span {
        debug_assert!(hi >= lo);
        Self::new_of_length(lo, u32::try_from(hi - lo).unwrap())
    }

    pub fn new_of_length(lo: usize, len: u32) -> Span {
        Span { len, lo }
    }

    pub fn hi(self) -> usize {
        self.lo + self.len as usize
    }

    /// Returns a span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        let lo = self.lo.min(other.lo);
        let hi = self.hi().max(other.hi());
        Span::new_of_bounds(lo..hi)
    }

    pub fn wrap<T>(self, inner: T) -> Spanned<T> {
        Spanned { span: self, inner }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({self}, len: {})", self.len)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lo = self.lo;
        let hi = self.hi();
        write!(f, "{lo}..{hi}")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Spanned<T> {
    pub span: Span,
    pub inner: T,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `начало`
    ProgramBegin,
    /// `конец`
    ProgramEnd,
    Semicolon,
    LeftParen,
    RightParen,
    EndOfInput,

    /// `цел`
    IntegerType,
    /// `плав`
    DoubleType,
    /// `строка`
    StringType,

    VariableName,
    IntegerLiteral,
    DoubleLiteral,
    StringLiteral,

    Add,
    Subtract,
    Multiply,
    Divide,
    /// `=`
    Assign,
    /// `==`
    Equals,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,

    /// `если`
    If,
    /// `то`
    ControlBegin,
    /// `иначе`
    Else,
    /// `кесли`
    ControlEnd,

    /// `нц`
    LoopBegin,
    /// `раз`
    LoopTimes,
    /// `кц`
    LoopEnd,
    /// `пока`
    While,

    /// `вернуть`
    Return,
    /// `написать`
    Write,
    /// `прочитать`
    Read,
}

impl TokenKind {
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::IntegerType | TokenKind::DoubleType | TokenKind::StringType
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            TokenKind::Equals
                | TokenKind::Less
                | TokenKind::LessOrEqual
                | TokenKind::Greater
                | TokenKind::GreaterOrEqual
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            TokenKind::Add | TokenKind::Subtract | TokenKind::Multiply | TokenKind::Divide
        )
    }
}

pub static PROGRAM_DELIMITERS: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "начало" => TokenKind::ProgramBegin,
    "конец" => TokenKind::ProgramEnd,
};

pub static TYPE_KEYWORDS: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "цел" => TokenKind::IntegerType,
    "плав" => TokenKind::DoubleType,
    "строка" => TokenKind::StringType,
};

pub static KEYWORDS: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "если" => TokenKind::If,
    "то" => TokenKind::ControlBegin,
    "иначе" => TokenKind::Else,
    "кесли" => TokenKind::ControlEnd,
    "нц" => TokenKind::LoopBegin,
    "раз" => TokenKind::LoopTimes,
    "кц" => TokenKind::LoopEnd,
    "пока" => TokenKind::While,
    "вернуть" => TokenKind::Return,
    "написать" => TokenKind::Write,
    "прочитать" => TokenKind::Read,
};

pub static OPERATORS: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "+" => TokenKind::Add,
    "-" => TokenKind::Subtract,
    "*" => TokenKind::Multiply,
    "/" => TokenKind::Divide,
    "=" => TokenKind::Assign,
    "==" => TokenKind::Equals,
    "<" => TokenKind::Less,
    "<=" => TokenKind::LessOrEqual,
    ">" => TokenKind::Greater,
    ">=" => TokenKind::GreaterOrEqual,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_span() {
        let a = Token::new(TokenKind::VariableName, "x", Span::new_of_length(0, 1));
        let b = Token::new(TokenKind::VariableName, "x", Span::new_of_length(10, 1));
        let c = Token::new(TokenKind::VariableName, "y", Span::new_of_length(0, 1));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_span_to() {
        let a = Span::new_of_bounds(2..4);
        let b = Span::new_of_bounds(7..9);
        assert_eq!(a.to(b), Span::new_of_bounds(2..9));
        assert_eq!(b.to(a), Span::new_of_bounds(2..9));
        assert_eq!(a.to(b).to_string(), "2..9");
    }
}
