use std::fmt;

use crate::{parser, token::Spanned, Error};

impl fmt::Display for Spanned<parser::Error> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Spanned { span, inner: error } = self;

        if f.alternate() {
            write!(f, "{span}: ")?;
        }

        use parser::Error::*;
        match error {
            Unexpected { actual, expected } => {
                write!(f, "expected token {expected:?}, but got {actual:?}")
            }
            UnexpectedAny { actual, expected } => {
                write!(f, "expected one of {expected:?}, but got {actual:?}")
            }
            UnexpectedStatement { actual } => {
                write!(f, "expected a type keyword or statement, but got {actual:?}")
            }
            UnexpectedTokenInExpr { actual } => {
                write!(f, "unexpected token {actual:?} in expression")
            }
            UnterminatedBlock { opener, expected } => {
                write!(f, "unterminated {opener:?} block, expected {expected:?}")
            }
            InvalidAssignmentTarget => write!(f, "invalid assignment target"),
            ChainedComparison => write!(f, "comparisons can't be chained"),
            MissingLoopCondition => write!(f, "loop has neither a count nor a condition"),
            UndeclaredReadTarget { name } => write!(f, "can't read into undeclared {name}"),
            LiteralOverflow => write!(f, "literal out of bounds"),
            MalformedLiteral => write!(f, "malformed literal"),
            OutOfTokens => write!(f, "unexpected end of input"),
            Internal(conversion) => write!(f, "internal error: {conversion}"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax(error) if f.alternate() => write!(f, "syntax error at {error:#}"),
            Error::Syntax(error) => write!(f, "syntax error: {error}"),
            Error::Internal(Spanned { span, inner }) if f.alternate() => {
                write!(f, "internal error at {span}: {inner}")
            }
            Error::Internal(Spanned { inner, .. }) => write!(f, "internal error: {inner}"),
        }
    }
}

/// Renders the error with a `line:column` position instead of byte offsets.
pub fn render(error: &Error, src: &str) -> String {
    let (kind, span) = match error {
        Error::Syntax(error) => ("syntax", error.span),
        Error::Internal(error) => ("internal", error.span),
    };
    let (line, col) = line_col(src, span.lo);
    let message = match error {
        Error::Syntax(error) => error.to_string(),
        Error::Internal(error) => error.inner.to_string(),
    };
    format!("{line}:{col}: {kind} error: {message}")
}

/// Returns the 1-based line and column, in chars, of the given byte offset.
pub fn line_col(src: &str, offset: usize) -> (usize, usize) {
    let before = &src[..offset.min(src.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Span;

    #[test]
    fn test_line_col() {
        let src = "начало\n  цел x;\nконец";
        assert_eq!(line_col(src, 0), (1, 1));
        assert_eq!(line_col(src, 15), (2, 3));
        assert_eq!(line_col(src, src.len()), (3, 6));
    }

    #[test]
    fn test_render() {
        let src = "начало\nнаписать ;\nконец";
        let error = Error::Syntax(Span::new_of_bounds(30..31).wrap(
            parser::Error::UnexpectedTokenInExpr {
                actual: crate::token::TokenKind::Semicolon,
            },
        ));
        assert_eq!(
            render(&error, src),
            "2:10: syntax error: unexpected token Semicolon in expression"
        );
        assert_eq!(
            format!("{error:#}"),
            "syntax error at 30..31: unexpected token Semicolon in expression"
        );
    }
}
