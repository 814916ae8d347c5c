//! Translates a Cyrillic pseudocode language into a C# console program.
//!
//! ```text
//! начало
//!     цел x = 2 * 3;
//!     написать x;
//! конец
//! ```

use log::debug;

use crate::{
    ast::{InvalidConversion, Program},
    codegen::Options,
    token::Spanned,
    token_stream::TokenStream,
};

/// The lexer takes the source input, mapping it into a sequence of tokens.
pub mod lexer;

/// The parser takes a sequence of tokens, mapping it into an AST.
pub mod parser;

/// The code generator takes an AST, mapping it into C# source.
pub mod codegen;

pub mod ast;
pub mod token;
pub mod token_stream;

pub mod util {
    pub mod fmt;
    #[cfg(test)]
    pub(crate) mod test_utils;
}

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The source is not a valid program.
    Syntax(Spanned<parser::Error>),
    /// The translator broke one of its own invariants.
    Internal(Spanned<InvalidConversion>),
}

impl Error {
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Internal(_))
    }

    pub fn span(&self) -> token::Span {
        match self {
            Error::Syntax(error) => error.span,
            Error::Internal(error) => error.span,
        }
    }
}

impl From<Spanned<parser::Error>> for Error {
    fn from(Spanned { span, inner }: Spanned<parser::Error>) -> Self {
        match inner {
            parser::Error::Internal(conversion) => Error::Internal(span.wrap(conversion)),
            inner => Error::Syntax(span.wrap(inner)),
        }
    }
}

impl std::error::Error for Error {}

/// Translates a whole program with the default [`Options`].
pub fn transpile(src: &str) -> Result<String, Error> {
    Transpiler::new().transpile(src)
}

/// Runs the pipeline, reusing its token buffer between runs.
pub struct Transpiler {
    tokens: TokenStream,
    options: Options,
}

impl Transpiler {
    pub fn new() -> Transpiler {
        Transpiler::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Transpiler {
        Transpiler {
            tokens: TokenStream::with_capacity(lexer::SUGGESTED_TOKENS_CAPACITY),
            options,
        }
    }

    pub fn transpile(&mut self, src: &str) -> Result<String, Error> {
        let program = self.parse(src)?;
        Ok(codegen::generate(&program, &self.options))
    }

    /// Lexes and parses the source, leaving its tokens in the buffer.
    pub fn parse(&mut self, src: &str) -> Result<Program, Error> {
        self.reset();
        lexer::lex(src, &mut self.tokens);
        let program = parser::parse_program(&mut self.tokens)?;
        Ok(program)
    }

    /// Tokens of the last run.
    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    pub fn reset(&mut self) {
        debug!("discarding {} buffered tokens", self.tokens.len());
        self.tokens.clear();
    }
}

impl Default for Transpiler {
    fn default() -> Self {
        Transpiler::new()
    }
}
