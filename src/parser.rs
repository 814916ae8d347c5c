use std::{collections::HashMap, num::IntErrorKind};

use log::debug;

use crate::{
    ast::{
        BinaryOperator, Block, Expr, ExprKind, Ident, IfElse, InvalidConversion, LoopTest,
        Program, Stmt, VariableDeclaration, VariableReference, VariableType,
    },
    token::{Span, Spanned, Token, TokenKind},
    token_stream::{StreamError, TokenStream},
};

type Result<T, E = Spanned<Error>> = std::result::Result<T, E>;

pub type ParseResult<T> = Result<T>;

/// Parses a whole program from an already lexed token stream.
///
/// Parsing stops at the first error; no partial tree is returned.
pub fn parse_program(tokens: &mut TokenStream) -> ParseResult<Program> {
    debug!("parsing program from {} tokens", tokens.len());
    let program = Parser::new(tokens)?.parse_program()?;
    debug!("parsed {} top-level statements", program.statements.len());
    Ok(program)
}

/// Parses a single expression spanning the whole token stream.
pub fn parse_expr(tokens: &mut TokenStream) -> ParseResult<Expr> {
    let mut p = Parser::new(tokens)?;
    let expr = p.parse_expr()?;
    p.tokens.expect(TokenKind::EndOfInput)?;
    Ok(expr)
}

struct Parser<'tok> {
    tokens: &'tok mut TokenStream,
    /// Declared type of every variable seen so far, regardless of scope.
    declared: HashMap<Box<str>, VariableType>,
}

impl Parser<'_> {
    fn parse_program(&mut self) -> Result<Program> {
        self.tokens.expect(TokenKind::ProgramBegin)?;
        let mut statements = Vec::new();
        while self.except([TokenKind::ProgramEnd]) {
            statements.push(self.parse_stmt()?);
        }
        self.tokens.expect(TokenKind::ProgramEnd)?;
        self.tokens.expect(TokenKind::EndOfInput)?;
        Ok(Program { statements })
    }

    fn parse_stmt(&mut self) -> Result<Stmt> {
        let current = self.tokens.current();
        let span = current.span();
        match current.kind {
            kind if kind.is_type_keyword() => self.parse_declaration(),
            TokenKind::VariableName => self.parse_assignment(),
            TokenKind::If => self.parse_if_else(),
            TokenKind::LoopBegin => self.parse_loop(),
            TokenKind::While => self.parse_while_first_loop(),
            TokenKind::Write => {
                self.tokens.advance()?;
                let expr = self.parse_expr()?;
                self.tokens.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Write(expr))
            }
            TokenKind::Read => {
                self.tokens.advance()?;
                let target = self.parse_read_target()?;
                self.tokens.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Read(target))
            }
            TokenKind::Return => {
                self.tokens.advance()?;
                if self.tokens.take(TokenKind::Semicolon) {
                    return Ok(Stmt::Return(None));
                }
                let expr = self.parse_expr()?;
                self.tokens.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Return(Some(expr)))
            }
            actual => Err(span.wrap(Error::UnexpectedStatement { actual })),
        }
    }

    fn parse_declaration(&mut self) -> Result<Stmt> {
        let ty_token = self.tokens.advance()?;
        let ty = VariableType::try_from(ty_token.kind)
            .map_err(|error| ty_token.span().wrap(Error::Internal(error)))?;
        let name = self.parse_ident()?;
        let initializer = if self.tokens.take(TokenKind::Assign) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.tokens.expect(TokenKind::Semicolon)?;

        self.declared.insert(name.name.clone(), ty);
        Ok(Stmt::VariableDeclaration(VariableDeclaration {
            ty,
            name,
            initializer,
        }))
    }

    fn parse_assignment(&mut self) -> Result<Stmt> {
        let next = self.tokens.peek_next();
        if next.kind != TokenKind::Assign {
            return Err(next.span().wrap(Error::Unexpected {
                actual: next.kind,
                expected: TokenKind::Assign,
            }));
        }
        let expr = self.parse_expr()?;
        self.tokens.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Assignment(expr))
    }

    fn parse_read_target(&mut self) -> Result<VariableReference> {
        let name = self.parse_ident()?;
        let declared = self.declared.get(&name.name).copied();
        let Some(ty) = declared else {
            return Err(name.span.wrap(Error::UndeclaredReadTarget { name: name.name }));
        };
        Ok(VariableReference { name, ty })
    }

    fn parse_if_else(&mut self) -> Result<Stmt> {
        let if_token = self.tokens.advance()?;
        let condition = self.parse_expr()?;
        self.tokens.expect(TokenKind::ControlBegin)?;
        let arm_ends = &[TokenKind::Else, TokenKind::ControlEnd];
        let then_block = self.parse_block(&if_token, TokenKind::ControlEnd, arm_ends)?;

        let mut else_ifs = Vec::new();
        let mut else_block = None;
        while self.tokens.take(TokenKind::Else) {
            if self.tokens.take(TokenKind::If) {
                let condition = self.parse_expr()?;
                self.tokens.expect(TokenKind::ControlBegin)?;
                let block = self.parse_block(&if_token, TokenKind::ControlEnd, arm_ends)?;
                else_ifs.push((condition, block));
            } else {
                let block =
                    self.parse_block(&if_token, TokenKind::ControlEnd, &[TokenKind::ControlEnd])?;
                else_block = Some(block);
                break;
            }
        }
        self.tokens.expect(TokenKind::ControlEnd)?;

        Ok(Stmt::IfElse(IfElse {
            condition,
            then_block,
            else_ifs,
            else_block,
        }))
    }

    /// Parses any loop introduced by `нц`.
    fn parse_loop(&mut self) -> Result<Stmt> {
        let loop_token = self.tokens.expect(TokenKind::LoopBegin)?;

        // нц пока <cond> ... кц
        if self.tokens.take(TokenKind::While) {
            let condition = self.parse_expr()?;
            let body = self.parse_block(&loop_token, TokenKind::LoopEnd, &[TokenKind::LoopEnd])?;
            self.tokens.expect(TokenKind::LoopEnd)?;
            return Ok(Stmt::WhileLoop {
                condition,
                body,
                test: LoopTest::Pre,
            });
        }

        // нц <count> раз ... кц
        if self.is_count_ahead() {
            let count = self.parse_expr()?;
            self.tokens.expect(TokenKind::LoopTimes)?;
            let body = self.parse_block(&loop_token, TokenKind::LoopEnd, &[TokenKind::LoopEnd])?;
            self.tokens.expect(TokenKind::LoopEnd)?;
            return Ok(Stmt::CountedLoop { count, body });
        }

        self.parse_post_test_loop(&loop_token)
    }

    /// A count can't start a statement, except for a variable, which is only
    /// a count when it isn't followed by an assignment.
    fn is_count_ahead(&self) -> bool {
        let next = self.tokens.peek_next().kind;
        match self.tokens.current().kind {
            TokenKind::IntegerLiteral | TokenKind::LeftParen => true,
            TokenKind::VariableName => next == TokenKind::LoopTimes || next.is_arithmetic(),
            _ => false,
        }
    }

    /// Parses `нц ... пока <cond> кц`, the `нц` being already consumed.
    fn parse_post_test_loop(&mut self, loop_token: &Token) -> Result<Stmt> {
        let mut body = Vec::new();
        loop {
            match self.tokens.current().kind {
                TokenKind::While => {
                    self.tokens.advance()?;
                    let condition = self.parse_expr()?;
                    if self.tokens.take(TokenKind::LoopEnd) {
                        return Ok(Stmt::WhileLoop {
                            condition,
                            body,
                            test: LoopTest::Post,
                        });
                    }
                    if self.tokens.is(TokenKind::LoopBegin) {
                        // A nested `пока <cond> нц ... кц` inside the body.
                        body.push(self.finish_pre_test_loop(condition)?);
                        continue;
                    }
                    let current = self.tokens.current();
                    return Err(current.span().wrap(Error::UnexpectedAny {
                        actual: current.kind,
                        expected: Box::from([TokenKind::LoopEnd, TokenKind::LoopBegin]),
                    }));
                }
                TokenKind::LoopEnd => {
                    return Err(loop_token.span().wrap(Error::MissingLoopCondition));
                }
                kind if is_block_end(kind) => {
                    return Err(loop_token.span().wrap(Error::UnterminatedBlock {
                        opener: loop_token.kind,
                        expected: TokenKind::LoopEnd,
                    }));
                }
                _ => body.push(self.parse_stmt()?),
            }
        }
    }

    /// Parses `пока <cond> нц ... кц`.
    fn parse_while_first_loop(&mut self) -> Result<Stmt> {
        self.tokens.expect(TokenKind::While)?;
        let condition = self.parse_expr()?;
        self.finish_pre_test_loop(condition)
    }

    fn finish_pre_test_loop(&mut self, condition: Expr) -> Result<Stmt> {
        let loop_token = self.tokens.expect(TokenKind::LoopBegin)?;
        let body = self.parse_block(&loop_token, TokenKind::LoopEnd, &[TokenKind::LoopEnd])?;
        self.tokens.expect(TokenKind::LoopEnd)?;
        Ok(Stmt::WhileLoop {
            condition,
            body,
            test: LoopTest::Pre,
        })
    }

    /// Parses statements until one of `ends` is current. Does **NOT** consume
    /// the end token.
    ///
    /// Reaching any other block end reports the `opener` as unterminated,
    /// rather than letting an enclosing block claim its statements.
    fn parse_block(
        &mut self,
        opener: &Token,
        expected: TokenKind,
        ends: &[TokenKind],
    ) -> Result<Block> {
        let mut block = Vec::new();
        loop {
            let kind = self.tokens.current().kind;
            if ends.contains(&kind) {
                break Ok(block);
            }
            if is_block_end(kind) {
                break Err(opener.span().wrap(Error::UnterminatedBlock {
                    opener: opener.kind,
                    expected,
                }));
            }
            block.push(self.parse_stmt()?);
        }
    }

    fn parse_ident(&mut self) -> Result<Ident> {
        let token = self.tokens.expect(TokenKind::VariableName)?;
        Ok(Ident {
            span: token.span(),
            name: token.text,
        })
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr> {
        let lhs_token = self.tokens.advance()?;
        let mut lhs = self.parse_nud(lhs_token)?;

        loop {
            let op_token = self.tokens.current().clone();
            let Some((lbp, rbp)) = Self::infix_binding_power(op_token.kind) else {
                // Not an infix operator
                break;
            };
            if lbp < min_bp {
                // Operator binds less tightly than the minimum required
                break;
            }
            self.tokens.advance()?;
            lhs = self.parse_led(&op_token, lhs, rbp)?;
        }

        Ok(lhs)
    }

    /// nud: Parses tokens that start an expression (literals, variables,
    /// grouping)
    fn parse_nud(&mut self, token: Token) -> Result<Expr> {
        let span = token.span();
        let kind = match token.kind {
            TokenKind::VariableName => ExprKind::Variable(Ident {
                name: token.text,
                span,
            }),
            TokenKind::IntegerLiteral => match token.text.parse::<i32>() {
                Ok(value) => ExprKind::Integer(value),
                Err(error) => {
                    let error = match error.kind() {
                        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                            Error::LiteralOverflow
                        }
                        _ => Error::MalformedLiteral,
                    };
                    return Err(span.wrap(error));
                }
            },
            TokenKind::DoubleLiteral => match token.text.parse::<f64>() {
                Ok(value) if value.is_finite() => ExprKind::Double(value),
                Ok(_) => return Err(span.wrap(Error::LiteralOverflow)),
                Err(_) => return Err(span.wrap(Error::MalformedLiteral)),
            },
            TokenKind::StringLiteral => {
                let text = &token.text;
                let inner = text
                    .strip_prefix('"')
                    .and_then(|s| s.strip_suffix('"'))
                    .ok_or_else(|| span.wrap(Error::MalformedLiteral))?;
                ExprKind::String(Box::from(inner))
            }

            // Grouping: ( expr )
            TokenKind::LeftParen => {
                let inner = self.parse_expr()?;
                let end = self.tokens.expect(TokenKind::RightParen)?;
                return Ok(Expr {
                    kind: inner.kind,
                    span: span.to(end.span()),
                });
            }

            actual => return Err(span.wrap(Error::UnexpectedTokenInExpr { actual })),
        };
        Ok(Expr { kind, span })
    }

    /// led: Parses the infix operator following a left-hand-side expression
    fn parse_led(&mut self, op_token: &Token, lhs: Expr, rbp: u8) -> Result<Expr> {
        let op = BinaryOperator::try_from(op_token.kind)
            .map_err(|error| op_token.span().wrap(Error::Internal(error)))?;

        if op == BinaryOperator::Assign && !matches!(lhs.kind, ExprKind::Variable(_)) {
            return Err(lhs.span.wrap(Error::InvalidAssignmentTarget));
        }

        let rhs = self.parse_expr_bp(rbp)?;

        if op.is_comparison() {
            let next = self.tokens.current();
            if next.kind.is_comparison() {
                return Err(next.span().wrap(Error::ChainedComparison));
            }
        }

        Ok(Expr {
            span: lhs.span.to(rhs.span),
            kind: ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        })
    }

    fn infix_binding_power(kind: TokenKind) -> Option<(u8, u8)> {
        let bp = match kind {
            // Assignment (right-associative)
            TokenKind::Assign => (2, 1),

            // Comparisons (non-associative, checked in `parse_led`)
            TokenKind::Equals
            | TokenKind::Less
            | TokenKind::LessOrEqual
            | TokenKind::Greater
            | TokenKind::GreaterOrEqual => (3, 4),

            // Addition/Subtraction (left-associative)
            TokenKind::Add | TokenKind::Subtract => (5, 6),

            // Multiplication/Division (left-associative)
            TokenKind::Multiply | TokenKind::Divide => (7, 8),

            _ => return None,
        };
        Some(bp)
    }
}

impl Parser<'_> {
    /// Fails on a stream that was never lexed, which lacks even the
    /// end-of-input marker.
    fn new(tokens: &mut TokenStream) -> Result<Parser<'_>> {
        if tokens.is_empty() {
            return Err(Span::new_of_length(0, 0).wrap(Error::OutOfTokens));
        }
        Ok(Parser {
            tokens,
            declared: HashMap::new(),
        })
    }

    /// Returns true while the current token does *not* match one of the
    /// provided ones. [`TokenKind::EndOfInput`] is implicitly included in the
    /// list.
    ///
    /// This won't advance the cursor.
    fn except(&self, except: impl IntoIterator<Item = TokenKind>) -> bool {
        let c = self.tokens.current();
        if except.into_iter().any(|e| c.kind == e) {
            return false;
        }
        !c.is_eoi()
    }
}

/// Tokens which close some block. Finding one where a statement is expected
/// means the enclosing block ends there.
fn is_block_end(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::ControlEnd
            | TokenKind::Else
            | TokenKind::LoopEnd
            | TokenKind::ProgramEnd
            | TokenKind::EndOfInput
    )
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    Unexpected {
        actual: TokenKind,
        expected: TokenKind,
    },
    UnexpectedAny {
        actual: TokenKind,
        expected: Box<[TokenKind]>,
    },
    /// Neither a type keyword nor the start of a statement.
    UnexpectedStatement {
        actual: TokenKind,
    },
    UnexpectedTokenInExpr {
        actual: TokenKind,
    },
    /// Reported at the span of the keyword which opened the block.
    UnterminatedBlock {
        opener: TokenKind,
        expected: TokenKind,
    },
    InvalidAssignmentTarget,
    ChainedComparison,
    MissingLoopCondition,
    UndeclaredReadTarget {
        name: Box<str>,
    },
    LiteralOverflow,
    MalformedLiteral,
    OutOfTokens,
    /// A parser bug rather than a user mistake.
    Internal(InvalidConversion),
}

impl From<StreamError> for Spanned<Error> {
    fn from(error: StreamError) -> Self {
        match error {
            StreamError::OutOfTokens { position } => position.wrap(Error::OutOfTokens),
            StreamError::UnexpectedToken {
                expected,
                found,
                position,
            } => position.wrap(Error::Unexpected {
                actual: found,
                expected,
            }),
        }
    }
}
