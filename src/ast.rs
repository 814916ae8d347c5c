// program ::= 'начало' stmt* 'конец'
// stmt ::= TYPE ID ['=' expr] ';'
//        | ID '=' expr ';'
//        | 'если' expr 'то' stmt* ('иначе' 'если' expr 'то' stmt*)* ['иначе' stmt*] 'кесли'
//        | 'нц' expr 'раз' stmt* 'кц'
//        | 'нц' 'пока' expr stmt* 'кц'
//        | 'пока' expr 'нц' stmt* 'кц'
//        | 'нц' stmt* 'пока' expr 'кц'
//        | 'написать' expr ';'
//        | 'прочитать' ID ';'
//        | 'вернуть' [expr] ';'
// expr ::= ID '=' expr
//        | expr ('==' | '<' | '<=' | '>' | '>=') expr
//        | expr ('+' | '-') expr
//        | expr ('*' | '/') expr
//        | '(' expr ')'
//        | ID
//        | integer
//        | double
//        | string

// Precedence
//
// * /
// + -
// == < <= > >=  (non-associative)
// =             (right-associative)

use std::fmt;

use crate::token::{Span, TokenKind};

#[derive(Debug, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

pub type Block = Vec<Stmt>;

#[derive(Debug, PartialEq)]
pub enum Stmt {
    VariableDeclaration(VariableDeclaration),
    /// A binary expression whose operator is [`BinaryOperator::Assign`].
    Assignment(Expr),
    Write(Expr),
    Read(VariableReference),
    Return(Option<Expr>),
    IfElse(IfElse),
    CountedLoop {
        count: Expr,
        body: Block,
    },
    WhileLoop {
        condition: Expr,
        body: Block,
        test: LoopTest,
    },
}

#[derive(Debug, PartialEq)]
pub struct VariableDeclaration {
    pub ty: VariableType,
    pub name: Ident,
    pub initializer: Option<Expr>,
}

/// A variable used as the target of a read, along with its declared type.
#[derive(Debug, PartialEq)]
pub struct VariableReference {
    pub name: Ident,
    pub ty: VariableType,
}

#[derive(Debug, PartialEq)]
pub struct IfElse {
    pub condition: Expr,
    pub then_block: Block,
    /// `иначе если` arms, in source order.
    pub else_ifs: Vec<(Expr, Block)>,
    pub else_block: Option<Block>,
}

/// Where the condition of a while loop is checked.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopTest {
    /// Before every iteration, so the body may never run.
    Pre,
    /// After every iteration, so the body runs at least once.
    Post,
}

#[derive(Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub enum ExprKind {
    Binary {
        op: BinaryOperator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Variable(Ident),
    Integer(i32),
    Double(f64),
    /// The literal's contents, without the surrounding quotes.
    String(Box<str>),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VariableType {
    Integer,
    Double,
    String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Assign,
    Equals,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl BinaryOperator {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperator::Equals
                | BinaryOperator::Less
                | BinaryOperator::LessOrEqual
                | BinaryOperator::Greater
                | BinaryOperator::GreaterOrEqual
        )
    }
}

/// A token kind with no counterpart in the target enum.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvalidConversion {
    pub kind: TokenKind,
    pub into: &'static str,
}

impl fmt::Display for InvalidConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token {:?} is not a valid {}", self.kind, self.into)
    }
}

impl std::error::Error for InvalidConversion {}

impl TryFrom<TokenKind> for VariableType {
    type Error = InvalidConversion;

    fn try_from(kind: TokenKind) -> Result<Self, Self::Error> {
        match kind {
            TokenKind::IntegerType => Ok(VariableType::Integer),
            TokenKind::DoubleType => Ok(VariableType::Double),
            TokenKind::StringType => Ok(VariableType::String),
            kind => Err(InvalidConversion {
                kind,
                into: "variable type",
            }),
        }
    }
}

impl TryFrom<TokenKind> for BinaryOperator {
    type Error = InvalidConversion;

    fn try_from(kind: TokenKind) -> Result<Self, Self::Error> {
        use BinaryOperator as B;
        let op = match kind {
            TokenKind::Add => B::Add,
            TokenKind::Subtract => B::Subtract,
            TokenKind::Multiply => B::Multiply,
            TokenKind::Divide => B::Divide,
            TokenKind::Assign => B::Assign,
            TokenKind::Equals => B::Equals,
            TokenKind::Less => B::Less,
            TokenKind::LessOrEqual => B::LessOrEqual,
            TokenKind::Greater => B::Greater,
            TokenKind::GreaterOrEqual => B::GreaterOrEqual,
            kind => {
                return Err(InvalidConversion {
                    kind,
                    into: "binary operator",
                })
            }
        };
        Ok(op)
    }
}

#[derive(Debug, PartialEq)]
pub struct Ident {
    pub name: Box<str>,
    pub span: Span,
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_type_conversion() {
        assert_eq!(
            VariableType::try_from(TokenKind::DoubleType),
            Ok(VariableType::Double)
        );
        assert_eq!(
            VariableType::try_from(TokenKind::Add),
            Err(InvalidConversion {
                kind: TokenKind::Add,
                into: "variable type",
            })
        );
    }

    #[test]
    fn test_binary_operator_conversion() {
        assert_eq!(
            BinaryOperator::try_from(TokenKind::GreaterOrEqual),
            Ok(BinaryOperator::GreaterOrEqual)
        );
        let err = BinaryOperator::try_from(TokenKind::Semicolon).unwrap_err();
        assert_eq!(err.to_string(), "token Semicolon is not a valid binary operator");
    }
}
