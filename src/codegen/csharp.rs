use std::{
    fmt::{self, Write},
    format_args as f,
};

use crate::{
    ast::{
        BinaryOperator, Block, Expr, ExprKind, IfElse, LoopTest, Program, Stmt,
        VariableDeclaration, VariableReference, VariableType,
    },
    codegen::Options,
};

const DEFAULT_CODE_CAPACITY: usize = 4 * 1024; // 4 KiB

pub struct Generator<'o> {
    code: String,
    options: &'o Options,
    level: usize,
    /// Number of enclosing counted loops.
    loop_depth: usize,
    /// Whether `Main` returns an exit code.
    int_main: bool,
}

impl<'o> Generator<'o> {
    pub fn new(options: &'o Options) -> Generator<'o> {
        Generator {
            code: String::with_capacity(DEFAULT_CODE_CAPACITY),
            options,
            level: 0,
            loop_depth: 0,
            int_main: false,
        }
    }

    pub fn generate(mut self, program: &Program) -> String {
        self.int_main = has_valued_return(&program.statements);
        self.gen_program(program);
        self.code
    }

    fn gen_program(&mut self, program: &Program) {
        let options = self.options;
        let Options {
            namespace,
            class_name,
            ..
        } = options;
        let main_ty = if self.int_main { "int" } else { "void" };

        self.line(f!("using System;"));
        self.blank_line();
        self.line(f!("namespace {namespace};"));
        self.blank_line();
        self.line(f!("public class {class_name}"));
        self.line(f!("{{"));
        self.indented(|this| {
            this.line(f!("public static {main_ty} Main()"));
            this.line(f!("{{"));
            this.indented(|this| {
                for stmt in &program.statements {
                    this.gen_stmt(stmt);
                }
                let ends_with_return = matches!(program.statements.last(), Some(Stmt::Return(_)));
                if this.int_main && !ends_with_return {
                    this.line(f!("return 0;"));
                }
            });
            this.line(f!("}}"));
        });
        self.line(f!("}}"));
    }

    fn gen_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VariableDeclaration(VariableDeclaration {
                ty,
                name,
                initializer,
            }) => {
                let ty = type_name(*ty);
                match initializer {
                    Some(value) => self.line(f!("{ty} {name} = {};", CSharp(value))),
                    None => self.line(f!("{ty} {name};")),
                }
            }
            Stmt::Assignment(expr) => self.line(f!("{};", CSharp(expr))),
            Stmt::Write(expr) => self.line(f!("Console.WriteLine({});", CSharp(expr))),
            Stmt::Read(VariableReference { name, ty }) => match ty {
                VariableType::Integer => {
                    self.line(f!("{name} = int.Parse(Console.ReadLine()!);"));
                }
                VariableType::Double => self.line(f!(
                    "{name} = double.Parse(Console.ReadLine()!, \
                    System.Globalization.CultureInfo.InvariantCulture);"
                )),
                VariableType::String => {
                    self.line(f!("{name} = Console.ReadLine() ?? string.Empty;"));
                }
            },
            Stmt::Return(Some(value)) => self.line(f!("return {};", CSharp(value))),
            Stmt::Return(None) if self.int_main => self.line(f!("return 0;")),
            Stmt::Return(None) => self.line(f!("return;")),
            Stmt::IfElse(if_else) => self.gen_if_else(if_else),
            Stmt::CountedLoop { count, body } => {
                self.loop_depth += 1;
                let i = format!("_i{}", self.loop_depth);
                self.line(f!("for (int {i} = 0; {i} < {}; {i}++)", CSharp(count)));
                self.gen_block(body);
                self.loop_depth -= 1;
            }
            Stmt::WhileLoop {
                condition,
                body,
                test: LoopTest::Pre,
            } => {
                self.line(f!("while ({})", CSharp(condition)));
                self.gen_block(body);
            }
            Stmt::WhileLoop {
                condition,
                body,
                test: LoopTest::Post,
            } => {
                self.line(f!("do"));
                self.gen_block(body);
                self.line(f!("while ({});", CSharp(condition)));
            }
        }
    }

    fn gen_if_else(&mut self, if_else: &IfElse) {
        let IfElse {
            condition,
            then_block,
            else_ifs,
            else_block,
        } = if_else;

        self.line(f!("if ({})", CSharp(condition)));
        self.gen_block(then_block);
        for (condition, block) in else_ifs {
            self.line(f!("else if ({})", CSharp(condition)));
            self.gen_block(block);
        }
        if let Some(else_block) = else_block.as_ref().filter(|b| !b.is_empty()) {
            self.line(f!("else"));
            self.gen_block(else_block);
        }
    }

    fn gen_block(&mut self, block: &Block) {
        self.line(f!("{{"));
        self.indented(|this| {
            for stmt in block {
                this.gen_stmt(stmt);
            }
        });
        self.line(f!("}}"));
    }
}

// Utility functions.
impl Generator<'_> {
    /// Emits a single line at the current indentation level.
    fn line(&mut self, f: fmt::Arguments<'_>) {
        for _ in 0..self.level {
            self.code.push_str(&self.options.indent);
        }
        self.code
            .write_fmt(f)
            .expect("code emit should be infallible");
        self.code.push('\n');
    }

    fn blank_line(&mut self) {
        self.code.push('\n');
    }

    fn indented<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.level += 1;
        let res = f(self);
        self.level -= 1;
        res
    }
}

/// Whether `вернуть` is ever given a value, at any depth.
fn has_valued_return(block: &Block) -> bool {
    block.iter().any(|stmt| match stmt {
        Stmt::Return(value) => value.is_some(),
        Stmt::IfElse(IfElse {
            then_block,
            else_ifs,
            else_block,
            ..
        }) => {
            has_valued_return(then_block)
                || else_ifs.iter().any(|(_, block)| has_valued_return(block))
                || else_block.as_ref().is_some_and(has_valued_return)
        }
        Stmt::CountedLoop { body, .. } | Stmt::WhileLoop { body, .. } => has_valued_return(body),
        Stmt::VariableDeclaration(_) | Stmt::Assignment(_) | Stmt::Write(_) | Stmt::Read(_) => {
            false
        }
    })
}

fn type_name(ty: VariableType) -> &'static str {
    match ty {
        VariableType::Integer => "int",
        VariableType::Double => "double",
        VariableType::String => "string",
    }
}

fn operator(op: BinaryOperator) -> &'static str {
    match op {
        BinaryOperator::Add => "+",
        BinaryOperator::Subtract => "-",
        BinaryOperator::Multiply => "*",
        BinaryOperator::Divide => "/",
        BinaryOperator::Assign => "=",
        BinaryOperator::Equals => "==",
        BinaryOperator::Less => "<",
        BinaryOperator::LessOrEqual => "<=",
        BinaryOperator::Greater => ">",
        BinaryOperator::GreaterOrEqual => ">=",
    }
}

/// Renders an expression as C#.
struct CSharp<'e>(&'e Expr);

/// Renders an operand of another operator. An assignment there must keep its
/// parentheses, which the tree doesn't record.
struct Operand<'e>(&'e Expr);

impl fmt::Display for CSharp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            // Right-associative, so a chained assignment needs no parentheses.
            ExprKind::Binary {
                op: BinaryOperator::Assign,
                lhs,
                rhs,
            } => write!(f, "{} = {}", CSharp(lhs), CSharp(rhs)),
            ExprKind::Binary { op, lhs, rhs } => {
                write!(f, "({} {} {})", Operand(lhs), operator(*op), Operand(rhs))
            }
            ExprKind::Variable(ident) => write!(f, "{ident}"),
            ExprKind::Integer(value) => write!(f, "{value}"),
            // Debug keeps the decimal point and ignores locale.
            ExprKind::Double(value) => write!(f, "{value:?}"),
            ExprKind::String(value) => write!(f, "\"{value}\""),
        }
    }
}

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            ExprKind::Binary {
                op: BinaryOperator::Assign,
                ..
            } => write!(f, "({})", CSharp(self.0)),
            _ => write!(f, "{}", CSharp(self.0)),
        }
    }
}
