use std::io::Write;

use crate::ast::*;

const INDENT_WIDTH: usize = 2;

pub fn print_program_string(program: &Program) -> String {
    let mut buf = Vec::with_capacity(1024);
    print_program(&mut buf, program).expect("writing to a vec is infallible");
    String::from_utf8(buf).expect("tree is written from valid utf-8")
}

pub fn print_expr_string(expr: &Expr) -> String {
    let mut buf = Vec::with_capacity(512);
    print_expr(&mut buf, 0, expr).expect("writing to a vec is infallible");
    String::from_utf8(buf).expect("tree is written from valid utf-8")
}

pub fn print_program(w: &mut impl Write, program: &Program) -> std::io::Result<()> {
    for stmt in &program.statements {
        print_stmt(w, 0, stmt)?;
    }
    Ok(())
}

fn print_block(w: &mut impl Write, i: usize, label: &str, block: &Block) -> std::io::Result<()> {
    sp(w, i)?;
    if block.is_empty() {
        return writeln!(w, "{label} (empty)");
    }
    writeln!(w, "{label}")?;
    for stmt in block {
        print_stmt(w, i + 1, stmt)?;
    }
    Ok(())
}

pub fn print_stmt(w: &mut impl Write, i: usize, stmt: &Stmt) -> std::io::Result<()> {
    sp(w, i)?;
    match stmt {
        Stmt::VariableDeclaration(VariableDeclaration {
            ty,
            name,
            initializer,
        }) => {
            write!(w, "declaration {name}: {ty:?}")?;
            if let Some(initializer) = initializer {
                writeln!(w, " (initialized)")?;
                print_expr(w, i + 1, initializer)?;
            } else {
                writeln!(w)?;
            }
        }
        Stmt::Assignment(expr) => {
            writeln!(w, "assignment")?;
            print_expr(w, i + 1, expr)?;
        }
        Stmt::Write(expr) => {
            writeln!(w, "write")?;
            print_expr(w, i + 1, expr)?;
        }
        Stmt::Read(VariableReference { name, ty }) => {
            writeln!(w, "read {name}: {ty:?} ({})", name.span)?;
        }
        Stmt::Return(value) => {
            writeln!(w, "return")?;
            if let Some(value) = value {
                print_expr(w, i + 1, value)?;
            }
        }
        Stmt::IfElse(IfElse {
            condition,
            then_block,
            else_ifs,
            else_block,
        }) => {
            writeln!(w, "if")?;
            print_expr(w, i + 1, condition)?;
            print_block(w, i + 1, "then", then_block)?;
            for (condition, block) in else_ifs {
                sp(w, i + 1)?;
                writeln!(w, "else if")?;
                print_expr(w, i + 2, condition)?;
                print_block(w, i + 2, "then", block)?;
            }
            if let Some(else_block) = else_block {
                print_block(w, i + 1, "else", else_block)?;
            }
        }
        Stmt::CountedLoop { count, body } => {
            writeln!(w, "counted loop")?;
            print_expr(w, i + 1, count)?;
            print_block(w, i + 1, "body", body)?;
        }
        Stmt::WhileLoop {
            condition,
            body,
            test,
        } => {
            writeln!(w, "while loop {test:?}")?;
            print_expr(w, i + 1, condition)?;
            print_block(w, i + 1, "body", body)?;
        }
    }
    Ok(())
}

pub fn print_expr(w: &mut impl Write, i: usize, expr: &Expr) -> std::io::Result<()> {
    sp(w, i)?;
    let span = expr.span;
    match &expr.kind {
        ExprKind::Binary { op, lhs, rhs } => {
            writeln!(w, "binary {op:?} ({span})")?;
            print_expr(w, i + 1, lhs)?;
            print_expr(w, i + 1, rhs)?;
        }
        ExprKind::Variable(ident) => {
            writeln!(w, "ident {ident} ({span})")?;
        }
        ExprKind::Integer(val) => {
            writeln!(w, "int {val} ({span})")?;
        }
        ExprKind::Double(val) => {
            writeln!(w, "double {val:?} ({span})")?;
        }
        ExprKind::String(val) => {
            writeln!(w, "string {val:?} ({span})")?;
        }
    }
    Ok(())
}

fn sp(w: &mut impl Write, i: usize) -> std::io::Result<()> {
    write!(w, "{:width$}", "", width = i * INDENT_WIDTH)
}
