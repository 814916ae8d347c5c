use indoc::indoc;
use pretty_assertions::assert_eq;
use pseudoc::{
    codegen::Options,
    parser,
    token::TokenKind,
    transpile,
    util::fmt::{error::render, tree::print_program_string},
    Error, Transpiler,
};

static EXAMPLE: &str = include_str!("../demos/example.alg");
static BIG: &str = include_str!("../demos/big.alg");

#[test]
fn test_example_program() {
    let expected = indoc! {r#"
        using System;

        namespace GeneratedProgram;

        public class Program
        {
            public static void Main()
            {
                int Num1 = 5;
                double DecVal = 10.5;
                string Message = "Привет, мир!";
                Console.WriteLine("Начальные значения:");
                Console.WriteLine(Num1);
                Console.WriteLine(DecVal);
                Console.WriteLine(Message);
                Num1 = (Num1 + (2 * 3));
                DecVal = ((DecVal / 2.0) - 1.5);
                Console.WriteLine("Новые значения:");
                Console.WriteLine(Num1);
                Console.WriteLine(DecVal);
                Message = Console.ReadLine() ?? string.Empty;
                Console.WriteLine("Вы ввели:");
                Console.WriteLine(Message);
                int Var;
                Var = int.Parse(Console.ReadLine()!);
                if ((Num1 == 11))
                {
                    Console.WriteLine("Num1 стало 11!");
                }
                else if ((Num1 <= Var))
                {
                    Console.WriteLine("Num1 меньше или равно Var");
                }
                else
                {
                    Console.WriteLine("Num1 больше Var");
                }
                for (int _i1 = 0; _i1 < 2; _i1++)
                {
                    Console.WriteLine("Повтор внутри цикла!");
                    int Counter = 1;
                    Counter = (Counter + 1);
                }
                int x = 10;
                while ((x == 10))
                {
                    Console.WriteLine("x равно 10");
                    x = 5;
                }
                int y = 0;
                do
                {
                    Console.WriteLine(y);
                    y = (y + 1);
                }
                while ((y < 3));
            }
        }
    "#};
    assert_eq!(transpile(EXAMPLE).unwrap(), expected);
}

#[test]
fn test_big_program() {
    let mut transpiler = Transpiler::new();
    let code = transpiler.transpile(BIG).unwrap();
    assert!(code.starts_with("using System;\n"));
    assert_eq!(code.matches("for (int _i1 = 0;").count(), 60);
    assert_eq!(code.matches("do\n").count(), 60);
    assert!(transpiler.tokens().tokens().last().unwrap().is_eoi());
}

#[test]
fn test_options_are_applied() {
    let options = Options {
        namespace: "Lab".into(),
        class_name: "Solution".into(),
        ..Options::default()
    };
    let code = Transpiler::with_options(options)
        .transpile("начало конец")
        .unwrap();
    assert!(code.contains("namespace Lab;\n"));
    assert!(code.contains("public class Solution\n"));
}

#[test]
fn test_tree_of_example() {
    let program = Transpiler::new().parse(EXAMPLE).unwrap();
    let tree = print_program_string(&program);
    assert!(tree.starts_with("declaration Num1: Integer (initialized)\n  int 5 ("));
    assert!(tree.contains("while loop Pre\n"));
    assert!(tree.contains("while loop Post\n"));
    assert!(tree.contains("read Var: Integer ("));
}

#[test]
fn test_error_rendering() {
    let src = "начало\n    если x то\n        написать 1;\nконец\n";
    let error = transpile(src).unwrap_err();
    assert!(matches!(
        &error,
        Error::Syntax(e) if e.inner == parser::Error::UnterminatedBlock {
            opener: TokenKind::If,
            expected: TokenKind::ControlEnd,
        }
    ));
    assert_eq!(
        render(&error, src),
        "2:5: syntax error: unterminated If block, expected ControlEnd"
    );
}

#[test]
fn test_nothing_is_generated_on_error() {
    for src in [
        "",
        "конец",
        "начало",
        "начало цел x = 2147483648; конец",
        "начало написать 1 < 2 < 3; конец",
        "начало нц 3 раз кесли конец",
    ] {
        let error = transpile(src).unwrap_err();
        assert!(!error.is_internal(), "{src:?}: {error}");
    }
}
