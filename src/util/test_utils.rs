use crate::{
    codegen::{self, Options},
    lexer, parser,
    util::fmt::tree,
};

/// Each variant contains the input.
pub enum Test {
    ParserProgram(&'static str),
    ParserExpr(&'static str),
    CodegenProgram(&'static str),
}

pub enum Assertion {
    TreeOk(&'static str),
    ExpectedError(&'static str),
}

/// Runs the input through the pipeline, returning either the formatted
/// output or the formatted error.
#[track_caller]
pub fn run_pipeline(test: Test) -> Result<String, String> {
    let format_error = |e: crate::token::Spanned<parser::Error>| format!("{e:#}");

    match test {
        Test::ParserProgram(input) => {
            let mut tokens = lexer::lex_in_new(input);
            let program = parser::parse_program(&mut tokens).map_err(format_error)?;
            Ok(tree::print_program_string(&program))
        }
        Test::ParserExpr(input) => {
            let mut tokens = lexer::lex_in_new(input);
            let expr = parser::parse_expr(&mut tokens).map_err(format_error)?;
            Ok(tree::print_expr_string(&expr))
        }
        Test::CodegenProgram(input) => {
            let mut tokens = lexer::lex_in_new(input);
            let program = parser::parse_program(&mut tokens).map_err(format_error)?;
            Ok(codegen::generate(&program, &Options::default()))
        }
    }
}

#[track_caller]
pub fn run_assertion(assertion: Assertion, actual: &Result<String, String>) {
    match assertion {
        Assertion::TreeOk(expected_tree) => {
            let actual = actual.as_deref().map(str::trim);
            ::pretty_assertions::assert_eq!(actual, Ok(expected_tree.trim()));
        }
        Assertion::ExpectedError(expected_error) => {
            let actual = actual.as_ref().map(|_| "<no error>").map_err(String::as_str);
            ::pretty_assertions::assert_eq!(actual, Err(expected_error));
        }
    }
}

macro_rules! tree_tests {
    (
        use $test_kind:ident;

        $(
            fn $test_name:ident() {
                let $source_kind:ident = $source:expr;
                $($assertions_tt:tt)*
            }
        )*
    ) => {
        $(
            #[test]
            fn $test_name() {
                let test: crate::util::test_utils::Test =
                    tree_tests!(@@get_test($test_kind, $source_kind), $source);
                let actual = crate::util::test_utils::run_pipeline(test);
                tree_tests!(@@expand_assertions, &actual, [$($assertions_tt)*]);
            }
        )*
    };

    (@@expand_assertions, $actual:expr, []) => {};
    (@@expand_assertions, $actual:expr, [
        let $assertion:ident = $assertion_expected:expr;
        $($rest_assertions_tt:tt)*
    ]) => {
        crate::util::test_utils::run_assertion(
            tree_tests!(@@assertion, $assertion, $assertion_expected),
            $actual,
        );
        tree_tests!(@@expand_assertions, $actual, [$($rest_assertions_tt)*]);
    };

    (@@assertion, tree_ok, $expected:expr) => {
        crate::util::test_utils::Assertion::TreeOk(::indoc::indoc! { $expected })
    };
    (@@assertion, expected_error, $expected:expr) => {
        crate::util::test_utils::Assertion::ExpectedError($expected)
    };

    (@@get_test(parser, program), $source:expr) => {
        crate::util::test_utils::Test::ParserProgram($source)
    };
    (@@get_test(parser, expr), $source:expr) => {
        crate::util::test_utils::Test::ParserExpr($source)
    };
    (@@get_test(codegen, program), $source:expr) => {
        crate::util::test_utils::Test::CodegenProgram($source)
    };
}
pub(crate) use tree_tests;
