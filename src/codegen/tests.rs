use indoc::indoc;
use pretty_assertions::assert_eq;

use crate::{
    codegen::{generate, Options},
    lexer::lex_in_new,
    parser::parse_program,
    util::test_utils::tree_tests,
};

tree_tests!(
    use codegen;

    fn test_empty_program() {
        let program = "начало конец";
        let tree_ok = "
            using System;

            namespace GeneratedProgram;

            public class Program
            {
                public static void Main()
                {
                }
            }
        ";
    }

    fn test_declaration_with_arithmetic() {
        let program = "начало цел X = 1 + 1; конец";
        let tree_ok = "
            using System;

            namespace GeneratedProgram;

            public class Program
            {
                public static void Main()
                {
                    int X = (1 + 1);
                }
            }
        ";
    }

    fn test_declarations_and_literals() {
        let program = r#"
            начало
                плав d = 2.0 * 10.50;
                строка s = "Привет, мир!";
                плав n;
                n = d = 3;
                написать s;
            конец
        "#;
        let tree_ok = r#"
            using System;

            namespace GeneratedProgram;

            public class Program
            {
                public static void Main()
                {
                    double d = (2.0 * 10.5);
                    string s = "Привет, мир!";
                    double n;
                    n = d = 3;
                    Console.WriteLine(s);
                }
            }
        "#;
    }

    fn test_reads_follow_declared_type() {
        let program = "
            начало
                цел a; плав b; строка c;
                прочитать a; прочитать b; прочитать c;
            конец
        ";
        let tree_ok = "
            using System;

            namespace GeneratedProgram;

            public class Program
            {
                public static void Main()
                {
                    int a;
                    double b;
                    string c;
                    a = int.Parse(Console.ReadLine()!);
                    b = double.Parse(Console.ReadLine()!, System.Globalization.CultureInfo.InvariantCulture);
                    c = Console.ReadLine() ?? string.Empty;
                }
            }
        ";
    }

    fn test_counted_loop() {
        let program = r#"начало нц 5 раз написать "hi"; кц конец"#;
        let tree_ok = r#"
            using System;

            namespace GeneratedProgram;

            public class Program
            {
                public static void Main()
                {
                    for (int _i1 = 0; _i1 < 5; _i1++)
                    {
                        Console.WriteLine("hi");
                    }
                }
            }
        "#;
    }

    fn test_nested_counted_loops_use_distinct_counters() {
        let program = "
            начало
                цел n = 2;
                нц n раз
                    нц (n + 1) раз
                        написать n;
                    кц
                кц
                нц n * 2 раз
                кц
            конец
        ";
        let tree_ok = "
            using System;

            namespace GeneratedProgram;

            public class Program
            {
                public static void Main()
                {
                    int n = 2;
                    for (int _i1 = 0; _i1 < n; _i1++)
                    {
                        for (int _i2 = 0; _i2 < (n + 1); _i2++)
                        {
                            Console.WriteLine(n);
                        }
                    }
                    for (int _i1 = 0; _i1 < (n * 2); _i1++)
                    {
                    }
                }
            }
        ";
    }

    fn test_pre_and_post_test_loops() {
        let program = "
            начало
                цел i = 0;
                нц пока i < 3
                    i = i + 1;
                кц
                пока i > 0 нц
                    i = i - 1;
                кц
                нц
                    i = i + 2;
                пока i < 10 кц
            конец
        ";
        let tree_ok = "
            using System;

            namespace GeneratedProgram;

            public class Program
            {
                public static void Main()
                {
                    int i = 0;
                    while ((i < 3))
                    {
                        i = (i + 1);
                    }
                    while ((i > 0))
                    {
                        i = (i - 1);
                    }
                    do
                    {
                        i = (i + 2);
                    }
                    while ((i < 10));
                }
            }
        ";
    }

    fn test_if_else_chain() {
        let program = "
            начало
                цел a = 2;
                если a == 1 то
                    написать 1;
                иначе если a == 2 то
                    написать 2;
                иначе если a >= 3 то
                иначе
                    написать 0;
                кесли
                если a <= 0 то
                    написать a;
                иначе
                кесли
            конец
        ";
        let tree_ok = "
            using System;

            namespace GeneratedProgram;

            public class Program
            {
                public static void Main()
                {
                    int a = 2;
                    if ((a == 1))
                    {
                        Console.WriteLine(1);
                    }
                    else if ((a == 2))
                    {
                        Console.WriteLine(2);
                    }
                    else if ((a >= 3))
                    {
                    }
                    else
                    {
                        Console.WriteLine(0);
                    }
                    if ((a <= 0))
                    {
                        Console.WriteLine(a);
                    }
                }
            }
        ";
    }

    fn test_valued_return_makes_main_return_int() {
        let program = "
            начало
                цел x;
                прочитать x;
                если x > 0 то
                    вернуть x;
                кесли
                вернуть;
            конец
        ";
        let tree_ok = "
            using System;

            namespace GeneratedProgram;

            public class Program
            {
                public static int Main()
                {
                    int x;
                    x = int.Parse(Console.ReadLine()!);
                    if ((x > 0))
                    {
                        return x;
                    }
                    return 0;
                }
            }
        ";
    }

    fn test_int_main_gets_trailing_return() {
        let program = "начало нц 3 раз вернуть 1; кц конец";
        let tree_ok = "
            using System;

            namespace GeneratedProgram;

            public class Program
            {
                public static int Main()
                {
                    for (int _i1 = 0; _i1 < 3; _i1++)
                    {
                        return 1;
                    }
                    return 0;
                }
            }
        ";
    }

    fn test_bare_return_in_void_main() {
        let program = "начало вернуть; конец";
        let tree_ok = "
            using System;

            namespace GeneratedProgram;

            public class Program
            {
                public static void Main()
                {
                    return;
                }
            }
        ";
    }

    fn test_grouped_assignment_keeps_parentheses() {
        let program = "
            начало
                цел x;
                цел y = (x = 1) + 2;
                написать (x = 3) * 2;
                y = x = 4;
            конец
        ";
        let tree_ok = "
            using System;

            namespace GeneratedProgram;

            public class Program
            {
                public static void Main()
                {
                    int x;
                    int y = ((x = 1) + 2);
                    Console.WriteLine(((x = 3) * 2));
                    y = x = 4;
                }
            }
        ";
    }

    fn test_errors_are_propagated() {
        let program = "начало написать 1 конец";
        let expected_error = "32..42: expected token Semicolon, but got ProgramEnd";
    }
);

fn generate_from(src: &str, options: &Options) -> String {
    let mut tokens = lex_in_new(src);
    let program = parse_program(&mut tokens).unwrap();
    generate(&program, options)
}

#[test]
fn test_custom_options() {
    let options = Options {
        namespace: "Homework".into(),
        class_name: "Task1".into(),
        indent: "\t".into(),
    };
    let code = generate_from("начало написать 1; конец", &options);
    let expected = indoc! {"
        using System;

        namespace Homework;

        public class Task1
        {
        \tpublic static void Main()
        \t{
        \t\tConsole.WriteLine(1);
        \t}
        }
    "};
    assert_eq!(code, expected);
}

#[test]
fn test_generation_is_deterministic() {
    let src = include_str!("../../demos/example.alg");
    let options = Options::default();
    assert_eq!(generate_from(src, &options), generate_from(src, &options));
}
