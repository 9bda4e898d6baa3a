#[cfg(test)]
mod parser_tests {
    use lox_frontend as lox;

    use lox::ast_printer::AstPrinter;
    use lox::expr::Expr;
    use lox::parser::{Parser, MAX_ARGUMENTS, MAX_NESTING};
    use lox::scanner::scan_tokens;
    use lox::stmt::Stmt;

    /// Parse `source` as a single expression and print it in prefix form.
    fn print_expr(source: &str) -> String {
        let (tokens, lex_errors) = scan_tokens(source);
        assert!(lex_errors.is_empty(), "lexing failed: {:?}", lex_errors);

        match Parser::new(&tokens).parse_expression() {
            Ok(expr) => AstPrinter::print(&expr),
            Err(e) => panic!("failed to parse {:?}: {}", source, e),
        }
    }

    /// Parse a whole program; return printed statements and error lines.
    fn parse_program(source: &str) -> (Vec<String>, Vec<String>) {
        let (tokens, lex_errors) = scan_tokens(source);
        assert!(lex_errors.is_empty(), "lexing failed: {:?}", lex_errors);

        let output = Parser::new(&tokens).parse();

        (
            output.statements.iter().map(AstPrinter::print_stmt).collect(),
            output.errors.iter().map(|e| e.to_string()).collect(),
        )
    }

    // ── precedence & associativity ──────────────────────────────────────

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let (tokens, _) = scan_tokens("1 + 2 * 3");
        let expr = Parser::new(&tokens).parse_expression().expect("parses");

        let Expr::Binary(add) = &expr else {
            panic!("expected binary, got {:?}", expr);
        };
        assert_eq!(add.operator.lexeme, "+");
        assert!(matches!(&*add.left, Expr::Literal(_)));
        assert!(matches!(&*add.right, Expr::Binary(mul) if mul.operator.lexeme == "*"));

        assert_eq!(AstPrinter::print(&expr), "(+ 1.0 (* 2.0 3.0))");
    }

    #[test]
    fn assignment_is_right_associative() {
        let (tokens, _) = scan_tokens("a = b = 3");
        let expr = Parser::new(&tokens).parse_expression().expect("parses");

        let Expr::Assign(outer) = &expr else {
            panic!("expected assign, got {:?}", expr);
        };
        assert_eq!(outer.name.lexeme, "a");
        assert!(outer.resolution.get().is_none());

        let Expr::Assign(inner) = &*outer.value else {
            panic!("expected nested assign, got {:?}", outer.value);
        };
        assert_eq!(inner.name.lexeme, "b");
        assert!(matches!(&*inner.value, Expr::Literal(_)));
    }

    #[test]
    fn ternary_is_right_associative() {
        assert_eq!(
            print_expr("a ? 1 : b ? 2 : 3"),
            "(?: a 1.0 (?: b 2.0 3.0))"
        );
    }

    #[test]
    fn ternary_sits_between_logic_and_equality() {
        assert_eq!(print_expr("a and b ? 1 : 2"), "(and a (?: b 1.0 2.0))");
        assert_eq!(print_expr("a == b ? 1 : 2"), "(?: (== a b) 1.0 2.0)");
    }

    #[test]
    fn comma_is_left_associative() {
        let (tokens, _) = scan_tokens("1, 2, 3");
        let expr = Parser::new(&tokens).parse_expression().expect("parses");

        let Expr::Binary(outer) = &expr else {
            panic!("expected binary, got {:?}", expr);
        };
        assert_eq!(outer.operator.lexeme, ",");
        assert!(matches!(&*outer.left, Expr::Binary(inner) if inner.operator.lexeme == ","));

        assert_eq!(AstPrinter::print(&expr), "(, (, 1.0 2.0) 3.0)");
    }

    #[test]
    fn power_is_right_associative_and_above_unary() {
        assert_eq!(print_expr("2 ** 3 ** 2"), "(** 2.0 (** 3.0 2.0))");
        assert_eq!(print_expr("-2 ** 2"), "(- (** 2.0 2.0))");
        assert_eq!(print_expr("2 ** -1"), "(** 2.0 (- 1.0))");
        assert_eq!(print_expr("2 * 3 ** 2"), "(* 2.0 (** 3.0 2.0))");
    }

    #[test]
    fn binary_levels() {
        assert_eq!(print_expr("1 < 2 == true"), "(== (< 1.0 2.0) true)");
        assert_eq!(print_expr("a or b and c"), "(or a (and b c))");
        assert_eq!(print_expr("!!x"), "(! (! x))");
        assert_eq!(print_expr("(1 + 2) / 3"), "(/ (group (+ 1.0 2.0)) 3.0)");
        assert_eq!(print_expr("\"s\" + nil"), "(+ s nil)");
    }

    #[test]
    fn calls_properties_and_set() {
        assert_eq!(print_expr("f(a, b)(c)"), "(call (call f a b) c)");
        assert_eq!(print_expr("a.b.c = 1"), "(= (. (. a b) c) 1.0)");
        assert_eq!(print_expr("this.x"), "(. this x)");
        assert_eq!(print_expr("super.init(1)"), "(call (super init) 1.0)");
    }

    #[test]
    fn call_arguments_do_not_use_the_comma_operator() {
        assert_eq!(print_expr("f(1, 2)"), "(call f 1.0 2.0)");
        assert_eq!(print_expr("f((1, 2))"), "(call f (group (, 1.0 2.0)))");
    }

    // ── errors & recovery ───────────────────────────────────────────────

    #[test]
    fn invalid_assignment_target_is_reported_once() {
        let (statements, errors) = parse_program("1 = 2;\nprint 3;");

        assert_eq!(
            errors,
            vec!["[line 1] Error at '=': Invalid assignment target.".to_string()]
        );
        assert_eq!(statements, vec!["(; 1.0)", "(print 3.0)"]);
    }

    #[test]
    fn grouping_is_not_an_assignment_target() {
        let (_, errors) = parse_program("(a) = 1;");

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Invalid assignment target."));
    }

    #[test]
    fn recovery_keeps_following_statement() {
        let (statements, errors) = parse_program("var ;  print 1;");

        assert_eq!(
            errors,
            vec!["[line 1] Error at ';': Expected variable name.".to_string()]
        );
        assert_eq!(statements, vec!["(print 1.0)"]);
    }

    #[test]
    fn one_error_per_broken_statement() {
        let (statements, errors) = parse_program("print ;\nvar x = 1;\nprint (;\nprint 2;");

        assert_eq!(
            errors,
            vec![
                "[line 1] Error at ';': Expected expression.".to_string(),
                "[line 3] Error at ';': Expected expression.".to_string(),
            ]
        );
        assert_eq!(statements, vec!["(var x 1.0)", "(print 2.0)"]);
    }

    #[test]
    fn synchronize_stops_before_statement_keyword() {
        let (statements, errors) = parse_program("1 + + print 2;");

        assert_eq!(errors.len(), 1);
        assert_eq!(statements, vec!["(print 2.0)"]);
    }

    #[test]
    fn errors_inside_blocks_are_recovered_locally() {
        let (statements, errors) = parse_program("{ print ; print 1; }");

        assert_eq!(errors.len(), 1);
        assert_eq!(statements, vec!["(block (print 1.0))"]);
    }

    #[test]
    fn error_at_end_of_input() {
        let (statements, errors) = parse_program("print 1");

        assert!(statements.is_empty());
        assert_eq!(
            errors,
            vec!["[line 1] Error at end: Expected ';' after value.".to_string()]
        );
    }

    #[test]
    fn error_reports_source_line() {
        let (_, errors) = parse_program("print 1;\n\nprint ;");

        assert_eq!(
            errors,
            vec!["[line 3] Error at ';': Expected expression.".to_string()]
        );
    }

    #[test]
    fn nine_arguments_reported_but_all_kept() {
        let (tokens, _) = scan_tokens("f(1, 2, 3, 4, 5, 6, 7, 8, 9);");
        let output = Parser::new(&tokens).parse();

        assert!(output.had_error());
        assert_eq!(output.errors.len(), 1);
        assert!(output.errors[0]
            .to_string()
            .contains("Can't have more than 8 arguments."));

        let [Stmt::Expression(stmt)] = output.statements.as_slice() else {
            panic!("expected one expression statement");
        };
        let Expr::Call(call) = &stmt.expression else {
            panic!("expected call, got {:?}", stmt.expression);
        };
        assert_eq!(call.arguments.len(), 9);
    }

    #[test]
    fn eight_arguments_are_fine() {
        let args: Vec<String> = (1..=MAX_ARGUMENTS).map(|n| n.to_string()).collect();
        let (_, errors) = parse_program(&format!("f({});", args.join(", ")));

        assert!(errors.is_empty());
    }

    #[test]
    fn too_many_parameters() {
        let (statements, errors) = parse_program("fun f(a, b, c, d, e, f, g, h, i) {}");

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Can't have more than 8 parameters."));
        assert_eq!(statements, vec!["(fun f (a b c d e f g h i))"]);
    }

    #[test]
    fn empty_token_stream() {
        let output = Parser::new(&[]).parse();

        assert!(output.statements.is_empty());
        assert!(!output.had_error());
    }

    // ── declarations & statements ───────────────────────────────────────

    #[test]
    fn declarations() {
        let (statements, errors) = parse_program(
            "var a;\nvar b = 1;\nfun add(x, y) { return x + y; }\nfun noop() { return; }",
        );

        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(
            statements,
            vec![
                "(var a)",
                "(var b 1.0)",
                "(fun add (x y) (return (+ x y)))",
                "(fun noop () (return))",
            ]
        );
    }

    #[test]
    fn class_with_superclass_and_methods() {
        let (statements, errors) = parse_program(
            "class B < A { init(x) { this.x = x; } get() { return super.get(); } }",
        );

        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(
            statements,
            vec![
                "(class B < A (method init (x) (; (= (. this x) x))) \
                 (method get () (return (call (super get)))))"
            ]
        );
    }

    #[test]
    fn control_flow() {
        let (statements, errors) = parse_program(
            "if (a) print 1; else print 2;\nwhile (x < 3) { x = x + 1; }",
        );

        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(
            statements,
            vec![
                "(if a (print 1.0) (print 2.0))",
                "(while (< x 3.0) (block (; (= x (+ x 1.0)))))",
            ]
        );
    }

    #[test]
    fn for_desugars_to_while() {
        let (statements, errors) =
            parse_program("for (var i = 0; i < 3; i = i + 1) print i;\nfor (;;) break;");

        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(
            statements,
            vec![
                "(block (var i 0.0) (while (< i 3.0) (print i) (= i (+ i 1.0))))",
                "(while true (break))",
            ]
        );
    }

    #[test]
    fn break_and_continue_need_a_loop() {
        let (statements, errors) = parse_program("break;\nwhile (true) { continue; }");

        assert_eq!(
            errors,
            vec!["[line 1] Error at 'break': Must be inside a loop to use 'break'.".to_string()]
        );
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn function_body_does_not_inherit_loop() {
        let (_, errors) = parse_program("while (true) { fun f() { continue; } break; }");

        assert_eq!(
            errors,
            vec![
                "[line 1] Error at 'continue': Must be inside a loop to use 'continue'."
                    .to_string()
            ]
        );
    }

    #[test]
    fn loop_depth_restored_after_failed_body() {
        let (_, errors) = parse_program("while (true) print ;\nbreak;");

        assert_eq!(errors.len(), 2);
        assert!(errors[1].contains("Must be inside a loop to use 'break'."));
    }

    #[test]
    fn ternary_without_colon() {
        let (statements, errors) = parse_program("a ? 1;\nprint 2;");

        assert_eq!(
            errors,
            vec!["[line 1] Error at ';': Expected ':' in ternary operator.".to_string()]
        );
        assert_eq!(statements, vec!["(print 2.0)"]);
    }

    #[test]
    fn literal_payloads_distinguish_nodes() {
        let (one, _) = scan_tokens("1");
        let (two, _) = scan_tokens("2");

        let one = Parser::new(&one).parse_expression().expect("parses");
        let two = Parser::new(&two).parse_expression().expect("parses");

        assert_ne!(one, two);
    }

    // ── nesting limit ───────────────────────────────────────────────────

    /// Run `source` through the parser on a thread with a generous stack, so
    /// the result does not depend on the test harness's default stack size.
    fn parse_on_big_stack(source: String) -> (Vec<String>, Vec<String>) {
        std::thread::Builder::new()
            .stack_size(64 * 1024 * 1024)
            .spawn(move || parse_program(&source))
            .expect("spawn parser thread")
            .join()
            .expect("parser thread finished")
    }

    #[test]
    fn deep_parentheses_are_rejected_without_crashing() {
        let depth = 5_000;
        let source = format!("{}1{};\nprint 2;", "(".repeat(depth), ")".repeat(depth));

        let (statements, errors) = parse_on_big_stack(source);

        assert_eq!(
            errors,
            vec!["[line 1] Error at '(': Too much nesting.".to_string()]
        );
        assert_eq!(statements, vec!["(print 2.0)"]);
    }

    #[test]
    fn deep_unary_chain_is_rejected() {
        let source = format!("print {}1;", "-".repeat(MAX_NESTING * 2));

        let (statements, errors) = parse_on_big_stack(source);

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Too much nesting."));
        assert!(statements.is_empty());
    }

    #[test]
    fn moderate_nesting_still_parses() {
        let depth = 50;
        let source = format!("{}1{};", "(".repeat(depth), ")".repeat(depth));

        let (statements, errors) = parse_on_big_stack(source);

        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(statements.len(), 1);
        assert!(statements[0].starts_with("(; (group (group"));
    }
}
