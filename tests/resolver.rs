#[cfg(test)]
mod resolver_tests {
    use lox_frontend as lox;

    use lox::parser::Parser;
    use lox::resolver::Resolver;
    use lox::scanner::scan_tokens;
    use serde_json::Value;

    type Found = Vec<(String, Option<(usize, usize)>)>;

    /// Scan, parse and resolve `source`, then pull every recorded resolution
    /// back out of the JSON form of the AST.
    fn resolve(source: &str) -> (Found, Vec<String>) {
        let (tokens, lex_errors) = scan_tokens(source);
        assert!(lex_errors.is_empty(), "lexing failed: {:?}", lex_errors);

        let output = Parser::new(&tokens).parse();
        assert!(!output.had_error(), "parsing failed: {:?}", output.errors);

        let errors: Vec<String> = Resolver::new()
            .resolve(&output.statements)
            .iter()
            .map(|e| e.to_string())
            .collect();

        let json = serde_json::to_value(&output.statements).expect("AST serializes");
        let mut found: Found = Vec::new();
        collect(&json, &mut found);

        (found, errors)
    }

    fn collect(value: &Value, found: &mut Found) {
        match value {
            Value::Object(map) => {
                if let Some(resolution) = map.get("resolution") {
                    let name = map
                        .get("name")
                        .or_else(|| map.get("keyword"))
                        .and_then(|token| token["lexeme"].as_str())
                        .unwrap_or_default()
                        .to_string();

                    let at = resolution.as_object().map(|r| {
                        (
                            r["depth"].as_u64().expect("depth") as usize,
                            r["index"].as_u64().expect("index") as usize,
                        )
                    });

                    found.push((name, at));
                }

                for child in map.values() {
                    collect(child, found);
                }
            }
            Value::Array(items) => {
                for item in items {
                    collect(item, found);
                }
            }
            _ => {}
        }
    }

    /// All resolutions recorded for `name`, sorted.
    fn slots(found: &Found, name: &str) -> Vec<Option<(usize, usize)>> {
        let mut slots: Vec<_> = found
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, at)| *at)
            .collect();
        slots.sort();
        slots
    }

    fn errors_of(source: &str) -> Vec<String> {
        resolve(source).1
    }

    // ── resolution ──────────────────────────────────────────────────────

    #[test]
    fn globals_stay_unresolved() {
        let (found, errors) = resolve("var a = 1; print a; a = 2;");

        assert!(errors.is_empty());
        assert_eq!(slots(&found, "a"), vec![None, None]);
    }

    #[test]
    fn block_locals_get_sequential_slots() {
        let (found, errors) = resolve("{ var a = 1; var b = 2; print a + b; }");

        assert!(errors.is_empty());
        assert_eq!(slots(&found, "a"), vec![Some((0, 0))]);
        assert_eq!(slots(&found, "b"), vec![Some((0, 1))]);
    }

    #[test]
    fn depth_counts_enclosing_blocks() {
        let (found, _) = resolve("{ var a = 1; { var b = a; print b; } }");

        assert_eq!(slots(&found, "a"), vec![Some((1, 0))]);
        assert_eq!(slots(&found, "b"), vec![Some((0, 0))]);
    }

    #[test]
    fn parameters_come_before_body_locals() {
        let (found, errors) =
            resolve("fun outer(x) { var y = x; fun inner() { return x + y; } }");

        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(slots(&found, "x"), vec![Some((0, 0)), Some((1, 0))]);
        assert_eq!(slots(&found, "y"), vec![Some((1, 1))]);
    }

    #[test]
    fn function_can_refer_to_itself() {
        let (found, _) = resolve("{ fun f() { f(); } }");

        assert_eq!(slots(&found, "f"), vec![Some((1, 0))]);
    }

    #[test]
    fn assignment_is_resolved() {
        let (found, _) = resolve("{ var a; a = 2; }");

        assert_eq!(slots(&found, "a"), vec![Some((0, 0))]);
    }

    #[test]
    fn desugared_for_shares_one_scope() {
        let (found, _) = resolve("for (var i = 0; i < 3; i = i + 1) print i;");

        assert_eq!(slots(&found, "i"), vec![Some((0, 0)); 4]);
    }

    #[test]
    fn this_and_super_live_in_their_own_scopes() {
        let (found, errors) = resolve(
            "class A { m() {} }\nclass B < A { m() { return this.x + super.m(); } }",
        );

        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(slots(&found, "this"), vec![Some((1, 0))]);
        assert_eq!(slots(&found, "super"), vec![Some((2, 0))]);
        assert_eq!(slots(&found, "A"), vec![None]);
    }

    // ── semantic errors ─────────────────────────────────────────────────

    #[test]
    fn redeclaration_in_local_scope() {
        assert_eq!(
            errors_of("{ var a = 1; var a = 2; }"),
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
        assert!(errors_of("var a = 1; var a = 2;").is_empty());
    }

    #[test]
    fn read_in_own_initializer() {
        assert_eq!(
            errors_of("var a = 1;\n{ var a = a; }"),
            vec!["[line 2] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn return_outside_function() {
        assert_eq!(
            errors_of("return 1;"),
            vec!["[line 1] Error at 'return': Can't return from top-level code."]
        );
        assert!(errors_of("fun f() { return 1; }").is_empty());
    }

    #[test]
    fn return_value_from_initializer() {
        assert_eq!(
            errors_of("class A { init() { return 1; } }"),
            vec!["[line 1] Error at 'return': Can't return a value from an initializer."]
        );
        assert!(errors_of("class A { init() { return; } }").is_empty());
    }

    #[test]
    fn this_outside_class() {
        assert_eq!(
            errors_of("print this;"),
            vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
        );
        assert!(errors_of("fun f() { print this; }").len() == 1);
    }

    #[test]
    fn super_misuse() {
        assert_eq!(
            errors_of("super.x;"),
            vec!["[line 1] Error at 'super': Can't use 'super' outside of a class."]
        );
        assert_eq!(
            errors_of("class A { m() { super.m(); } }"),
            vec!["[line 1] Error at 'super': Can't use 'super' in a class with no superclass."]
        );
    }

    #[test]
    fn class_inheriting_from_itself() {
        assert_eq!(
            errors_of("class A < A {}"),
            vec!["[line 1] Error at 'A': A class can't inherit from itself."]
        );
    }

    #[test]
    fn every_error_is_collected() {
        let errors = errors_of("return;\nprint this;\n{ var b; var b; }");

        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("[line 1]"));
        assert!(errors[1].starts_with("[line 2]"));
        assert!(errors[2].starts_with("[line 3]"));
    }
}
