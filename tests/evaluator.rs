#[cfg(test)]
mod evaluator_tests {
    use std::io;
    use std::rc::Rc;

    use eelios::console::BufferedConsole;
    use eelios::datatype::DataType;
    use eelios::error::{EeliosError, RuntimeError};
    use eelios::evaluator::{parse_number, Evaluator};
    use eelios::token::Span;
    use eelios::value::Value;
    use pretty_assertions::assert_eq;

    fn run(source: &str, console: &Rc<BufferedConsole>) -> Result<Option<Value>, EeliosError> {
        eelios::run(source, Rc::clone(console) as Rc<dyn eelios::console::Console>)
    }

    fn value_of(source: &str) -> String {
        match run(source, &Rc::new(BufferedConsole::new())) {
            Ok(Some(value)) => value.to_string(),
            other => panic!("expected a value from {:?}, got {:?}", source, other),
        }
    }

    fn runtime_error(source: &str) -> RuntimeError {
        match run(source, &Rc::new(BufferedConsole::new())) {
            Err(EeliosError::Runtime(e)) => e,
            other => panic!("expected a runtime error from {:?}, got {:?}", source, other),
        }
    }

    fn assert_mismatch(error: RuntimeError, expected: Vec<DataType>, found: DataType) {
        match error {
            RuntimeError::ExpectedDataTypesButFound {
                expected: actual_expected,
                found: actual_found,
                ..
            } => {
                assert_eq!(actual_expected, expected);
                assert_eq!(actual_found, found);
            }
            other => panic!("expected a datatype mismatch, got {:?}", other),
        }
    }

    // ───────────────────────── scoping & calls ─────────────────────────

    #[test]
    fn test_while_body_shares_the_callers_scope() {
        assert_eq!(value_of("i <- 0 . while i < 3 do [ i <- i + 1 ] . eval i"), "3");
    }

    #[test]
    fn test_variables_created_in_branches_stay_visible() {
        assert_eq!(value_of("if true then [j <- 5] . eval j"), "5");
    }

    #[test]
    fn test_self_recursion_computes_factorial() {
        let source = "fact <- |n: Number| -> Number \
                      if n <= 1 then eval 1 else eval n * self(n - 1) . \
                      eval fact(5)";

        assert_eq!(value_of(source), "120");
    }

    #[test]
    fn test_closures_capture_bindings_at_creation() {
        assert_eq!(
            value_of("x <- 1 . c <- () => Number eval x . x <- 2 . eval c()"),
            "2"
        );

        match runtime_error("c <- () => Number eval y . y <- 5 . eval c()") {
            RuntimeError::UndefinedVariable { name, .. } => assert_eq!(name, "y"),
            other => panic!("expected UndefinedVariable, got {:?}", other),
        }

        assert_eq!(value_of("eval (() => Number eval 1)()"), "1");
    }

    #[test]
    fn test_closures_returned_from_functions_keep_the_call_scope() {
        let source = "make <- |x: Number| -> () => Number eval () => Number eval x . \
                      c <- make(1) . x <- 5 . eval c()";

        assert_eq!(value_of(source), "1");

        let source = "adder <- |n: Number| -> (Number) => Number eval (x: Number) => Number eval x + n . \
                      two <- adder(2) . ten <- adder(10) . eval two(1) + ten(1)";

        assert_eq!(value_of(source), "14");
    }

    #[test]
    fn test_functions_do_not_capture() {
        match runtime_error("x <- 1 . f <- || -> Number eval x . eval f()") {
            RuntimeError::UndefinedVariable { name, .. } => assert_eq!(name, "x"),
            other => panic!("expected UndefinedVariable, got {:?}", other),
        }
    }

    #[test]
    fn test_closure_parameters_shadow_captured_names() {
        let source = "x <- 1 . add <- (x: Number, y: Number) => Number eval x + y . eval add(10, 5) + x";

        assert_eq!(value_of(source), "16");
    }

    #[test]
    fn test_arity_is_checked_before_arguments_are_evaluated() {
        match runtime_error("f <- |a: Number| -> Number eval a . eval f(1, missing)") {
            RuntimeError::InvalidArguments { expected, .. } => assert_eq!(expected, 1),
            other => panic!("expected InvalidArguments, got {:?}", other),
        }
    }

    #[test]
    fn test_argument_and_return_types_are_checked() {
        assert_mismatch(
            runtime_error("f <- |a: Number| -> Number eval a . eval f(\"x\")"),
            vec![DataType::Number],
            DataType::String,
        );

        assert_mismatch(
            runtime_error("f <- || -> String eval 1 . eval f()"),
            vec![DataType::String],
            DataType::Number,
        );

        assert_mismatch(
            runtime_error("eval 5(1)"),
            vec![
                DataType::function(vec![], DataType::Any),
                DataType::closure(vec![], DataType::Any),
            ],
            DataType::Number,
        );
    }

    #[test]
    fn test_bodies_without_eval_are_rejected() {
        assert!(matches!(
            runtime_error("f <- || -> Number [print(1)] . eval f()"),
            RuntimeError::InvalidFunction { .. }
        ));
        assert!(matches!(
            runtime_error("c <- () => Number [print(1)] . eval c()"),
            RuntimeError::InvalidClosure { .. }
        ));
    }

    #[test]
    fn test_self_outside_a_call_is_rejected() {
        assert!(matches!(
            runtime_error("eval self"),
            RuntimeError::InvalidSelf { .. }
        ));
    }

    #[test]
    fn test_undefined_variables() {
        match runtime_error("eval missing") {
            RuntimeError::UndefinedVariable { name, span } => {
                assert_eq!(name, "missing");
                assert_eq!(span, Span::new(5, 12));
            }
            other => panic!("expected UndefinedVariable, got {:?}", other),
        }

        assert!(matches!(
            runtime_error("x <- 1 . eval missing"),
            RuntimeError::UndefinedVariable { .. }
        ));
    }

    // ───────────────────────── operators ─────────────────────────

    #[test]
    fn test_arithmetic_follows_ieee_semantics() {
        assert_eq!(value_of("eval 7 % 3 + 2 ^ 3 - 10 / 4"), "6.5");
        assert_eq!(value_of("eval -7 % 3"), "-1");
        assert_eq!(value_of("eval 1 / 0"), "inf");
        assert_eq!(value_of("eval \"ab\" + \"cd\""), "abcd");
    }

    #[test]
    fn test_operand_types_are_checked() {
        assert_mismatch(
            runtime_error("eval \"a\" + 1"),
            vec![DataType::String],
            DataType::Number,
        );
        assert_mismatch(
            runtime_error("eval true + 1"),
            vec![DataType::Number, DataType::String],
            DataType::Boolean,
        );
        assert_mismatch(
            runtime_error("eval -\"a\""),
            vec![DataType::Number],
            DataType::String,
        );
        assert_mismatch(
            runtime_error("eval 1 and true"),
            vec![DataType::Boolean],
            DataType::Number,
        );
    }

    #[test]
    fn test_unwritten_elements_are_reported_as_any() {
        let source = "y <- y . a <- [y, y] . a[0] <- 5 . eval a[1] + 1";

        assert_mismatch(runtime_error(source), vec![DataType::Number], DataType::Any);
        assert_mismatch(
            runtime_error("y <- y . a <- [y, y] . a[0] <- 5 . eval a[1] * 2"),
            vec![DataType::Number],
            DataType::Any,
        );
    }

    #[test]
    fn test_logical_operators_short_circuit() {
        let console = Rc::new(BufferedConsole::new());

        let value = run("eval false and exec [print(\"side\"), eval true]", &console)
            .unwrap()
            .unwrap();
        assert_eq!(value.to_string(), "false");
        assert!(console.output().is_empty());

        let value = run("eval true & exec [print(\"side\"), eval true]", &console)
            .unwrap()
            .unwrap();
        assert_eq!(value.to_string(), "true");
        assert_eq!(console.output(), vec!["side".to_string()]);

        assert_eq!(value_of("eval true or missing"), "true");
        assert_eq!(value_of("eval false | true"), "true");
        assert_eq!(value_of("eval true | false & false"), "false");
        assert_eq!(value_of("eval false & true or true"), "true");
    }

    #[test]
    fn test_equality_is_restricted_to_primitives() {
        assert_eq!(value_of("eval 1 = 1"), "true");
        assert_eq!(value_of("eval \"a\" != \"b\""), "true");
        assert_eq!(value_of("eval true = false"), "false");

        match runtime_error("eval [1] = [1]") {
            RuntimeError::CannotCompare { span } => assert_eq!(span, Span::new(5, 8)),
            other => panic!("expected CannotCompare, got {:?}", other),
        }

        assert_mismatch(
            runtime_error("eval 1 = \"1\""),
            vec![DataType::Number],
            DataType::String,
        );
    }

    // ───────────────────────── arrays & indexing ─────────────────────────

    #[test]
    fn test_arrays_must_be_homogeneous() {
        match runtime_error("eval [1, \"a\"]") {
            RuntimeError::ExpectedDataTypesButFound {
                expected,
                found,
                span,
            } => {
                assert_eq!(expected, vec![DataType::Number]);
                assert_eq!(found, DataType::String);
                assert_eq!(span, Span::new(9, 12));
            }
            other => panic!("expected a datatype mismatch, got {:?}", other),
        }

        assert_eq!(value_of("eval [[1], [2, 3]]"), "[[1], [2, 3]]");
        assert_eq!(value_of("eval []"), "[]");
    }

    #[test]
    fn test_indexing_is_bounds_checked() {
        assert_eq!(value_of("xs <- [1, 2, 3] . eval xs[2]"), "3");
        assert_eq!(value_of("eval \"héllo\"[1]"), "é");
        assert_eq!(value_of("eval len(\"héllo\") + len([1, 2])"), "7");

        match runtime_error("xs <- [1, 2, 3] . eval xs[3]") {
            RuntimeError::OutOfBounds { index, length, .. } => {
                assert_eq!(index, 3.0);
                assert_eq!(length, 3);
            }
            other => panic!("expected OutOfBounds, got {:?}", other),
        }

        assert!(matches!(
            runtime_error("xs <- [1, 2, 3] . eval xs[-1]"),
            RuntimeError::OutOfBounds { .. }
        ));
        assert!(matches!(
            runtime_error("xs <- [1, 2, 3] . eval xs[1.5]"),
            RuntimeError::InvalidIndex { .. }
        ));
        assert!(matches!(
            runtime_error("eval \"abc\"[3]"),
            RuntimeError::OutOfBounds { length: 3, .. }
        ));
        assert_mismatch(
            runtime_error("eval 5[0]"),
            vec![DataType::array(DataType::Any), DataType::String],
            DataType::Number,
        );
    }

    #[test]
    fn test_indexed_assignment_copies_on_write() {
        assert_eq!(
            value_of("xs <- [1, 2, 3] . xs[1] <- 20 . eval xs"),
            "[1, 20, 3]"
        );
        assert_eq!(
            value_of("xs <- [1, 2] . ys <- xs . xs[0] <- 9 . eval ys"),
            "[1, 2]"
        );
        assert_eq!(
            value_of("g <- [[1, 2], [3, 4]] . g[1][0] <- 30 . eval g"),
            "[[1, 2], [30, 4]]"
        );
    }

    #[test]
    fn test_assignment_keeps_the_declared_type() {
        assert_mismatch(
            runtime_error("x <- 1 . x <- \"a\""),
            vec![DataType::Number],
            DataType::String,
        );
        assert_mismatch(
            runtime_error("xs <- [1, 2] . xs[0] <- \"a\""),
            vec![DataType::Number],
            DataType::String,
        );
        assert_mismatch(
            runtime_error("x <- 1 . x[0] <- 2"),
            vec![DataType::array(DataType::Any)],
            DataType::Number,
        );
    }

    // ───────────────────────── instructions ─────────────────────────

    #[test]
    fn test_instructions_round_trip_through_variables() {
        assert_eq!(
            value_of("x <- 0 . inc <- [x <- x + 1, eval x] . y <- exec inc . eval x + y"),
            "2"
        );
        assert_eq!(
            value_of("step <- print(\"hi\") . eval toString(step)"),
            "<instruction>"
        );
    }

    #[test]
    fn test_eval_stops_every_enclosing_sequence() {
        let console = Rc::new(BufferedConsole::new());
        let source = "i <- 0 . \
                      while true do [i <- i + 1, if i = 3 then eval i] . \
                      print(\"unreachable\")";

        let value = run(source, &console).unwrap().unwrap();

        assert_eq!(value.to_string(), "3");
        assert!(console.output().is_empty());
    }

    #[test]
    fn test_program_without_eval_produces_nothing() {
        let console = Rc::new(BufferedConsole::new());

        let value = run("print(\"a\", 1, true, [1, 2]) . print(toString(2.5))", &console).unwrap();

        assert!(value.is_none());
        assert_eq!(
            console.output(),
            vec!["a1true[1, 2]".to_string(), "2.5".to_string()]
        );
    }

    #[test]
    fn test_exec_and_builtins_are_rejected_as_instructions() {
        assert!(matches!(
            runtime_error("exec [eval 1]"),
            RuntimeError::InvalidExec { .. }
        ));
        assert!(matches!(
            runtime_error("len(\"abc\")"),
            RuntimeError::InvalidLen { .. }
        ));
        assert!(matches!(
            runtime_error("[x <- 1, toNumber(\"1\")]"),
            RuntimeError::InvalidToNumber { .. }
        ));
        assert!(matches!(
            runtime_error("if true then input()"),
            RuntimeError::InvalidInput { .. }
        ));
    }

    #[test]
    fn test_values_are_not_instructions() {
        assert_mismatch(
            runtime_error("1 + 2"),
            vec![DataType::Instruction],
            DataType::Number,
        );
        assert_mismatch(
            runtime_error("xs <- [1, 2] . y <- exec xs"),
            vec![DataType::Instruction],
            DataType::array(DataType::Number),
        );
        assert!(matches!(
            runtime_error("v <- v . xs <- [v, 1] . y <- exec xs"),
            RuntimeError::InvalidInstruction { .. }
        ));
        assert!(matches!(
            runtime_error("x <- exec [print(1)]"),
            RuntimeError::InvalidInstruction { .. }
        ));
    }

    // ───────────────────────── built-ins & console ─────────────────────────

    #[test]
    fn test_input_reads_through_the_console() {
        let console = Rc::new(BufferedConsole::with_input(["41\n", "ignored"]));

        let value = run("n <- toNumber(input(\"n? \")) . eval n + 1", &console)
            .unwrap()
            .unwrap();

        assert_eq!(value.to_string(), "42");
        assert_eq!(console.prompts(), vec!["n? ".to_string()]);
    }

    #[test]
    fn test_input_at_end_of_stream_is_an_io_error() {
        match runtime_error("eval input()") {
            RuntimeError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }

    #[test]
    fn test_conversions() {
        assert_eq!(value_of("eval toNumber(\" 2.5 \")"), "2.5");
        assert_eq!(value_of("eval toBoolean(\"true\")"), "true");
        assert_eq!(value_of("eval isNumber(\"1e3\")"), "true");
        assert_eq!(value_of("eval isNumber(\"twelve\")"), "false");
        assert_eq!(value_of("eval isBoolean(\"false\")"), "true");
        assert_eq!(value_of("eval toString([1, 2]) + \"!\""), "[1, 2]!");

        match runtime_error("eval toNumber(\"abc\")") {
            RuntimeError::InvalidNumber { raw, span } => {
                assert_eq!(raw, "abc");
                assert_eq!(span, Span::new(14, 19));
            }
            other => panic!("expected InvalidNumber, got {:?}", other),
        }

        assert!(matches!(
            runtime_error("eval toBoolean(\"yes\")"),
            RuntimeError::InvalidBoolean { ref raw, .. } if raw == "yes"
        ));
        assert_mismatch(
            runtime_error("eval toNumber(1)"),
            vec![DataType::String],
            DataType::Number,
        );
    }

    #[test]
    fn test_number_parsing_rejects_non_finite_spellings() {
        assert_eq!(parse_number("  12 "), Some(12.0));
        assert_eq!(parse_number("-3.5e2"), Some(-350.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_evaluator_exposes_top_level_environment() {
        let program = eelios::parse("x <- 1 . y <- [x, 2]").unwrap();
        let mut evaluator = Evaluator::new(program, Rc::new(BufferedConsole::new()));

        assert!(evaluator.evaluate().unwrap().is_none());

        let environment = evaluator.environment().expect("variables were created");
        let y = environment.get_variable("y", Span::default()).unwrap().get();

        assert_eq!(y.to_string(), "[1, 2]");
        assert_eq!(y.datatype, DataType::array(DataType::Number));
        assert!(environment.has_variable("x"));
    }
}
