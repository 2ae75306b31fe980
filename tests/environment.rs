#[cfg(test)]
mod environment_tests {
    use std::rc::Rc;

    use eelios::datatype::DataType;
    use eelios::environment::{Environment, Variable};
    use eelios::error::RuntimeError;
    use eelios::lens::Lens;
    use eelios::token::Span;
    use eelios::value::{Payload, Value};
    use pretty_assertions::assert_eq;

    fn numbers(items: &[f64]) -> Value {
        Value::new(
            Payload::Array(Rc::new(items.iter().map(|n| Payload::Number(*n)).collect())),
            DataType::array(DataType::Number),
            Span::default(),
        )
    }

    #[test]
    fn test_lookup_walks_to_the_nearest_binding() {
        let outer = Environment::extend(None, Variable::new("x", Value::number(1.0, Span::default())));
        let middle = Environment::extend(
            Some(Rc::clone(&outer)),
            Variable::new("y", Value::number(2.0, Span::default())),
        );
        let inner = Environment::extend(
            Some(Rc::clone(&middle)),
            Variable::new("x", Value::number(3.0, Span::default())),
        );

        assert_eq!(inner.get_variable("x", Span::default()).unwrap().get().to_string(), "3");
        assert_eq!(inner.get_variable("y", Span::default()).unwrap().get().to_string(), "2");
        assert_eq!(outer.get_variable("x", Span::default()).unwrap().get().to_string(), "1");
        assert!(inner.has_variable("y"));
        assert!(!outer.has_variable("y"));
    }

    #[test]
    fn test_missing_variable_reports_name_and_span() {
        let env = Environment::extend(None, Variable::new("x", Value::number(1.0, Span::default())));

        match env.get_variable("nope", Span::new(4, 8)) {
            Err(RuntimeError::UndefinedVariable { name, span }) => {
                assert_eq!(name, "nope");
                assert_eq!(span, Span::new(4, 8));
            }
            other => panic!("expected UndefinedVariable, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_variables_see_writes() {
        let variable = Variable::new("x", Value::number(1.0, Span::default()));
        let first = Environment::extend(None, Rc::clone(&variable));
        let second = Environment::extend(Some(Rc::clone(&first)), Variable::new("y", Value::number(0.0, Span::default())));

        Lens::variable(Rc::clone(&variable))
            .set(Value::string("changed".into(), Span::default()))
            .unwrap();

        assert_eq!(second.get_variable("x", Span::default()).unwrap().get().to_string(), "changed");
        assert_eq!(first.get_variable("x", Span::default()).unwrap().get().datatype, DataType::String);
    }

    #[test]
    fn test_element_lens_copies_on_write() {
        let variable = Variable::new("xs", numbers(&[1.0, 2.0, 3.0]));
        let before: Value = variable.get();

        let lens = Lens::element(Lens::variable(Rc::clone(&variable)), 1, Span::new(0, 5));

        assert_eq!(lens.get().unwrap().to_string(), "2");
        assert_eq!(lens.get().unwrap().datatype, DataType::Number);

        lens.set(Value::number(20.0, Span::default())).unwrap();

        assert_eq!(variable.get().to_string(), "[1, 20, 3]");
        assert_eq!(variable.get().datatype, DataType::array(DataType::Number));
        assert_eq!(before.to_string(), "[1, 2, 3]");
    }

    #[test]
    fn test_nested_element_lens_writes_through() {
        let inner = |items: &[f64]| -> Payload {
            Payload::Array(Rc::new(items.iter().map(|n| Payload::Number(*n)).collect()))
        };
        let grid = Value::new(
            Payload::Array(Rc::new(vec![inner(&[1.0, 2.0]), inner(&[3.0, 4.0])])),
            DataType::array(DataType::array(DataType::Number)),
            Span::default(),
        );
        let variable = Variable::new("grid", grid);

        let row = Lens::element(Lens::variable(Rc::clone(&variable)), 1, Span::default());
        let cell = Lens::element(row, 0, Span::default());

        cell.set(Value::number(30.0, Span::default())).unwrap();

        assert_eq!(variable.get().to_string(), "[[1, 2], [30, 4]]");
    }

    #[test]
    fn test_element_lens_rechecks_bounds() {
        let variable = Variable::new("xs", numbers(&[1.0, 2.0]));
        let lens = Lens::element(Lens::variable(Rc::clone(&variable)), 1, Span::new(0, 5));

        variable.set(numbers(&[1.0]));

        assert!(matches!(
            lens.get(),
            Err(RuntimeError::OutOfBounds { length: 1, .. })
        ));
        assert!(matches!(
            lens.set(Value::number(0.0, Span::default())),
            Err(RuntimeError::OutOfBounds { length: 1, .. })
        ));
    }
}
