#[cfg(test)]
mod datatype_tests {
    use eelios::datatype::{is_expected_datatype, DataType};
    use pretty_assertions::assert_eq;

    fn samples() -> Vec<DataType> {
        vec![
            DataType::Any,
            DataType::String,
            DataType::Number,
            DataType::Boolean,
            DataType::Instruction,
            DataType::array(DataType::Number),
            DataType::array(DataType::array(DataType::String)),
            DataType::function(vec![DataType::Number], DataType::Boolean),
            DataType::closure(vec![], DataType::Instruction),
        ]
    }

    #[test]
    fn test_compatibility_is_reflexive() {
        for datatype in samples() {
            assert!(
                is_expected_datatype(&datatype, &datatype),
                "{} should accept itself",
                datatype
            );
        }
    }

    #[test]
    fn test_any_accepts_everything() {
        for datatype in samples() {
            assert!(is_expected_datatype(&DataType::Any, &datatype));
        }

        assert!(!is_expected_datatype(&DataType::Number, &DataType::Any));
    }

    #[test]
    fn test_instruction_widening_is_one_way() {
        let instructions = DataType::array(DataType::Instruction);
        let empty = DataType::array(DataType::Any);

        assert!(is_expected_datatype(&DataType::Instruction, &instructions));
        assert!(is_expected_datatype(&DataType::Instruction, &empty));
        assert!(!is_expected_datatype(&instructions, &DataType::Instruction));
        assert!(!is_expected_datatype(
            &DataType::Instruction,
            &DataType::array(DataType::Number)
        ));
    }

    #[test]
    fn test_arrays_compare_element_types() {
        assert!(is_expected_datatype(
            &DataType::array(DataType::Any),
            &DataType::array(DataType::String)
        ));
        assert!(!is_expected_datatype(
            &DataType::array(DataType::String),
            &DataType::array(DataType::Number)
        ));
        assert!(!is_expected_datatype(
            &DataType::array(DataType::String),
            &DataType::String
        ));
    }

    #[test]
    fn test_signatures_compare_arity_parameters_and_return() {
        let expected = DataType::function(vec![DataType::Any], DataType::Any);

        assert!(is_expected_datatype(
            &expected,
            &DataType::function(vec![DataType::Number], DataType::String)
        ));
        assert!(!is_expected_datatype(
            &expected,
            &DataType::function(vec![DataType::Number, DataType::Number], DataType::String)
        ));
        assert!(!is_expected_datatype(
            &expected,
            &DataType::closure(vec![DataType::Number], DataType::String)
        ));
        assert!(!is_expected_datatype(
            &DataType::closure(vec![], DataType::Number),
            &DataType::closure(vec![], DataType::String)
        ));
    }

    #[test]
    fn test_datatype_display() {
        assert_eq!(DataType::array(DataType::Number).to_string(), "Array<Number>");
        assert_eq!(
            DataType::function(vec![DataType::Number, DataType::String], DataType::Boolean)
                .to_string(),
            "|Number, String| -> Boolean"
        );
        assert_eq!(
            DataType::closure(vec![], DataType::array(DataType::Any)).to_string(),
            "() => Array<Any>"
        );
    }
}
