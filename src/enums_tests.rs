#[cfg(test)]
mod tests {
    use crate::enums::normalize_enum;
    use crate::validate::{EnumIR, EnumValueIR};
    use pretty_assertions::assert_eq;

    fn mock_enum(name: &str, values: &[&str]) -> EnumIR {
        EnumIR {
            name: name.to_string(),
            values: values
                .iter()
                .map(|v| EnumValueIR {
                    name: v.to_string(),
                    value: None,
                })
                .collect(),
        }
    }

    fn x_names(e: &EnumIR) -> Vec<String> {
        normalize_enum(e)
            .values
            .into_iter()
            .map(|v| v.x_name)
            .collect()
    }

    #[test]
    fn test_strips_enum_prefix_and_trailing_underscores() {
        let e = mock_enum("Foo_", &["Foo_Bar_", "Foo_Baz__"]);
        assert_eq!(x_names(&e), vec!["Bar", "Baz"]);
    }

    #[test]
    fn test_prefix_is_taken_up_to_first_underscore() {
        let e = mock_enum(
            "StatusFrame_Enhanced",
            &["StatusFrame_Status_1_General_", "StatusFrame_Status_2_Feedback0_"],
        );
        assert_eq!(x_names(&e), vec!["Status_1_General", "Status_2_Feedback0"]);
    }

    #[test]
    fn test_values_without_prefix_are_kept() {
        let e = mock_enum("ControlMode", &["PercentOutput", "Velocity_"]);
        assert_eq!(x_names(&e), vec!["PercentOutput", "Velocity"]);
    }

    #[test]
    fn test_none_is_renamed() {
        let e = mock_enum("LimitSwitchSource", &["LimitSwitchSource_None", "None_"]);
        assert_eq!(x_names(&e), vec!["None_", "None_"]);
    }

    #[test]
    fn test_leading_digit_gets_enum_initial() {
        let e = mock_enum("Foo_", &["Foo_2x", "Foo_10Ms_"]);
        assert_eq!(x_names(&e), vec!["F2x", "F10Ms"]);
    }

    #[test]
    fn test_empty_result_falls_back_to_native_name() {
        let e = mock_enum("Foo", &["Foo_"]);
        assert_eq!(x_names(&e), vec!["Foo"]);
    }

    #[test]
    fn test_native_names_and_values_are_preserved() {
        let e = EnumIR {
            name: "Mode_".to_string(),
            values: vec![
                EnumValueIR {
                    name: "Mode_Brake".to_string(),
                    value: Some(serde_json::json!(1)),
                },
                EnumValueIR {
                    name: "Mode_Coast".to_string(),
                    value: Some(serde_json::json!("2")),
                },
            ],
        };

        let normalized = normalize_enum(&e);
        assert_eq!(normalized.name, "Mode_");
        assert_eq!(normalized.values[0].name, "Mode_Brake");
        assert_eq!(normalized.values[0].x_name, "Brake");
        assert_eq!(normalized.values[0].value, Some(serde_json::json!(1)));
        assert_eq!(normalized.values[1].x_name, "Coast");
        // Input is untouched.
        assert_eq!(e.values[0].name, "Mode_Brake");
    }
}
