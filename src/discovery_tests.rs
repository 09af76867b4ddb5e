#[cfg(test)]
mod tests {
    use crate::config::{parse_header_config, DefaultValue};
    use crate::discovery::{discover_headers, parse_header_ir};
    use crate::finalize::{generate_bindings, GenerateOptions, GeneratedHeader};
    use crate::validate::{
        ArraySize, ERR_CONFIG_PARSE, ERR_IO, ERR_IR_PARSE, ERR_UNDRAINED_DEFAULT,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    fn mot_controller_ir() -> serde_json::Value {
        json!({
            "name": "MotController",
            "enums": [{
                "name": "FeedbackDevice_",
                "values": [
                    { "name": "FeedbackDevice_QuadEncoder_", "value": 0 },
                    { "name": "FeedbackDevice_None", "value": 14 }
                ]
            }],
            "functions": [
                {
                    "name": "c_MotController_GetTemperature",
                    "rtnType": "ctre::phoenix::ErrorCode",
                    "parameters": [
                        { "name": "handle", "raw_type": "void *", "pointer": 1, "array": 0 },
                        { "name": "param", "raw_type": "double", "pointer": 1, "array": 0 }
                    ]
                },
                {
                    "name": "c_MotController_SetNeutralMode",
                    "rtnType": "void",
                    "parameters": [
                        { "name": "handle", "raw_type": "void *", "pointer": 1, "array": 0 },
                        { "name": "neutralMode", "raw_type": "int", "pointer": 0, "array": 0 }
                    ]
                }
            ]
        })
    }

    const MOT_CONTROLLER_TOML: &str = r#"
module_name = "MotController"

[functions.c_MotController_GetTemperature]

[functions.c_MotController_SetNeutralMode]
defaults = { neutralMode = 1 }
"#;

    fn write_json(path: &Path, value: &serde_json::Value) {
        fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    #[test]
    fn test_parser_flags_accept_integers_and_booleans() {
        let ir = parse_header_ir(
            r#"{
                "functions": [{
                    "name": "c_M_f",
                    "rtnType": "void",
                    "parameters": [
                        { "name": "a", "raw_type": "int", "pointer": 1, "array": false },
                        { "name": "b", "raw_type": "int", "array": true, "array_size": "kSize" },
                        { "raw_type": "int" }
                    ]
                }]
            }"#,
            "inline",
        )
        .unwrap();

        let params = &ir.functions[0].parameters;
        assert!(params[0].pointer);
        assert!(!params[0].array);
        assert!(params[1].array);
        assert_eq!(params[1].array_size, Some(ArraySize::Symbol("kSize".to_string())));
        assert_eq!(params[2].name, "");
        assert!(!params[2].pointer);
    }

    #[test]
    fn test_invalid_header_ir_is_reported() {
        let err = parse_header_ir("{ not json", "broken.json").unwrap_err();
        assert_eq!(err.code, ERR_IR_PARSE);
        assert!(err.message.contains("broken.json"));
    }

    #[test]
    fn test_config_accepts_legacy_data_key() {
        let config = parse_header_config(
            r#"
module_name = "CANifier"
[data.c_CANifier_SetLEDOutput]
internal = true
defaults = { ledChannel = "LEDChannelA", enable = true }
"#,
            "inline",
        )
        .unwrap();

        let f = &config.functions["c_CANifier_SetLEDOutput"];
        assert!(f.internal);
        assert_eq!(
            f.defaults["ledChannel"],
            DefaultValue::Text("LEDChannelA".to_string())
        );
        assert_eq!(f.defaults["enable"].to_string(), "True");
    }

    #[test]
    fn test_config_rejects_unknown_override_fields() {
        let err = parse_header_config(
            r#"
module_name = "M"
[functions.c_M_f.param_override.x]
pointr = false
"#,
            "typo.toml",
        )
        .unwrap_err();
        assert_eq!(err.code, ERR_CONFIG_PARSE);
    }

    #[test]
    fn test_discovery_pairs_configs_and_skips_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("motorcontrol");
        fs::create_dir_all(&nested).unwrap();

        write_json(&nested.join("MotController.json"), &mot_controller_ir());
        fs::write(nested.join("MotController.toml"), MOT_CONTROLLER_TOML).unwrap();
        write_json(&dir.path().join("Logger.json"), &json!({ "name": "Logger" }));
        fs::write(dir.path().join("Logger.gen.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let headers = discover_headers(dir.path()).unwrap();
        let stems: Vec<&str> = headers.iter().map(|h| h.stem.as_str()).collect();
        assert_eq!(stems, vec!["Logger", "MotController"]);
        assert_eq!(headers[0].config_path, None);
        assert_eq!(
            headers[1].config_path.as_deref(),
            Some(nested.join("MotController.toml").as_path())
        );
    }

    #[test]
    fn test_missing_input_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_headers(&dir.path().join("nope")).unwrap_err();
        assert_eq!(err.code, ERR_IO);
    }

    #[test]
    fn test_generate_writes_one_document_per_header() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        write_json(&input.path().join("MotController.json"), &mot_controller_ir());
        fs::write(input.path().join("MotController.toml"), MOT_CONTROLLER_TOML).unwrap();
        write_json(
            &input.path().join("Unconfigured.json"),
            &json!({
                "enums": [{ "name": "Color", "values": [{ "name": "Color_Red_" }] }],
                "functions": [{ "name": "c_Whatever", "rtnType": "void" }]
            }),
        );

        let result = generate_bindings(&GenerateOptions {
            input_dir: input.path().to_path_buf(),
            output_dir: Some(output.path().to_path_buf()),
        })
        .unwrap();

        assert_eq!(result.headers.len(), 2);
        assert_eq!(result.written.len(), 2);

        let data = fs::read_to_string(output.path().join("MotController.gen.json")).unwrap();
        let generated: GeneratedHeader = serde_json::from_str(&data).unwrap();
        assert_eq!(generated.header, "MotController");
        assert_eq!(generated.module_name.as_deref(), Some("MotController"));

        let x_names: Vec<&str> = generated.enums[0]
            .values
            .iter()
            .map(|v| v.x_name.as_str())
            .collect();
        assert_eq!(x_names, vec!["QuadEncoder", "None_"]);

        let temperature = &generated.functions[0];
        assert_eq!(temperature.x_name, "getTemperature");
        assert_eq!(temperature.x_pyann_ret, "typing.Tuple[ErrorCode, float]");
        assert_eq!(temperature.x_temprefs, "double param;");

        let neutral = &generated.functions[1];
        assert_eq!(neutral.params[0].x_pyann, "neutralMode: int = 1");

        // No module name: enums only, and the header takes its file stem.
        let unconfigured = &result.headers[1];
        assert_eq!(unconfigured.header, "Unconfigured");
        assert!(unconfigured.functions.is_empty());
        assert_eq!(unconfigured.enums[0].values[0].x_name, "Red");
    }

    #[test]
    fn test_check_mode_writes_nothing_and_stops_on_fatal_errors() {
        let input = tempfile::tempdir().unwrap();
        write_json(&input.path().join("MotController.json"), &mot_controller_ir());
        fs::write(
            input.path().join("MotController.toml"),
            r#"
module_name = "MotController"
[functions.c_MotController_SetNeutralMode]
defaults = { mode = 1 }
"#,
        )
        .unwrap();

        let err = generate_bindings(&GenerateOptions {
            input_dir: input.path().to_path_buf(),
            output_dir: None,
        })
        .unwrap_err();

        assert_eq!(err.code, ERR_UNDRAINED_DEFAULT);
        assert_eq!(err.header.as_deref(), Some("MotController"));
        assert_eq!(err.function.as_deref(), Some("c_MotController_SetNeutralMode"));
        assert_eq!(fs::read_dir(input.path()).unwrap().count(), 2);
    }
}
