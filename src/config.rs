//! Generator configuration.
//!
//! One TOML document per header:
//!
//! ```toml
//! module_name = "MotController"
//!
//! [functions.c_MotController_SetDemand]
//! defaults = { demand1 = 0 }
//!
//! [functions.c_MotController_GetSelectedSensorPosition.param_override.pidIdx]
//! pointer = false
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::validate::{
    deserialize_opt_flag, ArraySize, GeneratorError, ERR_CONFIG_PARSE, ERR_IO,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeaderConfig {
    /// Functions are only generated for headers that name their module.
    pub module_name: Option<String>,
    #[serde(alias = "data")]
    pub functions: BTreeMap<String, FunctionConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FunctionConfig {
    pub defaults: BTreeMap<String, DefaultValue>,
    pub param_override: BTreeMap<String, ParamOverride>,
    pub internal: bool,
    pub rename: Option<String>,
    pub code: Option<String>,
    pub get: Option<serde_json::Value>,
    pub set: Option<serde_json::Value>,
}

impl FunctionConfig {
    pub fn has_code(&self) -> bool {
        self.code.is_some() || self.get.is_some() || self.set.is_some()
    }
}

/// Partial parameter record merged over a parsed parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ParamOverride {
    #[serde(deserialize_with = "deserialize_opt_flag")]
    pub pointer: Option<bool>,
    #[serde(deserialize_with = "deserialize_opt_flag")]
    pub array: Option<bool>,
    pub array_size: Option<ArraySize>,
    pub x_type: Option<String>,
    pub annotation: Option<String>,
}

/// A literal default spliced verbatim into generated signatures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Bool(true) => f.write_str("True"),
            DefaultValue::Bool(false) => f.write_str("False"),
            DefaultValue::Int(i) => write!(f, "{}", i),
            DefaultValue::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            DefaultValue::Float(x) => write!(f, "{}", x),
            DefaultValue::Text(s) => f.write_str(s),
        }
    }
}

pub fn parse_header_config(source: &str, origin: &str) -> Result<HeaderConfig, GeneratorError> {
    toml::from_str(source).map_err(|e| {
        GeneratorError::new(
            ERR_CONFIG_PARSE,
            format!("Invalid generator config {}: {}", origin, e),
        )
    })
}

pub fn load_header_config(path: &Path) -> Result<HeaderConfig, GeneratorError> {
    let source = fs::read_to_string(path).map_err(|e| {
        GeneratorError::new(
            ERR_IO,
            format!("Failed to read config {}: {}", path.display(), e),
        )
    })?;
    parse_header_config(&source, &path.display().to_string())
}
