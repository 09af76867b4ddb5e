use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// INVARIANT CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_NAMING_CONVENTION: &str = "BG-ERR-NAMING";
pub const ERR_UNDRAINED_DEFAULT: &str = "BG-ERR-UNDRAINED-DEFAULT";
pub const ERR_UNDRAINED_OVERRIDE: &str = "BG-ERR-UNDRAINED-OVERRIDE";
pub const ERR_EARLY_RETURN: &str = "BG-ERR-EARLY-RETURN";
pub const ERR_UNKNOWN_TYPE: &str = "BG-ERR-UNKNOWN-TYPE";
pub const ERR_IO: &str = "BG-ERR-IO";
pub const ERR_IR_PARSE: &str = "BG-ERR-IR-PARSE";
pub const ERR_CONFIG_PARSE: &str = "BG-ERR-CONFIG-PARSE";

// ═══════════════════════════════════════════════════════════════════════════════
// GUARANTEES
// ═══════════════════════════════════════════════════════════════════════════════

fn get_guarantee(code: &str) -> &'static str {
    match code {
        ERR_NAMING_CONVENTION => "Every native function is named c_<module>_<name>.",
        ERR_UNDRAINED_DEFAULT => {
            "Every configured default corresponds to a parameter of its function."
        }
        ERR_UNDRAINED_OVERRIDE => {
            "Every configured parameter override corresponds to a parameter of its function."
        }
        ERR_EARLY_RETURN => {
            "Injected code assigns to retval and never returns; the wrapper owns the return statement."
        }
        ERR_UNKNOWN_TYPE => "Every exposed native type has a host-language annotation.",
        ERR_IO => "Input and output files are readable and writable.",
        ERR_IR_PARSE => "Header metadata is well-formed parser output.",
        ERR_CONFIG_PARSE => "Generator configuration is well-formed TOML.",
        _ => "Unknown invariant.",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GENERATOR ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// A fatal generation error. Any of these aborts the whole run.
#[derive(Debug, Clone, Serialize, Deserialize, Error, PartialEq)]
#[error("[{code}] {message}")]
pub struct GeneratorError {
    pub code: String,
    pub message: String,
    pub guarantee: String,
    pub header: Option<String>,
    pub function: Option<String>,
    pub hints: Vec<String>,
}

impl GeneratorError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        GeneratorError {
            code: code.to_string(),
            message: message.into(),
            guarantee: get_guarantee(code).to_string(),
            header: None,
            function: None,
            hints: vec![],
        }
    }

    pub fn in_function(mut self, function: &str) -> Self {
        if self.function.is_none() {
            self.function = Some(function.to_string());
        }
        self
    }

    pub fn in_header(mut self, header: &str) -> Self {
        if self.header.is_none() {
            self.header = Some(header.to_string());
        }
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HEADER IR (parser output)
// ═══════════════════════════════════════════════════════════════════════════════

/// Parsed metadata for one header file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HeaderIR {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub enums: Vec<EnumIR>,
    #[serde(default)]
    pub functions: Vec<FunctionIR>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnumIR {
    pub name: String,
    #[serde(default)]
    pub values: Vec<EnumValueIR>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnumValueIR {
    pub name: String,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionIR {
    pub name: String,
    #[serde(rename = "rtnType", alias = "rtn_type")]
    pub rtn_type: String,
    #[serde(default)]
    pub parameters: Vec<ParameterIR>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ParameterIR {
    #[serde(default)]
    pub name: String,
    pub raw_type: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub pointer: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub array: bool,
    #[serde(default)]
    pub array_size: Option<ArraySize>,
}

/// Fixed array length as reported by the parser: either a literal count or
/// the name of a compile-time constant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ArraySize {
    Count(u64),
    Symbol(String),
}

impl ArraySize {
    /// Zero and empty sizes mean the parser saw `T name[]`.
    pub fn is_fixed(&self) -> bool {
        match self {
            ArraySize::Count(n) => *n > 0,
            ArraySize::Symbol(s) => !s.trim().is_empty(),
        }
    }
}

impl fmt::Display for ArraySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArraySize::Count(n) => write!(f, "{}", n),
            ArraySize::Symbol(s) => f.write_str(s),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        }
    }
}

/// The header parser emits pointer/array markers as `0`/`1`; hand-written
/// fixtures tend to use booleans. Accept both.
pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Flag::deserialize(deserializer)?.is_set())
}

pub(crate) fn deserialize_opt_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Flag>::deserialize(deserializer)?.map(Flag::is_set))
}
