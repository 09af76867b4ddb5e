use serde::{Deserialize, Serialize};

use crate::validate::EnumIR;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedEnum {
    pub name: String,
    pub values: Vec<NormalizedEnumValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedEnumValue {
    pub name: String,
    pub x_name: String,
    pub value: Option<serde_json::Value>,
}

/// Host identifier the enum's values are not allowed to take.
const RESERVED_NAME: &str = "None";

/// Derive host-facing value names for one enum.
pub fn normalize_enum(e: &EnumIR) -> NormalizedEnum {
    let prefix = enum_prefix(&e.name);
    let values = e
        .values
        .iter()
        .map(|v| NormalizedEnumValue {
            name: v.name.clone(),
            x_name: normalize_value_name(&prefix, &v.name),
            value: v.value.clone(),
        })
        .collect();

    NormalizedEnum {
        name: e.name.clone(),
        values,
    }
}

/// `ControlMode` -> `ControlMode_`, `Foo_Bar` -> `Foo_`.
fn enum_prefix(enum_name: &str) -> String {
    let head = enum_name.split('_').next().unwrap_or_default();
    format!("{}_", head)
}

fn normalize_value_name(prefix: &str, native: &str) -> String {
    let stripped = native.strip_prefix(prefix).unwrap_or(native);
    let mut name = stripped.trim_end_matches('_');
    if name.is_empty() {
        name = native.trim_end_matches('_');
    }

    if name == RESERVED_NAME {
        return format!("{}_", RESERVED_NAME);
    }

    match name.chars().next() {
        Some(c) if c.is_ascii_digit() => {
            let lead = native.chars().next().unwrap_or('_');
            format!("{}{}", lead, name)
        }
        _ => name.to_string(),
    }
}
