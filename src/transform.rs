//! Function Transform Pass
//!
//! Turns one native `c_<module>_<name>` function into the fragments a binding
//! template needs: exposed name, per-parameter marshalling, return shape and the
//! assertions a simulation shim evaluates against arguments and return values.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::annotations::{derive_check, is_void_type, to_annotation, ERROR_CODE_TYPE};
use crate::config::{DefaultValue, FunctionConfig, HeaderConfig, ParamOverride};
use crate::validate::{
    ArraySize, FunctionIR, GeneratorError, ParameterIR, ERR_EARLY_RETURN, ERR_NAMING_CONVENTION,
    ERR_UNDRAINED_DEFAULT, ERR_UNDRAINED_OVERRIDE,
};

/// Parameters with this (case-insensitive) name default to zero.
const TIMEOUT_PARAM_NAME: &str = "timeoutms";
const TIMEOUT_DEFAULT: &str = "0";

/// Sentinel the shim assigns so simulated calls report success.
const ERROR_CODE_OK_CHECK: &str = "retval = ErrorCode.OK";

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ParamKind {
    Input,
    /// Passed by address.
    OutPointer,
    /// Fixed-size buffer.
    OutArray,
    /// Dynamically sized collection.
    OutVector,
}

impl ParamKind {
    pub fn is_output(self) -> bool {
        !matches!(self, ParamKind::Input)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundParameter {
    pub name: String,
    pub raw_type: String,
    pub kind: ParamKind,
    pub pointer: bool,
    pub array: bool,
    pub array_size: Option<ArraySize>,
    pub default: Option<String>,
    pub x_type: String,
    pub x_callname: String,
    pub x_pyann_type: String,
    pub x_pyann: String,
    pub x_pyarg: String,
    pub x_decl: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnValue {
    pub name: String,
    pub raw_type: String,
    pub x_type: String,
    pub x_pyann_type: String,
}

impl ReturnValue {
    fn from_param(p: &BoundParameter) -> Self {
        ReturnValue {
            name: p.name.clone(),
            raw_type: p.raw_type.clone(),
            x_type: p.x_type.clone(),
            x_pyann_type: p.x_pyann_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundFunction {
    pub name: String,
    pub x_name: String,
    pub rtn_type: String,
    /// Leading handle argument, omitted from the exposed signature.
    pub instance_param: Option<ParameterIR>,
    pub params: Vec<BoundParameter>,
    pub x_in_params: Vec<BoundParameter>,
    pub x_out_params: Vec<BoundParameter>,
    pub x_rets: Vec<ReturnValue>,
    pub x_param_checks: Vec<String>,
    pub x_return_checks: Vec<String>,
    pub x_callstart: String,
    pub x_wrap_return: String,
    pub x_wrap_return_type: String,
    pub x_pyann_ret: String,
    pub x_temprefs: String,
    pub args_comma: String,
    pub internal: bool,
    pub rename: Option<String>,
    pub has_code: bool,
    pub code: Option<String>,
    pub get: Option<serde_json::Value>,
    pub set: Option<serde_json::Value>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAMING
// ═══════════════════════════════════════════════════════════════════════════════

/// `c_MotController_SetDemand` in module `MotController` -> `setDemand`.
pub fn exposed_name(native: &str, module_name: &str) -> Result<String, GeneratorError> {
    let pattern = format!("^c_{}_(.+)", regex::escape(module_name));
    let re = Regex::new(&pattern).map_err(|e| {
        GeneratorError::new(
            ERR_NAMING_CONVENTION,
            format!("Invalid module name '{}': {}", module_name, e),
        )
    })?;

    let rest = re
        .captures(native)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            GeneratorError::new(
                ERR_NAMING_CONVENTION,
                format!(
                    "Unexpected fn {}: expected c_{}_<name>",
                    native, module_name
                ),
            )
            .in_function(native)
        })?;

    let mut chars = rest.chars();
    Ok(match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARAMETERS
// ═══════════════════════════════════════════════════════════════════════════════

struct PendingConfig {
    defaults: BTreeMap<String, DefaultValue>,
    overrides: BTreeMap<String, ParamOverride>,
}

impl PendingConfig {
    fn new(config: &FunctionConfig) -> Self {
        PendingConfig {
            defaults: config.defaults.clone(),
            overrides: config.param_override.clone(),
        }
    }

    /// Every configured entry must have matched a real parameter.
    fn ensure_drained(self, function: &str) -> Result<(), GeneratorError> {
        if !self.defaults.is_empty() {
            let names: Vec<&str> = self.defaults.keys().map(String::as_str).collect();
            return Err(GeneratorError::new(
                ERR_UNDRAINED_DEFAULT,
                format!(
                    "{}: defaults configured for unknown parameters: {}",
                    function,
                    names.join(", ")
                ),
            )
            .in_function(function));
        }
        if !self.overrides.is_empty() {
            let names: Vec<&str> = self.overrides.keys().map(String::as_str).collect();
            return Err(GeneratorError::new(
                ERR_UNDRAINED_OVERRIDE,
                format!(
                    "{}: param_override configured for unknown parameters: {}",
                    function,
                    names.join(", ")
                ),
            )
            .in_function(function));
        }
        Ok(())
    }
}

fn bind_parameter(
    index: usize,
    param: &ParameterIR,
    pending: &mut PendingConfig,
) -> Result<BoundParameter, GeneratorError> {
    let name = if param.name.is_empty() {
        format!("param{}", index)
    } else {
        param.name.clone()
    };

    let mut pointer = param.pointer;
    let mut array = param.array;
    let mut array_size = param.array_size.clone();
    let mut x_type = param.raw_type.clone();
    let mut x_pyann_type = to_annotation(&param.raw_type)?.to_string();

    if let Some(ov) = pending.overrides.remove(&name) {
        pointer = ov.pointer.unwrap_or(false);
        if let Some(a) = ov.array {
            array = a;
        }
        if ov.array_size.is_some() {
            array_size = ov.array_size;
        }
        if let Some(t) = ov.x_type {
            x_type = t;
        }
        if let Some(ann) = ov.annotation {
            x_pyann_type = ann;
        }
    }

    let mut x_pyann = format!("{}: {}", name, x_pyann_type);
    let mut x_pyarg = format!("py::arg(\"{}\")", name);

    let default = match pending.defaults.remove(&name) {
        Some(value) => Some(value.to_string()),
        None if name.to_lowercase() == TIMEOUT_PARAM_NAME => Some(TIMEOUT_DEFAULT.to_string()),
        None => None,
    };
    if let Some(value) = &default {
        x_pyann.push_str(&format!(" = {}", value));
        x_pyarg.push_str(&format!("={}", value));
    }

    let mut x_callname = name.clone();
    let kind = if pointer {
        x_callname = format!("&{}", x_callname);
        ParamKind::OutPointer
    } else if array {
        match array_size.as_ref().filter(|size| size.is_fixed()) {
            Some(size) => {
                x_pyann_type = format!("typing.List[{}]", to_annotation(&param.raw_type)?);
                x_type = format!("std::array<{}, {}>", x_type, size);
                x_callname = format!("{}.data()", x_callname);
                ParamKind::OutArray
            }
            None => ParamKind::OutVector,
        }
    } else {
        ParamKind::Input
    };

    let x_decl = format!("{} {}", x_type, name);

    Ok(BoundParameter {
        name,
        raw_type: param.raw_type.clone(),
        kind,
        pointer,
        array,
        array_size,
        default,
        x_type,
        x_callname,
        x_pyann_type,
        x_pyann,
        x_pyarg,
        x_decl,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// RETURN SHAPE
// ═══════════════════════════════════════════════════════════════════════════════

struct ReturnShape {
    x_rets: Vec<ReturnValue>,
    x_callstart: String,
    x_wrap_return: String,
    x_wrap_return_type: String,
    x_pyann_ret: String,
    x_return_checks: Vec<String>,
}

fn return_shape(
    func: &FunctionIR,
    out_params: &[BoundParameter],
) -> Result<ReturnShape, GeneratorError> {
    let mut x_rets: Vec<ReturnValue> = out_params.iter().map(ReturnValue::from_param).collect();
    let mut x_callstart = String::new();
    let mut x_return_checks = Vec::new();

    // A lone error code is dropped; callers read the last error separately.
    let suppress_error_code = x_rets.is_empty() && func.rtn_type == ERROR_CODE_TYPE;
    if !suppress_error_code && !is_void_type(&func.rtn_type) {
        x_callstart = "auto __ret =".to_string();
        x_rets.insert(
            0,
            ReturnValue {
                name: "__ret".to_string(),
                raw_type: func.rtn_type.clone(),
                x_type: func.rtn_type.clone(),
                x_pyann_type: to_annotation(&func.rtn_type)?.to_string(),
            },
        );
    }

    let shape = if x_rets.len() == 1 && x_rets[0].x_type != "void" {
        let ret = &x_rets[0];
        if let Some(chk) = derive_check("retval", Some(ret.x_type.as_str()), true) {
            x_return_checks.push(format!("assert {}", chk));
        }
        ReturnShape {
            x_callstart,
            x_wrap_return: format!("return {};", ret.name),
            x_wrap_return_type: ret.x_type.clone(),
            x_pyann_ret: ret.x_pyann_type.clone(),
            x_return_checks,
            x_rets,
        }
    } else if x_rets.len() > 1 {
        let x_pyann_ret = format!(
            "typing.Tuple[{}]",
            join_fields(&x_rets, |r| &r.x_pyann_type, ", ")
        );
        let x_wrap_return = format!(
            "return std::make_tuple({});",
            join_fields(&x_rets, |r| &r.name, ",")
        );
        let x_wrap_return_type =
            format!("std::tuple<{}>", join_fields(&x_rets, |r| &r.x_type, ", "));

        x_return_checks.push(format!(
            "assert isinstance(retval, tuple) and len(retval) == {}",
            x_rets.len()
        ));
        for (i, ret) in x_rets.iter().enumerate() {
            let target = format!("retval[{}]", i);
            if let Some(chk) = derive_check(&target, Some(ret.raw_type.as_str()), true) {
                x_return_checks.push(format!("assert {}", chk));
            }
        }

        ReturnShape {
            x_callstart,
            x_wrap_return,
            x_wrap_return_type,
            x_pyann_ret,
            x_return_checks,
            x_rets,
        }
    } else {
        ReturnShape {
            x_callstart,
            x_wrap_return: String::new(),
            x_wrap_return_type: "void".to_string(),
            x_pyann_ret: "None".to_string(),
            x_return_checks,
            x_rets,
        }
    };

    Ok(shape)
}

fn join_fields<F>(rets: &[ReturnValue], field: F, sep: &str) -> String
where
    F: Fn(&ReturnValue) -> &String,
{
    rets.iter()
        .map(|r| field(r).as_str())
        .collect::<Vec<_>>()
        .join(sep)
}

// ═══════════════════════════════════════════════════════════════════════════════
// PASS
// ═══════════════════════════════════════════════════════════════════════════════

/// Transform one native function.
///
/// Returns `Ok(None)` when the header has no module name configured: such
/// headers contribute enums only. The input record is never modified, so the
/// pass can be rerun on the same record with identical results.
pub fn transform_function(
    func: &FunctionIR,
    header: &HeaderConfig,
) -> Result<Option<BoundFunction>, GeneratorError> {
    let Some(module_name) = header.module_name.as_deref() else {
        return Ok(None);
    };

    let mut x_name = exposed_name(&func.name, module_name)?;

    let config = match header.functions.get(&func.name) {
        Some(config) => config.clone(),
        None => {
            warn!(function = %func.name, "no generator config for function");
            FunctionConfig::default()
        }
    };

    let offset = if x_name.starts_with("create") { 0 } else { 1 };
    let instance_param = if offset == 1 {
        func.parameters.first().cloned()
    } else {
        None
    };

    let mut pending = PendingConfig::new(&config);
    let mut params = Vec::new();
    let mut x_in_params = Vec::new();
    let mut x_out_params = Vec::new();
    let mut x_param_checks = Vec::new();

    for (i, param) in func.parameters.iter().skip(offset).enumerate() {
        let bound =
            bind_parameter(i, param, &mut pending).map_err(|e| e.in_function(&func.name))?;

        if bound.kind.is_output() {
            x_out_params.push(bound.clone());
        } else {
            if let Some(chk) = derive_check(&bound.name, Some(bound.x_type.as_str()), false) {
                x_param_checks.push(format!("assert {}", chk));
            }
            x_in_params.push(bound.clone());
        }
        params.push(bound);
    }

    pending.ensure_drained(&func.name)?;

    let shape = return_shape(func, &x_out_params).map_err(|e| e.in_function(&func.name))?;
    if func.rtn_type == ERROR_CODE_TYPE {
        x_param_checks.push(ERROR_CODE_OK_CHECK.to_string());
    }

    let x_temprefs = if x_out_params.is_empty() {
        String::new()
    } else {
        let decls: Vec<String> = x_out_params
            .iter()
            .map(|p| format!("{} {}", p.x_type, p.name))
            .collect();
        format!("{};", decls.join(";"))
    };

    let args_comma = if x_in_params.is_empty() { "" } else { ", " }.to_string();

    if config.code.as_deref().is_some_and(|code| code.contains("return")) {
        return Err(GeneratorError::new(
            ERR_EARLY_RETURN,
            format!("{}: Do not use return, assign to retval instead", func.name),
        )
        .in_function(&func.name));
    }

    // Rename replaces the name outright, internal prefix included.
    if config.internal {
        x_name = format!("_{}", x_name);
    }
    if let Some(rename) = config.rename.as_ref().filter(|r| !r.is_empty()) {
        x_name = rename.clone();
    }

    debug!(
        function = %func.name,
        exposed = %x_name,
        inputs = x_in_params.len(),
        returns = shape.x_rets.len(),
        "transformed function"
    );

    let has_code = config.has_code();
    Ok(Some(BoundFunction {
        name: func.name.clone(),
        x_name,
        rtn_type: func.rtn_type.clone(),
        instance_param,
        params,
        x_in_params,
        x_out_params,
        x_rets: shape.x_rets,
        x_param_checks,
        x_return_checks: shape.x_return_checks,
        x_callstart: shape.x_callstart,
        x_wrap_return: shape.x_wrap_return,
        x_wrap_return_type: shape.x_wrap_return_type,
        x_pyann_ret: shape.x_pyann_ret,
        x_temprefs,
        args_comma,
        internal: config.internal,
        rename: config.rename,
        has_code,
        code: config.code,
        get: config.get,
        set: config.set,
    }))
}
