//! # Phoenix Binding Generator
//!
//! Build-time pass that turns parsed `c_` API headers into the fragments the
//! pybind11 templates render.
//!
//! ## Generation Invariants
//!
//! 1. **Naming**: every native function is `c_<module>_<Name>`; it is exposed as
//!    `name` (first letter lower-cased). Anything else aborts the run.
//!
//! 2. **Implicit Instance**: the first native parameter is the object handle and
//!    is not exposed, except for `create*` functions.
//!
//! 3. **Direction**: pointer and array parameters are outputs. Outputs are
//!    returned, in declaration order, after the native return value.
//!
//! 4. **Error Codes**: an `ErrorCode` return with nothing else to return is
//!    dropped from the exposed signature.
//!
//! 5. **Config Drain**: every configured default and override must match a real
//!    parameter.
//!
//! 6. **Closed Types**: only types in the native type table may be exposed.
//!
//! Passes are pure: they borrow parser records and return new enriched ones.

mod annotations;
mod config;
mod discovery;
mod enums;
mod finalize;
mod transform;
mod validate;

#[cfg(test)]
mod discovery_tests;
#[cfg(test)]
mod enums_tests;

pub use annotations::{derive_check, to_annotation, Annotation, CheckKind, NativeType};
pub use config::{
    load_header_config, parse_header_config, DefaultValue, FunctionConfig, HeaderConfig,
    ParamOverride,
};
pub use discovery::{discover_headers, load_header_ir, parse_header_ir, HeaderSource};
pub use enums::{normalize_enum, NormalizedEnum, NormalizedEnumValue};
pub use finalize::{
    generate_bindings, generate_header, write_generated, GenerateOptions, GenerateResult,
    GeneratedHeader,
};
pub use transform::{
    exposed_name, transform_function, BoundFunction, BoundParameter, ParamKind, ReturnValue,
};
pub use validate::*;
