//! Native Type Table
//!
//! The closed set of native types the generator understands, their host-language
//! annotations, and the simulation checks derived from them.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::validate::{GeneratorError, ERR_UNKNOWN_TYPE};

pub const ERROR_CODE_TYPE: &str = "ctre::phoenix::ErrorCode";

/// Return types that carry no value.
pub const VOID_TYPES: &[&str] = &["void", "void *"];

pub fn is_void_type(raw: &str) -> bool {
    VOID_TYPES.contains(&raw)
}

// ═══════════════════════════════════════════════════════════════════════════════
// NATIVE TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    Bool,
    Char,
    Short,
    Int,
    Long,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    SizeT,
    Float,
    Double,
    ControlMode,
    ErrorCode,
    Void,
    VoidPtr,
}

/// Host-language annotation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    Int,
    Float,
    Str,
    Bool,
    ControlMode,
    ErrorCode,
    NoneType,
}

impl Annotation {
    pub fn as_str(self) -> &'static str {
        match self {
            Annotation::Int => "int",
            Annotation::Float => "float",
            Annotation::Str => "str",
            Annotation::Bool => "bool",
            Annotation::ControlMode => "ControlMode",
            Annotation::ErrorCode => "ErrorCode",
            Annotation::NoneType => "None",
        }
    }
}

/// Shape of the runtime check a simulation shim performs for a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Bool,
    Float,
    Int,
    SignedRange(u32),
    UnsignedRange(u32),
    ErrorCodeEnum,
    Unchecked,
}

impl NativeType {
    pub const ALL: &'static [NativeType] = &[
        NativeType::Bool,
        NativeType::Char,
        NativeType::Short,
        NativeType::Int,
        NativeType::Long,
        NativeType::Int16,
        NativeType::Int32,
        NativeType::Int64,
        NativeType::UInt8,
        NativeType::UInt16,
        NativeType::UInt32,
        NativeType::UInt64,
        NativeType::SizeT,
        NativeType::Float,
        NativeType::Double,
        NativeType::ControlMode,
        NativeType::ErrorCode,
        NativeType::Void,
        NativeType::VoidPtr,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NativeType::Bool => "bool",
            NativeType::Char => "char",
            NativeType::Short => "short",
            NativeType::Int => "int",
            NativeType::Long => "long",
            NativeType::Int16 => "int16_t",
            NativeType::Int32 => "int32_t",
            NativeType::Int64 => "int64_t",
            NativeType::UInt8 => "uint8_t",
            NativeType::UInt16 => "uint16_t",
            NativeType::UInt32 => "uint32_t",
            NativeType::UInt64 => "uint64_t",
            NativeType::SizeT => "size_t",
            NativeType::Float => "float",
            NativeType::Double => "double",
            NativeType::ControlMode => "ctre::phoenix::motorcontrol::ControlMode",
            NativeType::ErrorCode => ERROR_CODE_TYPE,
            NativeType::Void => "void",
            NativeType::VoidPtr => "void *",
        }
    }

    pub fn from_raw(raw: &str) -> Option<NativeType> {
        NATIVE_TYPES.get(raw).copied()
    }

    /// `None` means the type may appear in checks but must never be exposed.
    pub fn annotation(self) -> Option<Annotation> {
        match self {
            NativeType::Short
            | NativeType::Int
            | NativeType::UInt8
            | NativeType::UInt16
            | NativeType::Int32
            | NativeType::UInt32
            | NativeType::SizeT => Some(Annotation::Int),
            NativeType::Double => Some(Annotation::Float),
            NativeType::Char => Some(Annotation::Str),
            NativeType::Bool => Some(Annotation::Bool),
            NativeType::ControlMode => Some(Annotation::ControlMode),
            NativeType::ErrorCode => Some(Annotation::ErrorCode),
            NativeType::Void => Some(Annotation::NoneType),
            NativeType::Long
            | NativeType::Int16
            | NativeType::Int64
            | NativeType::UInt64
            | NativeType::Float
            | NativeType::VoidPtr => None,
        }
    }

    pub fn check_kind(self) -> CheckKind {
        match self {
            NativeType::Bool => CheckKind::Bool,
            NativeType::Float | NativeType::Double => CheckKind::Float,
            NativeType::Int | NativeType::Long | NativeType::SizeT => CheckKind::Int,
            NativeType::Short | NativeType::Int16 => CheckKind::SignedRange(16),
            NativeType::Int32 => CheckKind::SignedRange(32),
            NativeType::Int64 => CheckKind::SignedRange(64),
            NativeType::UInt8 => CheckKind::UnsignedRange(8),
            NativeType::UInt16 => CheckKind::UnsignedRange(16),
            NativeType::UInt32 => CheckKind::UnsignedRange(32),
            NativeType::UInt64 => CheckKind::UnsignedRange(64),
            NativeType::ErrorCode => CheckKind::ErrorCodeEnum,
            // TODO: char and ControlMode values are not validated by the shim yet
            NativeType::Char | NativeType::ControlMode | NativeType::Void | NativeType::VoidPtr => {
                CheckKind::Unchecked
            }
        }
    }
}

lazy_static! {
    static ref NATIVE_TYPES: HashMap<&'static str, NativeType> =
        NativeType::ALL.iter().map(|ty| (ty.as_str(), *ty)).collect();
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOOKUPS
// ═══════════════════════════════════════════════════════════════════════════════

/// Annotation for a native type; an unmapped type means the allow-list needs
/// extending and generation cannot continue.
pub fn to_annotation(raw: &str) -> Result<&'static str, GeneratorError> {
    NativeType::from_raw(raw)
        .and_then(NativeType::annotation)
        .map(Annotation::as_str)
        .ok_or_else(|| {
            GeneratorError::new(
                ERR_UNKNOWN_TYPE,
                format!("No host annotation for native type '{}'", raw),
            )
            .with_hint("Add the type to the native type table in annotations.rs")
        })
}

/// Simulation check for `name` holding a value of native type `ty`.
///
/// An absent type checks for the null value. Strict mode rejects integers
/// where only floating point is expected. Types without a check kind yield
/// `None`, which callers treat as "no assertion".
pub fn derive_check(name: &str, ty: Option<&str>, strict: bool) -> Option<String> {
    let Some(raw) = ty else {
        return Some(format!("{} is None", name));
    };

    let kind = NativeType::from_raw(raw)
        .map(NativeType::check_kind)
        .unwrap_or(CheckKind::Unchecked);

    match kind {
        CheckKind::Bool => Some(format!("isinstance({}, bool)", name)),
        CheckKind::Float if strict => Some(format!("isinstance({}, (float))", name)),
        CheckKind::Float => Some(format!("isinstance({}, (int, float))", name)),
        CheckKind::Int => Some(format!("isinstance({}, int)", name)),
        CheckKind::SignedRange(bits) => Some(format!(
            "isinstance({0}, int) and -1<<{1} <= {0} < 1<<{1}",
            name,
            bits - 1
        )),
        CheckKind::UnsignedRange(bits) => Some(format!(
            "isinstance({0}, int) and 0 <= {0} < 1<<{1}",
            name, bits
        )),
        CheckKind::ErrorCodeEnum => Some(format!("isinstance({}, ErrorCode)", name)),
        CheckKind::Unchecked => None,
    }
}
