//! Mapping of declared types to wire type names.

use crate::ir::{Scalar, Type, TypeRegistry};

/// Wire type for anything without a table entry.
pub const FALLBACK_WIRE_TYPE: &str = "string";

/// Wire type name of a scalar.
pub fn map_scalar(scalar: &Scalar) -> &'static str {
    match scalar {
        Scalar::Int => "int32",
        Scalar::Float => "float",
        Scalar::Str => "string",
        Scalar::Bool => "bool",
        Scalar::Bytes => "bytes",
        Scalar::Any => "string",
        Scalar::Builtin(_) => FALLBACK_WIRE_TYPE,
    }
}

/// Wire type name of a map key.
///
/// Only `int`, `float`, `str` and `bool` keys resolve through the table;
/// every other key type is rendered as the fallback.
pub fn map_key(ty: &Type) -> &'static str {
    match ty {
        Type::Scalar(scalar @ (Scalar::Int | Scalar::Float | Scalar::Str | Scalar::Bool)) => {
            map_scalar(scalar)
        }
        _ => FALLBACK_WIRE_TYPE,
    }
}

/// Name used to reference `ty` in a field line.
///
/// Declarations are referenced by their own name; scalars go through the
/// table; anything else (generic aliases, dangling handles) is the fallback.
pub fn map_type<'a>(registry: &'a TypeRegistry, ty: &Type) -> &'a str {
    match ty {
        Type::Scalar(scalar) => map_scalar(scalar),
        Type::Named(id) => registry
            .get(*id)
            .map(|decl| decl.name.as_str())
            .unwrap_or(FALLBACK_WIRE_TYPE),
        Type::None | Type::List(_) | Type::Dict(_) | Type::Union(_) => FALLBACK_WIRE_TYPE,
    }
}
