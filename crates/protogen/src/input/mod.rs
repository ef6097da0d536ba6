//! Declaration loading.
//!
//! A [`Manifest`] describes declarations as data (JSON or TOML) and builds a
//! [`TypeRegistry`](crate::ir::TypeRegistry) from them. Field types are
//! written as type expressions and parsed by [`parse_type_expr`].

mod manifest;
mod typeexpr;

pub use manifest::{FieldEntry, Manifest, ManifestFormat, TypeEntry};
pub use typeexpr::parse_type_expr;

/// Error loading declarations.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid JSON manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML manifest: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid type expression `{expr}`: {reason}")]
    TypeExpr { expr: String, reason: String },

    #[error("unknown type `{name}` referenced by {context}")]
    UnknownType { name: String, context: String },

    #[error("invalid attribute `{name}`: {reason}")]
    Attribute { name: String, reason: String },
}
