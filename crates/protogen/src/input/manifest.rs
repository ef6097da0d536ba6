//! Declaration manifests.
//!
//! Example manifest.toml:
//! ```toml
//! [[types]]
//! name = "User"
//! conventions = ["rich-record"]
//! fields = [
//!     { name = "id", type = "int" },
//!     { name = "home", type = "Optional[Address]" },
//! ]
//!
//! [[types]]
//! name = "Address"
//! conventions = ["field-tuple"]
//! fields = [{ name = "street", type = "str" }]
//!
//! [[types]]
//! name = "Settings"
//! [types.attributes]
//! retries = 3
//! reload = { "$callable" = true }
//! ```

use super::LoadError;
use super::typeexpr::parse_type_expr;
use crate::ir::{AttrValue, Convention, DeclaredField, TypeDecl, TypeId, TypeRegistry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Manifest document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Toml,
}

impl ManifestFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// A set of declarations described as data.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Manifest {
    pub types: Vec<TypeEntry>,
}

/// One declaration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TypeEntry {
    pub name: String,
    #[serde(default)]
    pub conventions: Vec<Convention>,
    /// Names of parent declarations.
    #[serde(default)]
    pub bases: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
    /// Class-level attribute values, read by the plain-class heuristic.
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

/// One annotated field.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldEntry {
    pub name: String,
    /// Type expression, see [`parse_type_expr`].
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub class_var: bool,
}

impl Manifest {
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_toml(text: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(text)?)
    }

    pub fn parse(text: &str, format: ManifestFormat) -> Result<Self, LoadError> {
        match format {
            ManifestFormat::Json => Self::from_json(text),
            ManifestFormat::Toml => Self::from_toml(text),
        }
    }

    /// Build a registry holding every declaration, in manifest order.
    ///
    /// All names are declared before any field is resolved, so declarations
    /// may reference each other (and themselves) regardless of order.
    pub fn into_registry(&self) -> Result<TypeRegistry, LoadError> {
        let mut registry = TypeRegistry::new();
        let ids: Vec<TypeId> = self
            .types
            .iter()
            .map(|entry| {
                let mut decl = TypeDecl::new(entry.name.clone());
                for convention in &entry.conventions {
                    decl = decl.with_convention(*convention);
                }
                registry.declare(decl)
            })
            .collect();

        for (entry, &id) in self.types.iter().zip(&ids) {
            let bases = entry
                .bases
                .iter()
                .map(|base| {
                    registry.lookup(base).ok_or_else(|| LoadError::UnknownType {
                        name: base.clone(),
                        context: format!("bases of `{}`", entry.name),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let fields = entry
                .fields
                .iter()
                .map(|field| {
                    let ty = parse_type_expr(&registry, &field.ty)?;
                    Ok(DeclaredField {
                        name: field.name.clone(),
                        ty,
                        class_var: field.class_var,
                    })
                })
                .collect::<Result<Vec<_>, LoadError>>()?;

            let attributes = entry
                .attributes
                .iter()
                .map(|(name, value)| Ok((name.clone(), attr_value(&registry, name, value)?)))
                .collect::<Result<Vec<_>, LoadError>>()?;

            let decl = &mut registry[id];
            decl.bases = bases;
            decl.fields = fields;
            decl.attributes = attributes;
        }

        Ok(registry)
    }
}

/// Convert a data value into an attribute value.
///
/// Tables with a `$instance`, `$callable` or `$bytes` key describe values
/// plain data cannot express.
fn attr_value(registry: &TypeRegistry, name: &str, value: &Value) -> Result<AttrValue, LoadError> {
    let invalid = |reason: &str| LoadError::Attribute {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    Ok(match value {
        Value::Null => AttrValue::None,
        Value::Bool(b) => AttrValue::Bool(*b),
        Value::Number(n) if n.is_f64() => AttrValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        // Integers past `i64::MAX` saturate; only the runtime type matters.
        Value::Number(n) => AttrValue::Int(n.as_i64().unwrap_or(i64::MAX)),
        Value::String(s) => AttrValue::Str(s.clone()),
        Value::Array(items) => AttrValue::List(
            items
                .iter()
                .map(|item| attr_value(registry, name, item))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(map) => {
            if let Some(instance) = map.get("$instance") {
                let type_name = instance
                    .as_str()
                    .ok_or_else(|| invalid("`$instance` must be a type name"))?;
                let id = registry
                    .lookup(type_name)
                    .ok_or_else(|| LoadError::UnknownType {
                        name: type_name.to_string(),
                        context: format!("attribute `{name}`"),
                    })?;
                AttrValue::Instance(id)
            } else if map.contains_key("$callable") {
                AttrValue::Callable
            } else if let Some(bytes) = map.get("$bytes") {
                let text = bytes
                    .as_str()
                    .ok_or_else(|| invalid("`$bytes` must be a string"))?;
                AttrValue::Bytes(text.as_bytes().to_vec())
            } else {
                AttrValue::Dict(
                    map.iter()
                        .map(|(key, item)| Ok((key.clone(), attr_value(registry, name, item)?)))
                        .collect::<Result<_, LoadError>>()?,
                )
            }
        }
    })
}
