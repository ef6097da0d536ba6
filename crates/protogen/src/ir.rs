//! Type model for structured declarations.
//!
//! Declarations live in a [`TypeRegistry`] arena and are referred to by
//! [`TypeId`] handles. Field types are [`Type`] expressions that may point back
//! into the registry, so self-referential and mutually recursive graphs are
//! ordinary data.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::{Index, IndexMut};

/// Handle to a declaration in a [`TypeRegistry`].
///
/// Identity is the arena slot, never the name: two declarations sharing a
/// name are still distinct handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(usize);

impl TypeId {
    /// Position of the declaration in its registry.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A field-declaration convention a type can structurally satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Convention {
    /// Validated record with resolved type hints (pydantic-style models).
    RichRecord,
    /// Plain field tuple (dataclass-style).
    FieldTuple,
    /// Class with attribute-annotated fields (attrs-style).
    Attrs,
    /// Shape-only dictionary (TypedDict-style).
    ShapeDict,
}

/// Built-in scalar types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scalar {
    Int,
    Float,
    Str,
    Bool,
    Bytes,
    /// Untyped value.
    Any,
    /// Any other built-in (e.g. `list`, `complex`, `NoneType`).
    Builtin(String),
}

impl Scalar {
    /// Source-level name of the scalar.
    pub fn name(&self) -> &str {
        match self {
            Scalar::Int => "int",
            Scalar::Float => "float",
            Scalar::Str => "str",
            Scalar::Bool => "bool",
            Scalar::Bytes => "bytes",
            Scalar::Any => "Any",
            Scalar::Builtin(name) => name,
        }
    }
}

/// A declared field type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Scalar(Scalar),
    /// The explicit "absent" marker inside optional unions.
    None,

    // Compound
    List(Box<Type>),
    /// Mapping type; `None` when key and value types are unspecified.
    Dict(Option<(Box<Type>, Box<Type>)>),
    Union(Vec<Type>),

    // Reference to another declaration
    Named(TypeId),
}

impl Type {
    pub fn int() -> Self {
        Type::Scalar(Scalar::Int)
    }

    pub fn float() -> Self {
        Type::Scalar(Scalar::Float)
    }

    pub fn str() -> Self {
        Type::Scalar(Scalar::Str)
    }

    pub fn bool() -> Self {
        Type::Scalar(Scalar::Bool)
    }

    pub fn bytes() -> Self {
        Type::Scalar(Scalar::Bytes)
    }

    pub fn any() -> Self {
        Type::Scalar(Scalar::Any)
    }

    pub fn builtin(name: impl Into<String>) -> Self {
        Type::Scalar(Scalar::Builtin(name.into()))
    }

    pub fn list(element: Type) -> Self {
        Type::List(Box::new(element))
    }

    pub fn dict(key: Type, value: Type) -> Self {
        Type::Dict(Some((Box::new(key), Box::new(value))))
    }

    /// `Optional[inner]`, i.e. a union of `inner` and the absent marker.
    pub fn optional(inner: Type) -> Self {
        Type::union(vec![inner, Type::None])
    }

    /// Union of `members`, with nested unions flattened in place and
    /// duplicates dropped. A single remaining member is returned as itself.
    pub fn union(members: Vec<Type>) -> Self {
        let mut flat: Vec<Type> = Vec::with_capacity(members.len());
        for member in members {
            let nested = match member {
                Type::Union(inner) => inner,
                other => vec![other],
            };
            for ty in nested {
                if !flat.contains(&ty) {
                    flat.push(ty);
                }
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Type::Union(flat)
        }
    }
}

/// A field as written in a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredField {
    pub name: String,
    pub ty: Type,
    /// Class-level annotation rather than a per-instance field.
    pub class_var: bool,
}

impl DeclaredField {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            class_var: false,
        }
    }

    pub fn class_var(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            class_var: true,
        }
    }
}

/// Runtime value of a class-level attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Bytes(Vec<u8>),
    None,
    List(Vec<AttrValue>),
    Dict(Vec<(String, AttrValue)>),
    /// A method or other routine.
    Callable,
    /// An instance of a declared type.
    Instance(TypeId),
}

impl AttrValue {
    pub fn is_callable(&self) -> bool {
        matches!(self, AttrValue::Callable)
    }

    /// The type of the value as observed at runtime.
    ///
    /// Containers report their bare built-in type, not a parameterised one.
    pub fn runtime_type(&self) -> Type {
        match self {
            AttrValue::Int(_) => Type::int(),
            AttrValue::Float(_) => Type::float(),
            AttrValue::Str(_) => Type::str(),
            AttrValue::Bool(_) => Type::bool(),
            AttrValue::Bytes(_) => Type::bytes(),
            AttrValue::None => Type::builtin("NoneType"),
            AttrValue::List(_) => Type::builtin("list"),
            AttrValue::Dict(_) => Type::builtin("dict"),
            AttrValue::Callable => Type::builtin("function"),
            AttrValue::Instance(id) => Type::Named(*id),
        }
    }
}

/// A structured type declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Type name, used verbatim as the message name.
    pub name: String,
    /// Conventions this declaration satisfies directly.
    pub conventions: Vec<Convention>,
    /// Parent declarations, in declaration order.
    pub bases: Vec<TypeId>,
    /// Annotated fields, in declaration order.
    pub fields: Vec<DeclaredField>,
    /// Class-level attributes and their current values.
    pub attributes: Vec<(String, AttrValue)>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_convention(mut self, convention: Convention) -> Self {
        if !self.conventions.contains(&convention) {
            self.conventions.push(convention);
        }
        self
    }

    pub fn with_base(mut self, base: TypeId) -> Self {
        self.bases.push(base);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.fields.push(DeclaredField::new(name, ty));
        self
    }

    pub fn with_class_var(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.fields.push(DeclaredField::class_var(name, ty));
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.attributes.push((name.into(), value));
        self
    }
}

/// Arena owning every declaration of one type universe.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    decls: Vec<TypeDecl>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration and return its handle.
    ///
    /// Fields referring to the new handle (or to handles declared later) can
    /// be patched in afterwards through [`IndexMut`].
    pub fn declare(&mut self, decl: TypeDecl) -> TypeId {
        self.decls.push(decl);
        TypeId(self.decls.len() - 1)
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeDecl> {
        self.decls.get(id.0)
    }

    pub fn get_mut(&mut self, id: TypeId) -> Option<&mut TypeDecl> {
        self.decls.get_mut(id.0)
    }

    /// First declaration with the given name.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.decls.iter().position(|d| d.name == name).map(TypeId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDecl)> {
        self.decls.iter().enumerate().map(|(i, d)| (TypeId(i), d))
    }

    pub fn ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        (0..self.decls.len()).map(TypeId)
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Method resolution order of `id`: the declaration itself followed by
    /// its ancestors, most-derived first.
    ///
    /// Uses C3 linearization. Hierarchies C3 rejects (inconsistent orderings,
    /// cyclic bases) fall back to a left-to-right depth-first walk.
    pub fn mro(&self, id: TypeId) -> Vec<TypeId> {
        let mut stack = HashSet::new();
        self.c3(id, &mut stack)
            .unwrap_or_else(|| self.depth_first_ancestry(id))
    }

    /// Conventions satisfied by `id` directly or through any ancestor.
    pub fn conventions(&self, id: TypeId) -> Vec<Convention> {
        let mut out = Vec::new();
        for ancestor in self.mro(id) {
            let Some(decl) = self.get(ancestor) else {
                continue;
            };
            for convention in &decl.conventions {
                if !out.contains(convention) {
                    out.push(*convention);
                }
            }
        }
        out
    }

    fn c3(&self, id: TypeId, stack: &mut HashSet<TypeId>) -> Option<Vec<TypeId>> {
        if !stack.insert(id) {
            return None;
        }
        let bases = self.get(id).map(|d| d.bases.as_slice()).unwrap_or_default();
        let mut sequences = Vec::with_capacity(bases.len() + 1);
        for &base in bases {
            sequences.push(self.c3(base, stack)?);
        }
        sequences.push(bases.to_vec());
        stack.remove(&id);

        let mut out = vec![id];
        loop {
            sequences.retain(|s| !s.is_empty());
            if sequences.is_empty() {
                return Some(out);
            }
            let head = sequences.iter().map(|s| s[0]).find(|candidate| {
                sequences
                    .iter()
                    .all(|s| !s[1..].contains(candidate))
            })?;
            out.push(head);
            for s in &mut sequences {
                if s[0] == head {
                    s.remove(0);
                }
            }
        }
    }

    fn depth_first_ancestry(&self, id: TypeId) -> Vec<TypeId> {
        let mut out = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if out.contains(&next) {
                continue;
            }
            out.push(next);
            if let Some(decl) = self.get(next) {
                pending.extend(decl.bases.iter().rev());
            }
        }
        out
    }
}

impl Index<TypeId> for TypeRegistry {
    type Output = TypeDecl;

    fn index(&self, id: TypeId) -> &TypeDecl {
        &self.decls[id.0]
    }
}

impl IndexMut<TypeId> for TypeRegistry {
    fn index_mut(&mut self, id: TypeId) -> &mut TypeDecl {
        &mut self.decls[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_distinct_handles() {
        let mut registry = TypeRegistry::new();
        let a = registry.declare(TypeDecl::new("Item"));
        let b = registry.declare(TypeDecl::new("Item"));

        assert_ne!(a, b);
        assert_eq!(registry.lookup("Item"), Some(a));
    }

    #[test]
    fn forward_declared_self_reference() {
        let mut registry = TypeRegistry::new();
        let node = registry.declare(TypeDecl::new("Node"));
        registry[node]
            .fields
            .push(DeclaredField::new("next", Type::optional(Type::Named(node))));

        assert_eq!(
            registry[node].fields[0].ty,
            Type::Union(vec![Type::Named(node), Type::None])
        );
    }

    #[test]
    fn nested_optionals_flatten() {
        let mut registry = TypeRegistry::new();
        let a = registry.declare(TypeDecl::new("A"));
        let b = registry.declare(TypeDecl::new("B"));

        assert_eq!(
            Type::optional(Type::optional(Type::int())),
            Type::optional(Type::int())
        );
        assert_eq!(
            Type::optional(Type::Union(vec![Type::Named(a), Type::Named(b)])),
            Type::Union(vec![Type::Named(a), Type::Named(b), Type::None])
        );
        assert_eq!(Type::union(vec![Type::str(), Type::str()]), Type::str());
    }

    #[test]
    fn mro_diamond() {
        let mut registry = TypeRegistry::new();
        let a = registry.declare(TypeDecl::new("A"));
        let b = registry.declare(TypeDecl::new("B").with_base(a));
        let c = registry.declare(TypeDecl::new("C").with_base(a));
        let d = registry.declare(TypeDecl::new("D").with_base(b).with_base(c));

        assert_eq!(registry.mro(d), vec![d, b, c, a]);
    }

    #[test]
    fn mro_cyclic_bases_terminates() {
        let mut registry = TypeRegistry::new();
        let a = registry.declare(TypeDecl::new("A"));
        let b = registry.declare(TypeDecl::new("B").with_base(a));
        registry[a].bases.push(b);

        assert_eq!(registry.mro(b), vec![b, a]);
    }

    #[test]
    fn conventions_are_inherited() {
        let mut registry = TypeRegistry::new();
        let base = registry.declare(TypeDecl::new("Base").with_convention(Convention::RichRecord));
        let child = registry.declare(TypeDecl::new("Child").with_base(base));

        assert_eq!(registry.conventions(child), vec![Convention::RichRecord]);
    }

    #[test]
    fn attribute_runtime_types() {
        assert_eq!(AttrValue::Int(10).runtime_type(), Type::int());
        assert_eq!(
            AttrValue::List(vec![AttrValue::Int(1)]).runtime_type(),
            Type::builtin("list")
        );
    }
}
