//! Structural classification of types.

use crate::extract::plain;
use crate::ir::{Convention, Type, TypeId, TypeRegistry};
use serde::Serialize;

/// The structural convention a type follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Classification {
    RichRecord,
    PlainFieldTuple,
    AnnotatedAttributeClass,
    ShapeDictionary,
    /// Ad-hoc class described only by its class-level attributes.
    PlainClass,
    Scalar,
    Unrecognized,
}

impl From<Convention> for Classification {
    fn from(convention: Convention) -> Self {
        match convention {
            Convention::RichRecord => Classification::RichRecord,
            Convention::FieldTuple => Classification::PlainFieldTuple,
            Convention::Attrs => Classification::AnnotatedAttributeClass,
            Convention::ShapeDict => Classification::ShapeDictionary,
        }
    }
}

/// Order in which conventions are tried when a declaration satisfies several.
pub const PRECEDENCE: [Convention; 4] = [
    Convention::RichRecord,
    Convention::FieldTuple,
    Convention::Attrs,
    Convention::ShapeDict,
];

/// Classify an arbitrary type expression.
///
/// Generic aliases (lists, dicts, unions) have no fields of their own and are
/// never structured.
pub fn classify(registry: &TypeRegistry, ty: &Type) -> Classification {
    match ty {
        Type::Scalar(_) | Type::None => Classification::Scalar,
        Type::List(_) | Type::Dict(_) | Type::Union(_) => Classification::Unrecognized,
        Type::Named(id) => classify_decl(registry, *id),
    }
}

/// Classify a declaration.
pub fn classify_decl(registry: &TypeRegistry, id: TypeId) -> Classification {
    if registry.get(id).is_none() {
        return Classification::Unrecognized;
    }
    let conventions = registry.conventions(id);
    if let Some(convention) = PRECEDENCE.into_iter().find(|c| conventions.contains(c)) {
        return convention.into();
    }
    if plain::class_attributes(registry, id).is_empty() {
        Classification::Unrecognized
    } else {
        Classification::PlainClass
    }
}

/// Whether `ty` is emitted as its own message.
///
/// True for every declaration handle, including ones that classify as
/// [`Classification::Unrecognized`]; those emit an empty message.
pub fn is_structured(ty: &Type) -> bool {
    matches!(ty, Type::Named(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{AttrValue, TypeDecl};

    #[test]
    fn scalars_and_generics() {
        let registry = TypeRegistry::new();
        assert_eq!(classify(&registry, &Type::int()), Classification::Scalar);
        assert_eq!(classify(&registry, &Type::any()), Classification::Scalar);
        assert_eq!(
            classify(&registry, &Type::list(Type::int())),
            Classification::Unrecognized
        );
        assert!(!is_structured(&Type::dict(Type::str(), Type::int())));
    }

    #[test]
    fn precedence_resolves_ambiguity() {
        let mut registry = TypeRegistry::new();
        let both = registry.declare(
            TypeDecl::new("Both")
                .with_convention(Convention::ShapeDict)
                .with_convention(Convention::FieldTuple),
        );
        let all = registry.declare(
            TypeDecl::new("All")
                .with_convention(Convention::Attrs)
                .with_convention(Convention::RichRecord),
        );

        assert_eq!(
            classify_decl(&registry, both),
            Classification::PlainFieldTuple
        );
        assert_eq!(classify_decl(&registry, all), Classification::RichRecord);
    }

    #[test]
    fn plain_class_needs_attributes() {
        let mut registry = TypeRegistry::new();
        let plain = registry.declare(
            TypeDecl::new("Regular")
                .with_attribute("class_var", AttrValue::Str("class variable".into()))
                .with_attribute("method", AttrValue::Callable),
        );
        let only_methods =
            registry.declare(TypeDecl::new("Methods").with_attribute("run", AttrValue::Callable));
        let empty = registry.declare(TypeDecl::new("Empty"));

        assert_eq!(classify_decl(&registry, plain), Classification::PlainClass);
        assert_eq!(
            classify_decl(&registry, only_methods),
            Classification::Unrecognized
        );
        assert_eq!(classify_decl(&registry, empty), Classification::Unrecognized);
        assert!(is_structured(&Type::Named(empty)));
    }

    #[test]
    fn inherited_convention() {
        let mut registry = TypeRegistry::new();
        let base = registry.declare(TypeDecl::new("Base").with_convention(Convention::Attrs));
        let child = registry.declare(
            TypeDecl::new("Child")
                .with_base(base)
                .with_convention(Convention::ShapeDict),
        );

        assert_eq!(
            classify_decl(&registry, child),
            Classification::AnnotatedAttributeClass
        );
    }
}
