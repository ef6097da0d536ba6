//! Extraction from declared field annotations.

use crate::classify::Classification;
use crate::ir::{TypeId, TypeRegistry};
use crate::traits::{FieldSpec, FieldStrategy};

/// Reads annotated fields across the method resolution order.
///
/// Ancestors are visited base-first. A name redeclared by a subclass keeps the
/// position where it first appeared and takes the most-derived type.
pub struct AnnotationStrategy {
    pub classification: Classification,
    /// Whether class-level annotations count as fields.
    pub include_class_vars: bool,
}

impl FieldStrategy for AnnotationStrategy {
    fn classification(&self) -> Classification {
        self.classification
    }

    fn fields(&self, registry: &TypeRegistry, id: TypeId) -> Vec<FieldSpec> {
        let mut out: Vec<FieldSpec> = Vec::new();
        for ancestor in registry.mro(id).into_iter().rev() {
            let Some(decl) = registry.get(ancestor) else {
                continue;
            };
            for field in &decl.fields {
                if field.class_var && !self.include_class_vars {
                    // A subclass may turn an inherited field into a class variable.
                    out.retain(|f| f.name != field.name);
                    continue;
                }
                match out.iter_mut().find(|f| f.name == field.name) {
                    Some(existing) => existing.ty = field.ty.clone(),
                    None => out.push(FieldSpec::new(field.name.clone(), field.ty.clone())),
                }
            }
        }
        out
    }
}
