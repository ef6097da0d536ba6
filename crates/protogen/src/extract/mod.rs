//! Field extraction, one strategy per declaration convention.
//!
//! Annotation-based conventions read declared field types and merge them
//! across the method resolution order. Plain classes have no declarations to
//! read and fall back to the runtime types of their class attributes.

mod annotated;
pub(crate) mod plain;

pub use annotated::AnnotationStrategy;
pub use plain::PlainClassStrategy;

use crate::classify::{Classification, classify_decl};
use crate::ir::{TypeId, TypeRegistry};
use crate::traits::{FieldSpec, FieldStrategy};

/// Resolved type hints, class-level annotations included.
pub static RICH_RECORD_STRATEGY: AnnotationStrategy = AnnotationStrategy {
    classification: Classification::RichRecord,
    include_class_vars: true,
};

pub static FIELD_TUPLE_STRATEGY: AnnotationStrategy = AnnotationStrategy {
    classification: Classification::PlainFieldTuple,
    include_class_vars: false,
};

pub static ATTRS_STRATEGY: AnnotationStrategy = AnnotationStrategy {
    classification: Classification::AnnotatedAttributeClass,
    include_class_vars: false,
};

pub static SHAPE_DICT_STRATEGY: AnnotationStrategy = AnnotationStrategy {
    classification: Classification::ShapeDictionary,
    include_class_vars: true,
};

pub static PLAIN_CLASS_STRATEGY: PlainClassStrategy = PlainClassStrategy;

static SCALAR_STRATEGY: NoFields = NoFields(Classification::Scalar);
static UNRECOGNIZED_STRATEGY: NoFields = NoFields(Classification::Unrecognized);

/// Types without any extractable fields.
struct NoFields(Classification);

impl FieldStrategy for NoFields {
    fn classification(&self) -> Classification {
        self.0
    }

    fn fields(&self, _registry: &TypeRegistry, _id: TypeId) -> Vec<FieldSpec> {
        Vec::new()
    }
}

/// Get the extraction strategy for a classification.
pub fn strategy_for(classification: Classification) -> &'static dyn FieldStrategy {
    match classification {
        Classification::RichRecord => &RICH_RECORD_STRATEGY,
        Classification::PlainFieldTuple => &FIELD_TUPLE_STRATEGY,
        Classification::AnnotatedAttributeClass => &ATTRS_STRATEGY,
        Classification::ShapeDictionary => &SHAPE_DICT_STRATEGY,
        Classification::PlainClass => &PLAIN_CLASS_STRATEGY,
        Classification::Scalar => &SCALAR_STRATEGY,
        Classification::Unrecognized => &UNRECOGNIZED_STRATEGY,
    }
}

/// Classify `id` and extract its ordered fields.
pub fn fields(registry: &TypeRegistry, id: TypeId) -> (Classification, Vec<FieldSpec>) {
    let classification = classify_decl(registry, id);
    let fields = strategy_for(classification).fields(registry, id);
    (classification, fields)
}
