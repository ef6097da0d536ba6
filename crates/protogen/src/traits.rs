//! Traits for field extraction strategies.

use crate::classify::Classification;
use crate::ir::{Type, TypeId, TypeRegistry};

/// A field as reported by an extraction strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub ty: Type,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Reads the ordered field list of a declaration following one convention.
///
/// Each [`Classification`] has exactly one strategy, looked up through
/// [`strategy_for`](crate::extract::strategy_for). Supporting a new
/// convention means adding a classification and a strategy for it.
///
/// # Implementing Custom Strategies
///
/// ```ignore
/// use protogen::{Classification, FieldSpec, FieldStrategy, TypeId, TypeRegistry};
///
/// struct Reversed;
///
/// impl FieldStrategy for Reversed {
///     fn classification(&self) -> Classification { Classification::ShapeDictionary }
///     fn fields(&self, registry: &TypeRegistry, id: TypeId) -> Vec<FieldSpec> {
///         /* ... */
///     }
/// }
/// ```
pub trait FieldStrategy: Send + Sync {
    /// Classification this strategy extracts fields for.
    fn classification(&self) -> Classification;

    /// Ordered fields of `id`. Never fails; unknown handles have no fields.
    fn fields(&self, registry: &TypeRegistry, id: TypeId) -> Vec<FieldSpec>;
}
