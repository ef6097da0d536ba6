//! Heuristic extraction for plain classes.
//!
//! Plain classes carry no field declarations, so the runtime type of each
//! class-level attribute stands in for a declared type. This is lossy: a
//! default of `10` reads as `int` whatever the author intended, and ordering
//! is alphabetical rather than authoring order.

use crate::classify::Classification;
use crate::ir::{AttrValue, TypeId, TypeRegistry};
use crate::traits::{FieldSpec, FieldStrategy};
use std::collections::BTreeMap;

pub struct PlainClassStrategy;

impl FieldStrategy for PlainClassStrategy {
    fn classification(&self) -> Classification {
        Classification::PlainClass
    }

    fn fields(&self, registry: &TypeRegistry, id: TypeId) -> Vec<FieldSpec> {
        class_attributes(registry, id)
            .into_iter()
            .map(|(name, value)| FieldSpec::new(name, value.runtime_type()))
            .collect()
    }
}

/// Non-callable, non-dunder attributes visible on `id`, sorted by name.
///
/// Attributes are looked up through the method resolution order; a subclass
/// value shadows the inherited one.
pub(crate) fn class_attributes(registry: &TypeRegistry, id: TypeId) -> Vec<(&str, &AttrValue)> {
    let mut visible: BTreeMap<&str, &AttrValue> = BTreeMap::new();
    for ancestor in registry.mro(id) {
        let Some(decl) = registry.get(ancestor) else {
            continue;
        };
        for (name, value) in &decl.attributes {
            visible.entry(name.as_str()).or_insert(value);
        }
    }
    visible
        .into_iter()
        .filter(|(name, value)| !is_dunder(name) && !value.is_callable())
        .collect()
}

fn is_dunder(name: &str) -> bool {
    name.starts_with("__") && name.ends_with("__")
}
