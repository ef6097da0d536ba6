//! Schema generation entry points.

use crate::emit::{EmitContext, Emitter};
use crate::ir::{TypeId, TypeRegistry};
use crate::options::ProtoOptions;
use std::collections::HashSet;
use tracing::trace;

/// Generate a schema for `models` with default options.
///
/// Types in `already_visited` are treated as emitted by an earlier call: they
/// are referenced by name but produce no message.
pub fn generate(
    registry: &TypeRegistry,
    models: &[TypeId],
    already_visited: Option<&HashSet<TypeId>>,
) -> String {
    generate_with(registry, models, already_visited, &ProtoOptions::default())
}

/// Generate a schema for `models`.
///
/// Each model's subtree is emitted depth-first. The returned text lists
/// messages in reverse emission order, so a top-level message precedes the
/// nested messages it references.
pub fn generate_with(
    registry: &TypeRegistry,
    models: &[TypeId],
    already_visited: Option<&HashSet<TypeId>>,
    options: &ProtoOptions,
) -> String {
    let mut cx = EmitContext::with_visited(already_visited.into_iter().flatten().copied());
    let emitter = Emitter::new(registry, options);
    for &model in models {
        match registry.get(model) {
            Some(decl) => emitter.emit(model, &decl.name, &mut cx),
            None => trace!(?model, "model not in registry"),
        }
    }
    cx.into_schema()
}
