//! Recursive message emission.
//!
//! [`Emitter::emit`] marks a declaration visited *before* walking its fields,
//! which is what makes self-referential and mutually recursive graphs
//! terminate. Nested declarations are emitted while the referencing field is
//! resolved, so their messages land in the accumulator ahead of the message
//! that references them.

use crate::classify::is_structured;
use crate::extract;
use crate::ir::{Type, TypeId, TypeRegistry};
use crate::mapper::{map_key, map_type};
use crate::options::ProtoOptions;
use crate::traits::FieldSpec;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Visited set and message accumulator for one generation run.
#[derive(Debug, Default)]
pub struct EmitContext {
    visited: HashSet<TypeId>,
    messages: Vec<String>,
}

impl EmitContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context treating `visited` as already emitted.
    pub fn with_visited(visited: impl IntoIterator<Item = TypeId>) -> Self {
        Self {
            visited: visited.into_iter().collect(),
            messages: Vec::new(),
        }
    }

    pub fn is_visited(&self, id: TypeId) -> bool {
        self.visited.contains(&id)
    }

    pub fn visited(&self) -> &HashSet<TypeId> {
        &self.visited
    }

    /// Rendered messages in emission order.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Final schema text: messages in reverse emission order, separated by a
    /// blank line.
    pub fn into_schema(self) -> String {
        let mut messages = self.messages;
        messages.reverse();
        messages.join("\n")
    }
}

/// How a field is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Plain { type_name: String },
    Repeated { type_name: String },
    Map { key: String, value: String },
}

/// A field resolved to its wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub number: u32,
    pub kind: FieldKind,
    /// Unwrapped from an optional union.
    pub optional: bool,
}

impl FieldDescriptor {
    /// Field line without indentation or trailing newline.
    pub fn render(&self, options: &ProtoOptions) -> String {
        let Self { name, number, .. } = self;
        match &self.kind {
            FieldKind::Plain { type_name } if self.optional && options.optional_keyword => {
                format!("optional {type_name} {name} = {number};")
            }
            FieldKind::Plain { type_name } => format!("{type_name} {name} = {number};"),
            FieldKind::Repeated { type_name } => {
                format!("repeated {type_name} {name} = {number};")
            }
            FieldKind::Map { key, value } => format!("map<{key}, {value}> {name} = {number};"),
        }
    }
}

/// Walks declarations and renders one message per distinct handle.
pub struct Emitter<'a> {
    registry: &'a TypeRegistry,
    options: &'a ProtoOptions,
}

impl<'a> Emitter<'a> {
    pub fn new(registry: &'a TypeRegistry, options: &'a ProtoOptions) -> Self {
        Self { registry, options }
    }

    /// Emit `id` as `message_name`, after every declaration it reaches.
    ///
    /// Does nothing if `id` is already visited.
    pub fn emit(&self, id: TypeId, message_name: &str, cx: &mut EmitContext) {
        if !cx.visited.insert(id) {
            trace!(name = message_name, "already visited");
            return;
        }

        let (classification, fields) = extract::fields(self.registry, id);
        let mut lines = Vec::with_capacity(fields.len());
        for (number, field) in (1..).zip(&fields) {
            let descriptor = self.resolve(field, number, cx);
            lines.push(descriptor.render(self.options));
        }

        debug!(
            name = message_name,
            ?classification,
            fields = lines.len(),
            "emitted message"
        );
        cx.messages
            .push(render_message(message_name, &lines, self.options.indent));
    }

    /// Resolve one field, emitting any declaration it references first.
    pub fn resolve(&self, field: &FieldSpec, number: u32, cx: &mut EmitContext) -> FieldDescriptor {
        let (ty, optional) = unwrap_optional(&field.ty);
        let kind = match ty {
            Type::List(element) => FieldKind::Repeated {
                type_name: self.reference(element, cx),
            },
            Type::Dict(params) => {
                let (key, value) = match params {
                    Some((key, value)) => (map_key(key), self.reference(value, cx)),
                    None => (map_key(&Type::any()), self.reference(&Type::any(), cx)),
                };
                FieldKind::Map {
                    key: key.to_string(),
                    value,
                }
            }
            other => FieldKind::Plain {
                type_name: self.reference(other, cx),
            },
        };
        FieldDescriptor {
            name: field.name.clone(),
            number,
            kind,
            optional,
        }
    }

    fn reference(&self, ty: &Type, cx: &mut EmitContext) -> String {
        if let Type::Named(id) = ty {
            if let Some(decl) = self.registry.get(*id) {
                self.emit(*id, &decl.name, cx);
                return decl.name.clone();
            }
        }
        let name = map_type(self.registry, ty);
        if !is_structured(ty) && !matches!(ty, Type::Scalar(_)) {
            trace!(?ty, wire = name, "no wire mapping, using fallback");
        }
        name.to_string()
    }
}

/// Strip the absent marker from an optional union.
///
/// Unions written inside the union are read as their members, in place.
/// The first remaining member wins when several are left; a union of only
/// the absent marker resolves to `Any`. Unions without the marker are not
/// optional and are returned unchanged.
pub fn unwrap_optional(ty: &Type) -> (&Type, bool) {
    static ANY: Type = Type::Scalar(crate::ir::Scalar::Any);

    let Type::Union(members) = ty else {
        return (ty, false);
    };
    let mut flat = Vec::with_capacity(members.len());
    flatten_union(members, &mut flat);
    if !flat.contains(&&Type::None) {
        return (ty, false);
    }
    let present = flat.into_iter().find(|m| **m != Type::None).unwrap_or(&ANY);
    (present, true)
}

fn flatten_union<'t>(members: &'t [Type], out: &mut Vec<&'t Type>) {
    for member in members {
        match member {
            Type::Union(inner) => flatten_union(inner, out),
            other => out.push(other),
        }
    }
}

fn render_message(name: &str, lines: &[String], indent: usize) -> String {
    let pad = " ".repeat(indent);
    let mut out = format!("message {name} {{\n");
    for line in lines {
        out.push_str(&pad);
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("}\n");
    out
}
