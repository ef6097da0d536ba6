//! Protobuf message schema generation from structured type declarations.
//!
//! `protogen` takes declarations written in several incompatible conventions
//! (validated records, field tuples, attrs-style classes, shape dictionaries
//! and ad-hoc classes) and renders them as flat `message` definitions with
//! numbered, typed fields.
//!
//! # Architecture
//!
//! ```text
//! generate ──> Emitter ──┬─> classify   (which convention?)
//!   (generate.rs)        ├─> extract    (ordered fields, one strategy per convention)
//!                        ├─> mapper     (scalar -> wire type)
//!                        └─> Emitter    (nested and map-value declarations)
//! ```
//!
//! # Example
//!
//! ```
//! use protogen::{Convention, Type, TypeDecl, TypeRegistry, generate};
//!
//! let mut registry = TypeRegistry::new();
//! let point = registry.declare(
//!     TypeDecl::new("Point")
//!         .with_convention(Convention::RichRecord)
//!         .with_field("x", Type::int())
//!         .with_field("y", Type::int()),
//! );
//!
//! let schema = generate(&registry, &[point], None);
//! assert_eq!(schema, "message Point {\n    int32 x = 1;\n    int32 y = 2;\n}\n");
//! ```
//!
//! # Feature Flags
//!
//! - `manifest` - load declarations from JSON/TOML manifests (default)

pub mod classify;
pub mod emit;
pub mod extract;
pub mod generate;
#[cfg(feature = "manifest")]
pub mod input;
pub mod ir;
pub mod mapper;
pub mod options;
pub mod traits;

// Re-export commonly used items
pub use classify::{Classification, classify, classify_decl, is_structured};
pub use emit::{EmitContext, Emitter, FieldDescriptor, FieldKind};
pub use extract::strategy_for;
pub use generate::{generate, generate_with};
pub use ir::{AttrValue, Convention, DeclaredField, Scalar, Type, TypeDecl, TypeId, TypeRegistry};
pub use mapper::{map_key, map_scalar, map_type};
pub use options::ProtoOptions;
pub use traits::{FieldSpec, FieldStrategy};

#[cfg(feature = "manifest")]
pub use input::{LoadError, Manifest, ManifestFormat, parse_type_expr};
