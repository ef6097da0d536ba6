//! Rendering options.

use serde::{Deserialize, Serialize};

/// Options controlling the emitted schema text.
///
/// Example config.toml section:
/// ```toml
/// [output]
/// optional_keyword = false   # render `optional` on unwrapped Optional fields
/// indent = 4                 # spaces before each field line
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtoOptions {
    /// Prefix non-repeated fields unwrapped from an optional union with
    /// `optional`. Off by default to match the plain grammar.
    pub optional_keyword: bool,
    /// Spaces before each field line.
    pub indent: usize,
}

impl Default for ProtoOptions {
    fn default() -> Self {
        Self {
            optional_keyword: false,
            indent: 4,
        }
    }
}
