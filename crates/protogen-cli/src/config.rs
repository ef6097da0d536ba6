//! Configuration system for protogen.
//!
//! Loads config from:
//! 1. Global: ~/.config/protogen/config.toml
//! 2. Per-project: .protogen/config.toml (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [output]
//! optional_keyword = false
//! indent = 4
//! ```

use protogen::ProtoOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Output configuration. Unset keys leave the lower layer in place.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub optional_keyword: Option<bool>,
    pub indent: Option<usize>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProtogenConfig {
    pub output: OutputConfig,
}

impl ProtogenConfig {
    /// Load configuration for a project.
    ///
    /// Loads global config from ~/.config/protogen/config.toml,
    /// then merges with per-project config from .protogen/config.toml.
    pub fn load(root: &Path) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::load_file(&global_path)? {
                config = config.merge(global);
            }
        }

        let project_path = root.join(".protogen").join("config.toml");
        if let Some(project) = Self::load_file(&project_path)? {
            config = config.merge(project);
        }

        Ok(config)
    }

    /// Get the global config path.
    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("protogen").join("config.toml"))
    }

    /// Load config from a file path. A missing file is not an error.
    fn load_file(path: &Path) -> anyhow::Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(anyhow::anyhow!("failed to read {}: {}", path.display(), e)),
        };
        let config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Some(config))
    }

    /// Merge another config into this one; keys set in `other` win.
    fn merge(self, other: Self) -> Self {
        Self {
            output: OutputConfig {
                optional_keyword: other.output.optional_keyword.or(self.output.optional_keyword),
                indent: other.output.indent.or(self.output.indent),
            },
        }
    }

    /// Rendering options with defaults for unset keys.
    pub fn proto_options(&self) -> ProtoOptions {
        let defaults = ProtoOptions::default();
        ProtoOptions {
            optional_keyword: self
                .output
                .optional_keyword
                .unwrap_or(defaults.optional_keyword),
            indent: self.output.indent.unwrap_or(defaults.indent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ProtogenConfig::default();
        assert_eq!(config.proto_options(), ProtoOptions::default());
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join(".protogen");
        std::fs::create_dir_all(&config_dir).unwrap();

        let mut file = std::fs::File::create(config_dir.join("config.toml")).unwrap();
        writeln!(
            file,
            r#"
[output]
optional_keyword = true
"#
        )
        .unwrap();

        let config = ProtogenConfig::load_file(&config_dir.join("config.toml"))
            .unwrap()
            .unwrap();
        let options = config.proto_options();
        assert!(options.optional_keyword);
        assert_eq!(options.indent, 4);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(
            ProtogenConfig::load_file(&dir.path().join("absent.toml"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_merge_keeps_unset_keys() {
        let global = ProtogenConfig {
            output: OutputConfig {
                optional_keyword: Some(true),
                indent: Some(2),
            },
        };
        let project = ProtogenConfig {
            output: OutputConfig {
                optional_keyword: None,
                indent: Some(8),
            },
        };

        let merged = ProtogenConfig::default().merge(global).merge(project);
        assert_eq!(merged.output.optional_keyword, Some(true));
        assert_eq!(merged.output.indent, Some(8));
    }

    #[test]
    fn test_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\nindent = \"wide\"\n").unwrap();

        assert!(ProtogenConfig::load_file(&path).is_err());
    }
}
