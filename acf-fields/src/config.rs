//! Builder configuration loaded through figment.
//!
//! Sources are merged in precedence order (later sources override earlier
//! ones):
//! 1. Default values
//! 2. An optional configuration file (TOML, YAML or JSON by extension)
//! 3. Environment variables prefixed with `ACF_FIELDS_`

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FieldsError, Result};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "ACF_FIELDS_";

/// Which key prefixes nested fields (sub-fields and layouts) inherit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NestedKeys {
    /// Prefix with the parent field's key: `field_<group>_<parent>_<name>`.
    #[default]
    Parent,
    /// Prefix with the group key only: `field_<group>_<name>`.
    Group,
}

/// Options that shape key derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub nested_keys: NestedKeys,
    /// Field types keyed by a generated token instead of their `name`.
    pub tab_types: Vec<String>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            nested_keys: NestedKeys::Parent,
            tab_types: vec!["tab".to_string()],
        }
    }
}

impl BuilderConfig {
    /// Figment seeded with the default values, for callers that layer their
    /// own providers on top.
    pub fn figment() -> Figment {
        Figment::new().merge(Serialized::defaults(Self::default()))
    }

    /// Defaults overridden by `ACF_FIELDS_*` environment variables.
    pub fn load() -> Result<Self> {
        let config: Self = Self::figment().merge(Env::prefixed(ENV_PREFIX)).extract()?;
        debug!(?config, "loaded builder configuration");
        Ok(config)
    }

    /// Defaults, then the given file, then environment variables.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let figment = match extension.as_str() {
            "toml" => Self::figment().merge(Toml::file(path)),
            "yaml" | "yml" => Self::figment().merge(Yaml::file(path)),
            "json" => Self::figment().merge(Json::file(path)),
            other => {
                return Err(FieldsError::invalid(
                    "config",
                    format!("unsupported configuration file format: '{other}'"),
                ))
            }
        };

        let config: Self = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        debug!(path = %path.display(), ?config, "loaded builder configuration");
        Ok(config)
    }

    pub fn with_nested_keys(mut self, nested_keys: NestedKeys) -> Self {
        self.nested_keys = nested_keys;
        self
    }

    pub fn with_tab_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tab_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Whether fields of this type get a generated key segment.
    pub fn is_tab(&self, field_type: &str) -> bool {
        self.tab_types.iter().any(|t| t == field_type)
    }
}
