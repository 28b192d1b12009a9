//! Error types for the field builder

use thiserror::Error;

/// Result type for field builder operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur while building fields and groups
#[derive(Debug, Error)]
pub enum FieldsError {
    /// A derived key was already issued in this session
    #[error("field key [{key}] is not unique")]
    KeyCollision { key: String },

    /// A setting needed to derive a key is absent
    #[error("missing required setting: {setting}")]
    MissingSetting { setting: String },

    /// A setting is present but has the wrong shape
    #[error("invalid setting '{setting}': {message}")]
    InvalidSetting { setting: String, message: String },

    /// JSON input could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML input could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Builder configuration could not be extracted
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl FieldsError {
    pub(crate) fn missing(setting: impl Into<String>) -> Self {
        Self::MissingSetting {
            setting: setting.into(),
        }
    }

    pub(crate) fn invalid(setting: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            setting: setting.into(),
            message: message.into(),
        }
    }
}

impl From<figment::Error> for FieldsError {
    fn from(error: figment::Error) -> Self {
        Self::Config(Box::new(error))
    }
}
