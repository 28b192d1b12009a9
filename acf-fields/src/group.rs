//! Field groups: the root naming context for fields.

use serde_json::Value;
use tracing::debug;

use crate::error::{FieldsError, Result};
use crate::field::Field;
use crate::session::Session;
use crate::types::{keys, kind, required_str, settings_from_value, Settings};

/// Marker that begins every group key understood by the host plugin.
pub const GROUP_MARKER: &str = "group_";

/// A field group: a stable caller-supplied key plus raw field settings.
///
/// The group never rewrites its fields; it only provides the key prefix
/// they are named under and serializes them on request.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    key: String,
    settings: Settings,
}

impl Group {
    /// An empty group with the given key.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let mut settings = Settings::new();
        settings.insert(keys::KEY.to_string(), Value::String(key.clone()));
        Self { key, settings }
    }

    /// A group from its full settings (`key`, `title`, `fields`, ...).
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let key = required_str(&settings, keys::KEY)?.to_string();
        if let Some(fields) = settings.get(keys::FIELDS) {
            if !fields.is_array() {
                return Err(FieldsError::invalid(
                    keys::FIELDS,
                    format!("expected a sequence, found {}", kind(fields)),
                ));
            }
        }
        Ok(Self { key, settings })
    }

    pub fn from_json(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_settings(settings_from_value("group", value)?)
    }

    pub fn from_yaml(input: &str) -> Result<Self> {
        let value: Value = serde_yaml_ng::from_str(input)?;
        Self::from_settings(settings_from_value("group", value)?)
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with_setting("title", Value::String(title.into()))
    }

    /// Set an arbitrary pass-through setting (`location`, `position`, ...).
    ///
    /// Setting `key` is ignored; the key is fixed at construction.
    pub fn with_setting(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if name != keys::KEY {
            self.settings.insert(name, value.into());
        }
        self
    }

    /// Append a raw field specification.
    pub fn with_field(mut self, field: Settings) -> Self {
        let fields = self
            .settings
            .entry(keys::FIELDS)
            .or_insert_with(|| Value::Array(Vec::new()));
        match fields {
            Value::Array(items) => items.push(Value::Object(field)),
            other => *other = Value::Array(vec![Value::Object(field)]),
        }
        self
    }

    /// The key as supplied by the caller.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The namespace fields of this group are keyed under.
    pub fn prefix(&self) -> String {
        self.key.replace(GROUP_MARKER, "")
    }

    /// The key handed to the host plugin, always carrying the group marker.
    pub fn registration_key(&self) -> String {
        if self.key.starts_with(GROUP_MARKER) {
            self.key.clone()
        } else {
            format!("{GROUP_MARKER}{}", self.key)
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Raw field specifications, in declaration order.
    pub fn fields(&self) -> Result<Vec<Settings>> {
        match self.settings.get(keys::FIELDS) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| settings_from_value(keys::FIELDS, item.clone()))
                .collect(),
            Some(other) => Err(FieldsError::invalid(
                keys::FIELDS,
                format!("expected a sequence, found {}", kind(other)),
            )),
        }
    }

    /// Serialize the group and every field in it.
    pub fn to_mapping(&self, session: &mut Session) -> Result<Settings> {
        let mut fields = Vec::new();
        for settings in self.fields()? {
            let field = Field::new(session, self, settings)?;
            fields.push(Value::Object(field.to_mapping(session)?));
        }

        let mut mapping = self.settings.clone();
        mapping.insert(keys::KEY.to_string(), Value::String(self.registration_key()));
        mapping.insert(keys::FIELDS.to_string(), Value::Array(fields));

        debug!(
            group = %self.key,
            fields = mapping[keys::FIELDS].as_array().map_or(0, Vec::len),
            "serialized field group"
        );
        Ok(mapping)
    }
}
