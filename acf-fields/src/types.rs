//! Settings mappings and conditional-logic rules.
//!
//! Field and group settings are schema-agnostic JSON objects. Only a handful
//! of keys are interpreted by the builder; everything else passes through.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FieldsError, Result};

/// A field or group specification: string keys to arbitrary values, in
/// insertion order.
pub type Settings = serde_json::Map<String, Value>;

/// Setting names the builder reads or overlays.
pub mod keys {
    pub const KEY: &str = "key";
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const FIELDS: &str = "fields";
    pub const CONDITIONAL_LOGIC: &str = "conditional_logic";
    pub const SUB_FIELDS: &str = "sub_fields";
    pub const LAYOUTS: &str = "layouts";
}

/// One AND-rule of a conditional-logic group, as written by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rule {
    pub name: String,
    pub operator: String,
    pub value: Value,
}

impl Rule {
    /// Equality rule: show when `name` equals `value`.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with_operator(name, "==", value)
    }

    pub fn with_operator(
        name: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "operator": self.operator,
            "value": self.value,
        })
    }
}

/// A rule after rewriting: `field` holds the referenced field's key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedRule {
    pub field: String,
    pub operator: Value,
    pub value: Value,
}

/// Build a `conditional_logic` value from OR-groups of AND-rules.
pub fn conditional_logic<G>(groups: G) -> Value
where
    G: IntoIterator,
    G::Item: IntoIterator<Item = Rule>,
{
    Value::Array(
        groups
            .into_iter()
            .map(|rules| Value::Array(rules.into_iter().map(|r| r.to_value()).collect()))
            .collect(),
    )
}

/// Parse a settings mapping out of a JSON value.
pub fn settings_from_value(setting: &str, value: Value) -> Result<Settings> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(FieldsError::invalid(
            setting,
            format!("expected a mapping, found {}", kind(&other)),
        )),
    }
}

/// Read an optional string setting, rejecting non-string values.
pub(crate) fn optional_str<'a>(settings: &'a Settings, setting: &str) -> Result<Option<&'a str>> {
    match settings.get(setting) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(FieldsError::invalid(
            setting,
            format!("expected a string, found {}", kind(other)),
        )),
    }
}

/// Read a required string setting.
pub(crate) fn required_str<'a>(settings: &'a Settings, setting: &str) -> Result<&'a str> {
    optional_str(settings, setting)?.ok_or_else(|| FieldsError::missing(setting))
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
