//! Fields: key derivation, conditional-logic rewriting and recursive
//! serialization.
//!
//! A field key is `field_<prefix>_<segment>`. The prefix comes from the
//! enclosing group, or from the parent field for sub-fields and layouts, so
//! nested fields are namespaced by their ancestry. Keys are issued through
//! the [`Session`] and are unique within it.

use serde_json::Value;
use tracing::trace;

use crate::config::NestedKeys;
use crate::error::{FieldsError, Result};
use crate::group::Group;
use crate::naming::snake_case;
use crate::session::Session;
use crate::types::{keys, kind, settings_from_value, ResolvedRule, Settings};

/// Marker that begins every generated field key.
pub const FIELD_MARKER: &str = "field_";

/// Naming context a field key is derived under.
#[derive(Debug, Clone, Copy)]
pub enum KeyContext<'a> {
    Group(&'a Group),
    Parent(&'a Field<'a>),
}

impl KeyContext<'_> {
    /// The key prefix for a field in this context.
    pub fn prefix(&self, nested_keys: NestedKeys) -> String {
        match (self, nested_keys) {
            (KeyContext::Group(group), _) => group.prefix(),
            (KeyContext::Parent(parent), NestedKeys::Parent) => parent.prefix(),
            (KeyContext::Parent(parent), NestedKeys::Group) => parent.group().prefix(),
        }
    }
}

/// A field built against a group, optionally nested under a parent field.
///
/// The key is derived and registered once, at construction. The parent is
/// only consulted for the key prefix.
#[derive(Debug, Clone)]
pub struct Field<'a> {
    group: &'a Group,
    parent: Option<&'a Field<'a>>,
    settings: Settings,
    key: String,
}

impl<'a> Field<'a> {
    /// Build a top-level field of `group`.
    pub fn new(session: &mut Session, group: &'a Group, settings: Settings) -> Result<Self> {
        let key = session.derive_key(KeyContext::Group(group), &settings)?;
        Ok(Self {
            group,
            parent: None,
            settings,
            key,
        })
    }

    /// Build a field nested under `parent`, in the parent's group.
    pub fn nested(session: &mut Session, parent: &'a Field<'a>, settings: Settings) -> Result<Self> {
        trace!(parent = %parent.key, "building nested field");
        let key = session.derive_key(KeyContext::Parent(parent), &settings)?;
        Ok(Self {
            group: parent.group,
            parent: Some(parent),
            settings,
            key,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn group(&self) -> &'a Group {
        self.group
    }

    pub fn parent(&self) -> Option<&'a Field<'a>> {
        self.parent
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The namespace children of this field are keyed under.
    pub fn prefix(&self) -> String {
        self.key.replace(FIELD_MARKER, "")
    }

    /// Rewrite `conditional_logic` rules to reference field keys.
    ///
    /// Targets are always resolved against the group prefix, never a parent
    /// field's, so a rule pointing at a nested field resolves to the key that
    /// field would have as a direct child of the group.
    pub fn conditional_logic(&self) -> Result<Vec<Vec<ResolvedRule>>> {
        let groups = match self.settings.get(keys::CONDITIONAL_LOGIC) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(groups)) => groups,
            Some(other) => {
                return Err(FieldsError::invalid(
                    keys::CONDITIONAL_LOGIC,
                    format!("expected a sequence of rule groups, found {}", kind(other)),
                ))
            }
        };

        let prefix = self.group.prefix();
        let mut resolved = Vec::with_capacity(groups.len());

        for rules in groups {
            let rules = rules.as_array().ok_or_else(|| {
                FieldsError::invalid(
                    keys::CONDITIONAL_LOGIC,
                    format!("expected a sequence of rules, found {}", kind(rules)),
                )
            })?;

            let mut group = Vec::with_capacity(rules.len());
            for rule in rules {
                let rule = rule.as_object().ok_or_else(|| {
                    FieldsError::invalid(
                        keys::CONDITIONAL_LOGIC,
                        format!("expected a rule mapping, found {}", kind(rule)),
                    )
                })?;
                let name = rule
                    .get(keys::NAME)
                    .and_then(Value::as_str)
                    .ok_or_else(|| FieldsError::missing("conditional_logic.name"))?;

                let field = format!("{FIELD_MARKER}{prefix}_{}", snake_case(name));
                trace!(field = %self.key, target = %field, "resolved conditional rule");

                group.push(ResolvedRule {
                    field,
                    operator: rule.get("operator").cloned().unwrap_or(Value::Null),
                    value: rule.get("value").cloned().unwrap_or(Value::Null),
                });
            }
            resolved.push(group);
        }

        Ok(resolved)
    }

    /// Serialize each `sub_fields` entry as a child of this field.
    pub fn sub_fields(&self, session: &mut Session) -> Result<Vec<Value>> {
        self.children(session, keys::SUB_FIELDS)
    }

    /// Serialize each `layouts` entry as a child of this field.
    pub fn layouts(&self, session: &mut Session) -> Result<Vec<Value>> {
        self.children(session, keys::LAYOUTS)
    }

    fn children(&self, session: &mut Session, setting: &str) -> Result<Vec<Value>> {
        let Some(Value::Array(items)) = self.settings.get(setting) else {
            return Ok(Vec::new());
        };

        let mut children = Vec::with_capacity(items.len());
        for item in items {
            let settings = settings_from_value(setting, item.clone())?;
            let child = Field::nested(session, self, settings)?;
            children.push(Value::Object(child.to_mapping(session)?));
        }
        Ok(children)
    }

    /// The raw settings overlaid with the computed `key`, `conditional_logic`,
    /// `sub_fields` and `layouts`. Overlaid keys keep their position; a key
    /// that was absent is appended.
    pub fn to_mapping(&self, session: &mut Session) -> Result<Settings> {
        let mut mapping = self.settings.clone();
        mapping.insert(keys::KEY.to_string(), Value::String(self.key.clone()));

        if self
            .settings
            .get(keys::CONDITIONAL_LOGIC)
            .is_some_and(|v| !v.is_null())
        {
            let logic = serde_json::to_value(self.conditional_logic()?)?;
            mapping.insert(keys::CONDITIONAL_LOGIC.to_string(), logic);
        }

        if self.settings.get(keys::SUB_FIELDS).is_some_and(Value::is_array) {
            let sub_fields = self.sub_fields(session)?;
            mapping.insert(keys::SUB_FIELDS.to_string(), Value::Array(sub_fields));
        }

        if self.settings.get(keys::LAYOUTS).is_some_and(Value::is_array) {
            let layouts = self.layouts(session)?;
            mapping.insert(keys::LAYOUTS.to_string(), Value::Array(layouts));
        }

        Ok(mapping)
    }
}
