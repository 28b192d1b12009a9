//! Registration sessions.
//!
//! A [`Session`] owns everything key derivation needs: the registry of keys
//! already issued, the builder configuration and the token source for tab
//! fields. Keys are unique per session; independent builds (or test cases)
//! each start from a fresh session or call [`Session::reset`].

use std::fmt;

use tracing::debug;

use crate::config::BuilderConfig;
use crate::error::{FieldsError, Result};
use crate::field::{Field, KeyContext, FIELD_MARKER};
use crate::group::Group;
use crate::naming::{snake_case, TokenSource, UlidTokens};
use crate::registry::KeyRegistry;
use crate::types::{keys, optional_str, required_str, Settings};

/// One registration session: a key registry plus the collaborators used to
/// derive keys.
pub struct Session {
    registry: KeyRegistry,
    config: BuilderConfig,
    tokens: Box<dyn TokenSource>,
}

impl Session {
    /// A session with default configuration and ULID tab tokens.
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            registry: KeyRegistry::new(),
            config,
            tokens: Box::new(UlidTokens),
        }
    }

    /// Replace the token source used for tab fields.
    pub fn with_tokens(mut self, tokens: impl TokenSource + 'static) -> Self {
        self.tokens = Box::new(tokens);
        self
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    /// Forget every issued key so the session can be reused for an
    /// unrelated build.
    pub fn reset(&mut self) {
        self.registry.clear();
    }

    /// Build a top-level field of `group`.
    pub fn field<'a>(&mut self, group: &'a Group, settings: Settings) -> Result<Field<'a>> {
        Field::new(self, group, settings)
    }

    /// Serialize a whole group.
    pub fn group_mapping(&mut self, group: &Group) -> Result<Settings> {
        group.to_mapping(self)
    }

    /// Derive a field key in `context` and register it.
    ///
    /// Fails with [`FieldsError::KeyCollision`] if the key was already
    /// issued in this session.
    pub fn derive_key(&mut self, context: KeyContext<'_>, settings: &Settings) -> Result<String> {
        let segment = match optional_str(settings, keys::TYPE)? {
            Some(field_type) if self.config.is_tab(field_type) => self.tokens.next_token(),
            _ => {
                let name = required_str(settings, keys::NAME)?;
                let slug = snake_case(name);
                if slug.is_empty() {
                    return Err(FieldsError::invalid(
                        keys::NAME,
                        format!("'{name}' has no characters usable in a key"),
                    ));
                }
                slug
            }
        };

        let prefix = context.prefix(self.config.nested_keys);
        let key = format!("{FIELD_MARKER}{prefix}_{segment}");
        self.registry.register(key.clone())?;

        debug!(%key, "derived field key");
        Ok(key)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
