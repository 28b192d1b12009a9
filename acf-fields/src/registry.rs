//! Session-scoped registry of issued field keys.

use indexmap::IndexSet;
use tracing::{debug, warn};

use crate::error::{FieldsError, Result};

/// Append-only set of keys issued during one registration session.
///
/// Keys are kept in issue order. Nothing is ever removed except by
/// [`KeyRegistry::clear`], which starts a new session.
#[derive(Debug, Clone, Default)]
pub struct KeyRegistry {
    keys: IndexSet<String>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key, failing if it was already issued.
    pub fn register(&mut self, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        if self.keys.contains(&key) {
            warn!(%key, "field key collision");
            return Err(FieldsError::KeyCollision { key });
        }
        debug!(%key, issued = self.keys.len() + 1, "registered field key");
        self.keys.insert(key);
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Issued keys, oldest first.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Forget every issued key.
    pub fn clear(&mut self) {
        debug!(dropped = self.keys.len(), "cleared key registry");
        self.keys.clear();
    }
}
