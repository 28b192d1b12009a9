//! Field group builder for Advanced Custom Fields
//!
//! `acf-fields` turns plain field specifications into the nested mappings the
//! ACF plugin registers. It is schema-agnostic: settings are JSON objects and
//! only a few keys are interpreted.
//!
//! # Architecture
//!
//! - **Keys**: every field gets `field_<prefix>_<name>`, where the prefix is the
//!   group key or, for nested fields, the parent field's key
//! - **Sessions**: keys are unique per [`Session`]; there is no global state
//! - **Conditional logic**: rules naming a field are rewritten to its key
//! - **Pass-through**: settings the builder does not interpret are kept as-is
//!
//! ```rust
//! use acf_fields::{Group, Session, Rule, conditional_logic};
//! use serde_json::json;
//!
//! let group = Group::new("employee").with_title("Employee");
//! let mut session = Session::new();
//!
//! let mut settings = json!({"name": "website", "label": "Website", "type": "url"})
//!     .as_object()
//!     .cloned()
//!     .unwrap();
//! settings.insert(
//!     "conditional_logic".into(),
//!     conditional_logic([vec![Rule::new("has_website", 1)]]),
//! );
//!
//! let field = session.field(&group, settings)?;
//! let mapping = field.to_mapping(&mut session)?;
//! assert_eq!(mapping["key"], "field_employee_website");
//! assert_eq!(
//!     mapping["conditional_logic"][0][0]["field"],
//!     "field_employee_has_website"
//! );
//! # Ok::<(), acf_fields::FieldsError>(())
//! ```

pub mod config;
pub mod error;
pub mod field;
pub mod group;
pub mod naming;
pub mod registry;
pub mod session;
pub mod types;

pub use config::{BuilderConfig, NestedKeys};
pub use error::{FieldsError, Result};
pub use field::{Field, KeyContext, FIELD_MARKER};
pub use group::{Group, GROUP_MARKER};
pub use naming::{snake_case, SequentialTokens, TokenSource, UlidTokens};
pub use registry::KeyRegistry;
pub use session::Session;
pub use types::{conditional_logic, settings_from_value, ResolvedRule, Rule, Settings};
