//! # arbor-orm
//!
//! Declarative model definitions validated at registration time.
//!
//! A model is described as a value: its attributes (with nullability,
//! defaults, and creation-optionality), named indexes, computed
//! accessors, parameterized scopes, lifecycle hooks, and associations.
//! The [`Registry`] checks each definition when it is registered and
//! resolves associations across definitions once all models are in.
//!
//! ## Quick start
//!
//! ```
//! use arbor_orm::{
//!     AssociationDef, AttributeDef, AttributeType, Filter, ModelDef, Registry, Scope,
//! };
//!
//! let mut registry = Registry::new();
//!
//! registry.register(
//!     ModelDef::new("User")
//!         .table("users")
//!         .attribute(
//!             AttributeDef::new("id", AttributeType::BigInt)
//!                 .primary_key()
//!                 .auto_increment(),
//!         )
//!         .attribute(AttributeDef::new("first_name", AttributeType::Text).not_null())
//!         .attribute(AttributeDef::new("group_id", AttributeType::BigInt))
//!         .scope("without_first_name", Scope::Static(Filter::is_null("first_name")))
//!         .association(AssociationDef::belongs_to("group", "UserGroup").foreign_key("group_id")),
//! )?;
//!
//! registry.define("UserGroup", |def| {
//!     def.table("user_groups")
//!         .attribute(
//!             AttributeDef::new("id", AttributeType::BigInt)
//!                 .primary_key()
//!                 .auto_increment(),
//!         )
//!         .attribute(AttributeDef::new("name", AttributeType::Text).not_null())
//! })?;
//!
//! registry.resolve_associations()?;
//! # Ok::<(), arbor_orm::DefinitionError>(())
//! ```
//!
//! Failures coming back from the driver layer surface through the typed
//! taxonomy in [`arbor_core`], so callers can branch on the error kind
//! instead of parsing driver message text.

mod association;
mod error;
mod filter;
mod hooks;
mod model;
mod registry;
mod schema;
mod scope;

pub use association::{Association, AssociationDef, AssociationKind};
pub use error::{DefinitionError, Result};
pub use filter::{CompareOp, Filter, FilterExpr};
pub use hooks::{DestroyOptions, FindOptions, HookContext, HookPhase, HookRegistry};
pub use model::{Entity, Getter, Instance, ModelDef, Setter};
pub use registry::Registry;
pub use schema::{AttributeDef, AttributeType, DefaultValue, IndexDef, IndexMethod};
pub use scope::{Scope, ScopeCall};

// Re-export the shared contract types.
pub use arbor_core::{
    ConstraintDetail, ConstraintErrorOptions, DatabaseError, DriverError, ErrorKind, ScalarValue,
    ToScalarValue,
};
