//! Error types for model definition and registration.

use thiserror::Error;

/// Errors raised while defining, registering, or using models.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// Database error surfaced through the taxonomy.
    #[error(transparent)]
    Database(#[from] arbor_core::DatabaseError),

    /// A model with this name is already registered.
    #[error("model '{0}' is already registered")]
    DuplicateModel(String),

    /// No model with this name is registered.
    #[error("unknown model '{0}'")]
    UnknownModel(String),

    /// An attribute name appears twice on the same model.
    #[error("model '{model}' declares attribute '{attribute}' more than once")]
    DuplicateAttribute {
        /// Model name.
        model: String,
        /// The repeated attribute name.
        attribute: String,
    },

    /// A getter, setter, or scope name shadows an attribute.
    #[error("{kind} '{name}' on model '{model}' collides with an attribute of the same name")]
    NameCollision {
        /// What kind of member collides ("getter", "setter", "scope").
        kind: &'static str,
        /// Model name.
        model: String,
        /// The colliding name.
        name: String,
    },

    /// Something referenced an attribute the model does not declare.
    #[error("model '{model}' has no attribute '{attribute}' (referenced by {context})")]
    UnknownAttribute {
        /// Model name.
        model: String,
        /// The missing attribute name.
        attribute: String,
        /// What referenced it (an index, scope, association, payload).
        context: String,
    },

    /// The model declares no primary key.
    #[error("model '{0}' has no primary key attribute")]
    MissingPrimaryKey(String),

    /// More than one attribute auto-increments.
    #[error("model '{0}' declares more than one auto-increment attribute")]
    MultipleAutoIncrement(String),

    /// A scope was invoked by a name the model does not define.
    #[error("model '{model}' has no scope '{scope}'")]
    UnknownScope {
        /// Model name.
        model: String,
        /// The missing scope name.
        scope: String,
    },

    /// A static scope was invoked with arguments.
    #[error("scope '{scope}' on model '{model}' is static and takes no arguments")]
    StaticScopeArguments {
        /// Model name.
        model: String,
        /// Scope name.
        scope: String,
    },

    /// A creation payload omits an attribute that is required at creation.
    #[error("attribute '{attribute}' of model '{model}' is required at creation")]
    MissingRequiredAttribute {
        /// Model name.
        model: String,
        /// The omitted attribute.
        attribute: String,
    },

    /// An association alias was looked up but never declared.
    #[error("model '{model}' has no association '{alias}'")]
    UnknownAssociation {
        /// Model name.
        model: String,
        /// The missing alias.
        alias: String,
    },

    /// A hook was dispatched with a payload shaped for a different phase.
    #[error("hook phase '{phase}' does not accept the supplied context")]
    HookContextMismatch {
        /// The dispatched phase.
        phase: &'static str,
    },

    /// Generic validation failure.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type alias for model definition operations.
pub type Result<T> = std::result::Result<T, DefinitionError>;
