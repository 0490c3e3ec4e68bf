//! The database error taxonomy.
//!
//! Driver-native errors are translated into a [`DatabaseError`] exactly
//! once, by the layer that dispatches on the driver's raw error. The
//! taxonomy itself is a pure data-carrying step: construction never fails,
//! never panics, and never mutates the driver error it wraps.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::driver::DriverError;
use crate::value::ScalarValue;

/// Discriminator for the generic database error kind.
const NAME_DATABASE: &str = "SequelizeDatabaseError";
/// Discriminator for exclusion constraint violations.
const NAME_EXCLUSION: &str = "SequelizeExclusionConstraintError";
/// Discriminator for unique constraint violations.
const NAME_UNIQUE: &str = "SequelizeUniqueConstraintError";
/// Discriminator for foreign key constraint violations.
const NAME_FOREIGN_KEY: &str = "SequelizeForeignKeyConstraintError";

/// Structured payload of a constraint violation.
///
/// Plain data copied from driver-reported metadata at translation time;
/// nothing here is derived or recomputed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintDetail {
    /// Name of the violated constraint.
    pub constraint: String,
    /// Offending value per column participating in the constraint.
    pub fields: BTreeMap<String, ScalarValue>,
    /// Table the constraint is defined on.
    pub table: String,
}

/// The closed set of database error kinds.
///
/// Callers catching a [`DatabaseError`] branch on this to reach the
/// kind-specific payload without re-parsing driver message text.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Generic database error with no structured payload.
    Database,
    /// An exclusion constraint was violated (uniqueness generalized to
    /// arbitrary comparison operators, e.g. overlapping ranges).
    ExclusionConstraint(ConstraintDetail),
    /// A unique constraint was violated.
    UniqueConstraint(ConstraintDetail),
    /// A foreign key constraint was violated.
    ForeignKeyConstraint(ConstraintDetail),
}

impl ErrorKind {
    /// Returns the stable discriminator string for this kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Database => NAME_DATABASE,
            Self::ExclusionConstraint(_) => NAME_EXCLUSION,
            Self::UniqueConstraint(_) => NAME_UNIQUE,
            Self::ForeignKeyConstraint(_) => NAME_FOREIGN_KEY,
        }
    }
}

/// Options for constructing a constraint-kind [`DatabaseError`].
///
/// Every field is optional; defaults are substituted eagerly at
/// construction time so the error is always fully populated:
///
/// - `parent` defaults to an all-empty [`DriverError`]
/// - effective message: `message` override, else the parent's message,
///   else the empty string
/// - `constraint` and `table` default to empty strings, `fields` to an
///   empty map
#[derive(Debug, Clone, Default)]
pub struct ConstraintErrorOptions {
    /// The driver-native error being translated.
    pub parent: Option<DriverError>,
    /// Explicit message override. Wins over the parent's message.
    pub message: Option<String>,
    /// Explicit stack trace override.
    pub stack: Option<String>,
    /// Name of the violated constraint.
    pub constraint: Option<String>,
    /// Offending value per column.
    pub fields: Option<BTreeMap<String, ScalarValue>>,
    /// Table the constraint is defined on.
    pub table: Option<String>,
}

impl ConstraintErrorOptions {
    fn into_detail(self) -> (ConstraintDetail, Option<DriverError>, Option<String>, Option<String>) {
        let detail = ConstraintDetail {
            constraint: self.constraint.unwrap_or_default(),
            fields: self.fields.unwrap_or_default(),
            table: self.table.unwrap_or_default(),
        };
        (detail, self.parent, self.message, self.stack)
    }
}

/// A typed database error.
///
/// Immutable after construction. The driver error that triggered it is
/// always retained as the source and is reachable via [`Self::cause`] or
/// [`std::error::Error::source`].
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct DatabaseError {
    message: String,
    #[source]
    cause: DriverError,
    stack: Option<String>,
    kind: ErrorKind,
}

impl DatabaseError {
    fn build(
        kind: ErrorKind,
        parent: Option<DriverError>,
        message: Option<String>,
        stack: Option<String>,
    ) -> Self {
        let cause = parent.unwrap_or_default();
        let message = message.unwrap_or_else(|| cause.message.clone());
        Self {
            message,
            cause,
            stack,
            kind,
        }
    }

    /// Creates a generic database error wrapping the given driver error.
    pub fn generic(parent: impl Into<DriverError>) -> Self {
        Self::build(ErrorKind::Database, Some(parent.into()), None, None)
    }

    /// Creates an exclusion constraint violation error.
    #[must_use]
    pub fn exclusion_constraint(options: ConstraintErrorOptions) -> Self {
        let (detail, parent, message, stack) = options.into_detail();
        Self::build(ErrorKind::ExclusionConstraint(detail), parent, message, stack)
    }

    /// Creates a unique constraint violation error.
    #[must_use]
    pub fn unique_constraint(options: ConstraintErrorOptions) -> Self {
        let (detail, parent, message, stack) = options.into_detail();
        Self::build(ErrorKind::UniqueConstraint(detail), parent, message, stack)
    }

    /// Creates a foreign key constraint violation error.
    #[must_use]
    pub fn foreign_key_constraint(options: ConstraintErrorOptions) -> Self {
        let (detail, parent, message, stack) = options.into_detail();
        Self::build(ErrorKind::ForeignKeyConstraint(detail), parent, message, stack)
    }

    /// Returns the stable discriminator for this error's kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Returns the error kind with its payload.
    #[must_use]
    pub const fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the effective message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the driver error this was translated from.
    #[must_use]
    pub const fn cause(&self) -> &DriverError {
        &self.cause
    }

    /// Returns the stack trace override, if one was supplied.
    #[must_use]
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    /// Returns the constraint payload for the constraint-violation kinds.
    #[must_use]
    pub const fn constraint_detail(&self) -> Option<&ConstraintDetail> {
        match &self.kind {
            ErrorKind::Database => None,
            ErrorKind::ExclusionConstraint(d)
            | ErrorKind::UniqueConstraint(d)
            | ErrorKind::ForeignKeyConstraint(d) => Some(d),
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        Self::generic(DriverError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ToScalarValue;

    fn overlap_options() -> ConstraintErrorOptions {
        let mut fields = BTreeMap::new();
        fields.insert("start".to_string(), 5.to_scalar_value());
        fields.insert("end".to_string(), 10.to_scalar_value());
        ConstraintErrorOptions {
            parent: Some(DriverError::new("INSERT...", "ExclusionViolation", "conflict")),
            constraint: Some("no_overlap".to_string()),
            fields: Some(fields),
            table: Some("bookings".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_payload_copied_exactly() {
        let err = DatabaseError::exclusion_constraint(overlap_options());
        let detail = err.constraint_detail().unwrap();
        assert_eq!(detail.constraint, "no_overlap");
        assert_eq!(detail.table, "bookings");
        assert_eq!(detail.fields["start"], ScalarValue::Int(5));
        assert_eq!(detail.fields["end"], ScalarValue::Int(10));
        assert_eq!(err.message(), "conflict");
        assert_eq!(err.cause().sql, "INSERT...");
        assert_eq!(err.cause().name, "ExclusionViolation");
    }

    #[test]
    fn test_fully_defaulted_options() {
        let err = DatabaseError::exclusion_constraint(ConstraintErrorOptions::default());
        assert_eq!(err.name(), "SequelizeExclusionConstraintError");
        assert_eq!(err.message(), "");
        assert_eq!(err.cause(), &DriverError::default());
        let detail = err.constraint_detail().unwrap();
        assert_eq!(detail.constraint, "");
        assert_eq!(detail.table, "");
        assert!(detail.fields.is_empty());
    }

    #[test]
    fn test_parent_message_used_when_no_override() {
        let err = DatabaseError::exclusion_constraint(ConstraintErrorOptions {
            parent: Some(DriverError::new("", "", "dup key")),
            ..Default::default()
        });
        assert_eq!(err.message(), "dup key");
    }

    #[test]
    fn test_explicit_message_wins() {
        let err = DatabaseError::exclusion_constraint(ConstraintErrorOptions {
            parent: Some(DriverError::new("", "", "dup key")),
            message: Some("range overlap on bookings".to_string()),
            ..Default::default()
        });
        assert_eq!(err.message(), "range overlap on bookings");
    }

    #[test]
    fn test_discriminator_is_stable() {
        let with_payload = DatabaseError::exclusion_constraint(overlap_options());
        let empty = DatabaseError::exclusion_constraint(ConstraintErrorOptions::default());
        assert_eq!(with_payload.name(), "SequelizeExclusionConstraintError");
        assert_eq!(empty.name(), "SequelizeExclusionConstraintError");
    }

    #[test]
    fn test_sibling_discriminators() {
        let unique = DatabaseError::unique_constraint(ConstraintErrorOptions::default());
        let fk = DatabaseError::foreign_key_constraint(ConstraintErrorOptions::default());
        assert_eq!(unique.name(), "SequelizeUniqueConstraintError");
        assert_eq!(fk.name(), "SequelizeForeignKeyConstraintError");
    }

    #[test]
    fn test_source_chain_preserves_cause() {
        use std::error::Error as _;
        let err = DatabaseError::exclusion_constraint(overlap_options());
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "conflict");
    }

    #[test]
    fn test_generic_from_sqlx() {
        let err = DatabaseError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.name(), "SequelizeDatabaseError");
        assert!(err.constraint_detail().is_none());
        assert!(!err.message().is_empty());
    }

    #[test]
    fn test_stack_override() {
        let err = DatabaseError::exclusion_constraint(ConstraintErrorOptions {
            stack: Some("at insert_booking".to_string()),
            ..Default::default()
        });
        assert_eq!(err.stack(), Some("at insert_booking"));
    }
}
