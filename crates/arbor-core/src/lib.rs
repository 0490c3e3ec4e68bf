//! # arbor-core
//!
//! The contract layer shared by the arbor crates:
//!
//! - [`ScalarValue`] and [`ToScalarValue`] for attribute values, filter
//!   operands, and constraint-error payloads
//! - [`DriverError`], the minimal wrapper around a driver-native error
//! - [`DatabaseError`] and [`ErrorKind`], the typed database error taxonomy
//!
//! ## Error taxonomy
//!
//! Failures reported by the database driver are translated exactly once, at
//! the point the operation fails, into a [`DatabaseError`]. Each error kind
//! carries its own structured payload so callers can branch on the kind
//! instead of re-parsing driver-specific message text:
//!
//! ```
//! use arbor_core::{ConstraintErrorOptions, DatabaseError, DriverError, ErrorKind};
//!
//! let err = DatabaseError::exclusion_constraint(ConstraintErrorOptions {
//!     parent: Some(DriverError::new("INSERT ...", "ExclusionViolation", "conflict")),
//!     constraint: Some("no_overlap".into()),
//!     table: Some("bookings".into()),
//!     ..Default::default()
//! });
//!
//! match err.kind() {
//!     ErrorKind::ExclusionConstraint(detail) => {
//!         assert_eq!(detail.constraint, "no_overlap");
//!         assert_eq!(detail.table, "bookings");
//!     }
//!     _ => unreachable!(),
//! }
//! assert_eq!(err.name(), "SequelizeExclusionConstraintError");
//! assert_eq!(err.message(), "conflict");
//! ```

mod driver;
mod error;
mod value;

pub use driver::DriverError;
pub use error::{ConstraintDetail, ConstraintErrorOptions, DatabaseError, ErrorKind};
pub use value::{ScalarValue, ToScalarValue};
