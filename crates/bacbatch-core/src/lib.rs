//! Addressing types and value model for batched BACnet property reads.
//!
//! `bacbatch-core` provides the immutable value types that identify a
//! property read — a device address, an object reference, and a property
//! reference — together with the labeled read descriptor built from them,
//! the outcome union a read resolves to, and the error taxonomy shared by
//! the bacbatch crate family.
//!
//! Every addressing type has a canonical text form (`Display`) and parses
//! back from it (`FromStr`), so descriptors can be built from raw text
//! tuples such as `("Space Temp", "10.0.0.5", "analog-value,104",
//! "present-value")`.
//!
//! # Feature flags
//!
//! - **`serde`** — serialization of [`PropertyValue`] and [`ReadOutcome`]
//!   for label-keyed JSON result sinks.

/// Device network addresses.
pub mod address;
/// Parse and read error types.
pub mod error;
/// Object kinds and object references.
pub mod object;
/// Property identifiers and property references.
pub mod property;
/// The labeled read descriptor.
pub mod spec;
/// Property values and read outcomes.
pub mod value;

pub use address::DeviceAddress;
pub use error::{ReadError, ReferenceError};
pub use object::{ObjectKind, ObjectRef};
pub use property::{PropertyId, PropertyRef};
pub use spec::ReadSpec;
pub use value::{PropertyValue, ReadOutcome};
