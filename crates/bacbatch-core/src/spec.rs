use crate::address::DeviceAddress;
use crate::error::ReferenceError;
use crate::object::ObjectRef;
use crate::property::PropertyRef;

/// One labeled property read: which device, which object, which property,
/// and the caller-chosen label the outcome is reported under.
///
/// Labels must be unique within one batch. A label-keyed result sink
/// silently overwrites on duplicates; the batch engine does not enforce
/// uniqueness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadSpec {
    pub label: String,
    pub address: DeviceAddress,
    pub object: ObjectRef,
    pub property: PropertyRef,
}

impl ReadSpec {
    pub fn new(
        label: impl Into<String>,
        address: DeviceAddress,
        object: ObjectRef,
        property: PropertyRef,
    ) -> Self {
        Self {
            label: label.into(),
            address,
            object,
            property,
        }
    }

    /// Builds a descriptor from raw text, the shape drivers hold their
    /// static point lists in: `("Space Temp", "10.0.0.5",
    /// "analog-value,104", "present-value")`.
    ///
    /// Fails with [`ReferenceError::MalformedReference`] before any
    /// network activity if any part does not parse.
    pub fn parse(
        label: &str,
        address: &str,
        object: &str,
        property: &str,
    ) -> Result<Self, ReferenceError> {
        Ok(Self {
            label: label.to_string(),
            address: address.parse()?,
            object: object.parse()?,
            property: property.parse()?,
        })
    }
}
