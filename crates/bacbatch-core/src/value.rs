use crate::error::ReadError;

/// A decoded BACnet property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Boolean(bool),
    Unsigned(u32),
    Signed(i32),
    Real(f32),
    Double(f64),
    CharacterString(String),
    Enumerated(u32),
}

/// The result of attempting one descriptor's read.
///
/// Exactly one outcome is produced per submitted
/// [`ReadSpec`](crate::ReadSpec). Errors are ordinary outcomes: one
/// unreadable point does not abort its siblings.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    Value(PropertyValue),
    Error(ReadError),
}

impl ReadOutcome {
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl From<Result<PropertyValue, ReadError>> for ReadOutcome {
    fn from(result: Result<PropertyValue, ReadError>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(err) => Self::Error(err),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PropertyValue {
    /// Serializes as the bare scalar, so a label-keyed sink renders as
    /// `{"Space Temp": 72.5}` rather than a tagged enum.
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Boolean(v) => serializer.serialize_bool(*v),
            Self::Unsigned(v) => serializer.serialize_u32(*v),
            Self::Signed(v) => serializer.serialize_i32(*v),
            Self::Real(v) => serializer.serialize_f32(*v),
            Self::Double(v) => serializer.serialize_f64(*v),
            Self::CharacterString(v) => serializer.serialize_str(v),
            Self::Enumerated(v) => serializer.serialize_u32(*v),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ReadOutcome {
    /// A value serializes as itself; an error as `{"error": "<kind>"}`.
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        match self {
            Self::Value(value) => value.serialize(serializer),
            Self::Error(err) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", err.kind())?;
                map.end()
            }
        }
    }
}
