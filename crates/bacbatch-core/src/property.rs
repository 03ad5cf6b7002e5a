use crate::error::ReferenceError;
use core::fmt;
use std::str::FromStr;

/// BACnet property identifiers.
///
/// Common standard properties are named variants; vendor-specific or
/// unrecognised identifiers use [`Proprietary`](Self::Proprietary).
/// [`from_u32`](Self::from_u32) normalizes known numeric identifiers to
/// their named variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
    ObjectIdentifier,
    ObjectName,
    ObjectType,
    PresentValue,
    Description,
    StatusFlags,
    Units,
    Proprietary(u32),
}

impl PropertyId {
    pub const fn to_u32(self) -> u32 {
        match self {
            Self::ObjectIdentifier => 75,
            Self::ObjectName => 77,
            Self::ObjectType => 79,
            Self::PresentValue => 85,
            Self::Description => 28,
            Self::StatusFlags => 111,
            Self::Units => 117,
            Self::Proprietary(v) => v,
        }
    }

    pub const fn from_u32(value: u32) -> Self {
        match value {
            75 => Self::ObjectIdentifier,
            77 => Self::ObjectName,
            79 => Self::ObjectType,
            85 => Self::PresentValue,
            28 => Self::Description,
            111 => Self::StatusFlags,
            117 => Self::Units,
            v => Self::Proprietary(v),
        }
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectIdentifier => f.write_str("object-identifier"),
            Self::ObjectName => f.write_str("object-name"),
            Self::ObjectType => f.write_str("object-type"),
            Self::PresentValue => f.write_str("present-value"),
            Self::Description => f.write_str("description"),
            Self::StatusFlags => f.write_str("status-flags"),
            Self::Units => f.write_str("units"),
            Self::Proprietary(v) => write!(f, "{v}"),
        }
    }
}

impl FromStr for PropertyId {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "object-identifier" => Ok(Self::ObjectIdentifier),
            "object-name" => Ok(Self::ObjectName),
            "object-type" => Ok(Self::ObjectType),
            "present-value" => Ok(Self::PresentValue),
            "description" => Ok(Self::Description),
            "status-flags" => Ok(Self::StatusFlags),
            "units" => Ok(Self::Units),
            other => match other.parse::<u32>() {
                Ok(v) => Ok(Self::from_u32(v)),
                Err(_) => Err(ReferenceError::malformed(s, "unknown property")),
            },
        }
    }
}

/// A readable attribute of an object: a [`PropertyId`] plus an optional
/// array index for array-valued properties.
///
/// Text form: `"present-value"`, or `"present-value,3"` with an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyRef {
    pub id: PropertyId,
    pub array_index: Option<u32>,
}

impl PropertyRef {
    pub const fn new(id: PropertyId) -> Self {
        Self {
            id,
            array_index: None,
        }
    }

    pub const fn with_index(id: PropertyId, index: u32) -> Self {
        Self {
            id,
            array_index: Some(index),
        }
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.array_index {
            Some(index) => write!(f, "{},{index}", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

impl FromStr for PropertyRef {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id_text, index_text) = match s.split_once(',') {
            Some((id, index)) => (id, Some(index)),
            None => (s, None),
        };
        let id = id_text.parse::<PropertyId>()?;
        let array_index = match index_text {
            Some(index) => Some(index.trim().parse::<u32>().map_err(|_| {
                ReferenceError::malformed(s, "array index is not a non-negative integer")
            })?),
            None => None,
        };
        Ok(Self { id, array_index })
    }
}

#[cfg(test)]
mod tests {
    use super::{PropertyId, PropertyRef};
    use proptest::prelude::*;

    #[test]
    fn parses_present_value() {
        let prop: PropertyRef = "present-value".parse().unwrap();
        assert_eq!(prop, PropertyRef::new(PropertyId::PresentValue));
    }

    #[test]
    fn parses_array_index() {
        let prop: PropertyRef = "present-value,3".parse().unwrap();
        assert_eq!(prop, PropertyRef::with_index(PropertyId::PresentValue, 3));
    }

    #[test]
    fn parses_numeric_identifier() {
        let prop: PropertyRef = "85".parse().unwrap();
        assert_eq!(prop.id, PropertyId::PresentValue);

        let prop: PropertyRef = "513".parse().unwrap();
        assert_eq!(prop.id, PropertyId::Proprietary(513));
    }

    #[test]
    fn rejects_unknown_name() {
        assert!("not-a-property".parse::<PropertyRef>().is_err());
        assert!("present-value,abc".parse::<PropertyRef>().is_err());
    }

    proptest! {
        #[test]
        fn text_round_trip(id_raw in any::<u32>(), index in proptest::option::of(any::<u32>())) {
            let prop = PropertyRef {
                id: PropertyId::from_u32(id_raw),
                array_index: index,
            };
            let reparsed: PropertyRef = prop.to_string().parse().unwrap();
            prop_assert_eq!(prop, reparsed);
        }
    }
}
