use crate::error::ReferenceError;
use core::fmt;
use std::str::FromStr;

/// BACnet object type identifiers.
///
/// Known standard types are named variants; anything else uses
/// [`Proprietary`](Self::Proprietary). [`from_u16`](Self::from_u16)
/// normalizes: a numeric value with a standard mapping always becomes the
/// named variant, so `Proprietary` never shadows a known type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    AnalogInput,
    AnalogOutput,
    AnalogValue,
    BinaryInput,
    BinaryOutput,
    BinaryValue,
    Device,
    MultiStateInput,
    MultiStateOutput,
    MultiStateValue,
    Proprietary(u16),
}

impl ObjectKind {
    /// Converts this object kind to its numeric BACnet identifier.
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::AnalogInput => 0,
            Self::AnalogOutput => 1,
            Self::AnalogValue => 2,
            Self::BinaryInput => 3,
            Self::BinaryOutput => 4,
            Self::BinaryValue => 5,
            Self::Device => 8,
            Self::MultiStateInput => 13,
            Self::MultiStateOutput => 14,
            Self::MultiStateValue => 19,
            Self::Proprietary(v) => v,
        }
    }

    /// Creates an `ObjectKind` from its numeric BACnet identifier.
    pub const fn from_u16(value: u16) -> Self {
        match value {
            0 => Self::AnalogInput,
            1 => Self::AnalogOutput,
            2 => Self::AnalogValue,
            3 => Self::BinaryInput,
            4 => Self::BinaryOutput,
            5 => Self::BinaryValue,
            8 => Self::Device,
            13 => Self::MultiStateInput,
            14 => Self::MultiStateOutput,
            19 => Self::MultiStateValue,
            v => Self::Proprietary(v),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnalogInput => f.write_str("analog-input"),
            Self::AnalogOutput => f.write_str("analog-output"),
            Self::AnalogValue => f.write_str("analog-value"),
            Self::BinaryInput => f.write_str("binary-input"),
            Self::BinaryOutput => f.write_str("binary-output"),
            Self::BinaryValue => f.write_str("binary-value"),
            Self::Device => f.write_str("device"),
            Self::MultiStateInput => f.write_str("multi-state-input"),
            Self::MultiStateOutput => f.write_str("multi-state-output"),
            Self::MultiStateValue => f.write_str("multi-state-value"),
            Self::Proprietary(v) => write!(f, "{v}"),
        }
    }
}

impl FromStr for ObjectKind {
    type Err = ReferenceError;

    /// Parses a kebab-case kind name (`"analog-value"`) or a numeric
    /// object type identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "analog-input" => Ok(Self::AnalogInput),
            "analog-output" => Ok(Self::AnalogOutput),
            "analog-value" => Ok(Self::AnalogValue),
            "binary-input" => Ok(Self::BinaryInput),
            "binary-output" => Ok(Self::BinaryOutput),
            "binary-value" => Ok(Self::BinaryValue),
            "device" => Ok(Self::Device),
            "multi-state-input" => Ok(Self::MultiStateInput),
            "multi-state-output" => Ok(Self::MultiStateOutput),
            "multi-state-value" => Ok(Self::MultiStateValue),
            other => match other.parse::<u16>() {
                Ok(v) => Ok(Self::from_u16(v)),
                Err(_) => Err(ReferenceError::malformed(s, "unknown object kind")),
            },
        }
    }
}

/// A reference to one addressable object on a remote device: an
/// [`ObjectKind`] plus a 22-bit instance number.
///
/// The canonical text form is `"<kind>,<instance>"`, e.g.
/// `"analog-value,128"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    kind: ObjectKind,
    instance: u32,
}

impl ObjectRef {
    /// Largest addressable instance number (22 bits, per the BACnet
    /// object identifier layout).
    pub const MAX_INSTANCE: u32 = 0x3F_FFFF;

    /// Creates an `ObjectRef`. The instance number is masked to 22 bits.
    pub const fn new(kind: ObjectKind, instance: u32) -> Self {
        Self {
            kind,
            instance: instance & Self::MAX_INSTANCE,
        }
    }

    pub const fn kind(self) -> ObjectKind {
        self.kind
    }

    pub const fn instance(self) -> u32 {
        self.instance
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.kind, self.instance)
    }
}

impl FromStr for ObjectRef {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((kind_text, instance_text)) = s.split_once(',') else {
            return Err(ReferenceError::malformed(
                s,
                "expected \"<kind>,<instance>\"",
            ));
        };
        let kind = kind_text.parse::<ObjectKind>().map_err(|_| {
            ReferenceError::malformed(s, "unknown object kind")
        })?;
        let instance = instance_text.trim().parse::<u32>().map_err(|_| {
            ReferenceError::malformed(s, "instance is not a non-negative integer")
        })?;
        if instance > Self::MAX_INSTANCE {
            return Err(ReferenceError::malformed(
                s,
                "instance exceeds the 22-bit BACnet range",
            ));
        }
        Ok(Self { kind, instance })
    }
}
