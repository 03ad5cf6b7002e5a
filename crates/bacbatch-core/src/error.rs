use thiserror::Error;

/// A text descriptor could not be parsed into an addressing type.
///
/// Structural by nature: a malformed reference fails descriptor
/// construction before any network activity takes place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("malformed reference {text:?}: {reason}")]
    MalformedReference { text: String, reason: &'static str },
}

impl ReferenceError {
    pub(crate) fn malformed(text: &str, reason: &'static str) -> Self {
        Self::MalformedReference {
            text: text.to_string(),
            reason,
        }
    }
}

/// A per-descriptor runtime read failure reported by the transport.
///
/// These never abort a batch run; they are carried inside
/// [`ReadOutcome::Error`](crate::ReadOutcome::Error) and delivered through
/// the normal result path alongside successful reads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("device did not respond")]
    Unreachable,
    #[error("object does not exist on the device")]
    ObjectNotFound,
    #[error("property does not exist on the object")]
    PropertyNotFound,
    #[error("no response within the transport deadline")]
    Timeout,
    #[error("malformed or rejected response: {0}")]
    ProtocolError(String),
}

impl ReadError {
    /// Stable diagnostic name for this error kind, used as the `"error"`
    /// value in serialized result sinks.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable => "Unreachable",
            Self::ObjectNotFound => "ObjectNotFound",
            Self::PropertyNotFound => "PropertyNotFound",
            Self::Timeout => "Timeout",
            Self::ProtocolError(_) => "ProtocolError",
        }
    }
}
