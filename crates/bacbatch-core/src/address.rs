use crate::error::ReferenceError;
use core::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

/// The network address of a remote BACnet device.
///
/// Compared and hashed by value; two descriptors with equal addresses
/// target the same device and may be grouped into one dispatch unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceAddress {
    Ip(SocketAddr),
}

impl DeviceAddress {
    pub const BACNET_IP_DEFAULT_PORT: u16 = 47808;

    /// An address on the default BACnet/IP port.
    pub fn bacnet_default(addr: IpAddr) -> Self {
        Self::Ip(SocketAddr::new(addr, Self::BACNET_IP_DEFAULT_PORT))
    }

    pub fn as_socket_addr(self) -> SocketAddr {
        match self {
            Self::Ip(addr) => addr,
        }
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(addr) => write!(f, "{addr}"),
        }
    }
}

impl FromStr for DeviceAddress {
    type Err = ReferenceError;

    /// Parses `"10.0.0.5:47808"` or a bare IP, which gets the default
    /// BACnet/IP port.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if let Ok(addr) = text.parse::<SocketAddr>() {
            return Ok(Self::Ip(addr));
        }
        if let Ok(ip) = text.parse::<IpAddr>() {
            return Ok(Self::bacnet_default(ip));
        }
        Err(ReferenceError::malformed(
            s,
            "expected an IP address with optional port",
        ))
    }
}
