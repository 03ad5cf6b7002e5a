//! Batched property reads over an opaque BACnet transport.
//!
//! The centrepiece is [`BatchRead`]: it takes a list of labeled
//! [`ReadSpec`](bacbatch_core::ReadSpec)s, dispatches them concurrently
//! against any [`PropertyReader`] transport, and delivers one
//! [`ReadOutcome`](bacbatch_core::ReadOutcome) per label through a
//! callback — exactly once each, in transport arrival order, with
//! per-point failures isolated from their siblings.
//!
//! Reads targeting the same device are grouped so the transport can
//! pipeline them, and reads of the same object can additionally be
//! coalesced into one multi-property exchange (see [`Grouping`]). Runs
//! can be cut short cooperatively with [`BatchRead::stop`] or a
//! [`StopHandle`].
//!
//! [`SimulatedDevice`] provides an in-memory transport for tests and
//! development without hardware.

pub mod batch;
pub mod error;
pub mod plan;
pub mod simulator;
pub mod transport;

pub use batch::{BatchRead, BatchState, Completion, StopHandle};
pub use error::BatchError;
pub use plan::Grouping;
pub use simulator::SimulatedDevice;
pub use transport::PropertyReader;
