use bacbatch_core::{DeviceAddress, ObjectRef, PropertyRef, PropertyValue, ReadError};

/// Async trait for the transport a batch run executes against.
///
/// Implementors turn one property read into whatever wire exchange their
/// stack uses and resolve it to a value or a [`ReadError`]. Timeout
/// policy belongs to the transport: the batch coordinator imposes no
/// deadline of its own and only ever observes [`ReadError::Timeout`].
pub trait PropertyReader: Send + Sync {
    /// Reads a single property of one object on a remote device.
    async fn read_property(
        &self,
        address: DeviceAddress,
        object: ObjectRef,
        property: PropertyRef,
    ) -> Result<PropertyValue, ReadError>;

    /// Reads several properties of one object in a single exchange.
    ///
    /// Transports with a native multi-property service (BACnet RPM)
    /// should override this. The default issues one
    /// [`read_property`](Self::read_property) per entry, so grouped
    /// dispatch stays correct on any transport. On success the returned
    /// vector holds one per-property result for each requested entry, in
    /// request order; a top-level `Err` means the whole exchange failed
    /// (e.g. the device is unreachable).
    async fn read_object_properties(
        &self,
        address: DeviceAddress,
        object: ObjectRef,
        properties: &[PropertyRef],
    ) -> Result<Vec<Result<PropertyValue, ReadError>>, ReadError> {
        let mut results = Vec::with_capacity(properties.len());
        for &property in properties {
            results.push(self.read_property(address, object, property).await);
        }
        Ok(results)
    }
}
