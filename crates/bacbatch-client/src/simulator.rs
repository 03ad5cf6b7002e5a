//! Lightweight simulated BACnet device.
//!
//! [`SimulatedDevice`] answers property reads from an in-memory object
//! map. Useful for testing and development without physical hardware:
//! reads addressed to any other device resolve to `Unreachable`, unknown
//! objects and properties resolve to their respective errors, and
//! individual points can be scripted to fail.

use crate::transport::PropertyReader;
use bacbatch_core::{
    DeviceAddress, ObjectRef, PropertyId, PropertyRef, PropertyValue, ReadError,
};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

/// An in-memory [`PropertyReader`] standing in for one remote device.
#[derive(Debug)]
pub struct SimulatedDevice {
    address: DeviceAddress,
    objects: RwLock<HashMap<ObjectRef, HashMap<PropertyId, PropertyValue>>>,
    faults: RwLock<HashMap<(ObjectRef, PropertyId), ReadError>>,
    latency: Duration,
}

impl SimulatedDevice {
    /// Creates an empty simulated device reachable at `address`.
    pub fn new(address: DeviceAddress) -> Self {
        Self {
            address,
            objects: RwLock::new(HashMap::new()),
            faults: RwLock::new(HashMap::new()),
            latency: Duration::ZERO,
        }
    }

    /// Adds an artificial delay to every read, to exercise concurrency
    /// and cancellation in tests.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// The address this device answers at.
    pub fn address(&self) -> DeviceAddress {
        self.address
    }

    /// Sets (or replaces) one property value, creating the object if
    /// needed.
    pub async fn set_property(&self, object: ObjectRef, property: PropertyId, value: PropertyValue) {
        self.objects
            .write()
            .await
            .entry(object)
            .or_default()
            .insert(property, value);
    }

    /// Scripts one point to fail with `error` instead of resolving.
    pub async fn set_fault(&self, object: ObjectRef, property: PropertyId, error: ReadError) {
        self.faults.write().await.insert((object, property), error);
    }
}

impl PropertyReader for SimulatedDevice {
    async fn read_property(
        &self,
        address: DeviceAddress,
        object: ObjectRef,
        property: PropertyRef,
    ) -> Result<PropertyValue, ReadError> {
        if address != self.address {
            return Err(ReadError::Unreachable);
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(error) = self.faults.read().await.get(&(object, property.id)) {
            return Err(error.clone());
        }
        // Scalar store only: any array index misses.
        if property.array_index.is_some() {
            return Err(ReadError::PropertyNotFound);
        }
        let objects = self.objects.read().await;
        let properties = objects.get(&object).ok_or(ReadError::ObjectNotFound)?;
        properties
            .get(&property.id)
            .cloned()
            .ok_or(ReadError::PropertyNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::SimulatedDevice;
    use crate::transport::PropertyReader;
    use bacbatch_core::{
        DeviceAddress, ObjectKind, ObjectRef, PropertyId, PropertyRef, PropertyValue, ReadError,
    };

    fn device() -> (SimulatedDevice, DeviceAddress) {
        let address: DeviceAddress = "10.0.0.50".parse().unwrap();
        (SimulatedDevice::new(address), address)
    }

    #[tokio::test]
    async fn resolves_known_points_and_misses() {
        let (device, address) = device();
        let object = ObjectRef::new(ObjectKind::AnalogValue, 104);
        device
            .set_property(object, PropertyId::PresentValue, PropertyValue::Real(72.5))
            .await;

        let value = device
            .read_property(address, object, PropertyRef::new(PropertyId::PresentValue))
            .await
            .unwrap();
        assert_eq!(value, PropertyValue::Real(72.5));

        let err = device
            .read_property(address, object, PropertyRef::new(PropertyId::ObjectName))
            .await
            .unwrap_err();
        assert_eq!(err, ReadError::PropertyNotFound);

        let err = device
            .read_property(
                address,
                ObjectRef::new(ObjectKind::AnalogValue, 1),
                PropertyRef::new(PropertyId::PresentValue),
            )
            .await
            .unwrap_err();
        assert_eq!(err, ReadError::ObjectNotFound);
    }

    #[tokio::test]
    async fn wrong_address_is_unreachable() {
        let (device, _) = device();
        let elsewhere: DeviceAddress = "10.0.0.51".parse().unwrap();
        let err = device
            .read_property(
                elsewhere,
                ObjectRef::new(ObjectKind::BinaryValue, 5),
                PropertyRef::new(PropertyId::PresentValue),
            )
            .await
            .unwrap_err();
        assert_eq!(err, ReadError::Unreachable);
    }

    #[tokio::test]
    async fn scripted_faults_win_over_stored_values() {
        let (device, address) = device();
        let object = ObjectRef::new(ObjectKind::AnalogValue, 90);
        device
            .set_property(object, PropertyId::PresentValue, PropertyValue::Real(70.0))
            .await;
        device
            .set_fault(object, PropertyId::PresentValue, ReadError::Timeout)
            .await;

        let err = device
            .read_property(address, object, PropertyRef::new(PropertyId::PresentValue))
            .await
            .unwrap_err();
        assert_eq!(err, ReadError::Timeout);
    }

    #[tokio::test]
    async fn default_multi_read_matches_single_reads() {
        let (device, address) = device();
        let object = ObjectRef::new(ObjectKind::AnalogValue, 104);
        device
            .set_property(object, PropertyId::PresentValue, PropertyValue::Real(72.5))
            .await;

        let results = device
            .read_object_properties(
                address,
                object,
                &[
                    PropertyRef::new(PropertyId::PresentValue),
                    PropertyRef::new(PropertyId::Units),
                ],
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], Ok(PropertyValue::Real(72.5)));
        assert_eq!(results[1], Err(ReadError::PropertyNotFound));
    }
}
