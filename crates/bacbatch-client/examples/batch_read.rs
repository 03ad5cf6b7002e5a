//! Batch-read a handful of fan-coil points from a simulated device.
//!
//! Usage:
//!   cargo run -p bacbatch-client --example batch_read

use bacbatch_client::{BatchRead, SimulatedDevice};
use bacbatch_core::{DeviceAddress, ObjectKind, ObjectRef, PropertyId, PropertyValue, ReadSpec};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let address: DeviceAddress = "10.0.0.90".parse()?;
    let device = SimulatedDevice::new(address);
    device
        .set_property(
            ObjectRef::new(ObjectKind::BinaryValue, 5),
            PropertyId::PresentValue,
            PropertyValue::Boolean(true),
        )
        .await;
    device
        .set_property(
            ObjectRef::new(ObjectKind::AnalogValue, 104),
            PropertyId::PresentValue,
            PropertyValue::Real(72.5),
        )
        .await;

    let mut batch = BatchRead::new(vec![
        ReadSpec::parse("Fan Status", "10.0.0.90", "binary-value,5", "present-value")?,
        ReadSpec::parse("Space Temp", "10.0.0.90", "analog-value,104", "present-value")?,
        ReadSpec::parse("Space Humidity", "10.0.0.90", "analog-value,105", "present-value")?,
    ])?;

    let completion = batch
        .run(&device, |label, outcome| {
            println!("{label}: {outcome:?}");
        })
        .await;

    println!("delivered {} outcomes", completion.delivered);
    Ok(())
}
