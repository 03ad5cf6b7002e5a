use bacbatch_client::{Grouping, SimulatedDevice};
use bacbatch_core::{
    DeviceAddress, ObjectKind, ObjectRef, PropertyId, PropertyValue, ReadSpec, ReferenceError,
};
use clap::ValueEnum;

/// CLI-friendly enum for selecting the dispatch grouping strategy.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GroupingArg {
    PerRead,
    PerObject,
}

impl GroupingArg {
    pub const fn into_grouping(self) -> Grouping {
        match self {
            Self::PerRead => Grouping::PerRead,
            Self::PerObject => Grouping::PerObject,
        }
    }
}

/// The standard fan-coil-unit point list: every present-value the FCU
/// report reads, labeled the way the report keys its output.
///
/// All points live on the single controller at `device_address`.
pub fn fcu_points(device_address: &str) -> Result<Vec<ReadSpec>, ReferenceError> {
    const POINTS: &[(&str, &str)] = &[
        ("Fan Status", "binary-value,5"),
        ("System Enable", "binary-value,40"),
        ("Keypad Lock", "analog-value,128"),
        ("Occupied Setpoint", "analog-value,90"),
        ("Occupied Stpt Hi Limit", "analog-value,91"),
        ("Occupied Stpt Lo Limit", "analog-value,92"),
        ("Heating Offset", "analog-value,94"),
        ("Cooling Offset", "analog-value,93"),
        ("Cooling Valve", "analog-output,0"),
        ("Electric Heater", "analog-output,1"),
        ("Fan Speed", "analog-value,16"),
        ("1- Low Speed", "binary-output,0"),
        ("2-Med. Speed", "binary-output,1"),
        ("3 - High Speed", "binary-output,2"),
        ("Space Temp", "analog-value,104"),
        ("Space Humidity", "analog-value,105"),
        ("Discharge Air Flow", "binary-value,5"),
    ];

    POINTS
        .iter()
        .map(|&(label, object)| ReadSpec::parse(label, device_address, object, "present-value"))
        .collect()
}

/// A simulated fan-coil controller seeded with plausible values for every
/// point in [`fcu_points`]. Backs the `readfcu` binary and the end-to-end
/// tests.
pub async fn simulated_fcu(address: DeviceAddress) -> SimulatedDevice {
    let device = SimulatedDevice::new(address);

    let binary = [
        (ObjectKind::BinaryValue, 5, true),
        (ObjectKind::BinaryValue, 40, true),
        (ObjectKind::BinaryOutput, 0, true),
        (ObjectKind::BinaryOutput, 1, false),
        (ObjectKind::BinaryOutput, 2, false),
    ];
    for (kind, instance, value) in binary {
        device
            .set_property(
                ObjectRef::new(kind, instance),
                PropertyId::PresentValue,
                PropertyValue::Boolean(value),
            )
            .await;
    }

    let analog = [
        (ObjectKind::AnalogValue, 128, 0.0),
        (ObjectKind::AnalogValue, 90, 72.0),
        (ObjectKind::AnalogValue, 91, 78.0),
        (ObjectKind::AnalogValue, 92, 65.0),
        (ObjectKind::AnalogValue, 94, 2.0),
        (ObjectKind::AnalogValue, 93, 2.0),
        (ObjectKind::AnalogValue, 16, 1.0),
        (ObjectKind::AnalogValue, 104, 72.5),
        (ObjectKind::AnalogValue, 105, 45.0),
        (ObjectKind::AnalogOutput, 0, 35.0),
        (ObjectKind::AnalogOutput, 1, 0.0),
    ];
    for (kind, instance, value) in analog {
        device
            .set_property(
                ObjectRef::new(kind, instance),
                PropertyId::PresentValue,
                PropertyValue::Real(value),
            )
            .await;
    }

    device
}
