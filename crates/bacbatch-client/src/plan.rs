//! Dispatch planning: how a batch's descriptors become wire exchanges.

use bacbatch_core::{DeviceAddress, ObjectRef, ReadSpec};
use std::collections::HashMap;

/// How descriptors are packed into dispatch units.
///
/// Outcomes are identical under either strategy; the choice only affects
/// how many wire exchanges the transport sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grouping {
    /// One dispatch unit per descriptor.
    PerRead,
    /// Descriptors targeting the same object on the same device are
    /// coalesced into one multi-property unit.
    #[default]
    PerObject,
}

/// One schedulable wire exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DispatchUnit {
    Single {
        index: usize,
    },
    ObjectGroup {
        address: DeviceAddress,
        object: ObjectRef,
        indexes: Vec<usize>,
    },
}

/// Plans the dispatch units for `specs`.
///
/// Descriptors are partitioned by device in stable first-seen order,
/// keeping the original order within each device, so all reads bound for
/// one device sit adjacently and can be pipelined. Under
/// [`Grouping::PerObject`], descriptors within a device that share an
/// object are coalesced; groups of one stay single reads.
pub(crate) fn dispatch_units(specs: &[ReadSpec], grouping: Grouping) -> Vec<DispatchUnit> {
    let mut device_order: Vec<DeviceAddress> = Vec::new();
    let mut by_device: HashMap<DeviceAddress, Vec<usize>> = HashMap::new();
    for (index, spec) in specs.iter().enumerate() {
        by_device
            .entry(spec.address)
            .or_insert_with(|| {
                device_order.push(spec.address);
                Vec::new()
            })
            .push(index);
    }

    let mut units = Vec::new();
    for address in device_order {
        let indexes = &by_device[&address];
        match grouping {
            Grouping::PerRead => {
                units.extend(indexes.iter().map(|&index| DispatchUnit::Single { index }));
            }
            Grouping::PerObject => {
                let mut object_order: Vec<ObjectRef> = Vec::new();
                let mut by_object: HashMap<ObjectRef, Vec<usize>> = HashMap::new();
                for &index in indexes {
                    by_object
                        .entry(specs[index].object)
                        .or_insert_with(|| {
                            object_order.push(specs[index].object);
                            Vec::new()
                        })
                        .push(index);
                }
                for object in object_order {
                    let members = by_object.remove(&object).unwrap_or_default();
                    if members.len() == 1 {
                        units.push(DispatchUnit::Single { index: members[0] });
                    } else {
                        units.push(DispatchUnit::ObjectGroup {
                            address,
                            object,
                            indexes: members,
                        });
                    }
                }
            }
        }
    }
    units
}
