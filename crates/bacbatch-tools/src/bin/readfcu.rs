//! Read the standard fan-coil-unit point list as one batch and print the
//! label-keyed results as JSON.
//!
//! Runs against the built-in simulated controller; real deployments plug
//! their BACnet stack in behind `bacbatch_client::PropertyReader`.

use bacbatch_core::{DeviceAddress, ReadOutcome};
use bacbatch_tools::{fcu_points, simulated_fcu, GroupingArg};
use clap::Parser;
use std::collections::BTreeMap;

#[derive(Parser, Debug)]
#[command(name = "readfcu")]
struct Args {
    /// Address of the fan-coil controller (B-device).
    device_address: String,
    /// Dispatch grouping strategy.
    #[arg(long, value_enum, default_value = "per-object")]
    grouping: GroupingArg,
    /// How many wire exchanges may be outstanding at once.
    #[arg(long, default_value_t = 16)]
    max_in_flight: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let address: DeviceAddress = args.device_address.parse()?;
    let device = simulated_fcu(address).await;

    let mut batch = bacbatch_client::BatchRead::new(fcu_points(&args.device_address)?)?
        .with_grouping(args.grouping.into_grouping())
        .with_max_in_flight(args.max_in_flight);

    let mut results: BTreeMap<String, ReadOutcome> = BTreeMap::new();
    batch
        .run(&device, |label, outcome| {
            results.insert(label.to_string(), outcome);
        })
        .await;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
