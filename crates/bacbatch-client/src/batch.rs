//! The batch coordinator: concurrent dispatch, result correlation, and
//! cooperative cancellation for a fixed set of labeled property reads.

use crate::error::BatchError;
use crate::plan::{self, DispatchUnit, Grouping};
use crate::transport::PropertyReader;
use bacbatch_core::{PropertyRef, ReadError, ReadOutcome, ReadSpec};
use futures_util::stream::{self, StreamExt};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

const DEFAULT_MAX_IN_FLIGHT: usize = 16;

/// Lifecycle of a batch: `Idle -> Running -> {Completed, Stopped}`.
///
/// The terminal states are final; re-observing them yields the same
/// answer and never re-fires callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Running,
    Completed,
    Stopped,
}

/// Terminal state of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Completion {
    /// Number of outcomes handed to the callback.
    pub delivered: usize,
    /// `true` when a stop request cut the run short before every
    /// descriptor resolved.
    pub stopped: bool,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Running,
    Finished(Completion),
}

/// Requests cooperative termination of a running batch.
///
/// Clonable and cheap; obtained from [`BatchRead::stop_handle`] so a stop
/// can be issued while [`BatchRead::run`] holds the batch mutably (from a
/// callback, another task, or a signal handler).
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Sets the stop flag. Idempotent.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }
}

/// A fixed, ordered collection of labeled property reads executed
/// together against one transport.
///
/// Construction validates nothing beyond non-emptiness: descriptors are
/// already-parsed value types, so a `BatchRead` owns no network resources
/// and is immutable for the lifetime of a run. Execution is cooperative
/// and single-threaded: all dispatch units are logically outstanding at
/// once, but the callback is only ever invoked from the task driving
/// [`run`](Self::run), so a result sink needs no locking.
#[derive(Debug)]
pub struct BatchRead {
    specs: Vec<ReadSpec>,
    grouping: Grouping,
    max_in_flight: usize,
    stop: Arc<AtomicBool>,
    phase: Mutex<Phase>,
}

impl BatchRead {
    /// Creates a batch from an ordered list of descriptors.
    ///
    /// Fails with [`BatchError::EmptyBatch`] when `specs` is empty: an
    /// empty point list is a driver bug, and rejecting it keeps the
    /// one-outcome-per-descriptor guarantee unconditional.
    pub fn new(specs: Vec<ReadSpec>) -> Result<Self, BatchError> {
        if specs.is_empty() {
            return Err(BatchError::EmptyBatch);
        }
        Ok(Self {
            specs,
            grouping: Grouping::default(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            stop: Arc::new(AtomicBool::new(false)),
            phase: Mutex::new(Phase::Idle),
        })
    }

    /// Selects the dispatch [`Grouping`] strategy.
    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.grouping = grouping;
        self
    }

    /// Caps how many dispatch units are outstanding at once. Also bounds
    /// how much in-flight work a stop request waits out.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// The descriptors this batch will read.
    pub fn specs(&self) -> &[ReadSpec] {
        &self.specs
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BatchState {
        match *self.lock_phase() {
            Phase::Idle => {
                // A stop request against an idle batch is already terminal.
                if self.stop.load(Ordering::Acquire) {
                    BatchState::Stopped
                } else {
                    BatchState::Idle
                }
            }
            Phase::Running => BatchState::Running,
            Phase::Finished(c) if c.stopped => BatchState::Stopped,
            Phase::Finished(_) => BatchState::Completed,
        }
    }

    /// The recorded terminal state, once a run has finished (or the batch
    /// was stopped before running). Observation is idempotent.
    pub fn completion(&self) -> Option<Completion> {
        match *self.lock_phase() {
            Phase::Finished(c) => Some(c),
            _ => None,
        }
    }

    /// A clonable handle for stopping the batch while a run is in
    /// progress.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.stop))
    }

    /// Requests cooperative termination.
    ///
    /// Safe to call before, during (via [`StopHandle`]), or after a run;
    /// idempotent. Units not yet dispatched are never dispatched;
    /// in-flight units finish naturally and their outcomes are still
    /// delivered. Called before [`run`](Self::run), the batch transitions
    /// straight to `Stopped` and the run completes immediately with zero
    /// outcomes.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
        let mut phase = self.lock_phase();
        if let Phase::Idle = *phase {
            *phase = Phase::Finished(Completion {
                delivered: 0,
                stopped: true,
            });
        }
    }

    /// Runs the batch against `transport`, invoking `on_result(label,
    /// outcome)` exactly once per descriptor as results arrive.
    ///
    /// Dispatch units execute as cooperative futures on the calling task;
    /// callback invocations never overlap. Per-descriptor failures are
    /// delivered as [`ReadOutcome::Error`] and do not abort siblings.
    /// Outcome order follows transport arrival, not descriptor order.
    ///
    /// The callback should not panic. If it does, the panic payload is
    /// held back, the remaining outcomes are still delivered, the
    /// terminal [`Completion`] is recorded, and the first payload is then
    /// resumed — one misbehaving consumer cannot starve delivery to the
    /// others.
    ///
    /// Calling `run` on a finished batch returns the recorded
    /// [`Completion`] without dispatching anything.
    pub async fn run<T, F>(&mut self, transport: &T, mut on_result: F) -> Completion
    where
        T: PropertyReader,
        F: FnMut(&str, ReadOutcome),
    {
        {
            let mut phase = self.lock_phase();
            if let Phase::Finished(completion) = *phase {
                return completion;
            }
            if self.stop.load(Ordering::Acquire) {
                let completion = Completion {
                    delivered: 0,
                    stopped: true,
                };
                *phase = Phase::Finished(completion);
                return completion;
            }
            *phase = Phase::Running;
        }

        let specs = &self.specs;
        let total = specs.len();
        let units = plan::dispatch_units(specs, self.grouping);
        log::debug!("dispatching {total} reads in {} units", units.len());

        let stop = &self.stop;
        let mut delivered = 0usize;
        let mut resolved = 0usize;
        let mut deferred_panic: Option<Box<dyn std::any::Any + Send>> = None;

        {
            let mut completions = stream::iter(units)
                .take_while(|_| {
                    futures_util::future::ready(!stop.load(Ordering::Acquire))
                })
                .map(|unit| execute_unit(transport, specs, unit))
                .buffer_unordered(self.max_in_flight);

            while let Some(outcomes) = completions.next().await {
                for (index, outcome) in outcomes {
                    resolved += 1;
                    let label = specs[index].label.as_str();
                    match panic::catch_unwind(AssertUnwindSafe(|| on_result(label, outcome))) {
                        Ok(()) => delivered += 1,
                        Err(payload) => {
                            log::warn!(
                                "result callback panicked for {label:?}; continuing delivery"
                            );
                            if deferred_panic.is_none() {
                                deferred_panic = Some(payload);
                            }
                        }
                    }
                }
            }
        }

        let stop_requested = stop.load(Ordering::Acquire);
        if stop_requested && resolved < total {
            log::debug!("batch stopped after {resolved} of {total} reads");
        }
        let completion = Completion {
            delivered,
            stopped: stop_requested && resolved < total,
        };
        *self.lock_phase() = Phase::Finished(completion);

        if let Some(payload) = deferred_panic {
            panic::resume_unwind(payload);
        }
        completion
    }

    fn lock_phase(&self) -> std::sync::MutexGuard<'_, Phase> {
        self.phase.lock().expect("batch phase lock poisoned")
    }
}

async fn execute_unit<T: PropertyReader>(
    transport: &T,
    specs: &[ReadSpec],
    unit: DispatchUnit,
) -> Vec<(usize, ReadOutcome)> {
    match unit {
        DispatchUnit::Single { index } => {
            let spec = &specs[index];
            let result = transport
                .read_property(spec.address, spec.object, spec.property)
                .await;
            if let Err(err) = &result {
                log::debug!("read {:?} failed: {err}", spec.label);
            }
            vec![(index, result.into())]
        }
        DispatchUnit::ObjectGroup {
            address,
            object,
            indexes,
        } => {
            let properties: Vec<PropertyRef> =
                indexes.iter().map(|&index| specs[index].property).collect();
            match transport
                .read_object_properties(address, object, &properties)
                .await
            {
                Ok(results) => {
                    let mut results = results.into_iter();
                    indexes
                        .into_iter()
                        .map(|index| {
                            let outcome = match results.next() {
                                Some(result) => result.into(),
                                None => ReadOutcome::Error(ReadError::ProtocolError(
                                    "short multi-property response".to_string(),
                                )),
                            };
                            (index, outcome)
                        })
                        .collect()
                }
                Err(err) => {
                    log::debug!("grouped read of {object} at {address} failed: {err}");
                    indexes
                        .into_iter()
                        .map(|index| (index, ReadOutcome::Error(err.clone())))
                        .collect()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BatchRead, BatchState, Grouping};
    use crate::error::BatchError;
    use crate::simulator::SimulatedDevice;
    use bacbatch_core::{
        DeviceAddress, ObjectKind, ObjectRef, PropertyId, PropertyValue, ReadError, ReadOutcome,
        ReadSpec,
    };
    use futures_util::FutureExt;
    use std::collections::HashMap;
    use std::panic::AssertUnwindSafe;
    use std::time::Duration;
    use tokio::time::timeout;

    fn addr(last_octet: u8) -> DeviceAddress {
        format!("10.0.0.{last_octet}").parse().unwrap()
    }

    async fn fcu(address: DeviceAddress) -> SimulatedDevice {
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
        device
            .set_property(
                ObjectRef::new(ObjectKind::AnalogValue, 104),
                PropertyId::ObjectName,
                PropertyValue::CharacterString("Space Temp".to_string()),
            )
            .await;
        device
            .set_property(
                ObjectRef::new(ObjectKind::AnalogOutput, 0),
                PropertyId::PresentValue,
                PropertyValue::Real(0.0),
            )
            .await;
        device
    }

    fn spec(label: &str, address: DeviceAddress, object: &str, property: &str) -> ReadSpec {
        ReadSpec::new(
            label,
            address,
            object.parse().unwrap(),
            property.parse().unwrap(),
        )
    }

    #[tokio::test]
    async fn delivers_exactly_one_outcome_per_label() {
        let address = addr(90);
        let device = fcu(address).await;
        let mut batch = BatchRead::new(vec![
            spec("Fan Status", address, "binary-value,5", "present-value"),
            spec("Space Temp", address, "analog-value,104", "present-value"),
            spec("Cooling Valve", address, "analog-output,0", "present-value"),
        ])
        .unwrap();

        let mut sink: HashMap<String, ReadOutcome> = HashMap::new();
        let mut invocations = 0usize;
        let completion = batch
            .run(&device, |label, outcome| {
                invocations += 1;
                sink.insert(label.to_string(), outcome);
            })
            .await;

        assert_eq!(invocations, 3);
        assert_eq!(completion.delivered, 3);
        assert!(!completion.stopped);
        assert_eq!(batch.state(), BatchState::Completed);
        assert_eq!(
            sink["Fan Status"],
            ReadOutcome::Value(PropertyValue::Boolean(true))
        );
        assert_eq!(
            sink["Space Temp"],
            ReadOutcome::Value(PropertyValue::Real(72.5))
        );
    }

    #[tokio::test]
    async fn partial_failure_does_not_abort_siblings() {
        let address = addr(90);
        let device = fcu(address).await;
        let mut batch = BatchRead::new(vec![
            spec("Fan Status", address, "binary-value,5", "present-value"),
            spec("Missing", address, "analog-value,9999", "present-value"),
            spec("No Such Prop", address, "analog-value,104", "units"),
        ])
        .unwrap();

        let mut sink = HashMap::new();
        let completion = batch
            .run(&device, |label, outcome| {
                sink.insert(label.to_string(), outcome);
            })
            .await;

        assert_eq!(completion.delivered, 3);
        assert_eq!(
            sink["Fan Status"],
            ReadOutcome::Value(PropertyValue::Boolean(true))
        );
        assert_eq!(
            sink["Missing"],
            ReadOutcome::Error(ReadError::ObjectNotFound)
        );
        assert_eq!(
            sink["No Such Prop"],
            ReadOutcome::Error(ReadError::PropertyNotFound)
        );
    }

    #[tokio::test]
    async fn unreachable_device_errors_do_not_affect_reachable_one() {
        let reachable = addr(90);
        let dark = addr(91);
        let device = fcu(reachable).await;
        let mut batch = BatchRead::new(vec![
            spec("Fan Status", reachable, "binary-value,5", "present-value"),
            spec("Dark Temp", dark, "analog-value,104", "present-value"),
        ])
        .unwrap();

        let mut sink = HashMap::new();
        batch
            .run(&device, |label, outcome| {
                sink.insert(label.to_string(), outcome);
            })
            .await;

        assert_eq!(
            sink["Fan Status"],
            ReadOutcome::Value(PropertyValue::Boolean(true))
        );
        assert_eq!(sink["Dark Temp"], ReadOutcome::Error(ReadError::Unreachable));
    }

    #[tokio::test]
    async fn grouping_strategies_yield_identical_outcomes() {
        let address = addr(90);
        let device = fcu(address).await;
        let specs = vec![
            spec("Space Temp", address, "analog-value,104", "present-value"),
            spec("Temp Name", address, "analog-value,104", "object-name"),
            spec("Fan Status", address, "binary-value,5", "present-value"),
            spec("Missing", address, "analog-value,9999", "present-value"),
        ];

        let mut sinks = Vec::new();
        for grouping in [Grouping::PerRead, Grouping::PerObject] {
            let mut batch = BatchRead::new(specs.clone()).unwrap().with_grouping(grouping);
            let mut sink = HashMap::new();
            let completion = batch
                .run(&device, |label, outcome| {
                    sink.insert(label.to_string(), outcome);
                })
                .await;
            assert_eq!(completion.delivered, specs.len());
            sinks.push(sink);
        }
        assert_eq!(sinks[0], sinks[1]);
    }

    #[test]
    fn empty_batch_fails_construction() {
        assert_eq!(BatchRead::new(Vec::new()).unwrap_err(), BatchError::EmptyBatch);
    }

    #[tokio::test]
    async fn stop_before_run_completes_with_no_outcomes() {
        let address = addr(90);
        let device = fcu(address).await;
        let mut batch = BatchRead::new(vec![spec(
            "Fan Status",
            address,
            "binary-value,5",
            "present-value",
        )])
        .unwrap();

        batch.stop();
        assert_eq!(batch.state(), BatchState::Stopped);

        let mut invocations = 0usize;
        let completion = batch.run(&device, |_, _| invocations += 1).await;
        assert_eq!(invocations, 0);
        assert_eq!(completion.delivered, 0);
        assert!(completion.stopped);
    }

    #[tokio::test]
    async fn stop_handle_cuts_a_slow_run_short() {
        let address = addr(90);
        let device = fcu(address).await.with_latency(Duration::from_millis(25));
        let specs: Vec<ReadSpec> = (0..20)
            .map(|i| {
                spec(
                    &format!("Point {i}"),
                    address,
                    "binary-value,5",
                    "present-value",
                )
            })
            .collect();
        let total = specs.len();
        let mut batch = BatchRead::new(specs)
            .unwrap()
            .with_grouping(Grouping::PerRead)
            .with_max_in_flight(1);
        let handle = batch.stop_handle();

        let mut delivered = 0usize;
        let completion = timeout(
            Duration::from_secs(5),
            batch.run(&device, |_, _| {
                delivered += 1;
                // First result cancels the rest of the batch.
                handle.stop();
            }),
        )
        .await
        .expect("stopped run should resolve promptly");

        assert!(completion.stopped);
        assert!(completion.delivered >= 1);
        assert!(completion.delivered < total);
        assert_eq!(delivered, completion.delivered);
        assert_eq!(batch.state(), BatchState::Stopped);
    }

    #[tokio::test]
    async fn terminal_state_observation_is_idempotent() {
        let address = addr(90);
        let device = fcu(address).await;
        let mut batch = BatchRead::new(vec![spec(
            "Fan Status",
            address,
            "binary-value,5",
            "present-value",
        )])
        .unwrap();

        let mut invocations = 0usize;
        let first = batch.run(&device, |_, _| invocations += 1).await;
        let again = batch.run(&device, |_, _| invocations += 1).await;

        assert_eq!(first, again);
        assert_eq!(invocations, 1);
        assert_eq!(batch.completion(), Some(first));
        assert_eq!(batch.completion(), Some(first));
    }

    #[tokio::test]
    async fn callback_panic_is_deferred_until_the_run_finishes() {
        let address = addr(90);
        let device = fcu(address).await;
        let mut batch = BatchRead::new(vec![
            spec("Fan Status", address, "binary-value,5", "present-value"),
            spec("Space Temp", address, "analog-value,104", "present-value"),
            spec("Cooling Valve", address, "analog-output,0", "present-value"),
        ])
        .unwrap();

        let mut survivors = 0usize;
        let result = AssertUnwindSafe(batch.run(&device, |label, _| {
            if label == "Space Temp" {
                panic!("consumer bug");
            }
            survivors += 1;
        }))
        .catch_unwind()
        .await;

        assert!(result.is_err(), "deferred panic should resurface");
        assert_eq!(survivors, 2, "other labels still delivered");
        let completion = batch.completion().expect("terminal state recorded");
        assert_eq!(completion.delivered, 2);
        assert!(!completion.stopped);
    }
}
