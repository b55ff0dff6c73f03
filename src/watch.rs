//! Re-derivation of the claim state as its inputs change.
//!
//! A [`ClaimSession`] owns a task that derives a fresh [`ClaimState`] whenever its inputs change.
//! Inputs and outputs go through `watch` channels, so a burst of updates collapses into a
//! derivation of the latest inputs and readers only ever see the newest state.
//!
//! Ineligibility reasons are only valid for the quantity they were checked against, so the
//! quantity never changes on its own. A new quantity arrives together with a snapshot collected
//! for it, and every published state carries the inputs it was derived from.

use log::{debug, warn};
use metrics::{gauge, increment_counter};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;

use crate::claim::{derive_claim_state, ClaimState};
use crate::conditions::ClaimSnapshot;

pub const METRIC_DERIVATIONS: &str = "claim_derivations_total";
pub const METRIC_ELIGIBLE: &str = "claim_eligible";

/// Everything a derivation depends on.
///
/// `snapshot.ineligibility_reasons` must have been checked for `quantity`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClaimInputs {
    pub snapshot: ClaimSnapshot,
    pub quantity: u64,
}

impl ClaimInputs {
    pub fn derive(&self) -> ClaimState {
        let state = derive_claim_state(&self.snapshot, self.quantity);
        increment_counter!(METRIC_DERIVATIONS);
        gauge!(METRIC_ELIGIBLE, if state.is_eligible { 1.0 } else { 0.0 });
        state
    }
}

/// A derived state together with the inputs that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Derived {
    pub inputs: ClaimInputs,
    pub state: ClaimState,
}

impl Derived {
    fn from_inputs(inputs: ClaimInputs) -> Self {
        let state = inputs.derive();
        Self { inputs, state }
    }
}

pub struct ClaimSession {
    inputs: watch::Sender<ClaimInputs>,
    derived: watch::Receiver<Derived>,
    task: JoinHandle<()>,
}

impl ClaimSession {
    /// Start deriving. Must be called within a tokio runtime.
    pub fn spawn(snapshot: ClaimSnapshot, quantity: u64) -> Self {
        let initial = ClaimInputs { snapshot, quantity };
        let (derived_tx, derived_rx) = watch::channel(Derived::from_inputs(initial.clone()));
        let (inputs_tx, mut inputs_rx) = watch::channel(initial);

        let task = tokio::spawn(async move {
            while inputs_rx.changed().await.is_ok() {
                let derived = Derived::from_inputs(inputs_rx.borrow_and_update().clone());
                derived_tx.send_if_modified(|current| {
                    if *current == derived {
                        false
                    } else {
                        *current = derived;
                        true
                    }
                });
            }
            debug!("claim inputs closed, derivation task exiting");
        });

        Self {
            inputs: inputs_tx,
            derived: derived_rx,
            task,
        }
    }

    /// Replace the snapshot, keeping the quantity. The snapshot's reasons must have been
    /// collected for [`ClaimSession::quantity`].
    pub fn update_snapshot(&self, snapshot: ClaimSnapshot) {
        self.inputs.send_if_modified(|inputs| {
            if inputs.snapshot == snapshot {
                false
            } else {
                inputs.snapshot = snapshot;
                true
            }
        });
    }

    /// Replace both inputs at once, e.g. when the user picks a new quantity and its reasons have
    /// been fetched.
    pub fn update_inputs(&self, snapshot: ClaimSnapshot, quantity: u64) {
        let next = ClaimInputs { snapshot, quantity };
        self.inputs.send_if_modified(|inputs| {
            if *inputs == next {
                false
            } else {
                *inputs = next;
                true
            }
        });
    }

    /// The quantity the current snapshot was collected for.
    pub fn quantity(&self) -> u64 {
        self.inputs.borrow().quantity
    }

    /// The most recently derived state.
    pub fn current(&self) -> Derived {
        self.derived.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Derived> {
        self.derived.clone()
    }

    /// The current state followed by every change.
    pub fn stream(&self) -> WatchStream<Derived> {
        WatchStream::new(self.derived.clone())
    }

    /// Stop deriving and wait for the task to finish.
    pub async fn shutdown(self) {
        let Self { inputs, task, .. } = self;
        drop(inputs);
        if let Err(err) = task.await {
            warn!("claim derivation task failed: {err}");
        }
    }
}
