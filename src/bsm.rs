//! Bell-state measurement orchestrator.
//!
//! One orchestrator covers both physical models, parameterized by the
//! [`BellStateSelector`] strategy:
//!
//! - **four-state, detection-gated** — after coincidence, a Bell state is
//!   drawn from the four-state space, the photon pair is merged into one
//!   effective photon, and that photon must still pass an independent
//!   single-photon-detector draw before the measurement counts as a success.
//! - **two-state, interference-gated** — both photons are projected into the
//!   linear H/V basis and a visibility-gated beam-splitter draw alone decides
//!   success.
//!
//! The measurement keeps no memory across calls (the owned gate detector is
//! reset before each use), but every call consumes fresh randomness; callers
//! needing reproducibility seed the generator they pass in.

use log::trace;
use rand::Rng;

use crate::bell::{BellOutcome, BellStateSelector};
use crate::coincidence::is_coincident;
use crate::detector::SinglePhotonDetector;
use crate::error::{check_non_negative, ConfigError};
use crate::photon::PhotonEvent;

/// What a failed gate detection does to an already-selected Bell label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMissPolicy {
    /// Discard the label and report plain inconclusive.
    Inconclusive,
    /// Keep the selected label in the result; the success flag still records
    /// the miss. Useful when the selected-but-undetected distinction matters.
    KeepLabel,
}

/// Outcome record of one Bell-state measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct BellMeasurementResult {
    pub success: bool,
    pub outcome: BellOutcome,
    /// Arrival-time difference of the input pair; `None` when a timestamp was
    /// missing.
    pub time_difference: Option<f64>,
}

/// Secondary detection gate for the four-state model.
#[derive(Debug, Clone)]
pub struct DetectionGate {
    pub detector: SinglePhotonDetector,
    pub miss_policy: GateMissPolicy,
}

/// Composes coincidence check, basis transformation, Bell-state selection and
/// the optional detection gate into one measurement call.
#[derive(Debug, Clone)]
pub struct BellStateMeasurement {
    coincidence_window: f64,
    selector: BellStateSelector,
    gate: Option<DetectionGate>,
}

impl BellStateMeasurement {
    pub fn new(coincidence_window: f64, selector: BellStateSelector) -> Result<Self, ConfigError> {
        check_non_negative("coincidence_window", coincidence_window)?;
        Ok(Self {
            coincidence_window,
            selector,
            gate: None,
        })
    }

    /// Layer an independent detection draw on top of Bell-state selection.
    pub fn with_detection_gate(
        mut self,
        detector: SinglePhotonDetector,
        miss_policy: GateMissPolicy,
    ) -> Self {
        self.gate = Some(DetectionGate {
            detector,
            miss_policy,
        });
        self
    }

    /// Four-state model gated by a detector. A failed gate detection reports
    /// plain inconclusive, matching the simplified scheme.
    pub fn simplified(
        coincidence_window: f64,
        detector: SinglePhotonDetector,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(coincidence_window, BellStateSelector::four_state_uniform())?
            .with_detection_gate(detector, GateMissPolicy::Inconclusive))
    }

    /// Interference-gated two-state model; no secondary detector draw.
    pub fn realistic(
        coincidence_window: f64,
        interference_visibility: f64,
    ) -> Result<Self, ConfigError> {
        Self::new(
            coincidence_window,
            BellStateSelector::two_state_interference(interference_visibility)?,
        )
    }

    pub fn coincidence_window(&self) -> f64 {
        self.coincidence_window
    }

    pub fn selector(&self) -> &BellStateSelector {
        &self.selector
    }

    /// Perform the measurement on one photon pair.
    pub fn measure<R: Rng>(
        &mut self,
        photon_a: &PhotonEvent,
        photon_b: &PhotonEvent,
        rng: &mut R,
    ) -> BellMeasurementResult {
        let (coincident, time_difference) = is_coincident(
            photon_a.arrival_time,
            photon_b.arrival_time,
            self.coincidence_window,
        );
        if !coincident {
            trace!(
                "no coincidence: Δt = {:?}, window = {}",
                time_difference,
                self.coincidence_window
            );
            return BellMeasurementResult {
                success: false,
                outcome: BellOutcome::Inconclusive,
                time_difference,
            };
        }

        // The interference model operates on linear H/V amplitudes.
        let mut photon_a = photon_a.clone();
        let mut photon_b = photon_b.clone();
        if self.selector.requires_linear_basis() {
            photon_a.project_linear();
            photon_b.project_linear();
        }

        let outcome = match self.selector.select(rng) {
            Some(outcome) => outcome,
            None => {
                trace!("interference not ideal, measurement inconclusive");
                return BellMeasurementResult {
                    success: false,
                    outcome: BellOutcome::Inconclusive,
                    time_difference,
                };
            }
        };

        if let Some(gate) = self.gate.as_mut() {
            let effective = merge_effective(&photon_a, &photon_b, outcome);
            // Coincidence guarantees both timestamps, hence a merged one.
            let arrival = match effective.arrival_time {
                Some(t) => t,
                None => unreachable!("coincident photons carry arrival times"),
            };
            // The gate models an independent trial; clear any dead time left
            // over from a previous pair.
            gate.detector.reset();
            let detection = gate.detector.detect(&effective, arrival, rng);
            if !detection.detected {
                trace!("gate detection missed the effective photon");
                let outcome = match gate.miss_policy {
                    GateMissPolicy::Inconclusive => BellOutcome::Inconclusive,
                    GateMissPolicy::KeepLabel => outcome,
                };
                return BellMeasurementResult {
                    success: false,
                    outcome,
                    time_difference,
                };
            }
        }

        BellMeasurementResult {
            success: true,
            outcome,
            time_difference,
        }
    }
}

/// Merge a coincident pair into one effective photon carrying the selected
/// outcome. Shared physical attributes are copied from the first photon; the
/// arrival time is the arithmetic mean of the pair's.
pub fn merge_effective(
    photon_a: &PhotonEvent,
    photon_b: &PhotonEvent,
    outcome: BellOutcome,
) -> PhotonEvent {
    let arrival_time = match (photon_a.arrival_time, photon_b.arrival_time) {
        (Some(a), Some(b)) => Some(0.5 * (a + b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    };
    PhotonEvent {
        arrival_time,
        wavelength_nm: photon_a.wavelength_nm,
        frequency_hz: photon_a.frequency_hz,
        originating_atom: photon_a.originating_atom,
        emission_probability: photon_a.emission_probability,
        effective_bell_state: Some(outcome),
        ..PhotonEvent::default()
    }
}
