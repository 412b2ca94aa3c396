//! Monte Carlo experiment runners.
//!
//! Two experiments, mirroring how the link is operated:
//! 1. **Heralding** — laser → atom → collection → fiber → detector, one full
//!    chain per trial, short-circuiting at the first failed stage.
//! 2. **Bell-state measurement** — repeated measurement of a fixed photon
//!    pair, aggregated into an outcome histogram.
//!
//! Trials are independent: each gets its own component instances and its own
//! seeded generator, so runs reproduce exactly for a given base seed whether
//! they execute serially or, with the `parallel` feature, on a rayon pool.

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::atom::Rb87Atom;
use crate::bell::BellOutcome;
use crate::bsm::{BellMeasurementResult, BellStateMeasurement};
use crate::detector::SinglePhotonDetector;
use crate::fiber::OpticalFiber;
use crate::laser::ExcitationLaser;
use crate::optics::CollectionOptics;
use crate::photon::PhotonEvent;

/// Per-trial seed spacing; a prime stride keeps the seeds distinct.
const SEED_STRIDE: u64 = 7919;

fn trial_seed(base_seed: u64, trial: usize) -> u64 {
    base_seed.wrapping_add(trial as u64 * SEED_STRIDE)
}

/// How far along the chain a heralding trial got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeraldStage {
    NotExcited,
    NotCollected,
    NotTransmitted,
    NotDetected,
    Detected,
}

/// Configuration for a heralding-rate experiment.
#[derive(Debug, Clone)]
pub struct HeraldConfig {
    pub laser: ExcitationLaser,
    pub optics: CollectionOptics,
    pub fiber: OpticalFiber,
    pub detector: SinglePhotonDetector,
    pub trials: usize,
    pub base_seed: u64,
}

/// Aggregated counters from a heralding-rate experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct HeraldResult {
    pub trials: usize,
    /// Trials in which the atom was excited (and therefore emitted).
    pub excited: usize,
    /// Trials in which the emitted photon was captured by the optics.
    pub collected: usize,
    /// Trials in which the photon survived the fiber.
    pub transmitted: usize,
    /// Trials in which the detector registered the photon.
    pub detected: usize,
    /// detected / trials.
    pub herald_rate: f64,
}

fn run_herald_trial(config: &HeraldConfig, seed: u64) -> HeraldStage {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut laser = config.laser.clone();
    let mut atom = Rb87Atom::new();
    let mut detector = config.detector.clone();

    let pulse = laser.emit(&mut rng);
    if !atom.excite(&pulse, &mut rng).excited {
        return HeraldStage::NotExcited;
    }

    // The photon leaves roughly one excited-state lifetime after the pulse;
    // each trial runs on its own clock starting at the pulse arrival.
    let emission_time = pulse.pulse_duration + atom.excited_state_lifetime();
    let mut photon = match atom.decay(emission_time, &mut rng) {
        Some(photon) => photon,
        None => return HeraldStage::NotExcited,
    };

    if !config.optics.collect(&mut photon, &mut rng) {
        return HeraldStage::NotCollected;
    }

    if !config.fiber.propagate(&mut photon, emission_time, &mut rng) {
        return HeraldStage::NotTransmitted;
    }
    let arrival_time = match photon.arrival_time {
        Some(t) => t,
        None => return HeraldStage::NotTransmitted,
    };

    if detector.detect(&photon, arrival_time, &mut rng).detected {
        HeraldStage::Detected
    } else {
        HeraldStage::NotDetected
    }
}

/// Run the full heralding experiment.
pub fn run_herald_simulation(config: &HeraldConfig) -> HeraldResult {
    let seeds: Vec<u64> = (0..config.trials)
        .map(|trial| trial_seed(config.base_seed, trial))
        .collect();

    #[cfg(feature = "parallel")]
    let stages: Vec<HeraldStage> = seeds
        .par_iter()
        .map(|&seed| run_herald_trial(config, seed))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let stages: Vec<HeraldStage> = seeds
        .iter()
        .map(|&seed| run_herald_trial(config, seed))
        .collect();

    let mut excited = 0usize;
    let mut collected = 0usize;
    let mut transmitted = 0usize;
    let mut detected = 0usize;
    for stage in &stages {
        // Counters are cumulative: reaching a stage implies passing the
        // earlier ones.
        match stage {
            HeraldStage::NotExcited => {}
            HeraldStage::NotCollected => excited += 1,
            HeraldStage::NotTransmitted => {
                excited += 1;
                collected += 1;
            }
            HeraldStage::NotDetected => {
                excited += 1;
                collected += 1;
                transmitted += 1;
            }
            HeraldStage::Detected => {
                excited += 1;
                collected += 1;
                transmitted += 1;
                detected += 1;
            }
        }
    }

    let herald_rate = if config.trials > 0 {
        detected as f64 / config.trials as f64
    } else {
        0.0
    };
    debug!(
        "herald simulation: {}/{} trials heralded (excited {}, collected {}, transmitted {})",
        detected, config.trials, excited, collected, transmitted
    );

    HeraldResult {
        trials: config.trials,
        excited,
        collected,
        transmitted,
        detected,
        herald_rate,
    }
}

/// Outcome histogram of a repeated Bell-state measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub psi_minus: usize,
    pub psi_plus: usize,
    pub ambiguous_symmetric: usize,
    pub inconclusive: usize,
}

impl OutcomeCounts {
    fn record(&mut self, result: &BellMeasurementResult) {
        match result.outcome {
            BellOutcome::PsiMinus => self.psi_minus += 1,
            BellOutcome::PsiPlus => self.psi_plus += 1,
            BellOutcome::AmbiguousSymmetric => self.ambiguous_symmetric += 1,
            BellOutcome::Inconclusive => self.inconclusive += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.psi_minus + self.psi_plus + self.ambiguous_symmetric + self.inconclusive
    }
}

/// Configuration for a repeated-BSM experiment on a fixed photon pair.
#[derive(Debug, Clone)]
pub struct BsmConfig {
    pub measurement: BellStateMeasurement,
    pub photon_a: PhotonEvent,
    pub photon_b: PhotonEvent,
    pub trials: usize,
    pub base_seed: u64,
}

/// Aggregated result of a repeated-BSM experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct BsmResult {
    pub trials: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub outcomes: OutcomeCounts,
}

fn run_bsm_trial(config: &BsmConfig, seed: u64) -> BellMeasurementResult {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut measurement = config.measurement.clone();
    measurement.measure(&config.photon_a, &config.photon_b, &mut rng)
}

/// Run the repeated-BSM experiment.
pub fn run_bsm_simulation(config: &BsmConfig) -> BsmResult {
    let seeds: Vec<u64> = (0..config.trials)
        .map(|trial| trial_seed(config.base_seed, trial))
        .collect();

    #[cfg(feature = "parallel")]
    let results: Vec<BellMeasurementResult> = seeds
        .par_iter()
        .map(|&seed| run_bsm_trial(config, seed))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<BellMeasurementResult> = seeds
        .iter()
        .map(|&seed| run_bsm_trial(config, seed))
        .collect();

    let mut outcomes = OutcomeCounts::default();
    let mut successes = 0usize;
    for result in &results {
        outcomes.record(result);
        if result.success {
            successes += 1;
        }
    }

    let success_rate = if config.trials > 0 {
        successes as f64 / config.trials as f64
    } else {
        0.0
    };
    debug!(
        "BSM simulation: {}/{} successes (Ψ⁻ {}, Ψ⁺ {}, ambiguous {}, inconclusive {})",
        successes,
        config.trials,
        outcomes.psi_minus,
        outcomes.psi_plus,
        outcomes.ambiguous_symmetric,
        outcomes.inconclusive
    );

    BsmResult {
        trials: config.trials,
        successes,
        success_rate,
        outcomes,
    }
}
