//! Single-photon detector model: efficiency, dark counts, jitter, dead time.
//!
//! The detector is the only stateful stage in the link. `last_detection_time`
//! persists across calls and implements the dead-time gate. Dead time is
//! anchored at the *jittered* detection timestamp rather than the true photon
//! arrival time, so under large jitter the effective dead window can come out
//! slightly shorter or longer than configured; jitter can likewise put a later
//! detection's timestamp before an earlier one's. Both are properties of the
//! model and are kept as-is.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{check_non_negative, check_probability, ConfigError};
use crate::photon::PhotonEvent;

/// Resolution window for a single dark-count trial, in seconds.
pub const DARK_COUNT_WINDOW: f64 = 1e-9;

/// What kind of event the detector registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionKind {
    /// An actual incident photon.
    Photon,
    /// A false count not caused by any photon.
    DarkCount,
}

/// Outcome of one detection attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionEvent {
    pub detected: bool,
    /// Jitter-perturbed timestamp, present only when `detected`.
    pub detection_time: Option<f64>,
    pub kind: Option<DetectionKind>,
    /// The incident photon for a real detection; `None` for dark counts.
    pub photon: Option<PhotonEvent>,
}

impl DetectionEvent {
    /// The "nothing happened" event.
    fn empty() -> Self {
        Self {
            detected: false,
            detection_time: None,
            kind: None,
            photon: None,
        }
    }
}

/// A dead-time-limited single-photon detector.
#[derive(Debug, Clone)]
pub struct SinglePhotonDetector {
    detection_efficiency: f64,
    dark_count_rate: f64,
    timing_jitter: f64,
    dead_time: f64,
    jitter: Normal<f64>,
    last_detection_time: f64,
}

impl SinglePhotonDetector {
    /// Build a detector.
    ///
    /// * `detection_efficiency` — probability in [0, 1] that an incident
    ///   photon registers.
    /// * `dark_count_rate` — false counts per second, ≥ 0.
    /// * `timing_jitter` — standard deviation of the timestamp perturbation,
    ///   in seconds, ≥ 0.
    /// * `dead_time` — seconds after a detection during which the detector is
    ///   blind, ≥ 0.
    pub fn new(
        detection_efficiency: f64,
        dark_count_rate: f64,
        timing_jitter: f64,
        dead_time: f64,
    ) -> Result<Self, ConfigError> {
        check_probability("detection_efficiency", detection_efficiency)?;
        check_non_negative("dark_count_rate", dark_count_rate)?;
        check_non_negative("timing_jitter", timing_jitter)?;
        check_non_negative("dead_time", dead_time)?;
        let jitter = Normal::new(0.0, timing_jitter)
            .map_err(|_| ConfigError::Negative {
                name: "timing_jitter",
                value: timing_jitter,
            })?;
        Ok(Self {
            detection_efficiency,
            dark_count_rate,
            timing_jitter,
            dead_time,
            jitter,
            last_detection_time: f64::NEG_INFINITY,
        })
    }

    pub fn detection_efficiency(&self) -> f64 {
        self.detection_efficiency
    }

    pub fn dark_count_rate(&self) -> f64 {
        self.dark_count_rate
    }

    pub fn timing_jitter(&self) -> f64 {
        self.timing_jitter
    }

    pub fn dead_time(&self) -> f64 {
        self.dead_time
    }

    /// Timestamp of the most recent detection; `NEG_INFINITY` if the detector
    /// has never fired.
    pub fn last_detection_time(&self) -> f64 {
        self.last_detection_time
    }

    /// Whether the detector is out of its dead-time window. Pure query.
    pub fn is_available(&self, current_time: f64) -> bool {
        current_time - self.last_detection_time >= self.dead_time
    }

    /// Attempt to detect an incident photon arriving at `arrival_time`.
    ///
    /// A blocked detector rejects without consuming any randomness. An
    /// undetected photon still leaves a chance for a dark count within the
    /// detector's resolution window.
    pub fn detect<R: Rng>(
        &mut self,
        photon: &PhotonEvent,
        arrival_time: f64,
        rng: &mut R,
    ) -> DetectionEvent {
        if !self.is_available(arrival_time) {
            return DetectionEvent::empty();
        }

        if rng.gen::<f64>() < self.detection_efficiency {
            let detection_time = arrival_time + self.jitter.sample(rng);
            self.last_detection_time = detection_time;
            return DetectionEvent {
                detected: true,
                detection_time: Some(detection_time),
                kind: Some(DetectionKind::Photon),
                photon: Some(photon.clone()),
            };
        }

        if rng.gen::<f64>() < self.dark_count_rate * DARK_COUNT_WINDOW {
            let detection_time = arrival_time + self.jitter.sample(rng);
            self.last_detection_time = detection_time;
            return DetectionEvent {
                detected: true,
                detection_time: Some(detection_time),
                kind: Some(DetectionKind::DarkCount),
                photon: None,
            };
        }

        DetectionEvent::empty()
    }

    /// Independent dark-count trial, decoupled from any photon arrival and
    /// not gated by availability. Mutates the dead-time anchor on success.
    pub fn simulate_dark_count<R: Rng>(&mut self, current_time: f64, rng: &mut R) -> DetectionEvent {
        if rng.gen::<f64>() < self.dark_count_rate * DARK_COUNT_WINDOW {
            let detection_time = current_time + self.jitter.sample(rng);
            self.last_detection_time = detection_time;
            return DetectionEvent {
                detected: true,
                detection_time: Some(detection_time),
                kind: Some(DetectionKind::DarkCount),
                photon: None,
            };
        }
        DetectionEvent::empty()
    }

    /// Clear the dead-time state, as between independent Monte-Carlo trials.
    pub fn reset(&mut self) {
        self.last_detection_time = f64::NEG_INFINITY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn detector(efficiency: f64, dark_rate: f64, jitter: f64, dead: f64) -> SinglePhotonDetector {
        SinglePhotonDetector::new(efficiency, dark_rate, jitter, dead).unwrap()
    }

    #[test]
    fn rejects_invalid_configuration() {
        assert!(SinglePhotonDetector::new(1.5, 0.0, 0.0, 0.0).is_err());
        assert!(SinglePhotonDetector::new(-0.1, 0.0, 0.0, 0.0).is_err());
        assert!(SinglePhotonDetector::new(0.5, -1.0, 0.0, 0.0).is_err());
        assert!(SinglePhotonDetector::new(0.5, 0.0, -1e-12, 0.0).is_err());
        assert!(SinglePhotonDetector::new(0.5, 0.0, 0.0, -1e-6).is_err());
    }

    #[test]
    fn zero_dead_time_is_always_available() {
        let mut spd = detector(1.0, 0.0, 0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(1);
        for i in 0..100 {
            let t = i as f64 * 1e-9;
            assert!(spd.is_available(t));
            let event = spd.detect(&PhotonEvent::at(t), t, &mut rng);
            assert!(event.detected);
        }
    }

    #[test]
    fn dead_time_blocks_subsequent_detection() {
        let dead = 1e-6;
        let mut spd = detector(1.0, 0.0, 0.0, dead);
        let mut rng = StdRng::seed_from_u64(2);

        let first = spd.detect(&PhotonEvent::at(0.0), 0.0, &mut rng);
        assert!(first.detected);
        let t0 = first.detection_time.unwrap();

        // Within the dead window: blocked, no state change, no event fields.
        let blocked = spd.detect(&PhotonEvent::at(t0 + dead / 2.0), t0 + dead / 2.0, &mut rng);
        assert!(!blocked.detected);
        assert_eq!(blocked.detection_time, None);
        assert_eq!(blocked.kind, None);
        assert_eq!(blocked.photon, None);
        assert_eq!(spd.last_detection_time(), t0);

        // At exactly t0 + dead the detector is available again.
        assert!(spd.is_available(t0 + dead));
        let after = spd.detect(&PhotonEvent::at(t0 + dead), t0 + dead, &mut rng);
        assert!(after.detected);
    }

    #[test]
    fn blocked_detector_consumes_no_randomness() {
        let mut spd = detector(1.0, 0.0, 0.0, 1e-6);
        let mut rng = StdRng::seed_from_u64(3);
        let first = spd.detect(&PhotonEvent::at(0.0), 0.0, &mut rng);
        assert!(first.detected);

        // Both generators must stay in lockstep across the blocked call.
        let mut witness = rng.clone();
        let _ = spd.detect(&PhotonEvent::at(1e-9), 1e-9, &mut rng);
        assert_eq!(rng.gen::<u64>(), witness.gen::<u64>());
    }

    #[test]
    fn reset_restores_availability() {
        let mut spd = detector(1.0, 0.0, 0.0, 1.0);
        let mut rng = StdRng::seed_from_u64(4);
        assert!(spd.detect(&PhotonEvent::at(0.0), 0.0, &mut rng).detected);
        assert!(!spd.is_available(0.5));
        spd.reset();
        assert!(spd.is_available(0.5));
        assert!(spd.is_available(f64::MIN));
    }

    #[test]
    fn detection_efficiency_converges() {
        let p = 0.6;
        let mut spd = detector(p, 0.0, 0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(5);
        let trials = 10_000;
        let mut hits = 0usize;
        for i in 0..trials {
            let t = i as f64;
            let event = spd.detect(&PhotonEvent::at(t), t, &mut rng);
            if event.detected {
                assert_eq!(event.kind, Some(DetectionKind::Photon));
                hits += 1;
            }
        }
        let fraction = hits as f64 / trials as f64;
        assert!((fraction - p).abs() < 0.02, "fraction {}", fraction);
    }

    #[test]
    fn zero_efficiency_zero_dark_rate_never_fires() {
        let mut spd = detector(0.0, 0.0, 0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(6);
        for i in 0..1_000 {
            let event = spd.detect(&PhotonEvent::at(i as f64), i as f64, &mut rng);
            assert!(!event.detected);
        }
        assert_eq!(spd.last_detection_time(), f64::NEG_INFINITY);
    }

    #[test]
    fn dark_counts_converge_on_rate_times_window() {
        // 10^8 counts/s over the 1 ns resolution window: p = 0.1 per trial.
        let rate = 1e8;
        let mut spd = detector(0.0, rate, 0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(7);
        let trials = 10_000;
        let mut dark = 0usize;
        for i in 0..trials {
            let event = spd.simulate_dark_count(i as f64, &mut rng);
            if event.detected {
                assert_eq!(event.kind, Some(DetectionKind::DarkCount));
                assert_eq!(event.photon, None);
                dark += 1;
            }
        }
        let fraction = dark as f64 / trials as f64;
        assert!((fraction - 0.1).abs() < 0.015, "fraction {}", fraction);
    }

    #[test]
    fn dark_count_fallback_carries_no_photon() {
        // Efficiency 0 but a certain dark count on every attempt.
        let mut spd = detector(0.0, 1.0 / DARK_COUNT_WINDOW, 0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(8);
        let photon = PhotonEvent::at(1e-9);
        let event = spd.detect(&photon, 1e-9, &mut rng);
        assert!(event.detected);
        assert_eq!(event.kind, Some(DetectionKind::DarkCount));
        assert_eq!(event.photon, None);
    }

    #[test]
    fn jitter_perturbs_timestamps() {
        let sigma = 50e-12;
        let mut spd = detector(1.0, 0.0, sigma, 0.0);
        let mut rng = StdRng::seed_from_u64(9);
        let trials = 2_000;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for _ in 0..trials {
            let event = spd.detect(&PhotonEvent::at(0.0), 0.0, &mut rng);
            let dt = event.detection_time.unwrap();
            sum += dt;
            sum_sq += dt * dt;
        }
        let mean = sum / trials as f64;
        let var = sum_sq / trials as f64 - mean * mean;
        assert!(mean.abs() < 5e-12, "mean {}", mean);
        assert!(
            (var.sqrt() - sigma).abs() < 5e-12,
            "std dev {}",
            var.sqrt()
        );
    }

    #[test]
    fn jittered_anchor_tolerates_backward_timestamps() {
        // A large jitter can stamp a detection before the previous one. The
        // detector must accept this rather than panic or clamp.
        let mut spd = detector(1.0, 0.0, 1e-6, 0.0);
        let mut rng = StdRng::seed_from_u64(10);
        let mut previous = f64::NEG_INFINITY;
        let mut saw_backward = false;
        for i in 0..500 {
            let t = i as f64 * 1e-9;
            let event = spd.detect(&PhotonEvent::at(t), t, &mut rng);
            let dt = event.detection_time.unwrap();
            if dt < previous {
                saw_backward = true;
            }
            previous = dt;
        }
        assert!(saw_backward, "1 µs jitter on 1 ns spacing must reorder");
    }
}
