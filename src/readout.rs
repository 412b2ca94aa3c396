//! State-readout laser and projective bright/dark measurement.
//!
//! After a heralded emission the atom sits in a superposition over its ground
//! manifold. A 795 nm readout pulse with a station-specific polarization angle
//! projects that superposition: the atom fluoresces ("bright") when the pulse
//! matches the atomic state, and stays "dark" otherwise.

use num_complex::Complex;
use num_traits::Zero;
use rand::Rng;

use crate::error::{check_non_negative, ConfigError};

/// Which node of the link is reading out; the two ends use different
/// measurement-angle sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Station {
    Alice,
    Bob,
}

impl Station {
    fn polarization_angles(self) -> &'static [f64] {
        match self {
            Station::Alice => &[-22.5, 22.5, -45.0, 0.0],
            Station::Bob => &[22.5, -22.5],
        }
    }
}

/// One emitted readout pulse.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadoutPulse {
    pub wavelength_nm: f64,
    pub power: f64,
    pub pulse_duration: f64,
    pub polarization_angle_deg: f64,
    pub emission_time: f64,
}

/// Result of projecting the atomic superposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadoutOutcome {
    Bright,
    Dark,
}

/// Atomic superposition expressed in the readout basis: the amplitude of the
/// component matching the readout polarization, and of the orthogonal one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Superposition {
    pub matched: Complex<f64>,
    pub unmatched: Complex<f64>,
}

impl Superposition {
    pub fn new(matched: Complex<f64>, unmatched: Complex<f64>) -> Self {
        Self { matched, unmatched }
    }
}

/// The readout laser at one station.
#[derive(Debug, Clone)]
pub struct ReadoutLaser {
    wavelength_nm: f64,
    power: f64,
    pulse_duration: f64,
    noise_level: f64,
}

impl ReadoutLaser {
    /// * `noise_level` — fractional power fluctuation; 0.1 means ±10%.
    pub fn new(
        wavelength_nm: f64,
        power: f64,
        pulse_duration: f64,
        noise_level: f64,
    ) -> Result<Self, ConfigError> {
        check_non_negative("power", power)?;
        check_non_negative("pulse_duration", pulse_duration)?;
        check_non_negative("noise_level", noise_level)?;
        Ok(Self {
            wavelength_nm,
            power,
            pulse_duration,
            noise_level,
        })
    }

    /// Pick a readout polarization angle from the station's set.
    pub fn select_polarization<R: Rng>(&self, station: Station, rng: &mut R) -> f64 {
        let angles = station.polarization_angles();
        angles[rng.gen_range(0..angles.len())]
    }

    /// Emit a readout pulse with the given polarization angle.
    pub fn emit_pulse<R: Rng>(
        &self,
        polarization_angle_deg: f64,
        emission_time: f64,
        rng: &mut R,
    ) -> ReadoutPulse {
        let fluctuation = rng.gen_range((1.0 - self.noise_level)..=(1.0 + self.noise_level));
        ReadoutPulse {
            wavelength_nm: self.wavelength_nm,
            power: self.power * fluctuation,
            pulse_duration: self.pulse_duration,
            polarization_angle_deg,
            emission_time,
        }
    }

    /// Project the superposition: bright with probability
    /// |matched|² / (|matched|² + |unmatched|²). A zero-norm superposition has
    /// nothing to project onto and reads dark.
    pub fn measure<R: Rng>(&self, superposition: &Superposition, rng: &mut R) -> ReadoutOutcome {
        let p_matched = superposition.matched.norm_sqr();
        let p_unmatched = superposition.unmatched.norm_sqr();
        let total = p_matched + p_unmatched;
        if total.is_zero() {
            return ReadoutOutcome::Dark;
        }
        if rng.gen::<f64>() < p_matched / total {
            ReadoutOutcome::Bright
        } else {
            ReadoutOutcome::Dark
        }
    }
}
