//! Pulsed excitation laser.
//!
//! Emits excitation pulses with Gaussian power fluctuations, alignment losses
//! and occasional σ⁺ ↔ σ⁻ polarization flips scaled by the noise level.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{check_non_negative, check_probability, ConfigError};
use crate::photon::{flip_sigma, Polarization};

/// Temporal shape of the excitation pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseShape {
    Gaussian,
    Rectangular,
}

/// One emitted excitation pulse, as seen by the atom.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcitationPulse {
    /// Effective power after noise and alignment, in watts. Strong noise can
    /// drive this negative; consumers treat non-positive power as no light.
    pub power: f64,
    pub wavelength_nm: f64,
    pub pulse_duration: f64,
    pub pulse_shape: PulseShape,
    pub detuning: f64,
    pub polarization: Polarization,
    /// Running count of pulses emitted by the source laser.
    pub pulse_count: u64,
}

/// A pulsed laser driving the atomic excitation.
#[derive(Debug, Clone)]
pub struct ExcitationLaser {
    power: f64,
    wavelength_nm: f64,
    pulse_duration: f64,
    pulse_shape: PulseShape,
    noise_level: f64,
    power_noise: Normal<f64>,
    detuning: f64,
    alignment_efficiency: f64,
    polarization: Polarization,
    pulse_count: u64,
}

impl ExcitationLaser {
    /// A noiseless, perfectly aligned, on-resonance laser. Use the builder
    /// methods to dial in imperfections.
    pub fn new(
        power: f64,
        wavelength_nm: f64,
        pulse_duration: f64,
        polarization: Polarization,
    ) -> Result<Self, ConfigError> {
        check_non_negative("power", power)?;
        check_non_negative("pulse_duration", pulse_duration)?;
        Ok(Self {
            power,
            wavelength_nm,
            pulse_duration,
            pulse_shape: PulseShape::Gaussian,
            noise_level: 0.0,
            power_noise: noise_distribution(0.0)?,
            detuning: 0.0,
            alignment_efficiency: 1.0,
            polarization,
            pulse_count: 0,
        })
    }

    /// Standard deviation of the additive power fluctuation; also scales the
    /// polarization-flip probability.
    pub fn with_noise_level(mut self, noise_level: f64) -> Result<Self, ConfigError> {
        check_non_negative("noise_level", noise_level)?;
        self.noise_level = noise_level;
        self.power_noise = noise_distribution(noise_level)?;
        Ok(self)
    }

    pub fn with_detuning(mut self, detuning: f64) -> Self {
        self.detuning = detuning;
        self
    }

    pub fn with_alignment_efficiency(mut self, efficiency: f64) -> Result<Self, ConfigError> {
        check_probability("alignment_efficiency", efficiency)?;
        self.alignment_efficiency = efficiency;
        Ok(self)
    }

    pub fn with_pulse_shape(mut self, shape: PulseShape) -> Self {
        self.pulse_shape = shape;
        self
    }

    pub fn pulse_count(&self) -> u64 {
        self.pulse_count
    }

    /// Runtime parameter adjustment between pulses.
    pub fn set_power(&mut self, power: f64) -> Result<(), ConfigError> {
        check_non_negative("power", power)?;
        self.power = power;
        Ok(())
    }

    pub fn set_detuning(&mut self, detuning: f64) {
        self.detuning = detuning;
    }

    /// Fire one pulse.
    pub fn emit<R: Rng>(&mut self, rng: &mut R) -> ExcitationPulse {
        self.pulse_count += 1;

        let effective_power =
            (self.power + self.power_noise.sample(rng)) * self.alignment_efficiency;

        // Polarization noise: a small chance of a σ⁺ ↔ σ⁻ flip, weighted by
        // the noise level. π light is unaffected.
        let polarization = if rng.gen::<f64>() < 0.05 * self.noise_level {
            flip_sigma(self.polarization)
        } else {
            self.polarization
        };

        ExcitationPulse {
            power: effective_power,
            wavelength_nm: self.wavelength_nm,
            pulse_duration: self.pulse_duration,
            pulse_shape: self.pulse_shape,
            detuning: self.detuning,
            polarization,
            pulse_count: self.pulse_count,
        }
    }
}

fn noise_distribution(noise_level: f64) -> Result<Normal<f64>, ConfigError> {
    Normal::new(0.0, noise_level).map_err(|_| ConfigError::Negative {
        name: "noise_level",
        value: noise_level,
    })
}
