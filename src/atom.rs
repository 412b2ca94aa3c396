//! Rb87 atom: excitation and single-photon spontaneous emission.
//!
//! The atom starts in the 5S₁/₂ F=1, m_F=0 ground state. A resonant pulse
//! drives it toward 5P₃/₂ F'=0 with a pulse-area probability suppressed by
//! detuning; decay back to the ground manifold lands on m_F = ±1 (selection
//! rules forbid m_F = 0) and emits a polarization-correlated 780 nm photon.

use rand::Rng;

use crate::error::{check_positive, ConfigError};
use crate::laser::ExcitationPulse;
use crate::photon::{AtomState, PhotonEvent, Polarization};

const HBAR: f64 = 1.055e-34; // J·s
const DIPOLE_MOMENT: f64 = 3e-29; // C·m
const EPSILON_0: f64 = 8.85e-12; // F/m
const SPEED_OF_LIGHT: f64 = 3e8; // m/s
const BEAM_WAIST: f64 = 10e-6; // m
const DETUNING_SCALE: f64 = 0.1;

/// D2-line emission wavelength in nm.
pub const EMISSION_WAVELENGTH_NM: f64 = 780.0;

/// Default 5P₃/₂ lifetime in seconds.
pub const DEFAULT_EXCITED_LIFETIME: f64 = 26e-9;

/// Excited-state bookkeeping while the atom is in 5P₃/₂.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExcitedState {
    pub f_prime: u32,
    pub m_f: i32,
    /// Polarization of the driving pulse; biases the decay branching.
    pub laser_polarization: Polarization,
}

/// Outcome of one excitation attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExcitationResult {
    pub excited: bool,
    /// The computed excitation probability, whether or not the draw succeeded.
    pub probability: f64,
}

/// A single trapped Rb87 atom.
#[derive(Debug, Clone)]
pub struct Rb87Atom {
    state: AtomState,
    excited: Option<ExcitedState>,
    excited_state_lifetime: f64,
}

impl Default for Rb87Atom {
    fn default() -> Self {
        Self::new()
    }
}

impl Rb87Atom {
    pub fn new() -> Self {
        Self {
            state: AtomState { f: 1, m_f: 0 },
            excited: None,
            excited_state_lifetime: DEFAULT_EXCITED_LIFETIME,
        }
    }

    pub fn with_lifetime(lifetime: f64) -> Result<Self, ConfigError> {
        check_positive("excited_state_lifetime", lifetime)?;
        let mut atom = Self::new();
        atom.excited_state_lifetime = lifetime;
        Ok(atom)
    }

    pub fn state(&self) -> AtomState {
        self.state
    }

    pub fn is_excited(&self) -> bool {
        self.excited.is_some()
    }

    pub fn excited_state_lifetime(&self) -> f64 {
        self.excited_state_lifetime
    }

    /// Rabi frequency Ω in rad/s for a beam of the given power focused to the
    /// standard waist.
    pub fn rabi_frequency(power_watts: f64) -> Result<f64, ConfigError> {
        check_positive("power_watts", power_watts)?;
        Ok(rabi_frequency_unchecked(power_watts))
    }

    /// Excitation probability for a pulse:
    /// P = sin²(Ωτ/2) · exp(−|Δ|/Δ_scale).
    ///
    /// Non-positive effective power (noise can drive it there) means no light
    /// and therefore zero probability.
    pub fn excitation_probability(pulse: &ExcitationPulse) -> f64 {
        if pulse.power <= 0.0 {
            return 0.0;
        }
        let pulse_area = rabi_frequency_unchecked(pulse.power) * pulse.pulse_duration;
        let detuning_factor = (-pulse.detuning.abs() / DETUNING_SCALE).exp();
        (pulse_area / 2.0).sin().powi(2) * detuning_factor
    }

    /// Monte-Carlo excitation attempt.
    pub fn excite<R: Rng>(&mut self, pulse: &ExcitationPulse, rng: &mut R) -> ExcitationResult {
        let probability = Self::excitation_probability(pulse);
        if rng.gen::<f64>() < probability {
            self.excited = Some(ExcitedState {
                f_prime: 0,
                m_f: 0,
                laser_polarization: pulse.polarization,
            });
            ExcitationResult {
                excited: true,
                probability,
            }
        } else {
            ExcitationResult {
                excited: false,
                probability,
            }
        }
    }

    /// Spontaneous emission from the excited state.
    ///
    /// Returns `None` if the atom is not excited. Otherwise the atom falls to
    /// m_F = ±1 with branching ratios set by the excitation polarization
    /// (σ⁺: 0.8/0.2, σ⁻: 0.2/0.8, otherwise even), and the emitted photon's
    /// circular polarization is correlated with the final state.
    pub fn decay<R: Rng>(&mut self, emission_time: f64, rng: &mut R) -> Option<PhotonEvent> {
        let excited = self.excited.take()?;

        let ratio_plus = match excited.laser_polarization {
            Polarization::SigmaPlus => 0.8,
            Polarization::SigmaMinus => 0.2,
            _ => 0.5,
        };

        let (final_m_f, photon_polarization) = if rng.gen::<f64>() < ratio_plus {
            (1, Polarization::SigmaPlus)
        } else {
            (-1, Polarization::SigmaMinus)
        };

        let final_state = AtomState {
            f: 1,
            m_f: final_m_f,
        };
        self.state = final_state;

        Some(PhotonEvent {
            emission_time: Some(emission_time),
            wavelength_nm: Some(EMISSION_WAVELENGTH_NM),
            frequency_hz: Some(SPEED_OF_LIGHT / (EMISSION_WAVELENGTH_NM * 1e-9)),
            polarization: Some(photon_polarization),
            direction: Some([0.0, 0.0, 1.0]),
            originating_atom: Some(final_state),
            emission_probability: Some(1.0),
            ..PhotonEvent::default()
        })
    }

    /// Return to the initial ground state.
    pub fn reset(&mut self) {
        self.state = AtomState { f: 1, m_f: 0 };
        self.excited = None;
    }
}

fn rabi_frequency_unchecked(power_watts: f64) -> f64 {
    let beam_area = std::f64::consts::PI * BEAM_WAIST * BEAM_WAIST;
    let intensity = power_watts / beam_area;
    let field = (2.0 * intensity / (EPSILON_0 * SPEED_OF_LIGHT)).sqrt();
    DIPOLE_MOMENT * field / HBAR
}
