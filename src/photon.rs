//! Photon records and polarization states.
//!
//! A [`PhotonEvent`] is created once at emission and enriched append-only as
//! it moves through the link: collection stamps `collected`, fiber propagation
//! stamps `arrival_time` and `transmitted`, the measurement stage may attach a
//! linear-basis projection or an effective Bell-state tag. Fields are never
//! removed.

use num_complex::Complex;
use num_traits::Zero;
use rand::Rng;

use crate::bell::BellOutcome;

/// Linear H/V polarization amplitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearState {
    pub h: Complex<f64>,
    pub v: Complex<f64>,
}

impl LinearState {
    pub fn new(h: Complex<f64>, v: Complex<f64>) -> Self {
        Self { h, v }
    }

    /// Total squared modulus across both components.
    pub fn norm_sqr(&self) -> f64 {
        self.h.norm_sqr() + self.v.norm_sqr()
    }

    pub fn is_normalized(&self) -> bool {
        (self.norm_sqr() - 1.0).abs() < 1e-9
    }
}

/// Photon polarization, in either the circular/atomic or the linear basis.
///
/// σ⁺/σ⁻ label the atomic-frame transitions and carry the same circular
/// handedness as L/R for the purposes of the linear projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Polarization {
    SigmaPlus,
    SigmaMinus,
    Pi,
    LeftCircular,
    RightCircular,
    Linear(LinearState),
}

impl Polarization {
    /// Project onto the linear H/V basis:
    /// |L⟩ = (|H⟩ + i|V⟩)/√2, |R⟩ = (|H⟩ − i|V⟩)/√2.
    ///
    /// π light is linear along the quantization axis and maps to pure H;
    /// already-linear states pass through unchanged.
    pub fn to_linear(self) -> LinearState {
        let amp = std::f64::consts::FRAC_1_SQRT_2;
        match self {
            Polarization::LeftCircular | Polarization::SigmaPlus => LinearState {
                h: Complex::new(amp, 0.0),
                v: Complex::new(0.0, amp),
            },
            Polarization::RightCircular | Polarization::SigmaMinus => LinearState {
                h: Complex::new(amp, 0.0),
                v: Complex::new(0.0, -amp),
            },
            Polarization::Pi => LinearState {
                h: Complex::new(1.0, 0.0),
                v: Complex::zero(),
            },
            Polarization::Linear(state) => state,
        }
    }
}

/// Hyperfine state tag of the atom a photon originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtomState {
    pub f: u32,
    pub m_f: i32,
}

/// A single emitted photon and everything later stages have learned about it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhotonEvent {
    /// Stamped by channel propagation; absent until then.
    pub arrival_time: Option<f64>,
    pub emission_time: Option<f64>,
    pub wavelength_nm: Option<f64>,
    pub frequency_hz: Option<f64>,
    pub polarization: Option<Polarization>,
    /// Linear-basis projection of `polarization`, attached by the
    /// interference stage.
    pub linear_state: Option<LinearState>,
    pub direction: Option<[f64; 3]>,
    pub originating_atom: Option<AtomState>,
    pub emission_probability: Option<f64>,
    /// Temporal pulse width in seconds; broadened by dispersion.
    pub pulse_width: Option<f64>,
    pub spectral_width_nm: Option<f64>,
    pub transmitted: Option<bool>,
    pub collected: Option<bool>,
    /// Set when two photons are merged into one effective photon by the
    /// measurement stage.
    pub effective_bell_state: Option<BellOutcome>,
}

impl PhotonEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bare photon with only a detector-facing timestamp, as handed over by
    /// an upstream channel.
    pub fn at(arrival_time: f64) -> Self {
        Self {
            arrival_time: Some(arrival_time),
            ..Self::default()
        }
    }

    pub fn with_polarization(mut self, polarization: Polarization) -> Self {
        self.polarization = Some(polarization);
        self
    }

    /// Attach the linear-basis projection of the photon's polarization.
    ///
    /// Photons without polarization information are left unchanged.
    pub fn project_linear(&mut self) {
        if let Some(polarization) = self.polarization {
            self.linear_state = Some(polarization.to_linear());
        }
    }
}

/// Flip σ⁺ ↔ σ⁻; every other polarization is unaffected.
pub(crate) fn flip_sigma(polarization: Polarization) -> Polarization {
    match polarization {
        Polarization::SigmaPlus => Polarization::SigmaMinus,
        Polarization::SigmaMinus => Polarization::SigmaPlus,
        other => other,
    }
}

/// Uniformly pick one of the circular handednesses, for sources that emit
/// unpolarized pairs.
pub fn random_circular<R: Rng>(rng: &mut R) -> Polarization {
    match rng.gen_range(0..2) {
        0 => Polarization::LeftCircular,
        _ => Polarization::RightCircular,
    }
}
