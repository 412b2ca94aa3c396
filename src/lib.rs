//! # photon-link-sim
//!
//! Monte Carlo simulation of a heralded single-photon / entanglement link for
//! a neutral-atom quantum-network node: a pulsed laser excites a Rb87 atom,
//! the atom decays emitting a polarization-encoded photon, high-NA optics
//! collect it, a lossy dispersive fiber carries it, and a noisy
//! dead-time-limited single-photon detector registers it. Pairs of photons
//! can be combined in a Bell-state measurement that checks temporal
//! coincidence and draws a probabilistic entanglement-swapping outcome.
//!
//! ## Physics
//!
//! - **Heralding**: each pipeline stage is an independent Bernoulli/Gaussian
//!   draw; the only stateful element is the detector's dead-time window.
//! - **Bell-state measurement**: a linear-optical setup resolves only the
//!   antisymmetric Ψ⁻/Ψ⁺ states; the symmetric Φ± pair is reported as one
//!   ambiguous outcome. The interference-gated model abstracts the 50/50
//!   beam splitter into a visibility Bernoulli draw over the two resolvable
//!   states.
//!
//! ## Usage
//!
//! ```no_run
//! use photon_link_sim::prelude::*;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut bsm = BellStateMeasurement::realistic(0.5e-9, 0.9).unwrap();
//! let photon_a = PhotonEvent::at(1.0e-9).with_polarization(Polarization::LeftCircular);
//! let photon_b = PhotonEvent::at(1.2e-9).with_polarization(Polarization::RightCircular);
//! let result = bsm.measure(&photon_a, &photon_b, &mut rng);
//! println!("success: {}, outcome: {}", result.success, result.outcome);
//! ```

pub mod atom;
pub mod bell;
pub mod bsm;
pub mod coincidence;
pub mod detector;
pub mod error;
pub mod fiber;
pub mod laser;
pub mod optics;
pub mod photon;
pub mod readout;
pub mod simulation;

pub mod prelude {
    pub use crate::atom::*;
    pub use crate::bell::*;
    pub use crate::bsm::*;
    pub use crate::coincidence::*;
    pub use crate::detector::*;
    pub use crate::error::*;
    pub use crate::fiber::*;
    pub use crate::laser::*;
    pub use crate::optics::*;
    pub use crate::photon::*;
    pub use crate::readout::*;
    pub use crate::simulation::*;
}
