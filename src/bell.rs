//! Bell-state outcome space and selection strategies.
//!
//! A linear-optical measurement can distinguish at most two of the four Bell
//! states: the antisymmetric Ψ⁻ and Ψ⁺ produce distinct detector signatures,
//! while the symmetric Φ⁺ and Φ⁻ are indistinguishable from each other and
//! collapse into a single ambiguous outcome.

use std::fmt;

use rand::Rng;

use crate::error::{check_probability, ConfigError};

/// One of the four maximally-entangled two-photon basis states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BellState {
    PsiMinus,
    PsiPlus,
    PhiPlus,
    PhiMinus,
}

impl BellState {
    pub const ALL: [BellState; 4] = [
        BellState::PsiMinus,
        BellState::PsiPlus,
        BellState::PhiPlus,
        BellState::PhiMinus,
    ];

    /// The antisymmetric states are the ones a linear-optical setup resolves.
    pub fn is_antisymmetric(self) -> bool {
        matches!(self, BellState::PsiMinus | BellState::PsiPlus)
    }
}

impl fmt::Display for BellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BellState::PsiMinus => "Ψ⁻",
            BellState::PsiPlus => "Ψ⁺",
            BellState::PhiPlus => "Φ⁺",
            BellState::PhiMinus => "Φ⁻",
        };
        write!(f, "{}", label)
    }
}

/// What a measurement can actually report: the two resolvable states, the
/// merged symmetric pair, or nothing at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BellOutcome {
    PsiMinus,
    PsiPlus,
    AmbiguousSymmetric,
    Inconclusive,
}

impl BellOutcome {
    /// Project a selected Bell state onto its reportable outcome.
    pub fn from_state(state: BellState) -> Self {
        match state {
            BellState::PsiMinus => BellOutcome::PsiMinus,
            BellState::PsiPlus => BellOutcome::PsiPlus,
            BellState::PhiPlus | BellState::PhiMinus => BellOutcome::AmbiguousSymmetric,
        }
    }

    pub fn is_conclusive(self) -> bool {
        !matches!(self, BellOutcome::Inconclusive)
    }
}

impl fmt::Display for BellOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BellOutcome::PsiMinus => "Ψ⁻",
            BellOutcome::PsiPlus => "Ψ⁺",
            BellOutcome::AmbiguousSymmetric => "Ambiguous_Symmetric",
            BellOutcome::Inconclusive => "Inconclusive",
        };
        write!(f, "{}", label)
    }
}

/// Selection weights over the four Bell states. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BellStateWeights {
    pub psi_minus: f64,
    pub psi_plus: f64,
    pub phi_plus: f64,
    pub phi_minus: f64,
}

impl BellStateWeights {
    /// Equal probability for all four states.
    pub fn uniform() -> Self {
        Self {
            psi_minus: 0.25,
            psi_plus: 0.25,
            phi_plus: 0.25,
            phi_minus: 0.25,
        }
    }

    pub fn new(
        psi_minus: f64,
        psi_plus: f64,
        phi_plus: f64,
        phi_minus: f64,
    ) -> Result<Self, ConfigError> {
        check_probability("psi_minus weight", psi_minus)?;
        check_probability("psi_plus weight", psi_plus)?;
        check_probability("phi_plus weight", phi_plus)?;
        check_probability("phi_minus weight", phi_minus)?;
        let sum = psi_minus + psi_plus + phi_plus + phi_minus;
        if (sum - 1.0).abs() > 1e-9 {
            return Err(ConfigError::WeightsNotNormalized { sum });
        }
        Ok(Self {
            psi_minus,
            psi_plus,
            phi_plus,
            phi_minus,
        })
    }

    fn weight_of(&self, state: BellState) -> f64 {
        match state {
            BellState::PsiMinus => self.psi_minus,
            BellState::PsiPlus => self.psi_plus,
            BellState::PhiPlus => self.phi_plus,
            BellState::PhiMinus => self.phi_minus,
        }
    }

    /// Sample a Bell state according to the configured weights.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> BellState {
        let r: f64 = rng.gen();
        let mut cumulative = 0.0;
        for state in BellState::ALL {
            cumulative += self.weight_of(state);
            if r < cumulative {
                return state;
            }
        }
        // Fallback to last state (handles floating-point edge case)
        BellState::PhiMinus
    }
}

/// Strategy for picking a measurement outcome once two photons coincide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BellStateSelector {
    /// Select among all four states; the symmetric pair is reported as one
    /// ambiguous label. Selection always yields an outcome.
    FourStateUniform { weights: BellStateWeights },

    /// Two-photon interference at a 50/50 beam splitter, abstracted to a
    /// Bernoulli draw on the interference visibility. On success, one of the
    /// two resolvable states is picked uniformly; on failure there is no
    /// valid projection.
    TwoStateInterference { visibility: f64 },
}

impl BellStateSelector {
    pub fn four_state_uniform() -> Self {
        BellStateSelector::FourStateUniform {
            weights: BellStateWeights::uniform(),
        }
    }

    pub fn four_state_weighted(weights: BellStateWeights) -> Self {
        BellStateSelector::FourStateUniform { weights }
    }

    pub fn two_state_interference(visibility: f64) -> Result<Self, ConfigError> {
        check_probability("interference_visibility", visibility)?;
        Ok(BellStateSelector::TwoStateInterference { visibility })
    }

    /// The interference model operates on linear H/V amplitudes, so inputs
    /// must be projected out of the circular basis first.
    pub fn requires_linear_basis(&self) -> bool {
        matches!(self, BellStateSelector::TwoStateInterference { .. })
    }

    /// Draw an outcome. `None` means the interference was not ideal enough to
    /// yield a valid projection; the caller reports inconclusive.
    pub fn select<R: Rng>(&self, rng: &mut R) -> Option<BellOutcome> {
        match *self {
            BellStateSelector::FourStateUniform { weights } => {
                Some(BellOutcome::from_state(weights.sample(rng)))
            }
            BellStateSelector::TwoStateInterference { visibility } => {
                if rng.gen::<f64>() < visibility {
                    Some(match rng.gen_range(0..2) {
                        0 => BellOutcome::PsiMinus,
                        _ => BellOutcome::PsiPlus,
                    })
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn only_psi_states_are_antisymmetric() {
        assert!(BellState::PsiMinus.is_antisymmetric());
        assert!(BellState::PsiPlus.is_antisymmetric());
        assert!(!BellState::PhiPlus.is_antisymmetric());
        assert!(!BellState::PhiMinus.is_antisymmetric());
    }

    #[test]
    fn symmetric_states_collapse_to_ambiguous() {
        assert_eq!(
            BellOutcome::from_state(BellState::PhiPlus),
            BellOutcome::AmbiguousSymmetric
        );
        assert_eq!(
            BellOutcome::from_state(BellState::PhiMinus),
            BellOutcome::AmbiguousSymmetric
        );
        assert_eq!(
            BellOutcome::from_state(BellState::PsiMinus),
            BellOutcome::PsiMinus
        );
    }

    #[test]
    fn weights_must_sum_to_one() {
        assert!(BellStateWeights::new(0.25, 0.25, 0.25, 0.25).is_ok());
        assert!(BellStateWeights::new(0.4, 0.4, 0.1, 0.1).is_ok());
        let err = BellStateWeights::new(0.5, 0.25, 0.25, 0.25);
        assert!(matches!(
            err,
            Err(ConfigError::WeightsNotNormalized { .. })
        ));
    }

    #[test]
    fn weights_must_be_probabilities() {
        assert!(BellStateWeights::new(1.5, -0.5, 0.0, 0.0).is_err());
    }

    #[test]
    fn visibility_must_be_a_probability() {
        assert!(BellStateSelector::two_state_interference(1.0).is_ok());
        assert!(BellStateSelector::two_state_interference(1.1).is_err());
        assert!(BellStateSelector::two_state_interference(-0.1).is_err());
    }

    #[test]
    fn four_state_uniform_frequencies() {
        let selector = BellStateSelector::four_state_uniform();
        let mut rng = StdRng::seed_from_u64(7);
        let trials = 10_000;
        let mut psi_minus = 0usize;
        let mut psi_plus = 0usize;
        let mut ambiguous = 0usize;
        for _ in 0..trials {
            match selector.select(&mut rng) {
                Some(BellOutcome::PsiMinus) => psi_minus += 1,
                Some(BellOutcome::PsiPlus) => psi_plus += 1,
                Some(BellOutcome::AmbiguousSymmetric) => ambiguous += 1,
                other => panic!("unexpected outcome {:?}", other),
            }
        }
        let f_minus = psi_minus as f64 / trials as f64;
        let f_plus = psi_plus as f64 / trials as f64;
        let f_ambiguous = ambiguous as f64 / trials as f64;
        assert!((f_minus - 0.25).abs() < 0.025, "Ψ⁻ frequency {}", f_minus);
        assert!((f_plus - 0.25).abs() < 0.025, "Ψ⁺ frequency {}", f_plus);
        assert!(
            (f_ambiguous - 0.5).abs() < 0.025,
            "ambiguous frequency {}",
            f_ambiguous
        );
    }

    #[test]
    fn skewed_weights_shift_frequencies() {
        let weights = BellStateWeights::new(0.7, 0.1, 0.1, 0.1).unwrap();
        let selector = BellStateSelector::four_state_weighted(weights);
        let mut rng = StdRng::seed_from_u64(11);
        let trials = 10_000;
        let psi_minus = (0..trials)
            .filter(|_| selector.select(&mut rng) == Some(BellOutcome::PsiMinus))
            .count();
        let f = psi_minus as f64 / trials as f64;
        assert!((f - 0.7).abs() < 0.025, "Ψ⁻ frequency {}", f);
    }

    #[test]
    fn zero_visibility_never_projects() {
        let selector = BellStateSelector::two_state_interference(0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1_000 {
            assert_eq!(selector.select(&mut rng), None);
        }
    }

    #[test]
    fn full_visibility_always_projects_antisymmetric() {
        let selector = BellStateSelector::two_state_interference(1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1_000 {
            let outcome = selector.select(&mut rng).expect("ideal interference");
            assert!(
                outcome == BellOutcome::PsiMinus || outcome == BellOutcome::PsiPlus,
                "unexpected outcome {:?}",
                outcome
            );
        }
    }
}
