//! High-NA collection optics at the atom.

use rand::Rng;

use crate::error::{check_non_negative, check_positive, ConfigError};
use crate::photon::PhotonEvent;

/// Free-space collection stage characterized by its numerical aperture.
#[derive(Debug, Clone)]
pub struct CollectionOptics {
    numerical_aperture: f64,
    refractive_index: f64,
    additional_efficiency: f64,
    collection_efficiency: f64,
}

impl CollectionOptics {
    /// * `numerical_aperture` — NA of the optics, 0 < NA ≤ `refractive_index`.
    /// * `refractive_index` — of the surrounding medium (1 for air).
    /// * `additional_efficiency` — multiplicative factor for coupling and
    ///   reflection losses; values above 1 model boosted collection (e.g. a
    ///   retro-reflecting mirror), with the draw probability capped at 1.
    pub fn new(
        numerical_aperture: f64,
        refractive_index: f64,
        additional_efficiency: f64,
    ) -> Result<Self, ConfigError> {
        check_positive("numerical_aperture", numerical_aperture)?;
        check_positive("refractive_index", refractive_index)?;
        check_non_negative("additional_efficiency", additional_efficiency)?;
        if numerical_aperture > refractive_index {
            return Err(ConfigError::ApertureExceedsIndex {
                na: numerical_aperture,
                n: refractive_index,
            });
        }

        // Solid-angle fraction: θ = arcsin(NA/n), η = (1 − cos θ)/2.
        let theta = (numerical_aperture / refractive_index).asin();
        let eta = (1.0 - theta.cos()) / 2.0;
        let collection_efficiency = (eta * additional_efficiency).min(1.0);

        Ok(Self {
            numerical_aperture,
            refractive_index,
            additional_efficiency,
            collection_efficiency,
        })
    }

    pub fn numerical_aperture(&self) -> f64 {
        self.numerical_aperture
    }

    pub fn refractive_index(&self) -> f64 {
        self.refractive_index
    }

    pub fn additional_efficiency(&self) -> f64 {
        self.additional_efficiency
    }

    /// The effective per-photon capture probability.
    pub fn collection_efficiency(&self) -> f64 {
        self.collection_efficiency
    }

    /// Attempt to capture an emitted photon; stamps `collected` either way
    /// and reports whether it was captured.
    pub fn collect<R: Rng>(&self, photon: &mut PhotonEvent, rng: &mut R) -> bool {
        let captured = rng.gen::<f64>() < self.collection_efficiency;
        photon.collected = Some(captured);
        captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rejects_invalid_configuration() {
        assert!(CollectionOptics::new(0.0, 1.0, 1.0).is_err());
        assert!(CollectionOptics::new(0.5, 0.0, 1.0).is_err());
        assert!(CollectionOptics::new(0.5, 1.0, -0.1).is_err());
        assert!(matches!(
            CollectionOptics::new(1.2, 1.0, 1.0),
            Err(ConfigError::ApertureExceedsIndex { .. })
        ));
    }

    #[test]
    fn full_aperture_covers_half_the_sphere() {
        // NA = n: θ = π/2, so the optics see a full hemisphere.
        let optics = CollectionOptics::new(1.0, 1.0, 1.0).unwrap();
        assert!((optics.collection_efficiency() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn boosted_efficiency_is_capped() {
        let optics = CollectionOptics::new(1.0, 1.0, 3.0).unwrap();
        assert_eq!(optics.collection_efficiency(), 1.0);
    }

    #[test]
    fn smaller_aperture_collects_less() {
        let wide = CollectionOptics::new(0.8, 1.0, 1.0).unwrap();
        let narrow = CollectionOptics::new(0.4, 1.0, 1.0).unwrap();
        assert!(narrow.collection_efficiency() < wide.collection_efficiency());
    }

    #[test]
    fn collect_stamps_the_flag_and_converges() {
        let optics = CollectionOptics::new(1.0, 1.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(51);
        let trials = 10_000;
        let mut captured = 0usize;
        for _ in 0..trials {
            let mut photon = PhotonEvent::new();
            let hit = optics.collect(&mut photon, &mut rng);
            assert_eq!(photon.collected, Some(hit));
            if hit {
                captured += 1;
            }
        }
        let fraction = captured as f64 / trials as f64;
        assert!((fraction - 0.5).abs() < 0.02, "fraction {}", fraction);
    }
}
