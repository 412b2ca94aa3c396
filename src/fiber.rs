//! Lossy, dispersive optical fiber channel.

use rand::Rng;

use crate::error::{check_non_negative, check_positive, ConfigError};
use crate::photon::PhotonEvent;

/// Default group velocity in fused silica, m/s.
pub const DEFAULT_GROUP_VELOCITY: f64 = 2e8;

/// A single-mode fiber link between the collection optics and the detector.
#[derive(Debug, Clone)]
pub struct OpticalFiber {
    length_m: f64,
    attenuation_db_per_m: f64,
    /// Dispersion in ps/(nm·m).
    dispersion_ps_per_nm_m: f64,
    group_velocity: f64,
}

impl OpticalFiber {
    pub fn new(
        length_m: f64,
        attenuation_db_per_km: f64,
        dispersion_ps_per_nm_km: f64,
        group_velocity: f64,
    ) -> Result<Self, ConfigError> {
        check_non_negative("length_m", length_m)?;
        check_non_negative("attenuation_db_per_km", attenuation_db_per_km)?;
        check_non_negative("dispersion_ps_per_nm_km", dispersion_ps_per_nm_km)?;
        check_positive("group_velocity", group_velocity)?;
        Ok(Self {
            length_m,
            attenuation_db_per_m: attenuation_db_per_km / 1000.0,
            dispersion_ps_per_nm_m: dispersion_ps_per_nm_km / 1000.0,
            group_velocity,
        })
    }

    pub fn length_m(&self) -> f64 {
        self.length_m
    }

    /// Propagation delay through the full fiber length, in seconds.
    pub fn propagation_delay(&self) -> f64 {
        self.length_m / self.group_velocity
    }

    /// T = 10^(−dB/10) over the full length.
    pub fn transmission_efficiency(&self) -> f64 {
        let total_loss_db = self.attenuation_db_per_m * self.length_m;
        10f64.powf(-total_loss_db / 10.0)
    }

    /// Propagate a photon launched at `launch_time`.
    ///
    /// On transmission: stamps `arrival_time` and `transmitted = true`, and if
    /// the photon carries both a pulse width and a spectral width, broadens
    /// the pulse width in quadrature with the dispersion contribution. On
    /// loss: stamps `transmitted = false` and leaves the rest untouched.
    pub fn propagate<R: Rng>(
        &self,
        photon: &mut PhotonEvent,
        launch_time: f64,
        rng: &mut R,
    ) -> bool {
        if rng.gen::<f64>() < self.transmission_efficiency() {
            photon.arrival_time = Some(launch_time + self.propagation_delay());
            photon.transmitted = Some(true);
            if let (Some(pulse_width), Some(spectral_width)) =
                (photon.pulse_width, photon.spectral_width_nm)
            {
                // ps/(nm·m) × m × nm → ps, × 1e-12 → s.
                let broadening =
                    self.dispersion_ps_per_nm_m * self.length_m * spectral_width * 1e-12;
                photon.pulse_width =
                    Some((pulse_width * pulse_width + broadening * broadening).sqrt());
            }
            true
        } else {
            photon.transmitted = Some(false);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rejects_invalid_configuration() {
        assert!(OpticalFiber::new(-1.0, 4.0, 17.0, 2e8).is_err());
        assert!(OpticalFiber::new(700.0, -4.0, 17.0, 2e8).is_err());
        assert!(OpticalFiber::new(700.0, 4.0, -17.0, 2e8).is_err());
        assert!(OpticalFiber::new(700.0, 4.0, 17.0, 0.0).is_err());
    }

    #[test]
    fn lossless_fiber_always_transmits_with_exact_delay() {
        let fiber = OpticalFiber::new(50.0, 0.0, 0.0, 2e8).unwrap();
        let mut rng = StdRng::seed_from_u64(61);
        for _ in 0..1_000 {
            let mut photon = PhotonEvent::new();
            assert!(fiber.propagate(&mut photon, 1e-6, &mut rng));
            assert_eq!(photon.transmitted, Some(true));
            let arrival = photon.arrival_time.unwrap();
            assert!((arrival - (1e-6 + 50.0 / 2e8)).abs() < 1e-18);
        }
    }

    #[test]
    fn transmission_matches_attenuation() {
        // 4 dB/km over 700 m: T = 10^(−0.28) ≈ 0.525, the half-loss regime of
        // a 780 nm photon on a 700 m link.
        let fiber = OpticalFiber::new(700.0, 4.0, 0.0, 2e8).unwrap();
        let expected = fiber.transmission_efficiency();
        assert!((expected - 10f64.powf(-0.28)).abs() < 1e-12);

        let mut rng = StdRng::seed_from_u64(62);
        let trials = 10_000;
        let transmitted = (0..trials)
            .filter(|_| {
                let mut photon = PhotonEvent::new();
                fiber.propagate(&mut photon, 0.0, &mut rng)
            })
            .count();
        let fraction = transmitted as f64 / trials as f64;
        assert!((fraction - expected).abs() < 0.02, "fraction {}", fraction);
    }

    #[test]
    fn lost_photon_keeps_no_arrival_time() {
        // Absurd attenuation: everything is lost.
        let fiber = OpticalFiber::new(1000.0, 1000.0, 0.0, 2e8).unwrap();
        let mut rng = StdRng::seed_from_u64(63);
        let mut photon = PhotonEvent::new();
        assert!(!fiber.propagate(&mut photon, 0.0, &mut rng));
        assert_eq!(photon.transmitted, Some(false));
        assert_eq!(photon.arrival_time, None);
    }

    #[test]
    fn dispersion_broadens_in_quadrature() {
        let fiber = OpticalFiber::new(700.0, 0.0, 17.0, 2e8).unwrap();
        let mut rng = StdRng::seed_from_u64(64);
        let mut photon = PhotonEvent::new();
        photon.pulse_width = Some(50e-12);
        photon.spectral_width_nm = Some(1.0);
        assert!(fiber.propagate(&mut photon, 0.0, &mut rng));

        // 17 ps/(nm·km) × 0.7 km × 1 nm = 11.9 ps of broadening.
        let broadening = 11.9e-12;
        let expected = (50e-12f64 * 50e-12 + broadening * broadening).sqrt();
        let width = photon.pulse_width.unwrap();
        assert!((width - expected).abs() < 1e-15, "width {}", width);
        assert!(width > 50e-12);
    }

    #[test]
    fn dispersion_needs_both_widths() {
        let fiber = OpticalFiber::new(700.0, 0.0, 17.0, 2e8).unwrap();
        let mut rng = StdRng::seed_from_u64(65);
        let mut photon = PhotonEvent::new();
        photon.pulse_width = Some(50e-12);
        fiber.propagate(&mut photon, 0.0, &mut rng);
        assert_eq!(photon.pulse_width, Some(50e-12));
    }
}
