//! End-to-end heralding experiment: laser → atom → optics → fiber → detector.

use photon_link_sim::prelude::*;

fn main() {
    env_logger::init();

    // A π-pulse for the chosen power, on resonance with the D2 line.
    let power = 0.44e-3;
    let pulse_duration = std::f64::consts::PI / Rb87Atom::rabi_frequency(power).unwrap();
    let laser = ExcitationLaser::new(power, 780.0, pulse_duration, Polarization::SigmaPlus)
        .unwrap()
        .with_noise_level(1e-5)
        .unwrap()
        .with_alignment_efficiency(0.95)
        .unwrap();

    // Hemisphere collection boosted by coupling optimizations.
    let optics = CollectionOptics::new(1.0, 1.0, 1.4).unwrap();

    // 700 m of fiber at 4 dB/km: roughly half the 780 nm photons survive.
    let fiber = OpticalFiber::new(700.0, 4.0, 17.0, DEFAULT_GROUP_VELOCITY).unwrap();

    // 60% efficiency, 100 dark counts/s, 50 ps jitter, 1 µs dead time.
    let detector = SinglePhotonDetector::new(0.6, 100.0, 50e-12, 1e-6).unwrap();

    let config = HeraldConfig {
        laser,
        optics,
        fiber,
        detector,
        trials: 10_000,
        base_seed: 42,
    };
    let result = run_herald_simulation(&config);

    println!("Heralded single-photon link, {} trials", result.trials);
    println!("  excited:     {}", result.excited);
    println!("  collected:   {}", result.collected);
    println!("  transmitted: {}", result.transmitted);
    println!("  detected:    {}", result.detected);
    println!("  herald rate: {:.4}", result.herald_rate);
}
