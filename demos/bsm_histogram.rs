//! Repeated Bell-state measurements on a fixed photon pair, for both the
//! detection-gated four-state model and the interference-gated two-state
//! model.

use photon_link_sim::prelude::*;

fn print_histogram(label: &str, result: &BsmResult) {
    println!("{} ({} trials)", label, result.trials);
    println!("  Ψ⁻:                  {}", result.outcomes.psi_minus);
    println!("  Ψ⁺:                  {}", result.outcomes.psi_plus);
    println!("  Ambiguous_Symmetric: {}", result.outcomes.ambiguous_symmetric);
    println!("  Inconclusive:        {}", result.outcomes.inconclusive);
    println!("  success rate:        {:.4}", result.success_rate);
}

fn main() {
    env_logger::init();

    // Two photons 0.2 ns apart, well inside the 0.5 ns coincidence window.
    let photon_a = PhotonEvent::at(1.0e-9).with_polarization(Polarization::LeftCircular);
    let photon_b = PhotonEvent::at(1.2e-9).with_polarization(Polarization::RightCircular);

    let detector = SinglePhotonDetector::new(0.6, 100.0, 50e-12, 1e-6).unwrap();
    let simplified = BsmConfig {
        measurement: BellStateMeasurement::simplified(0.5e-9, detector).unwrap(),
        photon_a: photon_a.clone(),
        photon_b: photon_b.clone(),
        trials: 10_000,
        base_seed: 42,
    };
    print_histogram("Four-state, detection-gated", &run_bsm_simulation(&simplified));

    println!();

    let realistic = BsmConfig {
        measurement: BellStateMeasurement::realistic(0.5e-9, 0.9).unwrap(),
        photon_a,
        photon_b,
        trials: 10_000,
        base_seed: 42,
    };
    print_histogram("Two-state, interference-gated", &run_bsm_simulation(&realistic));
}
