//! Temporal coincidence test for photon-pair timestamps.

/// Compare two timestamps against a coincidence window.
///
/// Returns `(false, None)` when either timestamp is missing — a photon that
/// never arrived cannot coincide with anything. Otherwise returns whether the
/// absolute difference lies within the window, together with the difference
/// itself. The boundary is inclusive: a difference exactly equal to `window`
/// counts as coincident.
pub fn is_coincident(
    time_a: Option<f64>,
    time_b: Option<f64>,
    window: f64,
) -> (bool, Option<f64>) {
    match (time_a, time_b) {
        (Some(a), Some(b)) => {
            let difference = (a - b).abs();
            (difference <= window, Some(difference))
        }
        _ => (false, None),
    }
}
