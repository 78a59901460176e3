#![allow(dead_code)]

use approx::assert_relative_eq;
use hcnm::{
    cross_section::TabulatedCrossSection, horizon_crossing::HorizonCrossing,
    optical_depth::adaptive::AdaptiveTrace, orbit_geometry::OrbitGeometry, planet::PlanetBody,
};

/// Orbit altitude of the reference scenario (km).
pub const ISS_ALTITUDE_KM: f64 = 420.0;

/// Earth crossing at 420 km with a grazing LOS at `t = 0` and the tabulated cross-sections.
pub fn iss_crossing() -> HorizonCrossing {
    let geometry = OrbitGeometry::grazing(PlanetBody::earth(), ISS_ALTITUDE_KM).unwrap();
    HorizonCrossing::new(geometry, TabulatedCrossSection::new())
}

/// Structural checks shared by every adaptive trace.
pub fn assert_trace_consistent(trace: &AdaptiveTrace, half_length: f64) {
    let n = trace.accepted_intervals();
    assert!(n > 0);
    assert_eq!(trace.step_widths.len(), n);
    assert_eq!(trace.contributions.len(), n);
    assert_eq!(trace.evaluations % 5, 0);
    assert!(trace.evaluations >= 5 * n);

    assert!(trace.step_widths.iter().all(|&w| w > 0.0));
    assert!(trace.step_midpoints.windows(2).all(|m| m[0] < m[1]));
    assert_relative_eq!(
        trace.step_midpoints[n - 1] + trace.step_widths[n - 1],
        half_length,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        trace.tau,
        2.0 * trace.contributions.iter().sum::<f64>(),
        max_relative = 1e-15
    );
}
