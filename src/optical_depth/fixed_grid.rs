//! Reference optical depth with the composite Simpson rule on a fixed grid.
//!
//! The half chord `[0, d_tot/2]` is split into `N` equal subintervals (`N` even), the density is
//! evaluated at the `N + 1` nodes and combined with the Simpson weights `1, 4, 2, 4, …, 4, 1`.
//! The single cross-section value multiplies the result, the step is converted to centimeters
//! and the half-path integral is doubled.
//!
//! Cost is `N + 1` density evaluations per call whatever the geometry, and accuracy is bounded
//! by the grid spacing. With the default `N = 10000` the result serves as ground truth for
//! [`adaptive_simpson`](crate::optical_depth::adaptive::adaptive_simpson).

use crate::{
    constants::{KeV, Second, FIXED_GRID_INTERVALS, KM_TO_CM},
    cross_section::CrossSectionLookup,
    hcnm_errors::HcnmError,
    optical_depth::LosIntegrand,
    orbit_geometry::OrbitGeometry,
};

/// Optical depth `τ(E, t)` on the default grid of [`FIXED_GRID_INTERVALS`] subintervals.
pub fn optical_depth_fixed<X: CrossSectionLookup + ?Sized>(
    geometry: &OrbitGeometry,
    cross_section: &X,
    energy_kev: KeV,
    t: Second,
) -> Result<f64, HcnmError> {
    optical_depth_fixed_with(geometry, cross_section, energy_kev, t, FIXED_GRID_INTERVALS)
}

/// Optical depth `τ(E, t)` on a grid of `n_intervals` subintervals.
///
/// Arguments
/// -----------------
/// * `geometry`: the orbit and central body.
/// * `cross_section`: lookup queried once for `energy_kev`.
/// * `energy_kev`: photon energy (keV).
/// * `t`: time since the reference epoch of the crossing (s).
/// * `n_intervals`: number of Simpson subintervals, even and non-zero.
///
/// Return
/// ----------
/// * The dimensionless optical depth of the full chord, or an error when `t` is outside the
///   crossing window, the lookup fails, or `n_intervals` is odd or zero.
pub fn optical_depth_fixed_with<X: CrossSectionLookup + ?Sized>(
    geometry: &OrbitGeometry,
    cross_section: &X,
    energy_kev: KeV,
    t: Second,
    n_intervals: usize,
) -> Result<f64, HcnmError> {
    if n_intervals == 0 || n_intervals % 2 != 0 {
        return Err(HcnmError::InvalidQuadratureParameter(format!(
            "Simpson grid needs an even, non-zero number of intervals, got {n_intervals}"
        )));
    }

    let integrand = LosIntegrand::new(geometry, cross_section, energy_kev, t)?;
    let dx_km = integrand.half_length() / n_intervals as f64;
    let dx_cm = dx_km * KM_TO_CM;

    let weighted_density =
        composite_simpson_sum(n_intervals, |i| integrand.density(i as f64 * dx_km));

    let tau_half = (dx_cm / 3.0) * integrand.cross_section() * weighted_density;
    Ok(2.0 * tau_half)
}

/// `f(0) + 4 f(1) + 2 f(2) + … + 4 f(n−1) + f(n)` for an even `n`.
fn composite_simpson_sum(n: usize, f: impl Fn(usize) -> f64) -> f64 {
    (0..=n)
        .map(|i| {
            let weight = if i == 0 || i == n {
                1.0
            } else if i % 2 == 1 {
                4.0
            } else {
                2.0
            };
            weight * f(i)
        })
        .sum()
}
