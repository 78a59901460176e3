//! # Optical depth along a line of sight
//!
//! The optical depth of the LOS at time `t` and photon energy `E` is the path integral
//!
//! ```text
//! τ(E, t) = 2 · ∫₀^{d_tot/2} σ(E) · ρ(z(x)) dx
//! ```
//!
//! from the satellite (`x = 0`) to the tangent point (`x = d_tot/2`), doubled because the
//! chord is symmetric about the tangent point. Transmittance is `exp(−τ)`.
//!
//! Two integrators are provided:
//!
//! * [`fixed_grid`] – composite Simpson rule on a fixed grid of
//!   [`FIXED_GRID_INTERVALS`](crate::constants::FIXED_GRID_INTERVALS) subintervals. Deterministic
//!   and used as the reference.
//! * [`adaptive`] – error-controlled Simpson quadrature with Richardson extrapolation and a
//!   left-anchored bisection policy, which concentrates nodes near the tangent point.
//!
//! [`LosIntegrand`] is the shared integrand: it evaluates the geometry of the LOS and the
//! cross-section once per `(E, t)` query.

pub mod adaptive;
pub mod fixed_grid;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{Cm2PerGram, GramPerCm3, KeV, Kilometer, Second, KM_TO_CM},
    cross_section::CrossSectionLookup,
    hcnm_errors::HcnmError,
    optical_depth::adaptive::AdaptiveParams,
    orbit_geometry::{LineOfSightSample, OrbitGeometry},
};

/// Attenuation per unit length along one LOS, `γ(x) = σ(E) · ρ(z(x))`.
#[derive(Debug, Clone, Copy)]
pub struct LosIntegrand<'a> {
    geometry: &'a OrbitGeometry,
    los: LineOfSightSample,
    sigma: Cm2PerGram,
}

impl<'a> LosIntegrand<'a> {
    /// Bind the integrand to one `(energy, time)` query.
    ///
    /// Fails with a domain error when `t` is outside the crossing window, or with the error of
    /// the cross-section lookup.
    pub fn new<X: CrossSectionLookup + ?Sized>(
        geometry: &'a OrbitGeometry,
        cross_section: &X,
        energy_kev: KeV,
        t: Second,
    ) -> Result<Self, HcnmError> {
        let los = geometry.line_of_sight(t)?;
        let sigma = cross_section.mass_attenuation(energy_kev, geometry.planet().mixture())?;
        Ok(LosIntegrand {
            geometry,
            los,
            sigma,
        })
    }

    pub fn line_of_sight(&self) -> &LineOfSightSample {
        &self.los
    }

    pub fn cross_section(&self) -> Cm2PerGram {
        self.sigma
    }

    /// Integration upper bound: the distance from the satellite to the tangent point.
    pub fn half_length(&self) -> Kilometer {
        self.los.half_length()
    }

    /// Mass density (g/cm³) at distance `x_km` along the LOS.
    #[inline]
    pub fn density(&self, x_km: Kilometer) -> GramPerCm3 {
        let z = self.geometry.altitude_on_los(&self.los, x_km);
        self.geometry.planet().density(z)
    }

    /// Attenuation per kilometer (km⁻¹) at distance `x_km` along the LOS.
    #[inline]
    pub fn gamma(&self, x_km: Kilometer) -> f64 {
        self.sigma * self.density(x_km) * KM_TO_CM
    }
}

/// Optical depth and transmittance of one `(energy, time)` query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransmittanceSample {
    pub energy_kev: KeV,
    pub time: Second,
    pub tau: f64,
    pub transmittance: f64,
}

impl TransmittanceSample {
    pub fn from_tau(energy_kev: KeV, time: Second, tau: f64) -> Self {
        TransmittanceSample {
            energy_kev,
            time,
            tau,
            transmittance: (-tau).exp(),
        }
    }
}

/// Integrator selection for curve and batch computations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpticalDepthMethod {
    FixedGrid,
    Adaptive(AdaptiveParams),
}

impl OpticalDepthMethod {
    /// Optical depth of one query with the selected integrator.
    pub fn optical_depth<X: CrossSectionLookup + ?Sized>(
        &self,
        geometry: &OrbitGeometry,
        cross_section: &X,
        energy_kev: KeV,
        t: Second,
    ) -> Result<f64, HcnmError> {
        match self {
            OpticalDepthMethod::FixedGrid => {
                fixed_grid::optical_depth_fixed(geometry, cross_section, energy_kev, t)
            }
            OpticalDepthMethod::Adaptive(params) => {
                adaptive::adaptive_simpson(geometry, cross_section, energy_kev, t, params)
                    .map(|trace| trace.tau)
            }
        }
    }
}
