//! # Horizon crossing: the user-facing engine
//!
//! [`HorizonCrossing`] owns an [`OrbitGeometry`] (which owns its [`PlanetBody`]) together with a
//! [`CrossSectionLookup`], and answers transmittance questions about the crossing:
//!
//! * single queries: [`optical_depth_fixed`](HorizonCrossing::optical_depth_fixed),
//!   [`optical_depth_adaptive`](HorizonCrossing::optical_depth_adaptive),
//!   [`transmittance`](HorizonCrossing::transmittance);
//! * curves over time: [`transmittance_curve`](HorizonCrossing::transmittance_curve), serial,
//!   with a live progress bar when the `progress` feature is enabled;
//! * energy × time grids: [`transmittance_batch`](HorizonCrossing::transmittance_batch), on the
//!   rayon thread pool;
//! * step-concentration studies: [`tolerance_sweep`](HorizonCrossing::tolerance_sweep).
//!
//! Atmosphere and angular velocity are changed through
//! [`geometry_mut`](HorizonCrossing::geometry_mut), which needs `&mut self` and therefore cannot
//! overlap with an integration in flight.
//!
//! ## Configuration
//!
//! A [`CrossingConfig`] gathers the whole configuration surface in one serde record:
//!
//! ```rust
//! use hcnm::cross_section::TabulatedCrossSection;
//! use hcnm::horizon_crossing::{CrossingConfig, HorizonCrossing};
//!
//! let config: CrossingConfig = serde_json::from_str(
//!     r#"{ "central_body": "Earth", "orbit_altitude_km": 420.0, "orbital_speed_km_s": 7.6 }"#,
//! )
//! .unwrap();
//! let crossing = HorizonCrossing::from_config(&config, TabulatedCrossSection::new()).unwrap();
//!
//! let tau = crossing.optical_depth_fixed(4.0, 40.0).unwrap();
//! assert!(tau > 0.0);
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    constants::{KeV, Kilometer, RadPerSec, Radian, Second, DEFAULT_SCALE_HEIGHT_KM},
    cross_section::{CrossSectionLookup, TabulatedCrossSection},
    hcnm_errors::HcnmError,
    optical_depth::{
        adaptive::{self, AdaptiveParams, AdaptiveTrace},
        fixed_grid, OpticalDepthMethod, TransmittanceSample,
    },
    orbit_geometry::OrbitGeometry,
    planet::{AtmosphericMixture, CentralBody, PlanetBody},
};

fn default_central_body() -> String {
    CentralBody::Earth.to_string()
}

fn default_scale_height() -> Kilometer {
    DEFAULT_SCALE_HEIGHT_KM
}

/// Serializable description of a crossing.
///
/// Only `orbit_altitude_km` is required. When `theta` is absent the grazing offset
/// `asin(R / R_orbit)` is used, and when neither `angular_velocity` nor `orbital_speed_km_s` is
/// given the orbit is Keplerian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrossingConfig {
    #[serde(default = "default_central_body")]
    pub central_body: String,
    pub orbit_altitude_km: Kilometer,
    #[serde(default)]
    pub theta: Option<Radian>,
    #[serde(default)]
    pub mixture: AtmosphericMixture,
    #[serde(default = "default_scale_height")]
    pub scale_height_km: Kilometer,
    #[serde(default)]
    pub angular_velocity: Option<RadPerSec>,
    #[serde(default)]
    pub orbital_speed_km_s: Option<f64>,
}

impl CrossingConfig {
    pub fn new(orbit_altitude_km: Kilometer) -> Self {
        CrossingConfig {
            central_body: default_central_body(),
            orbit_altitude_km,
            theta: None,
            mixture: AtmosphericMixture::default(),
            scale_height_km: DEFAULT_SCALE_HEIGHT_KM,
            angular_velocity: None,
            orbital_speed_km_s: None,
        }
    }

    /// Build the geometry described by this configuration.
    ///
    /// Return
    /// ----------
    /// * The geometry, or a configuration error for an unknown body, a non-positive scale
    ///   height or angular rate, or when both `angular_velocity` and `orbital_speed_km_s` are set.
    pub fn build_geometry(&self) -> Result<OrbitGeometry, HcnmError> {
        if !(self.scale_height_km.is_finite() && self.scale_height_km > 0.0) {
            return Err(HcnmError::InvalidConfiguration(format!(
                "scale height must be a positive number of km, got {}",
                self.scale_height_km
            )));
        }

        let planet = PlanetBody::new(&self.central_body)?
            .with_mixture(self.mixture)
            .with_scale_height(self.scale_height_km);

        let mut geometry = match self.theta {
            Some(theta) => OrbitGeometry::new(planet, self.orbit_altitude_km, theta)?,
            None => OrbitGeometry::grazing(planet, self.orbit_altitude_km)?,
        };

        match (self.angular_velocity, self.orbital_speed_km_s) {
            (Some(_), Some(_)) => {
                return Err(HcnmError::InvalidConfiguration(
                    "angular_velocity and orbital_speed_km_s are mutually exclusive".into(),
                ))
            }
            (Some(omega), None) => geometry.set_angular_velocity(omega)?,
            (None, Some(speed)) => geometry.set_orbital_speed(speed)?,
            (None, None) => {}
        }

        Ok(geometry)
    }
}

#[derive(Debug, Clone)]
pub struct HorizonCrossing<X = TabulatedCrossSection> {
    geometry: OrbitGeometry,
    cross_section: X,
}

impl<X: CrossSectionLookup> HorizonCrossing<X> {
    pub fn new(geometry: OrbitGeometry, cross_section: X) -> Self {
        HorizonCrossing {
            geometry,
            cross_section,
        }
    }

    pub fn from_config(config: &CrossingConfig, cross_section: X) -> Result<Self, HcnmError> {
        Ok(Self::new(config.build_geometry()?, cross_section))
    }

    pub fn geometry(&self) -> &OrbitGeometry {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut OrbitGeometry {
        &mut self.geometry
    }

    pub fn cross_section(&self) -> &X {
        &self.cross_section
    }

    /// Reference optical depth on the fixed Simpson grid.
    pub fn optical_depth_fixed(&self, energy_kev: KeV, t: Second) -> Result<f64, HcnmError> {
        fixed_grid::optical_depth_fixed(&self.geometry, &self.cross_section, energy_kev, t)
    }

    /// Adaptive optical depth with tolerance `tol` and the default termination limits.
    pub fn optical_depth_adaptive(
        &self,
        energy_kev: KeV,
        t: Second,
        tol: f64,
    ) -> Result<AdaptiveTrace, HcnmError> {
        let params = AdaptiveParams::with_tolerance(tol)?;
        self.optical_depth_adaptive_with(energy_kev, t, &params)
    }

    pub fn optical_depth_adaptive_with(
        &self,
        energy_kev: KeV,
        t: Second,
        params: &AdaptiveParams,
    ) -> Result<AdaptiveTrace, HcnmError> {
        adaptive::adaptive_simpson(&self.geometry, &self.cross_section, energy_kev, t, params)
    }

    pub fn transmittance(
        &self,
        energy_kev: KeV,
        t: Second,
        method: &OpticalDepthMethod,
    ) -> Result<TransmittanceSample, HcnmError> {
        let tau = method.optical_depth(&self.geometry, &self.cross_section, energy_kev, t)?;
        Ok(TransmittanceSample::from_tau(energy_kev, t, tau))
    }

    /// Transmittance at one energy for each instant of `times`.
    ///
    /// The samples are index-aligned with `times`. The first failing instant aborts the curve.
    pub fn transmittance_curve(
        &self,
        energy_kev: KeV,
        times: &[Second],
        method: &OpticalDepthMethod,
    ) -> Result<Vec<TransmittanceSample>, HcnmError> {
        #[cfg(feature = "progress")]
        let pb = curve_progress_bar(times.len(), energy_kev);

        let samples = times
            .iter()
            .map(|&t| {
                let sample = self.transmittance(energy_kev, t, method);
                #[cfg(feature = "progress")]
                pb.inc(1);
                sample
            })
            .collect();

        #[cfg(feature = "progress")]
        pb.finish_and_clear();

        samples
    }

    /// Transmittance over the `energies × times` grid, evaluated in parallel.
    ///
    /// The result is energy-major: sample `i * times.len() + j` is `(energies[i], times[j])`.
    pub fn transmittance_batch(
        &self,
        energies: &[KeV],
        times: &[Second],
        method: &OpticalDepthMethod,
    ) -> Result<Vec<TransmittanceSample>, HcnmError> {
        let n_times = times.len();
        (0..energies.len() * n_times)
            .into_par_iter()
            .map(|k| self.transmittance(energies[k / n_times], times[k % n_times], method))
            .collect()
    }

    /// One adaptive trace per tolerance, index-aligned with `tolerances`.
    pub fn tolerance_sweep(
        &self,
        energy_kev: KeV,
        t: Second,
        tolerances: &[f64],
    ) -> Result<Vec<AdaptiveTrace>, HcnmError> {
        adaptive::tolerance_sweep(
            &self.geometry,
            &self.cross_section,
            energy_kev,
            t,
            tolerances,
            &AdaptiveParams::default(),
        )
    }
}

#[cfg(feature = "progress")]
fn curve_progress_bar(len: usize, energy_kev: KeV) -> ProgressBar {
    let pb = ProgressBar::new(len.max(1) as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise} | {msg}",
    ) {
        pb.set_style(style);
    }
    pb.set_message(format!("E = {energy_kev} keV"));
    pb
}
