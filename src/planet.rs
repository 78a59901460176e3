//! # Central body and atmosphere parameters
//!
//! A [`PlanetBody`] gathers the static parameters of the central body (mass, equatorial radius)
//! and the **mutable** parameters of its atmosphere (mixing ratios of N, O, Ar and the scale
//! height of the exponential density profile).
//!
//! Only the Earth is defined. The identifier is parsed from a string (`"Earth"`) through
//! [`CentralBody`], which is the extension point for other bodies.
//!
//! ## Mutation model
//!
//! Setters take `&mut self`. A [`PlanetBody`] is owned by an
//! [`OrbitGeometry`](crate::orbit_geometry::OrbitGeometry), itself owned by a
//! [`HorizonCrossing`](crate::horizon_crossing::HorizonCrossing), so the borrow checker rules
//! out mutating the atmosphere while an integration holds a shared reference to it.
//!
//! Mixing ratios are **not** normalized: callers are responsible for passing consistent values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        GramPerCm3, Kilometer, DEFAULT_MIX_AR, DEFAULT_MIX_N, DEFAULT_MIX_O,
        DEFAULT_SCALE_HEIGHT_KM, EARTH_MASS, EARTH_RADIUS_KM,
    },
    density::exponential_density,
    hcnm_errors::HcnmError,
};

/// Identifier of the central body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CentralBody {
    Earth,
}

impl fmt::Display for CentralBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CentralBody::Earth => write!(f, "Earth"),
        }
    }
}

impl FromStr for CentralBody {
    type Err = HcnmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Earth" => Ok(CentralBody::Earth),
            other => Err(HcnmError::UnsupportedCentralBody(other.to_string())),
        }
    }
}

impl TryFrom<&str> for CentralBody {
    type Error = HcnmError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Mixing ratios of the atmospheric constituents used by the cross-section lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtmosphericMixture {
    pub n: f64,
    pub o: f64,
    pub ar: f64,
}

impl Default for AtmosphericMixture {
    fn default() -> Self {
        AtmosphericMixture {
            n: DEFAULT_MIX_N,
            o: DEFAULT_MIX_O,
            ar: DEFAULT_MIX_AR,
        }
    }
}

/// Physical and atmospheric parameters of the central body.
///
/// Units
/// -----
/// * `mass`: kg
/// * `radius`: km (equatorial)
/// * `scale_height`: km
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetBody {
    body: CentralBody,
    mass: f64,
    radius: Kilometer,
    mixture: AtmosphericMixture,
    scale_height: Kilometer,
}

impl PlanetBody {
    /// Build the parameters of a central body from its identifier.
    ///
    /// Arguments
    /// -----------------
    /// * `cb`: the central-body identifier, only `"Earth"` is accepted.
    ///
    /// Return
    /// ----------
    /// * The body with its default atmosphere, or [`HcnmError::UnsupportedCentralBody`].
    pub fn new(cb: &str) -> Result<Self, HcnmError> {
        Ok(Self::from_body(cb.parse()?))
    }

    pub fn earth() -> Self {
        Self::from_body(CentralBody::Earth)
    }

    fn from_body(body: CentralBody) -> Self {
        match body {
            CentralBody::Earth => PlanetBody {
                body,
                mass: EARTH_MASS,
                radius: EARTH_RADIUS_KM,
                mixture: AtmosphericMixture::default(),
                scale_height: DEFAULT_SCALE_HEIGHT_KM,
            },
        }
    }

    pub fn body(&self) -> CentralBody {
        self.body
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn radius(&self) -> Kilometer {
        self.radius
    }

    pub fn mixture(&self) -> &AtmosphericMixture {
        &self.mixture
    }

    pub fn mix_n(&self) -> f64 {
        self.mixture.n
    }

    pub fn set_mix_n(&mut self, mix_n: f64) {
        self.mixture.n = mix_n;
    }

    pub fn mix_o(&self) -> f64 {
        self.mixture.o
    }

    pub fn set_mix_o(&mut self, mix_o: f64) {
        self.mixture.o = mix_o;
    }

    pub fn mix_ar(&self) -> f64 {
        self.mixture.ar
    }

    pub fn set_mix_ar(&mut self, mix_ar: f64) {
        self.mixture.ar = mix_ar;
    }

    pub fn set_mixture(&mut self, mixture: AtmosphericMixture) {
        self.mixture = mixture;
    }

    pub fn scale_height(&self) -> Kilometer {
        self.scale_height
    }

    pub fn set_scale_height(&mut self, scale_height: Kilometer) {
        self.scale_height = scale_height;
    }

    /// Consuming variant of [`set_scale_height`](PlanetBody::set_scale_height), for building
    /// a configured body in one expression.
    pub fn with_scale_height(mut self, scale_height: Kilometer) -> Self {
        self.scale_height = scale_height;
        self
    }

    pub fn with_mixture(mut self, mixture: AtmosphericMixture) -> Self {
        self.mixture = mixture;
        self
    }

    /// Atmospheric mass density at altitude `z_km`, using the current scale height.
    pub fn density(&self, z_km: Kilometer) -> GramPerCm3 {
        exponential_density(z_km, self.scale_height)
    }
}

#[cfg(test)]
mod planet_test {
    use super::*;

    #[test]
    fn test_earth_defaults() {
        let earth = PlanetBody::new("Earth").unwrap();
        assert_eq!(earth.body(), CentralBody::Earth);
        assert_eq!(earth.radius(), 6378.137);
        assert_eq!(earth.mass(), 5.972e24);
        assert_eq!(earth.mix_n(), 0.78);
        assert_eq!(earth.mix_o(), 0.21);
        assert_eq!(earth.mix_ar(), 0.01);
        assert_eq!(earth.scale_height(), 8.0);
        assert_eq!(earth, PlanetBody::earth());
    }

    #[test]
    fn test_unsupported_body() {
        let err = PlanetBody::new("Mars").unwrap_err();
        assert_eq!(err, HcnmError::UnsupportedCentralBody("Mars".into()));
        assert!(err.is_configuration());

        assert!(CentralBody::try_from("earth").is_err());
    }

    #[test]
    fn test_setters_do_not_normalize() {
        let mut earth = PlanetBody::earth();
        earth.set_mix_n(0.5);
        earth.set_mix_o(0.6);
        earth.set_mix_ar(0.2);
        earth.set_scale_height(6.0);

        assert_eq!(earth.mix_n(), 0.5);
        assert_eq!(earth.mix_o(), 0.6);
        assert_eq!(earth.mix_ar(), 0.2);
        assert_eq!(earth.scale_height(), 6.0);
        assert_eq!(
            earth.mixture(),
            &AtmosphericMixture {
                n: 0.5,
                o: 0.6,
                ar: 0.2
            }
        );
    }

    #[test]
    fn test_density_follows_scale_height() {
        let earth = PlanetBody::earth().with_scale_height(6.0);
        assert_eq!(earth.density(0.0), 0.001225);
        assert!((earth.density(6.0) - 0.001225 / std::f64::consts::E).abs() < 1e-18);
    }

    #[test]
    fn test_central_body_display_roundtrip() {
        let body: CentralBody = "Earth".parse().unwrap();
        assert_eq!(body.to_string(), "Earth");
    }
}
