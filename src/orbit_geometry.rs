//! # Circular-orbit line-of-sight geometry
//!
//! This module defines [`OrbitGeometry`], the kinematic model of a horizon crossing: a satellite
//! on a circular orbit of altitude `H` above a [`PlanetBody`] watches a distant X-ray source
//! whose line of sight (LOS) sweeps through the atmosphere as the satellite moves.
//!
//! ## Model
//!
//! The elevation of the LOS grows linearly with time, `ε(t) = ω·t`, and the tangent altitude
//! (altitude of the point of closest approach of the LOS to the planet) is
//!
//! ```text
//! h(t) = R_orbit · sin(θ + ε(t)) − R
//! ```
//!
//! where `θ` is the geometric offset angle of the observation. The LOS chord between the
//! satellite and the far side of the orbit sphere has length
//!
//! ```text
//! d_tot(t) = 2 · sqrt(R_orbit² − (R + h(t))²)
//! ```
//!
//! and a point at distance `x` from the satellite along the LOS sits at altitude
//!
//! ```text
//! z(x) = sqrt((R + h)² + (d_tot/2 − x)²) − R
//! ```
//!
//! so `x = 0` is the satellite and `x = d_tot/2` is the tangent point. [`OrbitGeometry::x_to_z`]
//! and [`OrbitGeometry::z_to_x`] are mutual inverses on `x ∈ [0, d_tot/2]`, `z ∈ [h, H]`.
//!
//! ## Validity window
//!
//! The geometry is only defined while `h(t) < R_orbit − R` and `θ + ωt < π/2`, i.e. up to
//! [`OrbitGeometry::crossing_duration`]. Every query that needs `d_tot` returns
//! [`HcnmError::LineOfSightUndefined`] outside that window instead of a `NaN` or a chord from
//! the falling branch of `sin` past the zenith.
//!
//! ## Tangent frame
//!
//! [`OrbitGeometry::los_point`] expresses positions in a 2D frame centred on the planet, with
//! `+y` through the tangent point and `+x` along the LOS towards the source. In this frame the
//! satellite sits at `(−d_tot/2, R + h)` and `‖p(x)‖ − R = z(x)`.
//!
//! ## Units
//!
//! - Lengths: **km**
//! - Angles: **radians**
//! - Time: **seconds** since the reference epoch of the crossing

use std::f64::consts::FRAC_PI_2;

use nalgebra::Vector2;

use crate::{
    constants::{Kilometer, RadPerSec, Radian, Second, G, KM_TO_M},
    hcnm_errors::HcnmError,
    planet::PlanetBody,
};

/// Geometry of the LOS at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineOfSightSample {
    pub time: Second,
    pub elevation: Radian,
    pub tangent_altitude: Kilometer,
    pub total_length: Kilometer,
}

impl LineOfSightSample {
    /// Distance from the satellite to the tangent point.
    pub fn half_length(&self) -> Kilometer {
        self.total_length / 2.0
    }
}

/// Angular velocity (rad/s) of a circular Keplerian orbit of radius `r_orbit` (km) around a body
/// of mass `mass` (kg).
pub fn keplerian_angular_velocity(mass: f64, r_orbit: Kilometer) -> RadPerSec {
    let r_m = r_orbit * KM_TO_M;
    (G * mass / r_m.powi(3)).sqrt()
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitGeometry {
    planet: PlanetBody,
    orbit_altitude: Kilometer,
    r_orbit: Kilometer,
    omega: RadPerSec,
    theta: Radian,
}

impl OrbitGeometry {
    /// Build the geometry of a circular orbit.
    ///
    /// The angular velocity defaults to the Keplerian value for the orbit radius; it can be
    /// overridden afterwards with [`set_angular_velocity`](OrbitGeometry::set_angular_velocity)
    /// or [`set_orbital_speed`](OrbitGeometry::set_orbital_speed) for parametric studies.
    ///
    /// Arguments
    /// -----------------
    /// * `planet`: the central body, moved into the geometry.
    /// * `orbit_altitude`: altitude `H` of the circular orbit above the equatorial radius (km).
    /// * `theta`: geometric offset angle of the observation (rad).
    ///
    /// Return
    /// ----------
    /// * The geometry, or [`HcnmError::InvalidConfiguration`] for a non-positive altitude or a
    ///   non-finite angle.
    pub fn new(
        planet: PlanetBody,
        orbit_altitude: Kilometer,
        theta: Radian,
    ) -> Result<Self, HcnmError> {
        if !(orbit_altitude.is_finite() && orbit_altitude > 0.0) {
            return Err(HcnmError::InvalidConfiguration(format!(
                "orbit altitude must be a positive number of km, got {orbit_altitude}"
            )));
        }
        if !theta.is_finite() {
            return Err(HcnmError::InvalidConfiguration(format!(
                "offset angle must be finite, got {theta}"
            )));
        }

        let r_orbit = planet.radius() + orbit_altitude;
        let omega = keplerian_angular_velocity(planet.mass(), r_orbit);

        Ok(OrbitGeometry {
            planet,
            orbit_altitude,
            r_orbit,
            omega,
            theta,
        })
    }

    /// Geometry whose LOS grazes the surface (`h = 0`) at `t = 0` and rises afterwards.
    ///
    /// The offset angle is `θ = asin(R / R_orbit)`.
    pub fn grazing(planet: PlanetBody, orbit_altitude: Kilometer) -> Result<Self, HcnmError> {
        let r_orbit = planet.radius() + orbit_altitude;
        let theta = (planet.radius() / r_orbit).asin();
        Self::new(planet, orbit_altitude, theta)
    }

    pub fn planet(&self) -> &PlanetBody {
        &self.planet
    }

    /// Mutable access to the atmosphere parameters of the central body.
    pub fn planet_mut(&mut self) -> &mut PlanetBody {
        &mut self.planet
    }

    pub fn orbit_altitude(&self) -> Kilometer {
        self.orbit_altitude
    }

    pub fn orbit_radius(&self) -> Kilometer {
        self.r_orbit
    }

    pub fn theta(&self) -> Radian {
        self.theta
    }

    pub fn angular_velocity(&self) -> RadPerSec {
        self.omega
    }

    /// Override the angular velocity (rad/s). Fails with [`HcnmError::InvalidConfiguration`]
    /// unless `omega` is finite and strictly positive; the geometry is left unchanged then.
    pub fn set_angular_velocity(&mut self, omega: RadPerSec) -> Result<(), HcnmError> {
        if !(omega.is_finite() && omega > 0.0) {
            return Err(HcnmError::InvalidConfiguration(format!(
                "angular velocity must be finite and > 0 rad/s, got {omega}"
            )));
        }
        self.omega = omega;
        Ok(())
    }

    /// Linear orbital speed `R_orbit · ω` (km/s).
    pub fn orbital_speed(&self) -> f64 {
        self.r_orbit * self.omega
    }

    /// Override the angular velocity through a linear speed (km/s): `ω = v / R_orbit`.
    ///
    /// The resulting orbit is generally not Keplerian, which is the point of velocity
    /// sensitivity sweeps.
    pub fn set_orbital_speed(&mut self, speed_km_s: f64) -> Result<(), HcnmError> {
        if !(speed_km_s.is_finite() && speed_km_s > 0.0) {
            return Err(HcnmError::InvalidConfiguration(format!(
                "orbital speed must be finite and > 0 km/s, got {speed_km_s}"
            )));
        }
        self.omega = speed_km_s / self.r_orbit;
        Ok(())
    }

    /// Orbital period (s) for the current angular velocity.
    pub fn orbital_period(&self) -> Second {
        std::f64::consts::TAU / self.omega
    }

    pub fn elevation(&self, t: Second) -> Radian {
        self.omega * t
    }

    /// Tangent altitude of the LOS (km).
    pub fn tan_alt(&self, t: Second) -> Kilometer {
        self.r_orbit * (self.theta + self.elevation(t)).sin() - self.planet.radius()
    }

    /// Total length of the LOS chord inside the orbit sphere (km).
    ///
    /// Return
    /// ----------
    /// * `d_tot(t) ≥ 0`, or [`HcnmError::LineOfSightUndefined`] once the tangent altitude has
    ///   reached the orbital altitude, i.e. from [`crossing_duration`](Self::crossing_duration)
    ///   on. Past the zenith `sin(θ + ωt)` decreases again, but the crossing is over and those
    ///   instants stay rejected.
    pub fn d_tot(&self, t: Second) -> Result<Kilometer, HcnmError> {
        let h = self.tan_alt(t);
        let radicand = self.r_orbit.powi(2) - (self.planet.radius() + h).powi(2);

        let past_zenith = !(self.theta + self.elevation(t) < FRAC_PI_2);
        if past_zenith
            || !(h < self.r_orbit - self.planet.radius())
            || radicand < 0.0
            || radicand.is_nan()
        {
            return Err(HcnmError::LineOfSightUndefined {
                time: t,
                tangent_altitude: h,
            });
        }
        Ok(2.0 * radicand.sqrt())
    }

    /// Full LOS description at time `t`.
    pub fn line_of_sight(&self, t: Second) -> Result<LineOfSightSample, HcnmError> {
        Ok(LineOfSightSample {
            time: t,
            elevation: self.elevation(t),
            tangent_altitude: self.tan_alt(t),
            total_length: self.d_tot(t)?,
        })
    }

    /// Altitude (km) of the point at distance `x_km` from the satellite along the LOS.
    pub fn x_to_z(&self, x_km: Kilometer, t: Second) -> Result<Kilometer, HcnmError> {
        let los = self.line_of_sight(t)?;
        Ok(self.altitude_on_los(&los, x_km))
    }

    /// Distance (km) from the satellite to the point of the LOS at altitude `z_km`, on the
    /// satellite side of the tangent point.
    ///
    /// Return
    /// ----------
    /// * The distance, [`HcnmError::AltitudeBelowTangent`] if `z_km` is below the tangent
    ///   altitude, or [`HcnmError::LineOfSightUndefined`] outside the crossing window.
    pub fn z_to_x(&self, z_km: Kilometer, t: Second) -> Result<Kilometer, HcnmError> {
        let los = self.line_of_sight(t)?;
        let r = self.planet.radius();
        let h = los.tangent_altitude;

        // (R+z)² − (R+h)² factored to avoid cancellation near the tangent point
        let radicand = (z_km - h) * (2.0 * r + z_km + h);
        if radicand < 0.0 || radicand.is_nan() {
            return Err(HcnmError::AltitudeBelowTangent {
                time: t,
                altitude: z_km,
                tangent_altitude: h,
            });
        }
        Ok(los.half_length() - radicand.sqrt())
    }

    /// Altitude along an already evaluated LOS. Used by the integrators so that the tangent
    /// altitude and chord length are computed once per query, not once per node.
    #[inline]
    pub(crate) fn altitude_on_los(&self, los: &LineOfSightSample, x_km: Kilometer) -> Kilometer {
        let r = self.planet.radius();
        ((r + los.tangent_altitude).powi(2) + (los.half_length() - x_km).powi(2)).sqrt() - r
    }

    /// Time (s) at which the tangent altitude reaches `h_km` on the rising branch of the
    /// crossing.
    pub fn time_at_tangent_altitude(&self, h_km: Kilometer) -> Result<Second, HcnmError> {
        let s = (self.planet.radius() + h_km) / self.r_orbit;
        if !(-1.0..=1.0).contains(&s) {
            return Err(HcnmError::TangentAltitudeUnreachable {
                tangent_altitude: h_km,
                orbit_altitude: self.orbit_altitude,
            });
        }
        Ok((s.asin() - self.theta) / self.omega)
    }

    /// Time (s) at which the tangent altitude reaches the orbital altitude, closing the window
    /// in which the LOS is defined.
    pub fn crossing_duration(&self) -> Second {
        (FRAC_PI_2 - self.theta) / self.omega
    }

    /// Satellite position in the tangent frame (km).
    pub fn satellite_position(&self, t: Second) -> Result<Vector2<f64>, HcnmError> {
        self.los_point(0.0, t)
    }

    /// Position in the tangent frame (km) of the point at distance `x_km` along the LOS.
    pub fn los_point(&self, x_km: Kilometer, t: Second) -> Result<Vector2<f64>, HcnmError> {
        let los = self.line_of_sight(t)?;
        let tangent_point = Vector2::new(0.0, self.planet.radius() + los.tangent_altitude);
        Ok(tangent_point + Vector2::x() * (x_km - los.half_length()))
    }
}
