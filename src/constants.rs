//! # Constants and type definitions for hcnm
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **unit type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Gravitational and Earth constants used by the circular-orbit model
//! - Reference density of the exponential atmosphere
//! - Unit conversions (km ↔ cm, km ↔ m)
//! - Type aliases documenting the unit carried by each `f64`
//! - The fixed grid size of the reference Simpson integrator

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Newtonian gravitational constant (N·m²/kg²)
pub const G: f64 = 6.6743e-11;

/// Mass of the Earth (kg)
pub const EARTH_MASS: f64 = 5.972e24;

/// Earth equatorial radius in kilometers (WGS84 semi-major axis)
pub const EARTH_RADIUS_KM: f64 = 6378.137;

/// Mass density of the atmosphere at the reference altitude (g/cm³)
pub const RHO0: f64 = 0.001225;

/// Reference altitude of [`RHO0`] (km)
pub const Z0_KM: f64 = 0.0;

/// Default atmospheric scale height of the exponential model (km)
pub const DEFAULT_SCALE_HEIGHT_KM: f64 = 8.0;

/// Default mixing ratios of the main atmospheric constituents
pub const DEFAULT_MIX_N: f64 = 0.78;
pub const DEFAULT_MIX_O: f64 = 0.21;
pub const DEFAULT_MIX_AR: f64 = 0.01;

/// Kilometers → centimeters
pub const KM_TO_CM: f64 = 1.0e5;

/// Kilometers → meters
pub const KM_TO_M: f64 = 1.0e3;

/// Number of Simpson subintervals of the fixed-grid integrator (must be even)
pub const FIXED_GRID_INTERVALS: usize = 10_000;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;
/// Angular velocity in radians per second
pub type RadPerSec = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Elapsed time since the reference epoch of a crossing, in seconds
pub type Second = f64;
/// Photon energy in kilo-electronvolts
pub type KeV = f64;
/// Mass density in g/cm³
pub type GramPerCm3 = f64;
/// Mass attenuation coefficient in cm²/g
pub type Cm2PerGram = f64;
