//! Exponential atmospheric density profile.
//!
//! `ρ(z) = ρ₀ · exp(−(z − z₀) / H)` with the reference point fixed at sea level
//! (`ρ₀ = 0.001225 g/cm³`, `z₀ = 0 km`). The scale height `H` comes from the owning
//! [`PlanetBody`](crate::planet::PlanetBody).

use crate::constants::{GramPerCm3, Kilometer, RHO0, Z0_KM};

/// Mass density (g/cm³) at altitude `z_km` for a given scale height (km).
#[inline]
pub fn exponential_density(z_km: Kilometer, scale_height: Kilometer) -> GramPerCm3 {
    RHO0 * (-(z_km - Z0_KM) / scale_height).exp()
}
