//! # Mass attenuation coefficients
//!
//! The optical-depth integrators consume a single number per energy: the mass attenuation
//! coefficient σ(E) (cm²/g) of the atmospheric mixture. Where that number comes from is outside
//! the scope of the integrators, so it is modelled by the [`CrossSectionLookup`] trait.
//!
//! ## Provided implementations
//!
//! * [`TabulatedCrossSection`] – per-element coefficients for N, O and Ar between 1 and 10 keV
//!   (values following the Hubbell & Seltzer photon attenuation tables), interpolated in
//!   log–log space. The Ar K edge at 3.2029 keV is stored as two rows with the same energy.
//! * [`ConstantCrossSection`] – an energy-independent coefficient, handy in tests.
//! * Any `Fn(KeV, &AtmosphericMixture) -> Cm2PerGram + Send + Sync` closure.
//!
//! ## Mixture weighting
//!
//! The tabulated lookup combines the elements linearly,
//! `σ = mix_N·σ_N + mix_O·σ_O + mix_Ar·σ_Ar`, with the ratios taken as given: no
//! normalization is applied.
//!
//! ## Contract
//!
//! Implementations must be deterministic for fixed inputs and `Send + Sync`, since batches of
//! integrations share a lookup across worker threads.

use crate::{
    constants::{Cm2PerGram, KeV},
    hcnm_errors::HcnmError,
    planet::AtmosphericMixture,
};

pub trait CrossSectionLookup: Send + Sync {
    /// Mass attenuation coefficient (cm²/g) of `mixture` at `energy_kev`.
    fn mass_attenuation(
        &self,
        energy_kev: KeV,
        mixture: &AtmosphericMixture,
    ) -> Result<Cm2PerGram, HcnmError>;
}

impl<F> CrossSectionLookup for F
where
    F: Fn(KeV, &AtmosphericMixture) -> Cm2PerGram + Send + Sync,
{
    fn mass_attenuation(
        &self,
        energy_kev: KeV,
        mixture: &AtmosphericMixture,
    ) -> Result<Cm2PerGram, HcnmError> {
        Ok(self(energy_kev, mixture))
    }
}

/// Energy-independent attenuation coefficient, ignoring the mixture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantCrossSection(pub Cm2PerGram);

impl CrossSectionLookup for ConstantCrossSection {
    fn mass_attenuation(&self, _: KeV, _: &AtmosphericMixture) -> Result<Cm2PerGram, HcnmError> {
        Ok(self.0)
    }
}

// (energy keV, μ/ρ cm²/g)
const NITROGEN: [(f64, f64); 9] = [
    (1.0, 3311.0),
    (1.5, 1083.0),
    (2.0, 476.9),
    (3.0, 145.6),
    (4.0, 61.66),
    (5.0, 31.44),
    (6.0, 18.09),
    (8.0, 7.562),
    (10.0, 3.879),
];

const OXYGEN: [(f64, f64); 9] = [
    (1.0, 4590.0),
    (1.5, 1549.0),
    (2.0, 694.9),
    (3.0, 217.1),
    (4.0, 93.15),
    (5.0, 47.90),
    (6.0, 27.70),
    (8.0, 11.63),
    (10.0, 5.952),
];

const ARGON: [(f64, f64); 11] = [
    (1.0, 4105.0),
    (1.5, 1368.0),
    (2.0, 617.6),
    (3.0, 204.0),
    (3.2029, 171.9),
    (3.2029, 1645.0),
    (4.0, 940.9),
    (5.0, 518.9),
    (6.0, 314.5),
    (8.0, 143.2),
    (10.0, 77.15),
];

/// Tabulated per-element attenuation coefficients with log–log interpolation.
#[derive(Debug, Clone, Copy)]
pub struct TabulatedCrossSection {
    nitrogen: &'static [(f64, f64)],
    oxygen: &'static [(f64, f64)],
    argon: &'static [(f64, f64)],
}

impl Default for TabulatedCrossSection {
    fn default() -> Self {
        TabulatedCrossSection {
            nitrogen: &NITROGEN,
            oxygen: &OXYGEN,
            argon: &ARGON,
        }
    }
}

impl TabulatedCrossSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Energy domain (keV) covered by every element table.
    pub fn energy_range(&self) -> (KeV, KeV) {
        let tables = [self.nitrogen, self.oxygen, self.argon];
        let min = tables.iter().map(|t| t[0].0).fold(f64::MIN, f64::max);
        let max = tables
            .iter()
            .map(|t| t[t.len() - 1].0)
            .fold(f64::MAX, f64::min);
        (min, max)
    }

    /// Per-element coefficients `(σ_N, σ_O, σ_Ar)` at `energy_kev`.
    pub fn element_coefficients(
        &self,
        energy_kev: KeV,
    ) -> Result<(Cm2PerGram, Cm2PerGram, Cm2PerGram), HcnmError> {
        let (min, max) = self.energy_range();
        if !(min..=max).contains(&energy_kev) {
            return Err(HcnmError::EnergyOutOfRange {
                energy: energy_kev,
                min,
                max,
            });
        }
        Ok((
            loglog_interpolate(self.nitrogen, energy_kev),
            loglog_interpolate(self.oxygen, energy_kev),
            loglog_interpolate(self.argon, energy_kev),
        ))
    }
}

impl CrossSectionLookup for TabulatedCrossSection {
    fn mass_attenuation(
        &self,
        energy_kev: KeV,
        mixture: &AtmosphericMixture,
    ) -> Result<Cm2PerGram, HcnmError> {
        let (sigma_n, sigma_o, sigma_ar) = self.element_coefficients(energy_kev)?;
        Ok(mixture.n * sigma_n + mixture.o * sigma_o + mixture.ar * sigma_ar)
    }
}

/// Log–log interpolation in a table sorted by energy. The caller guarantees
/// `table[0].0 <= e <= table[last].0`.
///
/// An absorption edge is two rows sharing one energy: an energy exactly on the edge takes the
/// value above the edge.
fn loglog_interpolate(table: &[(f64, f64)], e: f64) -> f64 {
    let upper = table.partition_point(|&(energy, _)| energy <= e);
    if upper == table.len() {
        return table[table.len() - 1].1;
    }
    let (e0, mu0) = table[upper - 1];
    let (e1, mu1) = table[upper];

    let slope = (mu1 / mu0).ln() / (e1 / e0).ln();
    mu0 * (e / e0).powf(slope)
}

#[cfg(test)]
mod cross_section_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_table_nodes() {
        let table = TabulatedCrossSection::new();
        let (n, o, ar) = table.element_coefficients(4.0).unwrap();
        assert_relative_eq!(n, 61.66, max_relative = 1e-12);
        assert_relative_eq!(o, 93.15, max_relative = 1e-12);
        assert_relative_eq!(ar, 940.9, max_relative = 1e-12);

        let (n, _, _) = table.element_coefficients(1.0).unwrap();
        assert_relative_eq!(n, 3311.0, max_relative = 1e-12);
        let (n, _, _) = table.element_coefficients(10.0).unwrap();
        assert_eq!(n, 3.879);
    }

    #[test]
    fn test_loglog_between_nodes() {
        // a power law between two nodes is reproduced exactly
        let table = [(2.0, 800.0), (4.0, 100.0)];
        assert_relative_eq!(
            loglog_interpolate(&table, 3.0),
            800.0 * (1.5f64).powi(-3),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_argon_k_edge() {
        let table = TabulatedCrossSection::new();
        let (_, _, below) = table.element_coefficients(3.2).unwrap();
        let (_, _, at_edge) = table.element_coefficients(3.2029).unwrap();
        let (_, _, above) = table.element_coefficients(3.21).unwrap();

        assert!(below < 180.0);
        assert_relative_eq!(at_edge, 1645.0, max_relative = 1e-12);
        assert!(above > 1600.0 && above < 1645.0);
    }

    #[test]
    fn test_mixture_is_linear_and_unnormalized() {
        let table = TabulatedCrossSection::new();
        let air = AtmosphericMixture::default();
        let sigma = table.mass_attenuation(4.0, &air).unwrap();
        assert_relative_eq!(
            sigma,
            0.78 * 61.66 + 0.21 * 93.15 + 0.01 * 940.9,
            max_relative = 1e-12
        );

        let doubled = AtmosphericMixture {
            n: 2.0 * air.n,
            o: 2.0 * air.o,
            ar: 2.0 * air.ar,
        };
        assert_relative_eq!(
            table.mass_attenuation(4.0, &doubled).unwrap(),
            2.0 * sigma,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_attenuation_decreases_in_study_band() {
        let table = TabulatedCrossSection::new();
        let air = AtmosphericMixture::default();
        let s2 = table.mass_attenuation(2.0, &air).unwrap();
        let s3 = table.mass_attenuation(3.0, &air).unwrap();
        let s4 = table.mass_attenuation(4.0, &air).unwrap();
        assert!(s2 > s3 && s3 > s4);
    }

    #[test]
    fn test_out_of_range() {
        let table = TabulatedCrossSection::new();
        let air = AtmosphericMixture::default();
        let err = table.mass_attenuation(0.5, &air).unwrap_err();
        assert!(matches!(
            err,
            HcnmError::EnergyOutOfRange { energy, min, max }
                if energy == 0.5 && min == 1.0 && max == 10.0
        ));
        assert!(table.mass_attenuation(12.0, &air).is_err());
        assert_eq!(table.energy_range(), (1.0, 10.0));
    }

    #[test]
    fn test_closure_and_constant_lookups() {
        let air = AtmosphericMixture::default();
        let lookup = |e: KeV, mix: &AtmosphericMixture| 100.0 / e * mix.n;
        assert_relative_eq!(lookup.mass_attenuation(2.0, &air).unwrap(), 39.0);
        assert_eq!(
            ConstantCrossSection(42.0).mass_attenuation(3.0, &air).unwrap(),
            42.0
        );
    }
}
