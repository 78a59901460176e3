//! # Adaptive Simpson quadrature along the line of sight
//!
//! This module integrates `γ(x)` over the half chord with an error-controlled Simpson rule that
//! spends its evaluations where the integrand is steep, i.e. close to the tangent point.
//!
//! ## One step: [`qstep`]
//!
//! For an interval `[a, b]` with midpoint `c` and quarter points `d = (a+c)/2`, `e = (c+b)/2`:
//!
//! ```text
//! I1 = (h1/6) · (γa + 4γc + γb)                    h1 = b − a
//! I2 = (h2/6) · (γa + 4γd + 2γc + 4γe + γb)        h2 = h1 / 2
//! ε  = (I2 − I1) / 15
//! ```
//!
//! If `|ε| ≤ tol` the interval is accepted with the Richardson-extrapolated value `I2 + ε`.
//! Otherwise the **upper** bound is pulled to the midpoint (`b ← c`) and the step is retried.
//! The bisection is left-anchored: the discarded right half is never subdivided inside the
//! step, it is picked up again by the driver.
//!
//! ## Driver: [`adaptive_simpson`]
//!
//! Starting from `a = 0` with the upper bound fixed at `d_tot/2`, the driver calls [`qstep`] on
//! `[a, d_tot/2]`, records the accepted interval and moves `a` to its upper bound, until the
//! tangent point is reached. The optical depth is twice the sum of the accepted contributions.
//!
//! The per-step widths (`upper − midpoint`) and midpoints are returned in an [`AdaptiveTrace`],
//! which is what step-concentration plots are made from.
//!
//! ## Termination
//!
//! Each step is limited to [`AdaptiveParams::max_depth`] halvings and each driver call to
//! [`AdaptiveParams::max_steps`] accepted intervals. Hitting either limit is reported as
//! [`HcnmError::MaxDepthExceeded`] / [`HcnmError::MaxStepsExceeded`]; no partial result escapes.
//!
//! ## Error budget
//!
//! The absolute error of each accepted interval is about `tol`, so the error on `τ` is bounded by
//! roughly `2 · tol · accepted_intervals()`.

use std::fmt;

use itertools::multiunzip;
use tracing::{debug, trace, warn};

use crate::{
    constants::{KeV, Kilometer, Second},
    cross_section::CrossSectionLookup,
    hcnm_errors::HcnmError,
    optical_depth::LosIntegrand,
    orbit_geometry::OrbitGeometry,
};

/// Integrand evaluations spent on one attempt of [`qstep`].
pub const EVALUATIONS_PER_ATTEMPT: usize = 5;

/// Tuning of the adaptive integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveParams {
    /// Absolute error target of every accepted interval.
    pub tolerance: f64,
    /// Maximum number of halvings of the upper bound within one [`qstep`].
    pub max_depth: u32,
    /// Maximum number of accepted intervals per driver call.
    pub max_steps: usize,
}

impl Default for AdaptiveParams {
    fn default() -> Self {
        AdaptiveParams {
            tolerance: 1e-10,
            max_depth: 60,
            max_steps: 1_000_000,
        }
    }
}

impl AdaptiveParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fluent builder starting from the default values.
    ///
    /// ```rust
    /// use hcnm::optical_depth::adaptive::AdaptiveParams;
    ///
    /// let params = AdaptiveParams::builder()
    ///     .tolerance(1e-12)
    ///     .max_depth(40)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(params.max_steps, 1_000_000);
    /// ```
    pub fn builder() -> AdaptiveParamsBuilder {
        AdaptiveParamsBuilder::new()
    }

    /// Default parameters with another tolerance.
    pub fn with_tolerance(tolerance: f64) -> Result<Self, HcnmError> {
        Self::builder().tolerance(tolerance).build()
    }

    /// Check the invariants enforced by [`AdaptiveParamsBuilder::build`].
    pub fn validate(&self) -> Result<(), HcnmError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(HcnmError::InvalidQuadratureParameter(format!(
                "tolerance must be finite and > 0, got {}",
                self.tolerance
            )));
        }
        if self.max_depth == 0 {
            return Err(HcnmError::InvalidQuadratureParameter(
                "max_depth must be >= 1".into(),
            ));
        }
        if self.max_steps == 0 {
            return Err(HcnmError::InvalidQuadratureParameter(
                "max_steps must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`AdaptiveParams`], with validation.
#[derive(Debug, Clone)]
pub struct AdaptiveParamsBuilder {
    params: AdaptiveParams,
}

impl Default for AdaptiveParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: AdaptiveParams::default(),
        }
    }

    pub fn tolerance(mut self, v: f64) -> Self {
        self.params.tolerance = v;
        self
    }
    pub fn max_depth(mut self, v: u32) -> Self {
        self.params.max_depth = v;
        self
    }
    pub fn max_steps(mut self, v: usize) -> Self {
        self.params.max_steps = v;
        self
    }

    /// Validate and return the parameters.
    ///
    /// Rules: `tolerance` finite and strictly positive, `max_depth >= 1`, `max_steps >= 1`.
    pub fn build(self) -> Result<AdaptiveParams, HcnmError> {
        self.params.validate()?;
        Ok(self.params)
    }
}

impl fmt::Display for AdaptiveParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Adaptive Simpson Parameters")?;
            writeln!(f, "---------------------------")?;
            writeln!(
                f,
                "  tolerance = {:.1e}    # absolute error per accepted interval",
                self.tolerance
            )?;
            writeln!(
                f,
                "  max_depth = {:<8}   # halvings of the upper bound per step",
                self.max_depth
            )?;
            writeln!(
                f,
                "  max_steps = {:<8}   # accepted intervals per line of sight",
                self.max_steps
            )
        } else {
            write!(
                f,
                "AdaptiveParams(tol={:.1e}, max_depth={}, max_steps={})",
                self.tolerance, self.max_depth, self.max_steps
            )
        }
    }
}

/// One attempt of the adaptive rule on `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationInterval {
    pub lower: Kilometer,
    pub midpoint: Kilometer,
    pub upper: Kilometer,
    /// 3-point Simpson estimate `I1`.
    pub coarse: f64,
    /// 5-point Simpson estimate `I2`.
    pub fine: f64,
    /// Richardson error estimate `(I2 − I1) / 15`.
    pub error_estimate: f64,
}

impl IntegrationInterval {
    /// Evaluate both Simpson estimates of `gamma` on `[a, b]`.
    pub fn evaluate<F: Fn(Kilometer) -> f64>(gamma: &F, a: Kilometer, b: Kilometer) -> Self {
        let h1 = b - a;
        let h2 = h1 / 2.0;
        let c = (a + b) / 2.0;
        let d = (a + c) / 2.0;
        let e = (c + b) / 2.0;

        let (ga, gb, gc, gd, ge) = (gamma(a), gamma(b), gamma(c), gamma(d), gamma(e));

        let coarse = (h1 / 6.0) * (ga + 4.0 * gc + gb);
        let fine = (h2 / 6.0) * (ga + 4.0 * gd + 2.0 * gc + 4.0 * ge + gb);

        IntegrationInterval {
            lower: a,
            midpoint: c,
            upper: b,
            coarse,
            fine,
            error_estimate: (fine - coarse) / 15.0,
        }
    }

    pub fn width(&self) -> Kilometer {
        self.upper - self.lower
    }

    pub fn is_accepted(&self, tol: f64) -> bool {
        self.error_estimate.abs() <= tol
    }

    /// Richardson-extrapolated integral `I2 + ε`.
    pub fn extrapolated(&self) -> f64 {
        self.fine + self.error_estimate
    }
}

/// Accepted interval of a [`qstep`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QStepOutcome {
    pub interval: IntegrationInterval,
    /// Number of times the upper bound was halved before acceptance.
    pub halvings: u32,
}

impl QStepOutcome {
    pub fn evaluations(&self) -> usize {
        EVALUATIONS_PER_ATTEMPT * (self.halvings as usize + 1)
    }
}

/// Left-anchored adaptive Simpson step on `[a, b]`.
///
/// Retries with `b ← (a + b)/2` until the Richardson error estimate is within `tol`.
///
/// Return
/// ----------
/// * The accepted interval (its lower bound is always `a`), or
///   [`HcnmError::MaxDepthExceeded`] after `max_depth` halvings, or as soon as the interval
///   can no longer be split in floating point.
pub fn qstep<F: Fn(Kilometer) -> f64>(
    gamma: &F,
    a: Kilometer,
    b: Kilometer,
    tol: f64,
    max_depth: u32,
) -> Result<QStepOutcome, HcnmError> {
    let mut upper = b;
    let mut halvings = 0;

    loop {
        let interval = IntegrationInterval::evaluate(gamma, a, upper);
        if interval.is_accepted(tol) {
            return Ok(QStepOutcome { interval, halvings });
        }

        let c = interval.midpoint;
        if halvings == max_depth || !(a < c && c < upper) {
            return Err(HcnmError::MaxDepthExceeded {
                tolerance: tol,
                lower: a,
                upper,
                depth: halvings,
            });
        }
        upper = c;
        halvings += 1;
    }
}

/// Result of one adaptive integration of a line of sight.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveTrace {
    /// Optical depth of the full chord.
    pub tau: f64,
    /// `upper − midpoint` of each accepted interval (km).
    pub step_widths: Vec<Kilometer>,
    /// Midpoint of each accepted interval (km from the satellite).
    pub step_midpoints: Vec<Kilometer>,
    /// Half-path contribution `I2 + ε` of each accepted interval.
    pub contributions: Vec<f64>,
    /// Total number of integrand evaluations.
    pub evaluations: usize,
}

impl AdaptiveTrace {
    pub fn accepted_intervals(&self) -> usize {
        self.step_midpoints.len()
    }

    pub fn transmittance(&self) -> f64 {
        (-self.tau).exp()
    }
}

/// Adaptive optical depth `τ(E, t)` of the line of sight.
///
/// Arguments
/// -----------------
/// * `geometry`: the orbit and central body.
/// * `cross_section`: lookup queried once for `energy_kev`.
/// * `energy_kev`: photon energy (keV).
/// * `t`: time since the reference epoch of the crossing (s).
/// * `params`: tolerance and termination limits.
///
/// Return
/// ----------
/// * The [`AdaptiveTrace`] of the integration, or a domain, lookup, parameter or convergence
///   error.
///
/// See also
/// ------------
/// * [`optical_depth_fixed`](crate::optical_depth::fixed_grid::optical_depth_fixed) – Fixed-grid
///   reference for the same quantity.
pub fn adaptive_simpson<X: CrossSectionLookup + ?Sized>(
    geometry: &OrbitGeometry,
    cross_section: &X,
    energy_kev: KeV,
    t: Second,
    params: &AdaptiveParams,
) -> Result<AdaptiveTrace, HcnmError> {
    params.validate()?;
    let integrand = LosIntegrand::new(geometry, cross_section, energy_kev, t)?;
    let trace = integrate_los(&integrand, params)?;

    debug!(
        energy_kev,
        t,
        tolerance = params.tolerance,
        accepted = trace.accepted_intervals(),
        evaluations = trace.evaluations,
        tau = trace.tau,
        "adaptive optical depth"
    );
    Ok(trace)
}

/// Moving-window driver over `[0, d_tot/2]` of an already bound integrand.
pub fn integrate_los(
    integrand: &LosIntegrand<'_>,
    params: &AdaptiveParams,
) -> Result<AdaptiveTrace, HcnmError> {
    let gamma = |x: Kilometer| integrand.gamma(x);
    let b_fixed = integrand.half_length();

    let mut a_moving = 0.0;
    let mut steps: Vec<(Kilometer, Kilometer, f64)> = Vec::new();
    let mut evaluations = 0;

    while a_moving < b_fixed {
        if steps.len() == params.max_steps {
            warn!(
                max_steps = params.max_steps,
                reached = a_moving,
                target = b_fixed,
                "adaptive quadrature step cap reached"
            );
            return Err(HcnmError::MaxStepsExceeded {
                max_steps: params.max_steps,
                reached: a_moving,
                target: b_fixed,
            });
        }

        let outcome = qstep(&gamma, a_moving, b_fixed, params.tolerance, params.max_depth)
            .inspect_err(|err| warn!(%err, "adaptive quadrature gave up"))?;
        let interval = outcome.interval;

        trace!(
            lower = interval.lower,
            upper = interval.upper,
            halvings = outcome.halvings,
            "accepted interval"
        );

        steps.push((
            interval.upper - interval.midpoint,
            interval.midpoint,
            interval.extrapolated(),
        ));
        evaluations += outcome.evaluations();
        a_moving = interval.upper;
    }

    let (step_widths, step_midpoints, contributions): (Vec<_>, Vec<_>, Vec<_>) =
        multiunzip(steps);
    let tau = 2.0 * contributions.iter().sum::<f64>();

    Ok(AdaptiveTrace {
        tau,
        step_widths,
        step_midpoints,
        contributions,
        evaluations,
    })
}

/// Run the adaptive integrator once per tolerance, all other limits taken from `params`.
///
/// The traces are index-aligned with `tolerances`.
pub fn tolerance_sweep<X: CrossSectionLookup + ?Sized>(
    geometry: &OrbitGeometry,
    cross_section: &X,
    energy_kev: KeV,
    t: Second,
    tolerances: &[f64],
    params: &AdaptiveParams,
) -> Result<Vec<AdaptiveTrace>, HcnmError> {
    let integrand = LosIntegrand::new(geometry, cross_section, energy_kev, t)?;
    tolerances
        .iter()
        .map(|&tolerance| {
            let params = AdaptiveParams {
                tolerance,
                ..*params
            };
            params.validate()?;
            integrate_los(&integrand, &params)
        })
        .collect()
}
