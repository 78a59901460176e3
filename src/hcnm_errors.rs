use thiserror::Error;

use crate::constants::{KeV, Kilometer, Second};

#[derive(Error, Debug)]
pub enum HcnmError {
    #[error("Unsupported central body: {0} (only \"Earth\" is defined)")]
    UnsupportedCentralBody(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error(
        "Line of sight undefined at t = {time} s: tangent altitude {tangent_altitude} km is outside the crossing window"
    )]
    LineOfSightUndefined {
        time: Second,
        tangent_altitude: Kilometer,
    },

    #[error("Altitude {altitude} km lies below the tangent altitude {tangent_altitude} km at t = {time} s")]
    AltitudeBelowTangent {
        time: Second,
        altitude: Kilometer,
        tangent_altitude: Kilometer,
    },

    #[error("Tangent altitude {tangent_altitude} km is never reached from an orbit at {orbit_altitude} km")]
    TangentAltitudeUnreachable {
        tangent_altitude: Kilometer,
        orbit_altitude: Kilometer,
    },

    #[error("Adaptive quadrature did not reach tolerance {tolerance:e} on [{lower}, {upper}] km after {depth} halvings")]
    MaxDepthExceeded {
        tolerance: f64,
        lower: Kilometer,
        upper: Kilometer,
        depth: u32,
    },

    #[error("Adaptive quadrature exceeded {max_steps} accepted steps (reached x = {reached} of {target} km)")]
    MaxStepsExceeded {
        max_steps: usize,
        reached: Kilometer,
        target: Kilometer,
    },

    #[error("Invalid quadrature parameter: {0}")]
    InvalidQuadratureParameter(String),

    #[error("Energy {energy} keV is outside the cross-section table [{min}, {max}] keV")]
    EnergyOutOfRange { energy: KeV, min: KeV, max: KeV },
}

impl HcnmError {
    /// Error raised at construction time (unsupported body, bad configuration values).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            HcnmError::UnsupportedCentralBody(_) | HcnmError::InvalidConfiguration(_)
        )
    }

    /// Geometric domain violation: the requested time or altitude has no line of sight.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            HcnmError::LineOfSightUndefined { .. }
                | HcnmError::AltitudeBelowTangent { .. }
                | HcnmError::TangentAltitudeUnreachable { .. }
        )
    }

    /// The adaptive integrator gave up before reaching the requested tolerance.
    pub fn is_convergence(&self) -> bool {
        matches!(
            self,
            HcnmError::MaxDepthExceeded { .. } | HcnmError::MaxStepsExceeded { .. }
        )
    }
}

impl PartialEq for HcnmError {
    fn eq(&self, other: &Self) -> bool {
        use HcnmError::*;
        match (self, other) {
            (UnsupportedCentralBody(a), UnsupportedCentralBody(b)) => a == b,
            (InvalidConfiguration(a), InvalidConfiguration(b)) => a == b,
            (InvalidQuadratureParameter(a), InvalidQuadratureParameter(b)) => a == b,

            // float payloads: same variant is enough
            (LineOfSightUndefined { .. }, LineOfSightUndefined { .. }) => true,
            (AltitudeBelowTangent { .. }, AltitudeBelowTangent { .. }) => true,
            (TangentAltitudeUnreachable { .. }, TangentAltitudeUnreachable { .. }) => true,
            (MaxDepthExceeded { depth: a, .. }, MaxDepthExceeded { depth: b, .. }) => a == b,
            (MaxStepsExceeded { max_steps: a, .. }, MaxStepsExceeded { max_steps: b, .. }) => {
                a == b
            }
            (EnergyOutOfRange { .. }, EnergyOutOfRange { .. }) => true,

            _ => false,
        }
    }
}
