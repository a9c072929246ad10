//! Error taxonomy for the propagation core.
//!
//! Everything here is a configuration error: it signals a fatal setup
//! mistake and is never retried. Shape changes are deliberately *not*
//! errors; the grid size is part of every kernel cache key, so a field
//! with a new `Np` simply builds a fresh kernel.

use thiserror::Error;

use crate::params::PropagatorKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropagationError {
    #[error(
        "unknown propagator '{0}', choose from Fraunhofer, Fresnel, ASP, polychromeASP, \
         scaledASP, scaledPolychromeASP or twoStepPolychrome"
    )]
    UnknownPropagator(String),

    #[error("{kind} works only with fftshift_switch = false")]
    ShiftConventionUnsupported { kind: PropagatorKind },

    #[error("{kind} is single-wavelength; got {nlambda} spectral entries (use the polychrome variant)")]
    MonochromaticOnly {
        kind: PropagatorKind,
        nlambda: usize,
    },
}
