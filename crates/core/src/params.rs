//! Propagation parameter configuration (TOML-loadable).
//!
//! # File format
//!
//! ```toml
//! propagator = "ASP"
//! zo = 0.01
//! wavelength = 500e-9
//! np = 64
//! lp = 1e-3
//! dxp = 1e-5
//! dxo = 1e-5
//! dxd = 1e-5
//! # spectral_density = [500e-9, 550e-9, 600e-9]
//! # nlambda = 3
//! ```
//!
//! Mode counts and switches default to single-mode, shift-off, CPU.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PropagationError;
use crate::field::FieldShape;

/// Which memory space a kernel is built for. CPU and GPU kernels are cached
/// under separate keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Cpu,
    Gpu,
}

/// The seven supported propagation models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropagatorKind {
    Fraunhofer,
    Fresnel,
    #[serde(rename = "ASP")]
    Asp,
    #[serde(rename = "polychromeASP")]
    PolychromeAsp,
    #[serde(rename = "scaledASP")]
    ScaledAsp,
    #[serde(rename = "scaledPolychromeASP")]
    ScaledPolychromeAsp,
    #[serde(rename = "twoStepPolychrome")]
    TwoStepPolychrome,
}

impl PropagatorKind {
    pub const ALL: [PropagatorKind; 7] = [
        PropagatorKind::Fraunhofer,
        PropagatorKind::Fresnel,
        PropagatorKind::Asp,
        PropagatorKind::PolychromeAsp,
        PropagatorKind::ScaledAsp,
        PropagatorKind::ScaledPolychromeAsp,
        PropagatorKind::TwoStepPolychrome,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PropagatorKind::Fraunhofer => "Fraunhofer",
            PropagatorKind::Fresnel => "Fresnel",
            PropagatorKind::Asp => "ASP",
            PropagatorKind::PolychromeAsp => "polychromeASP",
            PropagatorKind::ScaledAsp => "scaledASP",
            PropagatorKind::ScaledPolychromeAsp => "scaledPolychromeASP",
            PropagatorKind::TwoStepPolychrome => "twoStepPolychrome",
        }
    }

    /// Models built on the angular-spectrum transfer function. These require
    /// centered (non-shifted) transforms.
    pub fn is_asp_family(&self) -> bool {
        !matches!(self, PropagatorKind::Fraunhofer | PropagatorKind::Fresnel)
    }

    /// Models restricted to a single wavelength; multi-wavelength runs must
    /// use the matching polychrome variant.
    pub fn is_monochromatic_only(&self) -> bool {
        matches!(self, PropagatorKind::Asp | PropagatorKind::ScaledAsp)
    }
}

impl fmt::Display for PropagatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PropagatorKind {
    type Err = PropagationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropagatorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| PropagationError::UnknownPropagator(s.to_string()))
    }
}

/// Immutable physical and geometric configuration for one propagation call.
///
/// Distances and spacings are in meters. `dxp`, `dxo` and `dxd` are the pixel
/// spacings at the probe, object and detector planes; `lp` is the probe
/// field-of-view size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagationParams {
    pub propagator: PropagatorKind,
    #[serde(default)]
    pub fftshift_switch: bool,
    #[serde(default)]
    pub device: Device,
    /// Object-to-detector propagation distance.
    pub zo: f64,
    /// Design wavelength for monochromatic models.
    pub wavelength: f64,
    /// Per-wavelength values for polychromatic models. Falls back to
    /// `[wavelength]` when absent.
    #[serde(default)]
    pub spectral_density: Option<Vec<f64>>,
    pub np: usize,
    pub lp: f64,
    pub dxp: f64,
    pub dxo: f64,
    pub dxd: f64,
    #[serde(default = "one")]
    pub nlambda: usize,
    #[serde(default = "one")]
    pub nosm: usize,
    #[serde(default = "one")]
    pub npsm: usize,
    #[serde(default = "one")]
    pub nslice: usize,
    /// Apply the third quadratic phase of the scaled angular spectrum for
    /// phase-exact output. Off by default; intensities do not need it.
    #[serde(default)]
    pub scaled_asp_exact: bool,
}

fn one() -> usize {
    1
}

impl PropagationParams {
    /// Ordered per-wavelength values, falling back to the design wavelength.
    pub fn wavelengths(&self) -> Vec<f64> {
        match &self.spectral_density {
            Some(sd) if !sd.is_empty() => sd.clone(),
            _ => vec![self.wavelength],
        }
    }

    /// Number of spectral entries a propagation will see.
    pub fn effective_nlambda(&self) -> usize {
        self.nlambda.max(self.wavelengths().len())
    }

    /// Shape of a field matching this configuration. The wavelength axis
    /// follows [`Self::effective_nlambda`], so a spectral density alone is
    /// enough to size a polychromatic stack.
    pub fn field_shape(&self) -> FieldShape {
        FieldShape::new(
            self.effective_nlambda(),
            self.nosm,
            self.npsm,
            self.nslice,
            self.np,
        )
    }
}
