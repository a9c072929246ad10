//! Transfer-function and quadratic-phase kernel construction.
//!
//! Every builder here is a pure function of physical parameters; the
//! bounded retention layer lives in [`crate::factory`]. All kernels are
//! evaluated on the centered grid convention of [`crate::grid`], matching
//! the centered transforms in [`crate::fourier`].

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::field::FieldStack;
use crate::grid::{frequency_axis, inside_circle, spatial_axis};

/// A complex kernel: one `np × np` plane per wavelength entry, or a single
/// plane broadcast across all wavelengths when `nlambda == 1`. Object-mode,
/// probe-mode and slice axes always broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelStack {
    nlambda: usize,
    np: usize,
    data: Vec<Complex64>,
}

impl KernelStack {
    pub fn single(np: usize, data: Vec<Complex64>) -> Self {
        assert_eq!(data.len(), np * np, "kernel plane must be np x np");
        Self {
            nlambda: 1,
            np,
            data,
        }
    }

    pub fn stacked(nlambda: usize, np: usize, data: Vec<Complex64>) -> Self {
        assert_eq!(
            data.len(),
            nlambda * np * np,
            "kernel stack must hold nlambda planes"
        );
        Self { nlambda, np, data }
    }

    pub fn np(&self) -> usize {
        self.np
    }

    pub fn nlambda(&self) -> usize {
        self.nlambda
    }

    pub fn plane(&self, ilambda: usize) -> &[Complex64] {
        let len = self.np * self.np;
        let i = if self.nlambda == 1 { 0 } else { ilambda };
        &self.data[i * len..(i + 1) * len]
    }

    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    /// Multiply `field` elementwise by this kernel, optionally conjugated,
    /// broadcasting each kernel plane across the mode and slice axes.
    pub fn apply(&self, field: &mut FieldStack, conjugate: bool) {
        let shape = field.shape();
        debug_assert_eq!(shape.np, self.np, "kernel/field grid size mismatch");
        if self.nlambda != 1 {
            debug_assert_eq!(shape.nlambda, self.nlambda, "kernel/field nlambda mismatch");
        }
        let per_wavelength = shape.planes_per_wavelength();
        for (plane_idx, plane) in field.planes_mut().enumerate() {
            let kernel_plane = self.plane(plane_idx / per_wavelength);
            if conjugate {
                for (value, k) in plane.iter_mut().zip(kernel_plane) {
                    *value *= k.conj();
                }
            } else {
                for (value, k) in plane.iter_mut().zip(kernel_plane) {
                    *value *= *k;
                }
            }
        }
    }
}

/// Quadratic phase factor set for the scaled angular spectrum.
///
/// `q3` is present only in the phase-exact mode; the default intensity-only
/// path leaves it out.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledFactors {
    pub q1: KernelStack,
    pub q2: KernelStack,
    pub q3: Option<KernelStack>,
}

/// Band-limited angular-spectrum transfer function.
///
/// Follows Matsushima et al., "Band-Limited Angular Spectrum Method for
/// Numerical Simulation of Free-Space Propagation in Far and Near Fields",
/// Optics Express 2009. Evanescent components are zeroed, and a circular
/// window of radius `f_max = L / (λ sqrt(L² + 4z²))` suppresses aliasing.
pub fn aspw_transfer(np: usize, z: f64, wavelength: f64, l: f64) -> Vec<Complex64> {
    let k = 2.0 * PI / wavelength;
    let freq = frequency_axis(np, l);
    let f_max = l / (wavelength * (l * l + 4.0 * z * z).sqrt());
    let mut data = vec![Complex64::default(); np * np];
    for iy in 0..np {
        let fy = freq[iy];
        for ix in 0..np {
            let fx = freq[ix];
            let exponent = 1.0 - (fx * wavelength).powi(2) - (fy * wavelength).powi(2);
            if exponent > 0.0 && inside_circle(fx, fy, 2.0 * f_max) {
                data[iy * np + ix] = Complex64::new(0.0, k * z * exponent.sqrt()).exp();
            }
        }
    }
    data
}

/// Fresnel quadratic phase `exp(iπ/(λz)·(x² + y²))` on the centered grid.
pub fn quadratic_phase(np: usize, z: f64, wavelength: f64, dxp: f64) -> Vec<Complex64> {
    let coords = spatial_axis(np, dxp);
    let factor = PI / (wavelength * z);
    let mut data = vec![Complex64::default(); np * np];
    for iy in 0..np {
        let y = coords[iy];
        for ix in 0..np {
            let x = coords[ix];
            data[iy * np + ix] = Complex64::new(0.0, factor * (x * x + y * y)).exp();
        }
    }
    data
}

/// Quadratic-phase factors of the scaled angular spectrum for one
/// wavelength, with the scale parameter `m = dxd / dxo`.
///
/// Both factors are band-limited; `q1`'s window is skipped when the grids
/// match (`m == 1`) since its radius diverges. The optional `q3` makes the
/// result phase-exact on the observation grid.
pub fn scaled_asp_factors(
    np: usize,
    z: f64,
    wavelength: f64,
    dxo: f64,
    dxd: f64,
    exact: bool,
) -> (Vec<Complex64>, Vec<Complex64>, Option<Vec<Complex64>>) {
    let k = 2.0 * PI / wavelength;
    let m = dxd / dxo;
    let x1 = spatial_axis(np, dxo);
    let freq = frequency_axis(np, np as f64 * dxo);
    let plane_len = np * np;

    let mut q1 = vec![Complex64::default(); plane_len];
    let q1_factor = k / 2.0 * (1.0 - m) / z;
    // window radius |λz / (2·dxo·(1−m))|, degenerate when m == 1
    let r1_max = if m != 1.0 {
        Some((wavelength * z / (2.0 * dxo * (1.0 - m))).abs())
    } else {
        None
    };
    for iy in 0..np {
        let y = x1[iy];
        for ix in 0..np {
            let x = x1[ix];
            let windowed = match r1_max {
                Some(r) => inside_circle(x, y, 2.0 * r),
                None => true,
            };
            if windowed {
                q1[iy * np + ix] = Complex64::new(0.0, q1_factor * (x * x + y * y)).exp();
            }
        }
    }

    let mut q2 = vec![Complex64::default(); plane_len];
    let q2_factor = -2.0 * PI * PI * z / (m * k);
    let f_max = m * np as f64 * dxo / (2.0 * z * wavelength);
    for iy in 0..np {
        let fy = freq[iy];
        for ix in 0..np {
            let fx = freq[ix];
            if inside_circle(fx, fy, 2.0 * f_max) {
                q2[iy * np + ix] = Complex64::new(0.0, q2_factor * (fx * fx + fy * fy)).exp();
            }
        }
    }

    let q3 = exact.then(|| {
        let x2 = spatial_axis(np, dxd);
        let q3_factor = k / 2.0 * (m - 1.0) / (m * z);
        let mut q3 = vec![Complex64::default(); plane_len];
        for iy in 0..np {
            let y = x2[iy];
            for ix in 0..np {
                let x = x2[ix];
                q3[iy * np + ix] = Complex64::new(0.0, q3_factor * (x * x + y * y)).exp();
            }
        }
        q3
    });

    (q1, q2, q3)
}

/// Angular-spectrum transfer function stacked per spectral entry.
pub fn polychrome_aspw_transfer(np: usize, z: f64, spectral: &[f64], l: f64) -> KernelStack {
    let mut data = Vec::with_capacity(spectral.len() * np * np);
    for &wavelength in spectral {
        data.extend(aspw_transfer(np, z, wavelength, l));
    }
    KernelStack::stacked(spectral.len(), np, data)
}

/// Scaled angular-spectrum factors stacked per spectral entry.
pub fn scaled_polychrome_factors(
    np: usize,
    z: f64,
    spectral: &[f64],
    dxo: f64,
    dxd: f64,
    exact: bool,
) -> ScaledFactors {
    let plane_len = np * np;
    let nlambda = spectral.len();
    let mut q1 = Vec::with_capacity(nlambda * plane_len);
    let mut q2 = Vec::with_capacity(nlambda * plane_len);
    let mut q3 = exact.then(|| Vec::with_capacity(nlambda * plane_len));
    for &wavelength in spectral {
        let (p1, p2, p3) = scaled_asp_factors(np, z, wavelength, dxo, dxd, exact);
        q1.extend(p1);
        q2.extend(p2);
        if let (Some(q3), Some(p3)) = (q3.as_mut(), p3) {
            q3.extend(p3);
        }
    }
    ScaledFactors {
        q1: KernelStack::stacked(nlambda, np, q1),
        q2: KernelStack::stacked(nlambda, np, q2),
        q3: q3.map(|data| KernelStack::stacked(nlambda, np, data)),
    }
}

/// Two-step polychrome transfer stack: each wavelength propagates over the
/// residual distance `zo·(1 − λ₀/λ)` referenced to the first spectral entry.
pub fn two_step_transfer(np: usize, zo: f64, spectral: &[f64], l: f64) -> KernelStack {
    let reference = spectral[0];
    let mut data = Vec::with_capacity(spectral.len() * np * np);
    for &wavelength in spectral {
        let z = zo * (1.0 - reference / wavelength);
        data.extend(aspw_transfer(np, z, wavelength, l));
    }
    KernelStack::stacked(spectral.len(), np, data)
}
