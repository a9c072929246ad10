//! Spectral backend trait for plane-wise FFTs.
//!
//! The propagation core is written against this trait only. The host
//! implementation (rustfft) lives in `ptycho2d-backend-cpu`; device
//! backends are external collaborators that implement the same contract.

use num_complex::Complex64;

/// FFT provider over square complex planes stored row-major.
///
/// Contract: `forward_fft_2d` is unnormalized, `inverse_fft_2d` divides by
/// the total sample count, so a forward/inverse pair is the identity up to
/// roundoff. Normalization conventions for centered transforms are layered
/// on top in [`crate::fourier`].
pub trait SpectralBackend {
    fn forward_fft_2d(&mut self, plane: &mut [Complex64], n: usize);
    fn inverse_fft_2d(&mut self, plane: &mut [Complex64], n: usize);

    /// Allocate a zeroed `n × n` plane.
    fn alloc_plane(&self, n: usize) -> Vec<Complex64> {
        vec![Complex64::default(); n * n]
    }
}
