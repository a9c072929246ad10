//! Centered, orthonormal Fourier transforms over field stacks.
//!
//! `fft2c`/`ifft2c` follow the detector-centric convention used throughout
//! the reconstruction pipeline: the zero frequency sits at the center of the
//! plane, and both directions carry the `1/Np` orthonormal scaling so that
//! energy is preserved. When `fftshift_switch` is set the caller keeps its
//! arrays in wrapped FFT order and the plain transform is applied instead.

use num_complex::Complex64;

use crate::{backend::SpectralBackend, field::FieldStack};

/// Centered orthonormal forward transform of every plane in the stack.
pub fn fft2c<B: SpectralBackend>(backend: &mut B, field: &mut FieldStack, fftshift_switch: bool) {
    let n = field.shape().np;
    let scale = 1.0 / n as f64;
    for plane in field.planes_mut() {
        if !fftshift_switch {
            ifftshift_plane(plane, n);
        }
        backend.forward_fft_2d(plane, n);
        if !fftshift_switch {
            fftshift_plane(plane, n);
        }
        for value in plane.iter_mut() {
            *value *= scale;
        }
    }
}

/// Centered orthonormal inverse transform of every plane in the stack.
pub fn ifft2c<B: SpectralBackend>(backend: &mut B, field: &mut FieldStack, fftshift_switch: bool) {
    let n = field.shape().np;
    // the backend inverse divides by Np^2; restore to the orthonormal 1/Np
    let scale = n as f64;
    for plane in field.planes_mut() {
        if !fftshift_switch {
            ifftshift_plane(plane, n);
        }
        backend.inverse_fft_2d(plane, n);
        if !fftshift_switch {
            fftshift_plane(plane, n);
        }
        for value in plane.iter_mut() {
            *value *= scale;
        }
    }
}

/// Move the zero-frequency sample to the center of the plane.
pub fn fftshift_plane(plane: &mut [Complex64], n: usize) {
    circshift_plane(plane, n, n / 2);
}

/// Undo [`fftshift_plane`]; identical for even `n`, shifted by one for odd.
pub fn ifftshift_plane(plane: &mut [Complex64], n: usize) {
    circshift_plane(plane, n, n - n / 2);
}

fn circshift_plane(plane: &mut [Complex64], n: usize, shift: usize) {
    debug_assert_eq!(plane.len(), n * n, "plane must be square");
    let shift = shift % n;
    if shift == 0 {
        return;
    }
    let mut shifted = vec![Complex64::default(); n * n];
    for iy in 0..n {
        let oy = (iy + shift) % n;
        for ix in 0..n {
            let ox = (ix + shift) % n;
            shifted[oy * n + ox] = plane[iy * n + ix];
        }
    }
    plane.copy_from_slice(&shifted);
}
