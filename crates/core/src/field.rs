//! Contiguous complex-valued field stacks.
//!
//! Reconstruction engines hand fields around with the shape convention
//! `(wavelength, object-mode, probe-mode, slice, y, x)`; the last two
//! dimensions are always square. The stack stores every `Np × Np` plane
//! back-to-back in one allocation, and the FFT layer transforms planes
//! independently.

use num_complex::Complex64;

/// Logical shape of a [`FieldStack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldShape {
    pub nlambda: usize,
    pub nosm: usize,
    pub npsm: usize,
    pub nslice: usize,
    /// Side length of each square plane.
    pub np: usize,
}

impl FieldShape {
    pub fn new(nlambda: usize, nosm: usize, npsm: usize, nslice: usize, np: usize) -> Self {
        assert!(np > 0, "grid size must be non-zero");
        assert!(
            nlambda > 0 && nosm > 0 && npsm > 0 && nslice > 0,
            "mode counts must be non-zero"
        );
        Self {
            nlambda,
            nosm,
            npsm,
            nslice,
            np,
        }
    }

    /// Shape of a single monochromatic, single-mode field.
    pub fn single(np: usize) -> Self {
        Self::new(1, 1, 1, 1, np)
    }

    /// Number of `np × np` planes in the stack.
    pub fn planes(&self) -> usize {
        self.nlambda * self.nosm * self.npsm * self.nslice
    }

    /// Planes sharing one wavelength index.
    pub fn planes_per_wavelength(&self) -> usize {
        self.nosm * self.npsm * self.nslice
    }

    pub fn plane_len(&self) -> usize {
        self.np * self.np
    }

    pub fn len(&self) -> usize {
        self.planes() * self.plane_len()
    }

    /// Linear plane index for `(ilambda, iosm, ipsm, islice)`.
    pub fn plane_index(&self, ilambda: usize, iosm: usize, ipsm: usize, islice: usize) -> usize {
        ((ilambda * self.nosm + iosm) * self.npsm + ipsm) * self.nslice + islice
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldStack {
    shape: FieldShape,
    data: Vec<Complex64>,
}

impl FieldStack {
    pub fn zeros(shape: FieldShape) -> Self {
        Self {
            data: vec![Complex64::default(); shape.len()],
            shape,
        }
    }

    pub fn filled(shape: FieldShape, value: Complex64) -> Self {
        Self {
            data: vec![value; shape.len()],
            shape,
        }
    }

    pub fn from_vec(shape: FieldShape, data: Vec<Complex64>) -> Self {
        assert_eq!(data.len(), shape.len(), "data length must match shape");
        Self { shape, data }
    }

    pub fn shape(&self) -> FieldShape {
        self.shape
    }

    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [Complex64] {
        &mut self.data
    }

    pub fn plane(&self, plane: usize) -> &[Complex64] {
        let len = self.shape.plane_len();
        &self.data[plane * len..(plane + 1) * len]
    }

    pub fn plane_mut(&mut self, plane: usize) -> &mut [Complex64] {
        let len = self.shape.plane_len();
        &mut self.data[plane * len..(plane + 1) * len]
    }

    /// Iterate over every plane in stack order.
    pub fn planes_mut(&mut self) -> impl Iterator<Item = &mut [Complex64]> {
        let len = self.shape.plane_len();
        self.data.chunks_exact_mut(len)
    }

    /// Wavelength index a linear plane index belongs to.
    pub fn wavelength_of_plane(&self, plane: usize) -> usize {
        plane / self.shape.planes_per_wavelength()
    }

    /// Total squared magnitude over all planes.
    pub fn norm_sqr(&self) -> f64 {
        self.data.iter().map(|v| v.norm_sqr()).sum()
    }
}

impl From<FieldStack> for Vec<Complex64> {
    fn from(field: FieldStack) -> Self {
        field.data
    }
}
