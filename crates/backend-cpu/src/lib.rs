//! Host spectral backend built on rustfft.
//!
//! Plans are cached per `(size, direction)`; the planner itself deduplicates
//! twiddle tables, so repeated propagations over the same grid pay the
//! planning cost once.

use std::collections::HashMap;
use std::sync::Arc;

use num_complex::Complex64;
use ptycho2d_core::backend::SpectralBackend;
use rustfft::{Fft, FftDirection, FftPlanner};

pub struct CpuBackend {
    planner: FftPlanner<f64>,
    // keyed by (size, is_forward)
    plans: HashMap<(usize, bool), Arc<dyn Fft<f64>>>,
    scratch: Vec<Complex64>,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
            plans: HashMap::new(),
            scratch: Vec::new(),
        }
    }

    fn plan(&mut self, n: usize, direction: FftDirection) -> Arc<dyn Fft<f64>> {
        let planner = &mut self.planner;
        Arc::clone(
            self.plans
                .entry((n, direction == FftDirection::Forward))
                .or_insert_with(|| planner.plan_fft(n, direction)),
        )
    }

    /// Row-column 2D transform: transform every row, transpose, transform
    /// every row again, transpose back.
    fn fft_2d(&mut self, plane: &mut [Complex64], n: usize, direction: FftDirection) {
        debug_assert_eq!(plane.len(), n * n, "plane must be square");
        let fft = self.plan(n, direction);
        self.scratch
            .resize(fft.get_inplace_scratch_len(), Complex64::default());
        fft.process_with_scratch(plane, &mut self.scratch);
        transpose_square(plane, n);
        fft.process_with_scratch(plane, &mut self.scratch);
        transpose_square(plane, n);
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectralBackend for CpuBackend {
    fn forward_fft_2d(&mut self, plane: &mut [Complex64], n: usize) {
        self.fft_2d(plane, n, FftDirection::Forward);
    }

    fn inverse_fft_2d(&mut self, plane: &mut [Complex64], n: usize) {
        self.fft_2d(plane, n, FftDirection::Inverse);
        let scale = 1.0 / (n * n) as f64;
        for value in plane.iter_mut() {
            *value *= scale;
        }
    }
}

fn transpose_square(plane: &mut [Complex64], n: usize) {
    for iy in 0..n {
        for ix in (iy + 1)..n {
            plane.swap(iy * n + ix, ix * n + iy);
        }
    }
}
