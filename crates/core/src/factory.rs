//! Kernel factory: per-kind get-or-compute with bounded retention.
//!
//! One `KernelFactory` is owned by each propagator instance, so independent
//! reconstructions carry independent caches. Keys include the device flag;
//! host and device kernels never alias.

use std::sync::Arc;

use log::{debug, info};

use crate::cache::{BitKey, CacheStats, KernelCache, SpectrumKey, DEFAULT_KERNEL_CACHE_CAPACITY};
use crate::kernel::{self, KernelStack, ScaledFactors};
use crate::params::Device;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct QuadPhaseKey {
    np: usize,
    z: BitKey,
    wavelength: BitKey,
    dxp: BitKey,
    device: Device,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct AspKey {
    np: usize,
    z: BitKey,
    wavelength: BitKey,
    lp: BitKey,
    device: Device,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PolychromeAspKey {
    np: usize,
    z: BitKey,
    spectrum: SpectrumKey,
    lp: BitKey,
    device: Device,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ScaledAspKey {
    np: usize,
    z: BitKey,
    wavelength: BitKey,
    dxo: BitKey,
    dxd: BitKey,
    exact: bool,
    device: Device,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ScaledPolychromeKey {
    np: usize,
    z: BitKey,
    spectrum: SpectrumKey,
    dxo: BitKey,
    dxd: BitKey,
    exact: bool,
    device: Device,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TwoStepKey {
    np: usize,
    z: BitKey,
    spectrum: SpectrumKey,
    lp: BitKey,
    dxp: BitKey,
    device: Device,
}

/// Kernel pair of the two-step polychrome model.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoStepKernels {
    pub transfer: KernelStack,
    pub quad_phase: KernelStack,
}

pub struct KernelFactory {
    quad_phase: KernelCache<QuadPhaseKey, KernelStack>,
    asp: KernelCache<AspKey, KernelStack>,
    polychrome_asp: KernelCache<PolychromeAspKey, KernelStack>,
    scaled_asp: KernelCache<ScaledAspKey, ScaledFactors>,
    scaled_polychrome: KernelCache<ScaledPolychromeKey, ScaledFactors>,
    two_step: KernelCache<TwoStepKey, TwoStepKernels>,
}

impl KernelFactory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_KERNEL_CACHE_CAPACITY)
    }

    /// Build a factory whose per-kind caches hold `capacity` entries each.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            quad_phase: KernelCache::new(capacity),
            asp: KernelCache::new(capacity),
            polychrome_asp: KernelCache::new(capacity),
            scaled_asp: KernelCache::new(capacity),
            scaled_polychrome: KernelCache::new(capacity),
            two_step: KernelCache::new(capacity),
        }
    }

    pub fn quadratic_phase(
        &mut self,
        np: usize,
        z: f64,
        wavelength: f64,
        dxp: f64,
        device: Device,
    ) -> Arc<KernelStack> {
        let key = QuadPhaseKey {
            np,
            z: z.into(),
            wavelength: wavelength.into(),
            dxp: dxp.into(),
            device,
        };
        self.quad_phase.get_or_insert_with(key, || {
            KernelStack::single(np, kernel::quadratic_phase(np, z, wavelength, dxp))
        })
    }

    pub fn asp_transfer(
        &mut self,
        np: usize,
        z: f64,
        wavelength: f64,
        lp: f64,
        device: Device,
    ) -> Arc<KernelStack> {
        let key = AspKey {
            np,
            z: z.into(),
            wavelength: wavelength.into(),
            lp: lp.into(),
            device,
        };
        self.asp.get_or_insert_with(key, || {
            KernelStack::single(np, kernel::aspw_transfer(np, z, wavelength, lp))
        })
    }

    pub fn polychrome_asp_transfer(
        &mut self,
        np: usize,
        z: f64,
        spectral: &[f64],
        lp: f64,
        device: Device,
    ) -> Arc<KernelStack> {
        let key = PolychromeAspKey {
            np,
            z: z.into(),
            spectrum: SpectrumKey::new(spectral),
            lp: lp.into(),
            device,
        };
        self.polychrome_asp
            .get_or_insert_with(key, || kernel::polychrome_aspw_transfer(np, z, spectral, lp))
    }

    pub fn scaled_asp_factors(
        &mut self,
        np: usize,
        z: f64,
        wavelength: f64,
        dxo: f64,
        dxd: f64,
        exact: bool,
        device: Device,
    ) -> Arc<ScaledFactors> {
        let key = ScaledAspKey {
            np,
            z: z.into(),
            wavelength: wavelength.into(),
            dxo: dxo.into(),
            dxd: dxd.into(),
            exact,
            device,
        };
        self.scaled_asp.get_or_insert_with(key, || {
            let (q1, q2, q3) = kernel::scaled_asp_factors(np, z, wavelength, dxo, dxd, exact);
            ScaledFactors {
                q1: KernelStack::single(np, q1),
                q2: KernelStack::single(np, q2),
                q3: q3.map(|data| KernelStack::single(np, data)),
            }
        })
    }

    pub fn scaled_polychrome_factors(
        &mut self,
        np: usize,
        z: f64,
        spectral: &[f64],
        dxo: f64,
        dxd: f64,
        exact: bool,
        device: Device,
    ) -> Arc<ScaledFactors> {
        let key = ScaledPolychromeKey {
            np,
            z: z.into(),
            spectrum: SpectrumKey::new(spectral),
            dxo: dxo.into(),
            dxd: dxd.into(),
            exact,
            device,
        };
        self.scaled_polychrome.get_or_insert_with(key, || {
            kernel::scaled_polychrome_factors(np, z, spectral, dxo, dxd, exact)
        })
    }

    pub fn two_step_kernels(
        &mut self,
        np: usize,
        zo: f64,
        spectral: &[f64],
        lp: f64,
        dxp: f64,
        device: Device,
    ) -> Arc<TwoStepKernels> {
        let key = TwoStepKey {
            np,
            z: zo.into(),
            spectrum: SpectrumKey::new(spectral),
            lp: lp.into(),
            dxp: dxp.into(),
            device,
        };
        self.two_step.get_or_insert_with(key, || TwoStepKernels {
            transfer: kernel::two_step_transfer(np, zo, spectral, lp),
            quad_phase: KernelStack::single(
                np,
                kernel::quadratic_phase(np, zo, spectral[0], dxp),
            ),
        })
    }

    /// Per-kind cache statistics, in a fixed order.
    pub fn stats(&self) -> Vec<(&'static str, CacheStats)> {
        vec![
            ("quad_phase", self.quad_phase.stats()),
            ("asp", self.asp.stats()),
            ("polychrome_asp", self.polychrome_asp.stats()),
            ("scaled_asp", self.scaled_asp.stats()),
            ("scaled_polychrome", self.scaled_polychrome.stats()),
            ("two_step", self.two_step.stats()),
        ]
    }

    /// Evict every cached kernel across all kinds, e.g. when device memory
    /// runs low. Returns the pre-clear statistics per kernel kind.
    pub fn clear_all(&mut self) -> Vec<(&'static str, CacheStats)> {
        let stats = self.stats();
        for (kind, s) in &stats {
            debug!("kernel cache {kind}: {s:?}");
        }
        info!("clearing all kernel caches");
        self.quad_phase.clear();
        self.asp.clear();
        self.polychrome_asp.clear();
        self.scaled_asp.clear();
        self.scaled_polychrome.clear();
        self.two_step.clear();
        stats
    }
}

impl Default for KernelFactory {
    fn default() -> Self {
        Self::new()
    }
}
