//! Propagator dispatch and the object↔detector directional adapters.
//!
//! Each of the seven models is a pure forward/inverse transform pair over a
//! [`FieldStack`]; resolution by model kind is a total match, so an
//! unsupported name can only be rejected at parse time. The adapters mirror
//! the call shape the reconstruction engines use: an optional explicit
//! field (defaulting to the stored wave estimate), the propagation
//! parameters, and the current wave state.

use crate::backend::SpectralBackend;
use crate::cache::CacheStats;
use crate::error::PropagationError;
use crate::factory::KernelFactory;
use crate::field::FieldStack;
use crate::fourier::{fft2c, ifft2c};
use crate::kernel::{KernelStack, ScaledFactors};
use crate::params::{PropagationParams, PropagatorKind};

/// The wave pair an iterative engine carries between planes.
#[derive(Debug, Clone)]
pub struct ReconstructionState {
    /// Exit surface wave at the object plane.
    pub esw: FieldStack,
    /// Wave estimate at the detector plane.
    pub esw_detector: FieldStack,
}

impl ReconstructionState {
    pub fn new(esw: FieldStack, esw_detector: FieldStack) -> Self {
        Self { esw, esw_detector }
    }
}

/// Propagation engine: owns the spectral backend and the kernel caches.
///
/// Two reconstructions running side by side construct two propagators and
/// never share cache state.
pub struct WavefieldPropagator<B: SpectralBackend> {
    backend: B,
    kernels: KernelFactory,
}

impl<B: SpectralBackend> WavefieldPropagator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            kernels: KernelFactory::new(),
        }
    }

    pub fn with_cache_capacity(backend: B, capacity: usize) -> Self {
        Self {
            backend,
            kernels: KernelFactory::with_capacity(capacity),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn kernel_stats(&self) -> Vec<(&'static str, CacheStats)> {
        self.kernels.stats()
    }

    /// Evict every cached kernel; returns the pre-clear statistics per
    /// kernel kind for the caller's diagnostics.
    pub fn clear_kernel_caches(&mut self) -> Vec<(&'static str, CacheStats)> {
        self.kernels.clear_all()
    }

    /// Propagate from the object plane to the detector plane.
    ///
    /// When `field` is `None` the state's object-side wave is propagated.
    /// Returns the stored object-side wave unchanged alongside the
    /// transformed field, so callers can track both without extra
    /// bookkeeping.
    pub fn object_to_detector<'a>(
        &mut self,
        field: Option<&FieldStack>,
        params: &PropagationParams,
        state: &'a ReconstructionState,
    ) -> Result<(&'a FieldStack, FieldStack), PropagationError> {
        let input = field.unwrap_or(&state.esw);
        let output = self.forward(input, params)?;
        Ok((&state.esw, output))
    }

    /// Propagate from the detector plane back to the object plane.
    ///
    /// When `field` is `None` the state's detector-side wave is propagated.
    pub fn detector_to_object<'a>(
        &mut self,
        field: Option<&FieldStack>,
        params: &PropagationParams,
        state: &'a ReconstructionState,
    ) -> Result<(&'a FieldStack, FieldStack), PropagationError> {
        let input = field.unwrap_or(&state.esw_detector);
        let output = self.inverse(input, params)?;
        Ok((&state.esw, output))
    }

    /// Forward transform of `field` under the configured model.
    pub fn forward(
        &mut self,
        field: &FieldStack,
        params: &PropagationParams,
    ) -> Result<FieldStack, PropagationError> {
        check_validity(params)?;
        // the kernel grid always follows the input field; a grid-size change
        // keys a fresh kernel instead of failing
        let np = field.shape().np;
        let mut out = field.clone();
        match params.propagator {
            PropagatorKind::Fraunhofer => {
                fft2c(&mut self.backend, &mut out, params.fftshift_switch);
            }
            PropagatorKind::Fresnel => {
                let qp = self.kernels.quadratic_phase(
                    np,
                    params.zo,
                    params.wavelength,
                    params.dxp,
                    params.device,
                );
                qp.apply(&mut out, false);
                fft2c(&mut self.backend, &mut out, params.fftshift_switch);
            }
            PropagatorKind::Asp => {
                let h = self.kernels.asp_transfer(
                    np,
                    params.zo,
                    params.wavelength,
                    params.lp,
                    params.device,
                );
                self.spectral_multiply(&mut out, &h, false);
            }
            PropagatorKind::PolychromeAsp => {
                let h = self.kernels.polychrome_asp_transfer(
                    np,
                    params.zo,
                    &params.wavelengths(),
                    params.lp,
                    params.device,
                );
                self.spectral_multiply(&mut out, &h, false);
            }
            PropagatorKind::ScaledAsp => {
                let factors = self.kernels.scaled_asp_factors(
                    np,
                    params.zo,
                    params.wavelength,
                    params.dxo,
                    params.dxd,
                    params.scaled_asp_exact,
                    params.device,
                );
                self.scaled_forward(&mut out, &factors);
            }
            PropagatorKind::ScaledPolychromeAsp => {
                let factors = self.kernels.scaled_polychrome_factors(
                    np,
                    params.zo,
                    &params.wavelengths(),
                    params.dxo,
                    params.dxd,
                    params.scaled_asp_exact,
                    params.device,
                );
                self.scaled_forward(&mut out, &factors);
            }
            PropagatorKind::TwoStepPolychrome => {
                let kernels = self.kernels.two_step_kernels(
                    np,
                    params.zo,
                    &params.wavelengths(),
                    params.lp,
                    params.dxp,
                    params.device,
                );
                self.spectral_multiply(&mut out, &kernels.transfer, false);
                kernels.quad_phase.apply(&mut out, false);
                fft2c(&mut self.backend, &mut out, params.fftshift_switch);
            }
        }
        Ok(out)
    }

    /// Inverse transform of `field` under the configured model; the exact
    /// reverse of [`Self::forward`] for every model.
    pub fn inverse(
        &mut self,
        field: &FieldStack,
        params: &PropagationParams,
    ) -> Result<FieldStack, PropagationError> {
        check_validity(params)?;
        let np = field.shape().np;
        let mut out = field.clone();
        match params.propagator {
            PropagatorKind::Fraunhofer => {
                ifft2c(&mut self.backend, &mut out, params.fftshift_switch);
            }
            PropagatorKind::Fresnel => {
                let qp = self.kernels.quadratic_phase(
                    np,
                    params.zo,
                    params.wavelength,
                    params.dxp,
                    params.device,
                );
                ifft2c(&mut self.backend, &mut out, params.fftshift_switch);
                qp.apply(&mut out, true);
            }
            PropagatorKind::Asp => {
                let h = self.kernels.asp_transfer(
                    np,
                    params.zo,
                    params.wavelength,
                    params.lp,
                    params.device,
                );
                self.spectral_multiply(&mut out, &h, true);
            }
            PropagatorKind::PolychromeAsp => {
                let h = self.kernels.polychrome_asp_transfer(
                    np,
                    params.zo,
                    &params.wavelengths(),
                    params.lp,
                    params.device,
                );
                self.spectral_multiply(&mut out, &h, true);
            }
            PropagatorKind::ScaledAsp => {
                let factors = self.kernels.scaled_asp_factors(
                    np,
                    params.zo,
                    params.wavelength,
                    params.dxo,
                    params.dxd,
                    params.scaled_asp_exact,
                    params.device,
                );
                self.scaled_inverse(&mut out, &factors);
            }
            PropagatorKind::ScaledPolychromeAsp => {
                let factors = self.kernels.scaled_polychrome_factors(
                    np,
                    params.zo,
                    &params.wavelengths(),
                    params.dxo,
                    params.dxd,
                    params.scaled_asp_exact,
                    params.device,
                );
                self.scaled_inverse(&mut out, &factors);
            }
            PropagatorKind::TwoStepPolychrome => {
                let kernels = self.kernels.two_step_kernels(
                    np,
                    params.zo,
                    &params.wavelengths(),
                    params.lp,
                    params.dxp,
                    params.device,
                );
                ifft2c(&mut self.backend, &mut out, params.fftshift_switch);
                kernels.quad_phase.apply(&mut out, true);
                self.spectral_multiply(&mut out, &kernels.transfer, true);
            }
        }
        Ok(out)
    }

    /// `ifft2c(fft2c(field) · kernel)`, the angular-spectrum sandwich.
    fn spectral_multiply(&mut self, field: &mut FieldStack, kernel: &KernelStack, conjugate: bool) {
        fft2c(&mut self.backend, field, false);
        kernel.apply(field, conjugate);
        ifft2c(&mut self.backend, field, false);
    }

    fn scaled_forward(&mut self, field: &mut FieldStack, factors: &ScaledFactors) {
        factors.q1.apply(field, false);
        fft2c(&mut self.backend, field, false);
        factors.q2.apply(field, false);
        ifft2c(&mut self.backend, field, false);
        if let Some(q3) = &factors.q3 {
            q3.apply(field, false);
        }
    }

    fn scaled_inverse(&mut self, field: &mut FieldStack, factors: &ScaledFactors) {
        if let Some(q3) = &factors.q3 {
            q3.apply(field, true);
        }
        fft2c(&mut self.backend, field, false);
        factors.q2.apply(field, true);
        ifft2c(&mut self.backend, field, false);
        factors.q1.apply(field, true);
    }
}

fn check_validity(params: &PropagationParams) -> Result<(), PropagationError> {
    let kind = params.propagator;
    if kind.is_asp_family() && params.fftshift_switch {
        return Err(PropagationError::ShiftConventionUnsupported { kind });
    }
    let nlambda = params.effective_nlambda();
    if kind.is_monochromatic_only() && nlambda > 1 {
        return Err(PropagationError::MonochromaticOnly { kind, nlambda });
    }
    Ok(())
}
