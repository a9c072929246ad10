#![cfg(test)]

use super::error::PropagationError;
use super::params::{PropagationParams, PropagatorKind};

#[test]
fn names_round_trip_through_display_and_parse() {
    for kind in PropagatorKind::ALL {
        let parsed: PropagatorKind = kind.name().parse().unwrap();
        assert_eq!(parsed, kind);
        assert_eq!(kind.to_string(), kind.name());
    }
}

#[test]
fn unknown_names_are_a_configuration_error() {
    let err = "nearfield".parse::<PropagatorKind>().unwrap_err();
    assert_eq!(err, PropagationError::UnknownPropagator("nearfield".into()));
    // parsing is case sensitive, matching the published model names
    assert!("fraunhofer".parse::<PropagatorKind>().is_err());
}

#[test]
fn model_families_are_classified_correctly() {
    use PropagatorKind::*;
    for kind in [Asp, PolychromeAsp, ScaledAsp, ScaledPolychromeAsp, TwoStepPolychrome] {
        assert!(kind.is_asp_family(), "{kind}");
    }
    for kind in [Fraunhofer, Fresnel] {
        assert!(!kind.is_asp_family(), "{kind}");
    }
    assert!(Asp.is_monochromatic_only());
    assert!(ScaledAsp.is_monochromatic_only());
    assert!(!PolychromeAsp.is_monochromatic_only());
}

fn base_params() -> PropagationParams {
    PropagationParams {
        propagator: PropagatorKind::Asp,
        fftshift_switch: false,
        device: Default::default(),
        zo: 1e-4,
        wavelength: 500e-9,
        spectral_density: None,
        np: 16,
        lp: 1e-3,
        dxp: 1e-5,
        dxo: 1e-5,
        dxd: 1e-5,
        nlambda: 1,
        nosm: 1,
        npsm: 1,
        nslice: 1,
        scaled_asp_exact: false,
    }
}

#[test]
fn wavelengths_fall_back_to_the_design_wavelength() {
    let mut p = base_params();
    assert_eq!(p.wavelengths(), vec![500e-9]);
    assert_eq!(p.effective_nlambda(), 1);

    p.spectral_density = Some(vec![]);
    assert_eq!(p.wavelengths(), vec![500e-9]);

    p.spectral_density = Some(vec![450e-9, 550e-9]);
    assert_eq!(p.wavelengths().len(), 2);
    assert_eq!(p.effective_nlambda(), 2);
}

#[test]
fn field_shape_sizes_the_wavelength_axis_from_the_spectrum() {
    let mut p = base_params();
    p.spectral_density = Some(vec![450e-9, 500e-9, 550e-9]);
    p.npsm = 2;
    let shape = p.field_shape();
    assert_eq!(shape.nlambda, 3);
    assert_eq!(shape.planes(), 6);
    assert_eq!(shape.np, 16);
}
