#![cfg(test)]

use num_complex::Complex64;

use super::field::{FieldShape, FieldStack};

#[test]
fn shape_counts_planes_and_samples() {
    let shape = FieldShape::new(2, 3, 4, 5, 8);
    assert_eq!(shape.planes(), 120);
    assert_eq!(shape.planes_per_wavelength(), 60);
    assert_eq!(shape.plane_len(), 64);
    assert_eq!(shape.len(), 120 * 64);
}

#[test]
fn single_shape_is_one_plane() {
    let shape = FieldShape::single(16);
    assert_eq!(shape.planes(), 1);
    assert_eq!(shape.len(), 256);
}

#[test]
fn plane_index_is_row_major_over_the_mode_axes() {
    let shape = FieldShape::new(2, 2, 3, 2, 4);
    assert_eq!(shape.plane_index(0, 0, 0, 0), 0);
    assert_eq!(shape.plane_index(0, 0, 0, 1), 1);
    assert_eq!(shape.plane_index(0, 0, 1, 0), 2);
    assert_eq!(shape.plane_index(0, 1, 0, 0), 6);
    assert_eq!(shape.plane_index(1, 0, 0, 0), 12);
    assert_eq!(shape.plane_index(1, 1, 2, 1), 23);
}

#[test]
#[should_panic(expected = "mode counts must be non-zero")]
fn zero_mode_count_is_rejected() {
    FieldShape::new(1, 0, 1, 1, 8);
}

#[test]
fn zeros_and_filled_construct_the_right_length() {
    let shape = FieldShape::new(1, 1, 2, 1, 4);
    let zeros = FieldStack::zeros(shape);
    assert_eq!(zeros.as_slice().len(), 32);
    assert!(zeros.as_slice().iter().all(|v| *v == Complex64::default()));

    let ones = FieldStack::filled(shape, Complex64::new(1.0, 0.0));
    assert!((ones.norm_sqr() - 32.0).abs() < 1e-12);
}

#[test]
#[should_panic(expected = "data length must match shape")]
fn from_vec_checks_the_length() {
    FieldStack::from_vec(FieldShape::single(4), vec![Complex64::default(); 7]);
}

#[test]
fn planes_are_disjoint_views_in_stack_order() {
    let shape = FieldShape::new(1, 1, 3, 1, 2);
    let mut field = FieldStack::zeros(shape);
    for (i, plane) in field.planes_mut().enumerate() {
        for value in plane.iter_mut() {
            *value = Complex64::new(i as f64, 0.0);
        }
    }
    for i in 0..3 {
        assert!(field
            .plane(i)
            .iter()
            .all(|v| *v == Complex64::new(i as f64, 0.0)));
    }
    field.plane_mut(1)[0] = Complex64::new(9.0, 0.0);
    assert_eq!(field.plane(1)[0], Complex64::new(9.0, 0.0));
    assert_eq!(field.plane(0)[0], Complex64::new(0.0, 0.0));
}

#[test]
fn wavelength_of_plane_follows_the_leading_axis() {
    let shape = FieldShape::new(3, 1, 2, 1, 2);
    let field = FieldStack::zeros(shape);
    assert_eq!(field.wavelength_of_plane(0), 0);
    assert_eq!(field.wavelength_of_plane(1), 0);
    assert_eq!(field.wavelength_of_plane(2), 1);
    assert_eq!(field.wavelength_of_plane(5), 2);
}
