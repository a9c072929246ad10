//! Centered coordinate and spatial-frequency grid helpers.

/// Centered sample index, matching `arange(-N/2, N/2)`.
#[inline]
pub fn centered_index(i: usize, n: usize) -> f64 {
    i as f64 - n as f64 / 2.0
}

/// Real-space coordinates of an `n`-sample axis with spacing `dx`.
pub fn spatial_axis(n: usize, dx: f64) -> Vec<f64> {
    (0..n).map(|i| centered_index(i, n) * dx).collect()
}

/// Spatial-frequency coordinates of an `n`-sample axis spanning total size `l`.
pub fn frequency_axis(n: usize, l: f64) -> Vec<f64> {
    (0..n).map(|i| centered_index(i, n) / l).collect()
}

/// Circular aperture test: `true` strictly inside a circle of diameter `d`.
#[inline]
pub fn inside_circle(x: f64, y: f64, d: f64) -> bool {
    let r = d / 2.0;
    x * x + y * y < r * r
}
