//! Core wavefield propagation math and APIs for ptychographic reconstruction.

pub mod backend;
pub mod cache;
pub mod error;
pub mod factory;
pub mod field;
pub mod fourier;
pub mod grid;
pub mod kernel;
pub mod params;
pub mod propagator;

#[cfg(test)]
mod _tests_cache;
#[cfg(test)]
mod _tests_field;
#[cfg(test)]
mod _tests_params;
