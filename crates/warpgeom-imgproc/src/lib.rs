#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! The pipeline is a pure, synchronous pair of stages: a warper transforms
//! its fixed template grid by a batch of homographies, then drives the
//! [`interpolation::grid_sample`] resampling primitive to read the source
//! image at the transformed locations. Sampling rows may run in parallel
//! internally; no ordering is observable.

/// homogeneous-coordinate point transform module.
pub mod conversions;

/// error types for the warping operators.
pub mod error;

/// utilities for interpolation and grid resampling.
pub mod interpolation;

/// module containing parallelization utilities.
pub mod parallel;

/// image geometric transformations module.
pub mod warp;

pub use error::WarpError;
