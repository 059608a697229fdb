//! Pixel interpolation and grid resampling.
//!
//! This module provides the sampling machinery the warping operators are
//! built on: coordinate meshgrids, per-pixel interpolation kernels, and the
//! batched [`grid_sample`] resampling primitive.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: Fastest, uses nearest pixel value (no interpolation)
//! - **Bilinear**: Smooth linear interpolation between adjacent pixels
//!
//! # Padding Modes
//!
//! - **Zeros**: out-of-range samples fill with zero for every channel
//! - **Border**: sampling coordinates clamp to the nearest in-range edge

mod bilinear;

/// Grid generation utilities for image warping.
pub mod grid;

pub(crate) mod interpolate;
mod nearest;
mod sample;

pub use grid::create_meshgrid;
pub use interpolate::{interpolate_pixel, InterpolationMode, PaddingMode};
pub use sample::grid_sample;
