use thiserror::Error;
use warpgeom_tensor::{Device, TensorError};

/// An error type for the warping operators.
#[derive(Error, Debug, PartialEq)]
pub enum WarpError {
    /// Error when the requested grid dimensions are not positive.
    #[error("invalid grid size {height}x{width}, both sides must be positive")]
    InvalidGridSize {
        /// Requested grid height
        height: usize,
        /// Requested grid width
        width: usize,
    },

    /// Error when an explicit point set is not homogeneous with 3 rows.
    #[error("explicit point set must have shape (3, N), got ({rows}, {cols})")]
    InvalidPointSet {
        /// Number of rows in the provided point set
        rows: usize,
        /// Number of columns in the provided point set
        cols: usize,
    },

    /// Error when a region of interest does not fit inside the source image.
    #[error(
        "roi y:[{y_start}, {y_end}) x:[{x_start}, {x_end}) out of bounds for image of size {height}x{width}"
    )]
    RoiOutOfBounds {
        /// First row of the region
        y_start: usize,
        /// One past the last row of the region
        y_end: usize,
        /// First column of the region
        x_start: usize,
        /// One past the last column of the region
        x_end: usize,
        /// Height of the source image
        height: usize,
        /// Width of the source image
        width: usize,
    },

    /// Error when two operands live in different compute contexts.
    ///
    /// The core never migrates data between contexts; the caller must place
    /// both operands in the same one.
    #[error("operands must be in the same compute context, got {expected} and {found}")]
    DeviceMismatch {
        /// Context of the first operand
        expected: Device,
        /// Context of the second operand
        found: Device,
    },

    /// Error from the underlying tensor operations.
    #[error(transparent)]
    Tensor(#[from] TensorError),
}
