#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `warpgeom-tensor` provides the small, batched multi-dimensional array type
//! the warping operators are built on. A tensor owns a contiguous row-major
//! buffer, carries its shape and strides, and is bound to an explicit
//! compute context ([`Device`]).
//!
//! The device is an ordinary runtime field rather than an implicit property
//! of the storage: operations that combine two tensors compare the bindings
//! up front and fail loudly on a mismatch instead of silently migrating
//! data. Only the CPU backend computes; non-CPU variants exist so callers
//! (and tests) can track foreign contexts at API boundaries.
//!
//! # Quick Start
//!
//! ```rust
//! use warpgeom_tensor::{Device, Tensor2};
//!
//! let data = vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let tensor = Tensor2::from_shape_vec([2, 3], data, Device::Cpu).unwrap();
//!
//! assert_eq!(tensor.get([0, 0]), Some(&1.0));
//! assert_eq!(tensor.get([1, 2]), Some(&6.0));
//!
//! let reshaped = tensor.reshape([3, 2]).unwrap();
//! assert_eq!(reshaped.shape, [3, 2]);
//! ```

/// Device module containing the compute-context abstraction.
pub mod device;

/// Tensor module containing the main tensor implementation and error types.
pub mod tensor;

pub use crate::device::Device;
pub use crate::tensor::{Tensor, TensorError};

/// Type alias for a 1-dimensional tensor.
pub type Tensor1<T> = Tensor<T, 1>;

/// Type alias for a 2-dimensional tensor.
pub type Tensor2<T> = Tensor<T, 2>;

/// Type alias for a 3-dimensional tensor.
pub type Tensor3<T> = Tensor<T, 3>;

/// Type alias for a 4-dimensional tensor.
pub type Tensor4<T> = Tensor<T, 4>;
