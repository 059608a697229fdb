use num_traits::Zero;
use thiserror::Error;

use crate::device::Device;

/// An error type for tensor operations.
#[derive(Error, Debug, PartialEq)]
pub enum TensorError {
    /// Tensor shape does not match the provided data.
    ///
    /// The product of the shape dimensions must equal the number of elements
    /// in the data exactly.
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// Tensor dimensions incompatible for the requested operation.
    ///
    /// Raised by operations that require specific dimension relationships,
    /// such as batched matrix application or broadcasting.
    #[error("Dimension mismatch: {message}. Expected shape: {expected}, got: {actual}")]
    DimensionMismatch {
        /// Human-readable description of the mismatch
        message: String,
        /// Expected shape description
        expected: String,
        /// Actual shape description
        actual: String,
    },
}

impl TensorError {
    /// Creates an InvalidShape error with clear context.
    pub fn invalid_shape(expected: usize, actual: usize) -> Self {
        Self::InvalidShape { expected, actual }
    }

    /// Creates a DimensionMismatch error with formatted shapes.
    pub fn dimension_mismatch(
        message: impl Into<String>,
        expected: &[usize],
        actual: &[usize],
    ) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }
}

/// Computes the strides for a row-major (C-contiguous) tensor layout.
///
/// For row-major layout the rightmost dimension has stride 1, and each
/// dimension's stride is the product of all dimensions to its right.
///
/// # Examples
///
/// ```rust
/// use warpgeom_tensor::tensor::get_strides_from_shape;
///
/// let strides = get_strides_from_shape([2, 3]);
/// assert_eq!(strides, [3, 1]);
///
/// let strides = get_strides_from_shape([2, 3, 4]);
/// assert_eq!(strides, [12, 4, 1]);
/// ```
pub fn get_strides_from_shape<const N: usize>(shape: [usize; N]) -> [usize; N] {
    let mut strides: [usize; N] = [0; N];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// A multi-dimensional array (tensor) with owned data and an explicit device.
///
/// `Tensor` combines a contiguous data buffer, shape information, row-major
/// strides, and the compute context ([`Device`]) the value is bound to.
/// The dimensionality is checked at compile time through the `N` const
/// generic.
///
/// Storage is host-resident; the device field is the context binding that
/// operations validate when two tensors meet.
///
/// # Examples
///
/// ```rust
/// use warpgeom_tensor::{Device, Tensor2};
///
/// let data: Vec<u8> = vec![1, 2, 3, 4];
/// let t = Tensor2::from_shape_vec([2, 2], data, Device::Cpu).unwrap();
/// assert_eq!(t.shape, [2, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct Tensor<T, const N: usize> {
    data: Vec<T>,
    /// The shape of the tensor.
    pub shape: [usize; N],
    /// The strides of the tensor data in memory.
    pub strides: [usize; N],
    device: Device,
}

impl<T, const N: usize> Tensor<T, N> {
    /// Creates a new `Tensor` with the given shape and data.
    ///
    /// # Arguments
    ///
    /// * `shape` - An array containing the shape of the tensor.
    /// * `data` - A vector containing the data of the tensor.
    /// * `device` - The compute context the tensor is bound to.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape of the
    /// tensor, an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use warpgeom_tensor::{Device, Tensor2};
    ///
    /// let data: Vec<u8> = vec![1, 2, 3, 4];
    /// let t = Tensor2::from_shape_vec([2, 2], data, Device::Cpu).unwrap();
    /// assert_eq!(t.shape, [2, 2]);
    /// ```
    pub fn from_shape_vec(shape: [usize; N], data: Vec<T>, device: Device) -> Result<Self, TensorError> {
        let numel = shape.iter().product::<usize>();
        if numel != data.len() {
            return Err(TensorError::invalid_shape(numel, data.len()));
        }
        let strides = get_strides_from_shape(shape);
        Ok(Self {
            data,
            shape,
            strides,
            device,
        })
    }

    /// Creates a new `Tensor` filled with the given value.
    pub fn from_shape_val(shape: [usize; N], value: T, device: Device) -> Self
    where
        T: Clone,
    {
        let numel = shape.iter().product::<usize>();
        let strides = get_strides_from_shape(shape);
        Self {
            data: vec![value; numel],
            shape,
            strides,
            device,
        }
    }

    /// Creates a new `Tensor` filled with zeros.
    pub fn zeros(shape: [usize; N], device: Device) -> Self
    where
        T: Zero + Clone,
    {
        Self::from_shape_val(shape, T::zero(), device)
    }

    /// Creates a new `Tensor` where each element is produced from its index.
    ///
    /// Elements are generated in row-major order.
    ///
    /// # Example
    ///
    /// ```
    /// use warpgeom_tensor::{Device, Tensor2};
    ///
    /// let eye = Tensor2::from_shape_fn([3, 3], Device::Cpu, |[i, j]| {
    ///     if i == j { 1.0f32 } else { 0.0 }
    /// });
    /// assert_eq!(eye.get([1, 1]), Some(&1.0));
    /// assert_eq!(eye.get([1, 2]), Some(&0.0));
    /// ```
    pub fn from_shape_fn<F>(shape: [usize; N], device: Device, f: F) -> Self
    where
        F: Fn([usize; N]) -> T,
    {
        let numel = shape.iter().product::<usize>();
        let strides = get_strides_from_shape(shape);
        let mut data = Vec::with_capacity(numel);
        for flat in 0..numel {
            let mut index = [0; N];
            let mut rem = flat;
            for (i, s) in strides.iter().enumerate() {
                index[i] = rem / s;
                rem %= s;
            }
            data.push(f(index));
        }
        Self {
            data,
            shape,
            strides,
            device,
        }
    }

    /// Get the data of the tensor as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the data of the tensor as a mutable slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the tensor and returns the underlying vector.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns the total number of elements in the tensor.
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Returns the device the tensor is bound to.
    #[inline]
    pub fn device(&self) -> Device {
        self.device
    }

    /// Returns a reference to the element at the given index, if in bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use warpgeom_tensor::{Device, Tensor2};
    ///
    /// let t = Tensor2::from_shape_vec([2, 2], vec![1, 2, 3, 4], Device::Cpu).unwrap();
    /// assert_eq!(t.get([1, 0]), Some(&3));
    /// assert_eq!(t.get([2, 0]), None);
    /// ```
    pub fn get(&self, index: [usize; N]) -> Option<&T> {
        for (i, &idx) in index.iter().enumerate() {
            if idx >= self.shape[i] {
                return None;
            }
        }
        let offset = index
            .iter()
            .zip(self.strides.iter())
            .fold(0, |acc, (&idx, &stride)| acc + idx * stride);
        self.data.get(offset)
    }

    /// Binds a copy of the tensor to a different compute context.
    ///
    /// Storage is host-backed, so the transfer copies the buffer and changes
    /// the context binding.
    pub fn to_device(&self, device: Device) -> Self
    where
        T: Clone,
    {
        Self {
            data: self.data.clone(),
            shape: self.shape,
            strides: self.strides,
            device,
        }
    }

    /// Reshapes the tensor to a new dimensionality with the same element count.
    ///
    /// The data buffer is reused; only shape and strides change. Flattening
    /// is row-major, so `(1, H, W, 2)` reshaped to `(1, H*W, 2)` enumerates
    /// grid entries row by row.
    ///
    /// # Errors
    ///
    /// If the new shape does not cover the same number of elements, an error
    /// is returned.
    pub fn reshape<const M: usize>(self, shape: [usize; M]) -> Result<Tensor<T, M>, TensorError> {
        let numel = shape.iter().product::<usize>();
        if numel != self.data.len() {
            return Err(TensorError::invalid_shape(numel, self.data.len()));
        }
        let strides = get_strides_from_shape(shape);
        Ok(Tensor {
            data: self.data,
            shape,
            strides,
            device: self.device,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_row_major() {
        assert_eq!(get_strides_from_shape([4]), [1]);
        assert_eq!(get_strides_from_shape([2, 3, 4]), [12, 4, 1]);
    }

    #[test]
    fn from_shape_vec_checks_len() {
        let res = Tensor::<u8, 2>::from_shape_vec([2, 3], vec![0; 5], Device::Cpu);
        assert_eq!(res.unwrap_err(), TensorError::invalid_shape(6, 5));
    }

    #[test]
    fn zeros_and_get() {
        let t = Tensor::<f32, 3>::zeros([2, 2, 2], Device::Cpu);
        assert_eq!(t.numel(), 8);
        assert_eq!(t.get([1, 1, 1]), Some(&0.0));
        assert_eq!(t.get([1, 1, 2]), None);
    }

    #[test]
    fn reshape_roundtrip() -> Result<(), TensorError> {
        let t = Tensor::<i32, 2>::from_shape_vec([2, 3], vec![1, 2, 3, 4, 5, 6], Device::Cpu)?;
        let t = t.reshape([6])?;
        assert_eq!(t.shape, [6]);
        assert_eq!(t.as_slice(), &[1, 2, 3, 4, 5, 6]);
        let t = t.reshape([3, 2])?;
        assert_eq!(t.get([2, 1]), Some(&6));
        Ok(())
    }

    #[test]
    fn reshape_invalid() {
        let t = Tensor::<i32, 1>::from_shape_vec([4], vec![1, 2, 3, 4], Device::Cpu).unwrap();
        assert!(t.reshape([3, 2]).is_err());
    }

    #[test]
    fn from_shape_fn_row_major() {
        let t = Tensor::<usize, 2>::from_shape_fn([2, 3], Device::Cpu, |[i, j]| i * 10 + j);
        assert_eq!(t.as_slice(), &[0, 1, 2, 10, 11, 12]);
    }

    #[test]
    fn to_device_rebinds() {
        let t = Tensor::<f32, 1>::from_shape_vec([2], vec![1.0, 2.0], Device::Cpu).unwrap();
        let t_cuda = t.to_device(Device::cuda(1));
        assert_eq!(t_cuda.device(), Device::Cuda { device_id: 1 });
        assert_eq!(t_cuda.as_slice(), t.as_slice());
    }
}
