//! Homogeneous-coordinate point transforms.
//!
//! Points are batched as (batch, N, dims) tensors. The conversion helpers
//! move between Euclidean and homogeneous representations; the projective
//! application lives in [`transform_points`].

use warpgeom_tensor::{Tensor3, TensorError};

use crate::error::WarpError;

/// Append a homogeneous scale component of 1.0 to every point.
///
/// Converts a (batch, N, D) point set into (batch, N, D+1).
///
/// # Example
///
/// ```
/// use warpgeom_imgproc::conversions::convert_points_to_homogeneous;
/// use warpgeom_tensor::{Device, Tensor3};
///
/// let points = Tensor3::from_shape_vec([1, 2, 2], vec![0.0f32, 1.0, 2.0, 3.0], Device::Cpu).unwrap();
/// let points_h = convert_points_to_homogeneous(&points).unwrap();
/// assert_eq!(points_h.shape, [1, 2, 3]);
/// assert_eq!(points_h.as_slice(), &[0.0, 1.0, 1.0, 2.0, 3.0, 1.0]);
/// ```
pub fn convert_points_to_homogeneous(points: &Tensor3<f32>) -> Result<Tensor3<f32>, WarpError> {
    let [batch, n, dims] = points.shape;
    if dims == 0 {
        return Err(TensorError::dimension_mismatch(
            "points must have at least one coordinate",
            &[batch, n, 1],
            &points.shape,
        )
        .into());
    }

    let mut data = Vec::with_capacity(batch * n * (dims + 1));
    for point in points.as_slice().chunks_exact(dims) {
        data.extend_from_slice(point);
        data.push(1.0);
    }

    let points_h = Tensor3::from_shape_vec([batch, n, dims + 1], data, points.device())?;
    Ok(points_h)
}

/// Drop the homogeneous scale component of every point.
///
/// Converts a (batch, N, D+1) point set into (batch, N, D) by returning the
/// first D components as-is. No perspective division happens here; the
/// projective operations divide before calling this.
pub fn convert_points_from_homogeneous(points: &Tensor3<f32>) -> Result<Tensor3<f32>, WarpError> {
    let [batch, n, dims] = points.shape;
    if dims < 2 {
        return Err(TensorError::dimension_mismatch(
            "homogeneous points need a scale component and at least one coordinate",
            &[batch, n, 2],
            &points.shape,
        )
        .into());
    }

    let mut data = Vec::with_capacity(batch * n * (dims - 1));
    for point in points.as_slice().chunks_exact(dims) {
        data.extend_from_slice(&point[..dims - 1]);
    }

    let points_e = Tensor3::from_shape_vec([batch, n, dims - 1], data, points.device())?;
    Ok(points_e)
}

/// Apply a batch of projective transforms to a batch of 2d point sets.
///
/// Each point is converted to homogeneous coordinates, multiplied by its
/// 3x3 transform, perspective-divided by the resulting scale component, and
/// returned as a 2d point. The batch dimensions broadcast: either operand
/// may carry a batch of 1 and is reused across the other's batch.
///
/// The perspective division is deliberately unguarded: a transform that
/// sends a point to (near-)infinity produces IEEE infinities or NaNs in the
/// output rather than an error, since there is no principled finite value to
/// substitute.
///
/// # Arguments
///
/// * `trafo` - The projective transforms with shape (batch, 3, 3).
/// * `points` - The points to transform with shape (batch, N, 2).
///
/// # Returns
///
/// The transformed points with shape (batch, N, 2), bound to the
/// transform's compute context.
///
/// # Errors
///
/// Both operands must live in the same compute context and the batch
/// dimensions must broadcast.
pub fn transform_points(
    trafo: &Tensor3<f32>,
    points: &Tensor3<f32>,
) -> Result<Tensor3<f32>, WarpError> {
    if trafo.device() != points.device() {
        return Err(WarpError::DeviceMismatch {
            expected: trafo.device(),
            found: points.device(),
        });
    }

    let [trafo_batch, rows, cols] = trafo.shape;
    if rows != 3 || cols != 3 {
        return Err(TensorError::dimension_mismatch(
            "transform must be a batch of 3x3 matrices",
            &[trafo_batch, 3, 3],
            &trafo.shape,
        )
        .into());
    }

    let [points_batch, n, dims] = points.shape;
    if dims != 2 {
        return Err(TensorError::dimension_mismatch(
            "points must be batched 2d coordinates",
            &[points_batch, n, 2],
            &points.shape,
        )
        .into());
    }

    if trafo_batch != points_batch && trafo_batch != 1 && points_batch != 1 {
        return Err(TensorError::dimension_mismatch(
            "batch dimensions are not broadcastable",
            &trafo.shape,
            &points.shape,
        )
        .into());
    }
    let batch = if trafo_batch == 1 {
        points_batch
    } else {
        trafo_batch
    };

    let points_h = convert_points_to_homogeneous(points)?;

    let m = trafo.as_slice();
    let p = points_h.as_slice();

    let mut data = Vec::with_capacity(batch * n * 3);
    for b in 0..batch {
        let mb = &m[if trafo_batch == 1 { 0 } else { b * 9 }..][..9];
        let pb = &p[if points_batch == 1 { 0 } else { b * n * 3 }..][..n * 3];
        for q in pb.chunks_exact(3) {
            let x = mb[0] * q[0] + mb[1] * q[1] + mb[2] * q[2];
            let y = mb[3] * q[0] + mb[4] * q[1] + mb[5] * q[2];
            let w = mb[6] * q[0] + mb[7] * q[1] + mb[8] * q[2];
            data.push(x / w);
            data.push(y / w);
            data.push(w / w);
        }
    }

    let transformed = Tensor3::from_shape_vec([batch, n, 3], data, trafo.device())?;
    convert_points_from_homogeneous(&transformed)
}
