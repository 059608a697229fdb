use warpgeom_tensor::{Tensor4, TensorError};

use super::interpolate::{interpolate_pixel, InterpolationMode, PaddingMode};
use crate::error::WarpError;
use crate::parallel;

/// Resample a batched image at the locations of a normalized sampling grid.
///
/// # Arguments
///
/// * `src` - The input images with shape (batch, channels, height, width).
/// * `grid` - The sampling grid with shape (batch, out_height, out_width, 2),
///   holding (x, y) pairs normalized to [-1, 1] with the endpoints mapping to
///   the first and last pixel center of each axis.
/// * `interpolation` - The interpolation mode to use.
/// * `padding` - The boundary policy for samples outside [-1, 1].
///
/// # Returns
///
/// The resampled images with shape (batch, channels, out_height, out_width).
///
/// Grid values outside the normalized range are handled per `padding`:
/// [`PaddingMode::Zeros`] fills from zero, [`PaddingMode::Border`] clamps to
/// the nearest edge pixel. Non-finite grid values read as zero.
///
/// # Errors
///
/// The grid batch must match the image batch, the grid's last dimension must
/// be 2, the image planes must be non-empty, and both operands must live in
/// the same compute context.
pub fn grid_sample(
    src: &Tensor4<f32>,
    grid: &Tensor4<f32>,
    interpolation: InterpolationMode,
    padding: PaddingMode,
) -> Result<Tensor4<f32>, WarpError> {
    if src.device() != grid.device() {
        return Err(WarpError::DeviceMismatch {
            expected: src.device(),
            found: grid.device(),
        });
    }

    let [batch, channels, rows, cols] = src.shape;
    let [grid_batch, out_rows, out_cols, two] = grid.shape;

    if two != 2 {
        return Err(TensorError::dimension_mismatch(
            "sampling grid entries must be (x, y) pairs",
            &[grid_batch, out_rows, out_cols, 2],
            &grid.shape,
        )
        .into());
    }
    if grid_batch != batch {
        return Err(TensorError::dimension_mismatch(
            "sampling grid batch must match the image batch",
            &[batch, out_rows, out_cols, 2],
            &grid.shape,
        )
        .into());
    }
    if rows == 0 || cols == 0 {
        return Err(TensorError::dimension_mismatch(
            "source image planes must be non-empty",
            &[batch, channels, 1, 1],
            &src.shape,
        )
        .into());
    }

    let mut dst = Tensor4::zeros([batch, channels, out_rows, out_cols], src.device());
    if out_rows == 0 || out_cols == 0 {
        return Ok(dst);
    }

    let src_slice = src.as_slice();
    let plane_len = rows * cols;

    parallel::par_iter_rows_sample(
        dst.as_slice_mut(),
        grid.as_slice(),
        channels,
        out_rows,
        out_cols,
        |b, c, grid_row, dst_row| {
            let plane = &src_slice[(b * channels + c) * plane_len..][..plane_len];
            for (xy, px) in grid_row.chunks_exact(2).zip(dst_row.iter_mut()) {
                // unnormalize so [-1, 1] spans the pixel centers of each axis
                let u = (xy[0] + 1.0) * 0.5 * (cols - 1) as f32;
                let v = (xy[1] + 1.0) * 0.5 * (rows - 1) as f32;
                *px = interpolate_pixel(plane, rows, cols, u, v, interpolation, padding);
            }
        },
    );

    Ok(dst)
}
