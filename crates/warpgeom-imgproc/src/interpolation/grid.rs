use warpgeom_tensor::{Device, Tensor4};

use crate::error::WarpError;

// linspace over `num` samples, endpoints inclusive. A single sample
// collapses to `start`.
fn linspace(start: f32, end: f32, num: usize) -> Vec<f32> {
    if num == 1 {
        return vec![start];
    }
    let step = (end - start) / (num - 1) as f32;
    (0..num).map(|i| start + step * i as f32).collect()
}

/// Create a coordinate grid for an image of the given height and width.
///
/// The grid has shape (1, height, width, 2) and entry (0, y, x) holds the
/// coordinate pair for destination pixel (y, x). Pairs are stored as
/// (x, y) with the horizontal coordinate first, even though the mesh is
/// built row-major with y as the outer axis; downstream consumers
/// (point transforms and the resampler) expect that ordering, so the axis
/// swap happens here and nowhere else.
///
/// With `normalized_coordinates` the x axis spans [-1, 1] over `width`
/// samples and the y axis spans [-1, 1] over `height` samples, endpoints
/// inclusive, consistent with the resampler's normalized space. An axis
/// with a single sample collapses to -1. Without it, coordinates are pixel
/// centers 0..width-1 and 0..height-1.
///
/// # Errors
///
/// Returns [`WarpError::InvalidGridSize`] if either dimension is zero.
///
/// # Example
///
/// ```
/// use warpgeom_imgproc::interpolation::create_meshgrid;
///
/// let grid = create_meshgrid(2, 3, true).unwrap();
/// assert_eq!(grid.shape, [1, 2, 3, 2]);
/// // top-right corner: x = 1, y = -1
/// assert_eq!(grid.get([0, 0, 2, 0]), Some(&1.0));
/// assert_eq!(grid.get([0, 0, 2, 1]), Some(&-1.0));
/// ```
pub fn create_meshgrid(
    height: usize,
    width: usize,
    normalized_coordinates: bool,
) -> Result<Tensor4<f32>, WarpError> {
    if height == 0 || width == 0 {
        return Err(WarpError::InvalidGridSize { height, width });
    }

    let (xs, ys) = if normalized_coordinates {
        (linspace(-1.0, 1.0, width), linspace(-1.0, 1.0, height))
    } else {
        (
            linspace(0.0, (width - 1) as f32, width),
            linspace(0.0, (height - 1) as f32, height),
        )
    };

    let mut data = Vec::with_capacity(height * width * 2);
    for y in ys.iter() {
        for x in xs.iter() {
            data.push(*x);
            data.push(*y);
        }
    }

    let grid = Tensor4::from_shape_vec([1, height, width, 2], data, Device::Cpu)?;
    Ok(grid)
}
