use log::debug;

use warpgeom_tensor::{Tensor2, Tensor3, Tensor4, TensorError};

use crate::conversions::transform_points;
use crate::error::WarpError;
use crate::interpolation::{create_meshgrid, grid_sample, InterpolationMode, PaddingMode};

/// Axis-aligned pixel sub-rectangle of a source image.
///
/// Row and column ends are exclusive, matching the usual slicing convention;
/// the geometry below works with the inclusive last pixel to stay consistent
/// with pixel-center coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roi {
    /// First row of the region
    pub y_start: usize,
    /// One past the last row of the region
    pub y_end: usize,
    /// First column of the region
    pub x_start: usize,
    /// One past the last column of the region
    pub x_end: usize,
}

/// Template sampling grid owned by a warper.
///
/// The two construction modes are kept as distinct variants so no code has
/// to infer the mode from incidental field values.
#[derive(Debug, Clone)]
enum TemplateGrid {
    /// Full-image mode: normalized meshgrid flattened to (1, H*W, 2).
    Full(Tensor3<f32>),
    /// Explicit-points mode: homogeneous points of shape (3, N), used as-is.
    Points(Tensor2<f32>),
}

/// Warps image patches by homographies.
///
/// The warper owns an immutable template grid in normalized [-1, 1] space,
/// built once at construction. Every warp applies a batch of homographies
/// to that template and resamples the source at the transformed locations,
/// so the output always has the warper's height and width regardless of the
/// input patch size. The template is read-only after construction and can
/// be shared by concurrent calls.
///
/// # Example
///
/// ```
/// use warpgeom_imgproc::interpolation::PaddingMode;
/// use warpgeom_imgproc::warp::HomographyWarper;
/// use warpgeom_tensor::{Device, Tensor3, Tensor4};
///
/// let patch = Tensor4::from_shape_val([1, 3, 32, 32], 0.5f32, Device::Cpu);
/// let homography = Tensor3::from_shape_fn([1, 3, 3], Device::Cpu, |[_, i, j]| {
///     if i == j { 1.0 } else { 0.0 }
/// });
///
/// let warper = HomographyWarper::new(32, 32).unwrap();
/// let warped = warper.warp(&patch, &homography, PaddingMode::Zeros).unwrap();
/// assert_eq!(warped.shape, [1, 3, 32, 32]);
/// ```
#[derive(Debug, Clone)]
pub struct HomographyWarper {
    height: usize,
    width: usize,
    grid: TemplateGrid,
}

impl HomographyWarper {
    /// Creates a warper producing `height` x `width` outputs.
    ///
    /// The template grid is the full normalized meshgrid of that size,
    /// flattened row-major to (1, H*W, 2).
    ///
    /// # Errors
    ///
    /// Returns [`WarpError::InvalidGridSize`] if either dimension is zero.
    pub fn new(height: usize, width: usize) -> Result<Self, WarpError> {
        let grid = create_meshgrid(height, width, true)?;
        let grid = grid.reshape([1, height * width, 2])?;
        debug!("created {}x{} base grid for homography warps", height, width);
        Ok(Self {
            height,
            width,
            grid: TemplateGrid::Full(grid),
        })
    }

    /// Creates a warper sampling at an explicit homogeneous point set.
    ///
    /// `points` has shape (3, N) in normalized [-1, 1] image space and is
    /// used as-is instead of a regenerated meshgrid, for sparse or
    /// non-rectangular sampling. The warper's output is a single row of N
    /// samples.
    ///
    /// # Errors
    ///
    /// Returns [`WarpError::InvalidPointSet`] if the first dimension is
    /// not 3.
    pub fn from_points(points: Tensor2<f32>) -> Result<Self, WarpError> {
        let [rows, count] = points.shape;
        if rows != 3 {
            return Err(WarpError::InvalidPointSet { rows, cols: count });
        }
        Ok(Self {
            height: 1,
            width: count,
            grid: TemplateGrid::Points(points),
        })
    }

    /// Height of the warped output.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Width of the warped output.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Transforms the template grid by a batch of homographies.
    ///
    /// # Arguments
    ///
    /// * `homography` - The homographies with shape (batch, 3, 3).
    ///
    /// # Returns
    ///
    /// The transformed sampling locations in normalized image space with
    /// shape (batch, height, width, 2), bound to the homography's compute
    /// context. The template itself is never mutated; the result is
    /// deterministic given the homography batch.
    pub fn warp_grid(&self, homography: &Tensor3<f32>) -> Result<Tensor4<f32>, WarpError> {
        let [batch, rows, cols] = homography.shape;
        if rows != 3 || cols != 3 {
            return Err(TensorError::dimension_mismatch(
                "homography must be a batch of 3x3 matrices",
                &[batch, 3, 3],
                &homography.shape,
            )
            .into());
        }

        match &self.grid {
            TemplateGrid::Full(grid) => {
                // the template carries a leading batch of 1 and broadcasts
                // against the homography batch inside transform_points
                let template = grid.to_device(homography.device());
                let flow = transform_points(homography, &template)?;
                let grid = flow.reshape([batch, self.height, self.width, 2])?;
                Ok(grid)
            }
            TemplateGrid::Points(points) => {
                let [_, count] = points.shape;
                let m = homography.as_slice();
                let p = points.as_slice();

                // column-major homogeneous apply: p is laid out as three
                // rows of N, so point j is (p[j], p[count + j], p[2*count + j])
                let mut data = Vec::with_capacity(batch * count * 2);
                for b in 0..batch {
                    let mb = &m[b * 9..][..9];
                    for j in 0..count {
                        let (x, y, s) = (p[j], p[count + j], p[2 * count + j]);
                        let xw = mb[0] * x + mb[1] * y + mb[2] * s;
                        let yw = mb[3] * x + mb[4] * y + mb[5] * s;
                        let w = mb[6] * x + mb[7] * y + mb[8] * s;
                        data.push(xw / w);
                        data.push(yw / w);
                    }
                }

                let grid = Tensor4::from_shape_vec(
                    [batch, self.height, self.width, 2],
                    data,
                    homography.device(),
                )?;
                Ok(grid)
            }
        }
    }

    /// Warps a patch from source into destination frame.
    ///
    /// # Arguments
    ///
    /// * `patch` - The image tensor to warp with shape (batch, channels, H, W).
    /// * `dst_homo_src` - The homography or stack of homographies from
    ///   source to destination with shape (batch, 3, 3).
    /// * `padding_mode` - The boundary policy for out-of-range samples.
    ///
    /// # Returns
    ///
    /// The patch sampled at the transformed grid locations, with the
    /// warper's height and width: (batch, channels, height, width).
    ///
    /// # Errors
    ///
    /// The patch and the homography must live in the same compute context;
    /// a mismatch fails with [`WarpError::DeviceMismatch`] naming both.
    pub fn warp(
        &self,
        patch: &Tensor4<f32>,
        dst_homo_src: &Tensor3<f32>,
        padding_mode: PaddingMode,
    ) -> Result<Tensor4<f32>, WarpError> {
        if patch.device() != dst_homo_src.device() {
            return Err(WarpError::DeviceMismatch {
                expected: patch.device(),
                found: dst_homo_src.device(),
            });
        }
        let grid = self.warp_grid(dst_homo_src)?;
        grid_sample(patch, &grid, InterpolationMode::Bilinear, padding_mode)
    }

    /// Warps a rectangular region of interest of `image` through a
    /// homography, without materializing a cropped copy.
    ///
    /// The template grid is transformed as usual, then remapped by a
    /// per-axis affine map so that the full [-1, 1] extent of the grid
    /// addresses only the ROI's extent inside the full image, and the full
    /// image is sampled once at the remapped locations. ROI selection and
    /// the projective transform compose into a single sampling pass.
    ///
    /// # Arguments
    ///
    /// * `homography` - The homographies with shape (batch, 3, 3).
    /// * `image` - The full source images with shape (batch, channels, H, W).
    /// * `roi` - The pixel bounds of the region inside `image`, end-exclusive.
    /// * `padding_mode` - The boundary policy for out-of-range samples.
    ///
    /// # Errors
    ///
    /// The ROI must be non-empty and fit inside the image; the image and
    /// the homography must live in the same compute context.
    pub fn crop_and_warp(
        &self,
        homography: &Tensor3<f32>,
        image: &Tensor4<f32>,
        roi: Roi,
        padding_mode: PaddingMode,
    ) -> Result<Tensor4<f32>, WarpError> {
        if image.device() != homography.device() {
            return Err(WarpError::DeviceMismatch {
                expected: image.device(),
                found: homography.device(),
            });
        }

        let [_, _, height, width] = image.shape;
        if roi.y_start >= roi.y_end
            || roi.x_start >= roi.x_end
            || roi.y_end > height
            || roi.x_end > width
        {
            return Err(WarpError::RoiOutOfBounds {
                y_start: roi.y_start,
                y_end: roi.y_end,
                x_start: roi.x_start,
                x_end: roi.x_end,
                height,
                width,
            });
        }

        let mut grid = self.warp_grid(homography)?;

        // inclusive pixel bounds of the region, normalized so that pixel
        // centers 0 and size-1 land on -1 and 1, the same convention the
        // meshgrid and the resampler use. A single-pixel axis collapses
        // to -1 like a single-sample meshgrid axis.
        let normalize = |coord: usize, size: usize| -> f32 {
            if size > 1 {
                2.0 * coord as f32 / (size - 1) as f32 - 1.0
            } else {
                -1.0
            }
        };
        let start_x = normalize(roi.x_start, width);
        let end_x = normalize(roi.x_end - 1, width);
        let start_y = normalize(roi.y_start, height);
        let end_y = normalize(roi.y_end - 1, height);

        // midpoint and half-width of the normalized interval, per axis
        let b_x = (start_x + end_x) / 2.0;
        let a_x = b_x - start_x;
        let b_y = (start_y + end_y) / 2.0;
        let a_y = b_y - start_y;
        debug!(
            "roi remap: scale=({}, {}) offset=({}, {})",
            a_x, a_y, b_x, b_y
        );

        // squeeze the grid into the region's extent in the full image
        for sample in grid.as_slice_mut().chunks_exact_mut(2) {
            sample[0] = sample[0] * a_x + b_x;
            sample[1] = sample[1] * a_y + b_y;
        }

        grid_sample(image, &grid, InterpolationMode::Bilinear, padding_mode)
    }
}

/// Warps patches by homographies, constructing the warper on the fly.
///
/// Functional counterpart of [`HomographyWarper`]: builds a warper for
/// `dsize` = (height, width) -- or for an explicit (3, N) point set when
/// `points` is given, in which case `dsize` is ignored -- and warps `patch`
/// through `dst_homo_src` in one call. The template grid is allocated on
/// every invocation, so prefer keeping a [`HomographyWarper`] around for
/// repeated warps with the same geometry.
///
/// # Example
///
/// ```
/// use warpgeom_imgproc::interpolation::PaddingMode;
/// use warpgeom_imgproc::warp::homography_warp;
/// use warpgeom_tensor::{Device, Tensor3, Tensor4};
///
/// let patch = Tensor4::from_shape_val([1, 3, 32, 32], 0.5f32, Device::Cpu);
/// let homography = Tensor3::from_shape_fn([1, 3, 3], Device::Cpu, |[_, i, j]| {
///     if i == j { 1.0 } else { 0.0 }
/// });
///
/// let warped = homography_warp(&patch, &homography, (32, 32), None, PaddingMode::Zeros).unwrap();
/// assert_eq!(warped.shape, [1, 3, 32, 32]);
/// ```
pub fn homography_warp(
    patch: &Tensor4<f32>,
    dst_homo_src: &Tensor3<f32>,
    dsize: (usize, usize),
    points: Option<Tensor2<f32>>,
    padding_mode: PaddingMode,
) -> Result<Tensor4<f32>, WarpError> {
    let warper = match points {
        Some(points) => HomographyWarper::from_points(points),
        None => HomographyWarper::new(dsize.0, dsize.1),
    }?;
    warper.warp(patch, dst_homo_src, padding_mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use warpgeom_tensor::Device;

    fn eye3(batch: usize) -> Tensor3<f32> {
        Tensor3::from_shape_fn([batch, 3, 3], Device::Cpu, |[_, i, j]| {
            if i == j {
                1.0
            } else {
                0.0
            }
        })
    }

    #[test]
    fn warper_rejects_empty_grid() {
        assert!(matches!(
            HomographyWarper::new(0, 8),
            Err(WarpError::InvalidGridSize { .. })
        ));
    }

    #[test]
    fn warper_rejects_bad_point_set() {
        let points = Tensor2::from_shape_val([2, 5], 0.0f32, Device::Cpu);
        assert!(matches!(
            HomographyWarper::from_points(points),
            Err(WarpError::InvalidPointSet { rows: 2, cols: 5 })
        ));
    }

    #[test]
    fn warp_grid_identity_matches_meshgrid() -> Result<(), WarpError> {
        let warper = HomographyWarper::new(3, 4)?;
        let grid = warper.warp_grid(&eye3(1))?;
        let expected = create_meshgrid(3, 4, true)?;
        assert_eq!(grid.shape, [1, 3, 4, 2]);
        for (a, b) in grid.as_slice().iter().zip(expected.as_slice().iter()) {
            assert!((a - b).abs() < 1e-6);
        }
        Ok(())
    }

    #[test]
    fn warp_grid_expands_to_batch() -> Result<(), WarpError> {
        let warper = HomographyWarper::new(2, 5)?;
        for batch in [1, 3, 7] {
            let grid = warper.warp_grid(&eye3(batch))?;
            assert_eq!(grid.shape, [batch, 2, 5, 2]);
        }
        Ok(())
    }

    #[test]
    fn warp_grid_explicit_points() -> Result<(), WarpError> {
        // two homogeneous points, the second with scale 2
        let points = Tensor2::from_shape_vec(
            [3, 2],
            vec![
                -1.0f32, 2.0, // x row
                0.5, -2.0, // y row
                1.0, 2.0, // scale row
            ],
            Device::Cpu,
        )?;
        let warper = HomographyWarper::from_points(points)?;
        assert_eq!((warper.height(), warper.width()), (1, 2));

        let grid = warper.warp_grid(&eye3(2))?;
        assert_eq!(grid.shape, [2, 1, 2, 2]);
        // identity with perspective division recovers the euclidean points
        let expected = [-1.0, 0.5, 1.0, -1.0];
        for b in 0..2 {
            for (i, e) in expected.iter().enumerate() {
                let got = grid.as_slice()[b * 4 + i];
                assert!((got - e).abs() < 1e-6);
            }
        }
        Ok(())
    }

    #[test]
    fn identity_warp_reproduces_patch() -> Result<(), WarpError> {
        let patch = Tensor4::from_shape_vec(
            [1, 1, 3, 3],
            (0..9).map(|v| v as f32).collect(),
            Device::Cpu,
        )?;
        let warper = HomographyWarper::new(3, 3)?;
        let warped = warper.warp(&patch, &eye3(1), PaddingMode::Zeros)?;
        for (a, b) in warped.as_slice().iter().zip(patch.as_slice().iter()) {
            assert!((a - b).abs() < 1e-5);
        }
        Ok(())
    }

    #[test]
    fn warp_output_takes_warper_size() -> Result<(), WarpError> {
        let patch = Tensor4::from_shape_val([2, 3, 16, 16], 1.0f32, Device::Cpu);
        let warper = HomographyWarper::new(4, 6)?;
        let warped = warper.warp(&patch, &eye3(2), PaddingMode::Border)?;
        assert_eq!(warped.shape, [2, 3, 4, 6]);
        Ok(())
    }

    #[test]
    fn warp_device_mismatch_names_both_contexts() {
        let patch = Tensor4::from_shape_val([1, 1, 4, 4], 0.0f32, Device::Cpu);
        let homography = eye3(1).to_device(Device::cuda(1));
        let warper = HomographyWarper::new(4, 4).unwrap();

        let err = warper
            .warp(&patch, &homography, PaddingMode::Zeros)
            .unwrap_err();
        assert_eq!(
            err,
            WarpError::DeviceMismatch {
                expected: Device::Cpu,
                found: Device::cuda(1),
            }
        );
        let message = err.to_string();
        assert!(message.contains("cpu"));
        assert!(message.contains("cuda:1"));
    }

    #[test]
    fn crop_full_roi_equals_plain_warp() -> Result<(), WarpError> {
        let image = Tensor4::from_shape_vec(
            [1, 1, 4, 4],
            (0..16).map(|v| v as f32).collect(),
            Device::Cpu,
        )?;
        let warper = HomographyWarper::new(4, 4)?;

        let whole = warper.warp(&image, &eye3(1), PaddingMode::Zeros)?;
        let cropped = warper.crop_and_warp(
            &eye3(1),
            &image,
            Roi {
                y_start: 0,
                y_end: 4,
                x_start: 0,
                x_end: 4,
            },
            PaddingMode::Zeros,
        )?;

        assert_eq!(whole.shape, cropped.shape);
        for (a, b) in whole.as_slice().iter().zip(cropped.as_slice().iter()) {
            assert!((a - b).abs() < 1e-5);
        }
        Ok(())
    }

    #[test]
    fn crop_and_warp_samples_only_the_region() -> Result<(), WarpError> {
        // left half zeros, right half ones
        let mut data = vec![0.0f32; 16];
        for row in data.chunks_exact_mut(4) {
            row[2] = 1.0;
            row[3] = 1.0;
        }
        let image = Tensor4::from_shape_vec([1, 1, 4, 4], data, Device::Cpu)?;
        let warper = HomographyWarper::new(4, 2)?;

        let out = warper.crop_and_warp(
            &eye3(1),
            &image,
            Roi {
                y_start: 0,
                y_end: 4,
                x_start: 2,
                x_end: 4,
            },
            PaddingMode::Zeros,
        )?;

        for v in out.as_slice() {
            assert!((v - 1.0).abs() < 1e-5);
        }
        Ok(())
    }

    #[test]
    fn crop_rejects_out_of_bounds_roi() {
        let image = Tensor4::from_shape_val([1, 1, 4, 4], 0.0f32, Device::Cpu);
        let warper = HomographyWarper::new(2, 2).unwrap();
        let res = warper.crop_and_warp(
            &eye3(1),
            &image,
            Roi {
                y_start: 0,
                y_end: 5,
                x_start: 0,
                x_end: 4,
            },
            PaddingMode::Zeros,
        );
        assert!(matches!(res, Err(WarpError::RoiOutOfBounds { .. })));
    }

    #[test]
    fn functional_wrapper_matches_warper() -> Result<(), WarpError> {
        let patch = Tensor4::from_shape_vec(
            [1, 1, 2, 2],
            vec![1.0f32, 2.0, 3.0, 4.0],
            Device::Cpu,
        )?;
        let out = homography_warp(&patch, &eye3(1), (2, 2), None, PaddingMode::Zeros)?;
        let warper = HomographyWarper::new(2, 2)?;
        let expected = warper.warp(&patch, &eye3(1), PaddingMode::Zeros)?;
        assert_eq!(out.shape, expected.shape);
        assert_eq!(out.as_slice(), expected.as_slice());
        Ok(())
    }

    #[test]
    fn near_singular_homography_degenerates_quietly() -> Result<(), WarpError> {
        let patch = Tensor4::from_shape_val([1, 1, 4, 4], 1.0f32, Device::Cpu);
        let homography = Tensor3::from_shape_vec(
            [1, 3, 3],
            vec![1.0f32, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            Device::Cpu,
        )?;
        let warper = HomographyWarper::new(4, 4)?;

        let grid = warper.warp_grid(&homography)?;
        assert!(grid.as_slice().iter().any(|v| !v.is_finite()));

        // the degenerate samples resolve as out-of-range reads, not errors
        let out = warper.warp(&patch, &homography, PaddingMode::Zeros)?;
        assert!(out.as_slice().iter().all(|v| *v == 0.0));
        Ok(())
    }
}
