use super::interpolate::PaddingMode;

/// Kernel for bilinear interpolation with boundary policy
///
/// # Arguments
///
/// * `plane` - One channel of the source image, row-major (rows, cols).
/// * `u` - The x coordinate of the pixel to interpolate, in pixels.
/// * `v` - The y coordinate of the pixel to interpolate, in pixels.
/// * `padding` - The boundary policy for the four neighbor reads.
///
/// # Returns
///
/// The interpolated pixel value.
pub(crate) fn bilinear_interpolation(
    plane: &[f32],
    rows: usize,
    cols: usize,
    u: f32,
    v: f32,
    padding: PaddingMode,
) -> f32 {
    let (u, v) = match padding {
        PaddingMode::Border => (
            u.clamp(0.0, (cols - 1) as f32),
            v.clamp(0.0, (rows - 1) as f32),
        ),
        PaddingMode::Zeros => (u, v),
    };

    let iu0 = u.floor() as i64;
    let iv0 = v.floor() as i64;
    let iu1 = iu0 + 1;
    let iv1 = iv0 + 1;

    let frac_u = u - iu0 as f32;
    let frac_v = v - iv0 as f32;

    let frac_uu = 1.0 - frac_u;
    let frac_vv = 1.0 - frac_v;

    let w00 = frac_uu * frac_vv;
    let w01 = frac_u * frac_vv;
    let w10 = frac_uu * frac_v;
    let w11 = frac_u * frac_v;

    let load = |iu: i64, iv: i64| -> f32 {
        let (iu, iv) = match padding {
            PaddingMode::Border => (
                iu.clamp(0, cols as i64 - 1),
                iv.clamp(0, rows as i64 - 1),
            ),
            PaddingMode::Zeros => {
                if iu < 0 || iu >= cols as i64 || iv < 0 || iv >= rows as i64 {
                    return 0.0;
                }
                (iu, iv)
            }
        };
        plane[iv as usize * cols + iu as usize]
    };

    w00 * load(iu0, iv0) + w01 * load(iu1, iv0) + w10 * load(iu0, iv1) + w11 * load(iu1, iv1)
}
