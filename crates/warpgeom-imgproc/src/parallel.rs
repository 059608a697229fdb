use rayon::prelude::*;

/// Apply a sampling kernel to each row of a batched planar image in parallel.
///
/// `dst` is a (batch, channels, rows, cols) buffer flattened row-major and
/// `grid` a matching (batch, rows, cols, 2) buffer of (x, y) samples. The
/// kernel is invoked once per output row with the batch index, the channel
/// index, the grid row for that batch, and the destination row to fill.
///
/// Rows are distributed over the global Rayon thread pool; the kernel must
/// not rely on any ordering between rows.
pub fn par_iter_rows_sample(
    dst: &mut [f32],
    grid: &[f32],
    channels: usize,
    rows: usize,
    cols: usize,
    f: impl Fn(usize, usize, &[f32], &mut [f32]) + Send + Sync,
) {
    dst.par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(chunk_idx, dst_row)| {
            let b = chunk_idx / (channels * rows);
            let c = (chunk_idx / rows) % channels;
            let y = chunk_idx % rows;
            let grid_row = &grid[(b * rows + y) * cols * 2..][..cols * 2];
            f(b, c, grid_row, dst_row);
        });
}
