use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed source column/row for every destination pixel
pub struct ScaleLut {
    src_x: Vec<usize>,
    src_y: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            src_x: Vec::new(),
            src_y: Vec::new(),
        }
    }

    pub fn dst_size(&self) -> (usize, usize) {
        (self.src_x.len(), self.src_y.len())
    }
}

pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    ScaleLut {
        src_x: nearest_axis(dst_w, src_w),
        src_y: nearest_axis(dst_h, src_h),
    }
}

// Samples at pixel centers so both edges map onto the edge texels
fn nearest_axis(dst: usize, src: usize) -> Vec<usize> {
    if src == 0 {
        return vec![0; dst];
    }
    let s = src as f32 / dst as f32;
    (0..dst)
        .map(|d| (((d as f32 + 0.5) * s) as usize).min(src - 1))
        .collect()
}

/// Parallel nearest-neighbour stretch, one destination row per task.
/// Lines in the map view stay one source pixel wide instead of blurring.
pub fn blit_nearest_stretch(dst: &mut [u32], dw: usize, src: &[u32], sw: usize, lut: &ScaleLut) {
    if dw == 0 || sw == 0 {
        return;
    }
    dst.par_chunks_mut(dw)
        .zip(lut.src_y.par_iter())
        .for_each(|(dst_row, &sy)| {
            let row = &src[sy * sw..(sy + 1) * sw];
            for (d, &sx) in dst_row.iter_mut().zip(&lut.src_x) {
                *d = row[sx];
            }
        });
}
