use crate::sampler::HitSample;
use crate::world::Rgb;

/// Exponent applied to the linear brightness ramp; distant walls darken much
/// faster than a linear fade.
pub const BRIGHTNESS_FALLOFF: i32 = 5;

/// One vertical band of the raycast view, in view-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStrip {
    pub x: i32,         // left edge
    pub thickness: i32, // covers the gap left by integer column placement
    pub top: f64,
    pub bottom: f64,
    pub color: Rgb,
}

/// Linear interpolation of `x` from `[x0, x1]` onto `[y0, y1]`, clamped to
/// `y0`/`y1` outside the input range.
#[inline]
pub fn interp(x: f64, [x0, x1]: [f64; 2], [y0, y1]: [f64; 2]) -> f64 {
    if x <= x0 {
        return y0;
    }
    if x >= x1 {
        return y1;
    }
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}

/// Maps every sample to a strip of a `width` x `height` view. Output is
/// aligned with `samples`; misses stay `None` and keep the background.
///
/// Closer walls are taller and brighter; at `max_distance` and beyond a strip
/// has zero height and is black.
pub fn project(
    samples: &[HitSample],
    width: u32,
    height: u32,
    max_distance: f64,
) -> Vec<Option<ColumnStrip>> {
    if samples.is_empty() {
        return Vec::new();
    }

    let n = samples.len();
    let center_y = (height / 2) as f64;
    let thickness = (width as usize / n) as i32 + 1;
    let range = [0.0, max_distance];

    samples
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if !s.is_hit() {
                return None;
            }
            let half = interp(s.distance, range, [height as f64 / 2.0, 0.0]);
            let brightness = interp(s.distance, range, [1.0, 0.0]).powi(BRIGHTNESS_FALLOFF);

            Some(ColumnStrip {
                x: (i as f64 * width as f64 / n as f64) as i32,
                thickness,
                top: center_y - half,
                bottom: center_y + half,
                color: s.color.scaled(brightness),
            })
        })
        .collect()
}
