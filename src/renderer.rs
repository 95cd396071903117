use crate::camera::Viewer;
use crate::projector::ColumnStrip;
use crate::sampler::HitSample;
use crate::world::{Point, Rgb, World};

const BACKGROUND: Rgb = Rgb::BLACK;
const HIT_RAY_COLOR: Rgb = Rgb(0, 0, 255);
const VIEWER_COLOR: Rgb = Rgb(0, 255, 0);
const VIEWER_RADIUS: i64 = 4;

const CLIP_LEFT: u8 = 1;
const CLIP_RIGHT: u8 = 2;
const CLIP_TOP: u8 = 4;
const CLIP_BOTTOM: u8 = 8;

#[inline]
pub fn pack_rgb(c: Rgb) -> u32 {
    // BGRA8 in little-endian memory
    (c.2 as u32) | ((c.1 as u32) << 8) | ((c.0 as u32) << 16)
    // Alpha at 0
}

/// Everything one frame draws, borrowed from the host.
pub struct Frame<'a> {
    pub world: &'a World,
    pub viewer: &'a Viewer,
    pub samples: &'a [HitSample],
    pub strips: &'a [Option<ColumnStrip>],
}

/// Column window into a row-major framebuffer. Writes outside the pane are
/// dropped.
pub struct Pane<'a> {
    buf: &'a mut [u32],
    stride: usize,
    x0: usize,
    width: usize,
    height: usize,
}

impl<'a> Pane<'a> {
    pub fn new(buf: &'a mut [u32], stride: usize, height: usize, x0: usize, width: usize) -> Self {
        let width = width.min(stride.saturating_sub(x0));
        let height = height.min(buf.len() / stride.max(1));
        Self {
            buf,
            stride,
            x0,
            width,
            height,
        }
    }

    #[inline]
    pub fn put(&mut self, x: i64, y: i64, color: u32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.buf[y as usize * self.stride + self.x0 + x as usize] = color;
    }

    pub fn fill(&mut self, color: u32) {
        for y in 0..self.height {
            let row = y * self.stride + self.x0;
            self.buf[row..row + self.width].fill(color);
        }
    }

    /// Bresenham line, both endpoints included. The segment is clipped to the
    /// pane first, so the walk never leaves the visible pixels.
    pub fn line(&mut self, p0: Point, p1: Point, color: u32) {
        let Some((p0, p1)) = self.clip(p0, p1) else {
            return;
        };
        let (mut x0, mut y0) = (p0[0].round() as i64, p0[1].round() as i64);
        let (x1, y1) = (p1[0].round() as i64, p1[1].round() as i64);

        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Cohen-Sutherland clip against the pixel-center rectangle
    /// `[0, width - 1] x [0, height - 1]`. The clipped coordinate is set to
    /// the edge exactly, so far-away endpoints do not lose precision.
    fn clip(&self, mut a: Point, mut b: Point) -> Option<(Point, Point)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        if !(a[0].is_finite() && a[1].is_finite() && b[0].is_finite() && b[1].is_finite()) {
            return None;
        }

        let xmax = (self.width - 1) as f64;
        let ymax = (self.height - 1) as f64;
        let outcode = |p: Point| -> u8 {
            let mut code = 0;
            if p[0] < 0.0 {
                code |= CLIP_LEFT;
            } else if p[0] > xmax {
                code |= CLIP_RIGHT;
            }
            if p[1] < 0.0 {
                code |= CLIP_TOP;
            } else if p[1] > ymax {
                code |= CLIP_BOTTOM;
            }
            code
        };

        let mut ca = outcode(a);
        let mut cb = outcode(b);
        // each pass pins one endpoint to one edge
        for _ in 0..8 {
            if ca | cb == 0 {
                return Some((a, b));
            }
            if ca & cb != 0 {
                return None;
            }

            let out = if ca != 0 { ca } else { cb };
            let [x0, y0] = a;
            let [x1, y1] = b;
            let p = if out & CLIP_TOP != 0 {
                [x0 + (x1 - x0) * (0.0 - y0) / (y1 - y0), 0.0]
            } else if out & CLIP_BOTTOM != 0 {
                [x0 + (x1 - x0) * (ymax - y0) / (y1 - y0), ymax]
            } else if out & CLIP_LEFT != 0 {
                [0.0, y0 + (y1 - y0) * (0.0 - x0) / (x1 - x0)]
            } else {
                [xmax, y0 + (y1 - y0) * (xmax - x0) / (x1 - x0)]
            };
            if !(p[0].is_finite() && p[1].is_finite()) {
                return None;
            }

            if out == ca {
                a = p;
                ca = outcode(a);
            } else {
                b = p;
                cb = outcode(b);
            }
        }
        None
    }

    /// Fills columns `[x, x + w)` and rows `[y0, y1]`, clamped to the pane.
    pub fn fill_rect(&mut self, x: i64, w: i64, y0: i64, y1: i64, color: u32) {
        let xa = x.max(0);
        let xb = (x + w).min(self.width as i64);
        let ya = y0.max(0);
        let yb = y1.min(self.height as i64 - 1);
        if xa >= xb || ya > yb {
            return;
        }
        for y in ya..=yb {
            let row = y as usize * self.stride + self.x0;
            self.buf[row + xa as usize..row + xb as usize].fill(color);
        }
    }

    pub fn disc(&mut self, center: Point, radius: i64, color: u32) {
        let cx = center[0].round() as i64;
        let cy = center[1].round() as i64;
        let r2 = radius * radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= r2 {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }
}

/// Draws the top-down map into the left `view_width` columns and the raycast
/// view into the next `view_width` columns of a `width` x `height` buffer.
pub fn render_frame(buf: &mut [u32], width: usize, height: usize, view_width: usize, frame: &Frame) {
    // Clear background
    Pane::new(buf, width, height, 0, width).fill(pack_rgb(BACKGROUND));

    draw_view(&mut Pane::new(buf, width, height, view_width, view_width), frame.strips);
    draw_map(&mut Pane::new(buf, width, height, 0, view_width), frame);
}

fn draw_map(pane: &mut Pane, frame: &Frame) {
    for seg in &frame.world.segments {
        pane.line(seg.a, seg.b, pack_rgb(seg.color));
    }

    let ray_color = pack_rgb(HIT_RAY_COLOR);
    for p in frame.samples.iter().filter_map(|s| s.point) {
        pane.line(frame.viewer.pos, p, ray_color);
    }

    pane.disc(frame.viewer.pos, VIEWER_RADIUS, pack_rgb(VIEWER_COLOR));
}

fn draw_view(pane: &mut Pane, strips: &[Option<ColumnStrip>]) {
    for strip in strips.iter().flatten() {
        let y0 = strip.top.floor() as i64;
        let y1 = strip.bottom.floor() as i64;
        pane.fill_rect(
            strip.x as i64,
            strip.thickness as i64,
            y0,
            y1,
            pack_rgb(strip.color),
        );
    }
}
