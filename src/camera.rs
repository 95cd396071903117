use crate::intersect::Ray;
use crate::world::Point;

/// Widest fan `ray_fan` builds; wider requests are clamped to one full turn.
pub const MAX_FOV: f64 = 360.0;

pub struct Viewer {
    pub pos: Point,   // (x, y) position in world space
    pub heading: f64, // degrees in [0, 360), 0 faces +X
    pub fov: f64,     // degrees, last value handed to `ray_fan`
}

impl Viewer {
    pub fn new(pos: Point, heading: f64, fov: f64) -> Self {
        let mut viewer = Self {
            pos,
            heading: 0.0,
            fov,
        };
        viewer.rotate(heading);
        viewer
    }

    pub fn rotate(&mut self, delta_deg: f64) {
        let heading = (self.heading + delta_deg).rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        self.heading = if heading >= 360.0 { 0.0 } else { heading };
    }

    /// Walks along the heading. Walls do not block movement.
    pub fn move_forward(&mut self, delta: f64) {
        let dir = self.direction();
        self.pos[0] += delta * dir[0];
        self.pos[1] += delta * dir[1];
    }

    #[inline]
    pub fn direction(&self) -> [f64; 2] {
        let (s, c) = self.heading.to_radians().sin_cos();
        [c, s]
    }

    /// One ray per whole degree over `[heading - fov/2, heading + fov/2)`,
    /// ordered by increasing angle (left to right on screen).
    ///
    /// The half angle is floored and both bounds are truncated toward zero, so
    /// `fov = 10` at heading 0 yields angles -5..=4 and any `fov` below 2
    /// yields an empty fan. Anything above `MAX_FOV` is clamped, so a fan
    /// never holds more than 360 rays.
    pub fn ray_fan(&mut self, fov: f64) -> Vec<Ray> {
        self.fov = fov;
        if !fov.is_finite() {
            return Vec::new();
        }

        let half = (fov.min(MAX_FOV) / 2.0).floor();
        let start = (self.heading - half).trunc() as i64;
        let end = (self.heading + half).trunc() as i64;

        (start..end)
            .map(|deg| Ray::new(self.pos, deg as f64))
            .collect()
    }
}
