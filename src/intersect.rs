use crate::world::{Point, Segment};

/// One angular slice of the viewer's fan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point,
    pub direction: [f64; 2], // unit vector (1, 0) rotated by `angle`
    pub angle: f64,          // degrees, the angle the ray was built from
}

impl Ray {
    pub fn new(origin: Point, angle: f64) -> Self {
        let (s, c) = angle.to_radians().sin_cos();
        Self {
            origin,
            direction: [c, s],
            angle,
        }
    }
}

/// Intersects `ray` with `segment`, returning the hit point on the wall.
///
/// The ray is modeled as the finite segment `origin -> origin + direction * max_range`
/// and tested with the determinant form of the line-line intersection. A hit
/// requires `0 < t < 1` on the wall and `u > 0` on the ray.
///
/// `u` is deliberately left without an upper bound, so a wall that lies past
/// `max_range` along the ray still registers. `max_range` only places the far
/// endpoint; it is not a visibility limit.
///
/// Parallel, collinear and zero-length inputs give a zero determinant and are
/// reported as no hit.
#[inline]
pub fn intersect(ray: &Ray, segment: &Segment, max_range: f64) -> Option<Point> {
    let [x1, y1] = segment.a;
    let [x2, y2] = segment.b;
    let [x3, y3] = ray.origin;
    let x4 = x3 + ray.direction[0] * max_range;
    let y4 = y3 + ray.direction[1] * max_range;

    let den = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if den == 0.0 {
        return None;
    }

    let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / den;
    let u = -((x1 - x2) * (y1 - y3) - (y1 - y2) * (x1 - x3)) / den;

    if t > 0.0 && t < 1.0 && u > 0.0 {
        Some([x1 + t * (x2 - x1), y1 + t * (y2 - y1)])
    } else {
        None
    }
}
