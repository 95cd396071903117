use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::intersect::{Ray, intersect};
use crate::world::{Point, Rgb, Segment};

/// Distance reported for a ray that hit nothing.
pub const NO_HIT: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitSample {
    pub distance: f64,        // fisheye corrected, NO_HIT when point is None
    pub color: Rgb,           // wall color, background when point is None
    pub point: Option<Point>, // world-space hit on the nearest wall
}

impl HitSample {
    pub const MISS: HitSample = HitSample {
        distance: NO_HIT,
        color: Rgb::BLACK,
        point: None,
    };

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.point.is_some()
    }
}

/// Nearest wall along every ray, in fan order.
///
/// Rays are processed in parallel; the indexed collect keeps the output
/// aligned with `rays`. Walls are scanned in slice order per ray and only a
/// strictly closer hit replaces the current one, so the first of two equally
/// distant walls wins.
pub fn sample(rays: &[Ray], segments: &[Segment], heading: f64, max_range: f64) -> Vec<HitSample> {
    rays.par_iter()
        .map(|ray| sample_ray(ray, segments, heading, max_range))
        .collect()
}

pub fn sample_ray(ray: &Ray, segments: &[Segment], heading: f64, max_range: f64) -> HitSample {
    let correction = (ray.angle - heading).to_radians().cos();

    let mut best = HitSample::MISS;
    for seg in segments {
        let Some(p) = intersect(ray, seg, max_range) else {
            continue;
        };
        let dx = p[0] - ray.origin[0];
        let dy = p[1] - ray.origin[1];
        let d = dx.hypot(dy) * correction;

        if best.point.is_none() || d < best.distance {
            best = HitSample {
                distance: d,
                color: seg.color,
                point: Some(p),
            };
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Viewer;

    fn wall(a: Point, b: Point, color: Rgb) -> Segment {
        Segment::new(a, b, color)
    }

    #[test]
    fn picks_nearest_wall() {
        let near = wall([20.0, -50.0], [20.0, 50.0], Rgb(255, 0, 0));
        let far = wall([40.0, -50.0], [40.0, 50.0], Rgb(0, 255, 0));
        let ray = Ray::new([0.0, 0.0], 0.0);

        for walls in [[near, far], [far, near]] {
            let s = sample_ray(&ray, &walls, 0.0, 100.0);
            assert_eq!(s.color, Rgb(255, 0, 0));
            assert!((s.distance - 20.0).abs() < 1e-9);
            assert_eq!(s.point, Some([20.0, 0.0]));
        }
    }

    #[test]
    fn miss_reports_sentinel() {
        let ray = Ray::new([0.0, 0.0], 180.0);
        let walls = [wall([20.0, -50.0], [20.0, 50.0], Rgb(255, 0, 0))];
        let s = sample_ray(&ray, &walls, 180.0, 100.0);
        assert_eq!(s, HitSample::MISS);
        assert!(!s.is_hit());
        assert_eq!(s.distance, NO_HIT);

        let none = sample_ray(&ray, &[], 180.0, 100.0);
        assert_eq!(none, HitSample::MISS);
    }

    #[test]
    fn equal_distance_keeps_first() {
        let first = wall([20.0, -50.0], [20.0, 50.0], Rgb(1, 1, 1));
        let second = wall([20.0, 50.0], [20.0, -50.0], Rgb(2, 2, 2));
        let ray = Ray::new([0.0, 0.0], 0.0);

        assert_eq!(sample_ray(&ray, &[first, second], 0.0, 100.0).color, Rgb(1, 1, 1));
        assert_eq!(sample_ray(&ray, &[second, first], 0.0, 100.0).color, Rgb(2, 2, 2));
    }

    #[test]
    fn fisheye_correction_flattens_wall() {
        // Wall perpendicular to the heading, 50 units ahead
        let walls = [wall([50.0, -500.0], [50.0, 500.0], Rgb(200, 200, 200))];
        let mut viewer = Viewer::new([0.0, 0.0], 0.0, 60.0);
        let rays = viewer.ray_fan(60.0);
        let samples = sample(&rays, &walls, viewer.heading, 100.0);
        assert_eq!(samples.len(), rays.len());

        let raw: Vec<f64> = samples
            .iter()
            .map(|s| {
                let p = s.point.expect("every ray hits");
                p[0].hypot(p[1])
            })
            .collect();
        let spread = |v: &[f64]| {
            let lo = v.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = v.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            hi - lo
        };
        let corrected: Vec<f64> = samples.iter().map(|s| s.distance).collect();

        assert!(spread(&corrected) < spread(&raw));
        for d in corrected {
            assert!((d - 50.0).abs() < 1e-6, "corrected distance {d}");
        }
    }

    #[test]
    fn sampling_is_idempotent() {
        let walls = [
            wall([10.0, 10.0], [90.0, 30.0], Rgb(10, 20, 30)),
            wall([60.0, 5.0], [70.0, 95.0], Rgb(40, 50, 60)),
            wall([20.0, 80.0], [80.0, 80.0], Rgb(70, 80, 90)),
        ];
        let mut viewer = Viewer::new([50.0, 50.0], 30.0, 0.0);
        let rays = viewer.ray_fan(120.0);

        let first = sample(&rays, &walls, viewer.heading, 100.0);
        let second = sample(&rays, &walls, viewer.heading, 100.0);
        assert_eq!(first, second);
        assert_eq!(first.len(), 120);
    }

    #[test]
    fn order_matches_fan() {
        let walls = [
            wall([10.0, -100.0], [10.0, 0.0], Rgb(1, 0, 0)),
            wall([10.0, 0.0], [10.0, 100.0], Rgb(0, 1, 0)),
        ];
        let rays = [Ray::new([0.0, 0.0], -45.0), Ray::new([0.0, 0.0], 45.0)];
        let samples = sample(&rays, &walls, 0.0, 100.0);
        assert_eq!(samples[0].color, Rgb(1, 0, 0));
        assert_eq!(samples[1].color, Rgb(0, 1, 0));
    }
}
