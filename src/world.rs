use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::config::Config;

/// (x, y) in world space
pub type Point = [f64; 2];

/// Margin kept between randomly generated endpoints and the world border.
const SPAWN_MARGIN: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Scales every channel by `factor`, truncating toward zero.
    #[inline]
    pub fn scaled(self, factor: f64) -> Rgb {
        let ch = |c: u8| (c as f64 * factor).clamp(0.0, 255.0) as u8;
        Rgb(ch(self.0), ch(self.1), ch(self.2))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Segment {
    pub a: Point, // start point in world space
    pub b: Point, // end point in world space
    pub color: Rgb,
}

impl Segment {
    pub fn new(a: Point, b: Point, color: Rgb) -> Self {
        Self { a, b, color }
    }
}

#[derive(Debug)]
pub struct World {
    pub segments: Vec<Segment>,
}

impl World {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Configured walls when present, otherwise `wall_count` random walls,
    /// reproducible when `seed` is set.
    pub fn from_config(config: &Config) -> Self {
        if let Some(walls) = &config.walls {
            return Self::new(walls.clone());
        }
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::random(
            &mut rng,
            config.wall_count,
            config.view_width,
            config.view_height,
        )
    }

    /// `count` walls with integer endpoints inside `width` x `height`, kept
    /// away from the border, each with a random color.
    pub fn random<R: Rng>(rng: &mut R, count: usize, width: u32, height: u32) -> Self {
        let xs = spawn_range(width);
        let ys = spawn_range(height);

        let segments = (0..count)
            .map(|_| {
                let a = random_point(rng, xs, ys);
                let b = random_point(rng, xs, ys);
                let color = Rgb(
                    rng.gen_range(20..=255),
                    rng.gen_range(20..=255),
                    rng.gen_range(20..=255),
                );
                Segment { a, b, color }
            })
            .collect();

        Self { segments }
    }
}

fn random_point<R: Rng>(rng: &mut R, xs: (i32, i32), ys: (i32, i32)) -> Point {
    [
        rng.gen_range(xs.0..=xs.1) as f64,
        rng.gen_range(ys.0..=ys.1) as f64,
    ]
}

// Collapses to the middle of the side when it is narrower than both margins
fn spawn_range(side: u32) -> (i32, i32) {
    let side = side.min(i32::MAX as u32) as i32;
    let lo = SPAWN_MARGIN;
    let hi = side - SPAWN_MARGIN;
    if lo <= hi {
        (lo, hi)
    } else {
        let mid = side / 2;
        (mid, mid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_world_stays_inside_margins() {
        let mut rng = StdRng::seed_from_u64(7);
        let world = World::random(&mut rng, 64, 300, 200);
        assert_eq!(world.segments.len(), 64);

        for seg in &world.segments {
            for p in [seg.a, seg.b] {
                assert!((10.0..=290.0).contains(&p[0]), "x out of range: {:?}", p);
                assert!((10.0..=190.0).contains(&p[1]), "y out of range: {:?}", p);
                assert_eq!(p[0].fract(), 0.0);
            }
            assert!(seg.color.0 >= 20 && seg.color.1 >= 20 && seg.color.2 >= 20);
        }
    }

    #[test]
    fn same_seed_same_world() {
        let a = World::random(&mut StdRng::seed_from_u64(42), 5, 300, 300);
        let b = World::random(&mut StdRng::seed_from_u64(42), 5, 300, 300);
        assert_eq!(a.segments, b.segments);
    }

    #[test]
    fn configured_walls_replace_random_ones() {
        let wall = Segment::new([1.0, 2.0], [3.0, 4.0], Rgb(9, 9, 9));
        let config = Config {
            wall_count: 40,
            seed: Some(5),
            walls: Some(vec![wall]),
            ..Config::default()
        };
        assert_eq!(World::from_config(&config).segments, vec![wall]);

        let empty = Config {
            walls: Some(Vec::new()),
            ..Config::default()
        };
        assert!(World::from_config(&empty).segments.is_empty());
    }

    #[test]
    fn world_debug_lists_its_walls() {
        let world = World::new(vec![Segment::new([1.0, 2.0], [3.0, 4.0], Rgb(9, 8, 7))]);
        let text = format!("{world:?}");
        assert!(text.starts_with("World"), "{text}");
        assert!(text.contains("Rgb(9, 8, 7)"), "{text}");
    }

    #[test]
    fn seeded_config_is_reproducible() {
        let config = Config {
            wall_count: 12,
            view_width: 200,
            view_height: 100,
            seed: Some(77),
            ..Config::default()
        };
        let a = World::from_config(&config);
        let b = World::from_config(&config);
        assert_eq!(a.segments.len(), 12);
        assert_eq!(a.segments, b.segments);
        assert_eq!(
            a.segments,
            World::random(&mut StdRng::seed_from_u64(77), 12, 200, 100).segments
        );

        let unseeded = Config {
            seed: None,
            ..config
        };
        assert_eq!(World::from_config(&unseeded).segments.len(), 12);
    }

    #[test]
    fn tiny_world_collapses_to_center() {
        let world = World::random(&mut StdRng::seed_from_u64(1), 3, 12, 4);
        for seg in &world.segments {
            assert_eq!(seg.a, [6.0, 2.0]);
            assert_eq!(seg.b, [6.0, 2.0]);
        }
    }

    #[test]
    fn scaled_truncates() {
        assert_eq!(Rgb(255, 100, 3).scaled(0.5), Rgb(127, 50, 1));
        assert_eq!(Rgb(10, 20, 30).scaled(0.0), Rgb::BLACK);
        assert_eq!(Rgb(10, 20, 30).scaled(1.0), Rgb(10, 20, 30));
    }
}
