pub mod camera;
pub mod config;
pub mod error;
pub mod intersect;
pub mod projector;
pub mod renderer;
pub mod sampler;
pub mod scaler;
pub mod world;

pub use camera::Viewer;
pub use config::Config;
pub use error::{AppError, ConfigError};
pub use intersect::{Ray, intersect};
pub use projector::{ColumnStrip, project};
pub use sampler::{HitSample, NO_HIT, sample};
pub use world::{Point, Rgb, Segment, World};
