//! Direct-lighting ray tracer for static scenes of simple solids: spheres,
//! planes, rectangles, disks, boxes and pyramids, lit by an ambient term, a
//! fixed sun and emissive objects casting hard shadows.

pub mod aabb;
pub mod algebra;
pub mod camera;
pub mod disk;
pub mod error;
pub mod object;
pub mod plane;
pub mod prism;
pub mod pyramid;
pub mod ray;
pub mod renderer;
pub mod scene;
pub mod scene_file;
pub mod sphere;

pub use algebra::Vec3;
pub use camera::Camera;
pub use error::{RenderError, SceneError};
pub use object::{Object, Shape};
pub use ray::Ray;
pub use renderer::{HitResult, PixelSink, Renderer};
pub use scene::{ObjectId, Scene};
