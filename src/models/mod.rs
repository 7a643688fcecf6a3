//! Domain models for graph scenes.

mod camera;
mod frame;
mod graph;
mod point;

pub use camera::{Camera, Vec3};
pub use frame::Frame;
pub use graph::{Edge, Graph};
pub use point::{Dimensionality, Point2, Point3, Position};
