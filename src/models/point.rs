//! Node positions in two and three dimensions.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::geometry::{rotate_point_2d, rotate_point_3d};

/// A node coordinate that can be loaded, averaged, and rotated.
///
/// Implemented for [`Point2`] and [`Point3`]. Everything downstream of the
/// loader (bounds, traces, frame cycles) is generic over this trait, so the
/// 2D and 3D pipelines share one implementation.
pub trait Position: Copy + Debug + PartialEq + Send + Sync + 'static {
    /// Layout-file column names, in component order.
    const AXES: &'static [&'static str];

    /// Builds a point from components ordered as [`Self::AXES`].
    ///
    /// `components` always has exactly `AXES.len()` entries.
    fn from_components(components: &[f64]) -> Self;

    /// Component `i`, ordered as [`Self::AXES`].
    fn component(&self, i: usize) -> f64;

    /// Rotates counter-clockwise by `theta` radians about `pivot`.
    ///
    /// 3D points turn about the vertical axis through the pivot.
    fn rotated_about(&self, theta: f64, pivot: &Self) -> Self;

    /// Number of components.
    fn dims() -> usize {
        Self::AXES.len()
    }
}

/// Number of spatial axes in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimensionality {
    Planar,
    Spatial,
}

impl Dimensionality {
    pub fn of<P: Position>() -> Self {
        if P::dims() == 3 {
            Dimensionality::Spatial
        } else {
            Dimensionality::Planar
        }
    }

    pub fn is_spatial(self) -> bool {
        self == Dimensionality::Spatial
    }
}

/// Planar node position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Position for Point2 {
    const AXES: &'static [&'static str] = &["x", "y"];

    fn from_components(components: &[f64]) -> Self {
        Self::new(components[0], components[1])
    }

    fn component(&self, i: usize) -> f64 {
        match i {
            0 => self.x,
            _ => self.y,
        }
    }

    fn rotated_about(&self, theta: f64, pivot: &Self) -> Self {
        let (x, y) = rotate_point_2d(self.x, self.y, theta, pivot.x, pivot.y);
        Self::new(x, y)
    }
}

/// Spatial node position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Position for Point3 {
    const AXES: &'static [&'static str] = &["x", "y", "z"];

    fn from_components(components: &[f64]) -> Self {
        Self::new(components[0], components[1], components[2])
    }

    fn component(&self, i: usize) -> f64 {
        match i {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    fn rotated_about(&self, theta: f64, pivot: &Self) -> Self {
        let (x, y, z) = rotate_point_3d((self.x, self.y, self.z), theta, (pivot.x, pivot.y));
        Self::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_follow_axis_order() {
        let p = Point3::from_components(&[1.0, 2.0, 3.0]);
        let components: Vec<f64> = (0..Point3::dims()).map(|i| p.component(i)).collect();
        assert_eq!(components, vec![1.0, 2.0, 3.0]);
        assert_eq!(Point2::dims(), 2);
    }

    #[test]
    fn test_dimensionality_of_position() {
        assert_eq!(Dimensionality::of::<Point2>(), Dimensionality::Planar);
        assert!(Dimensionality::of::<Point3>().is_spatial());
    }

    #[test]
    fn test_point3_rotation_keeps_height() {
        let p = Point3::new(1.0, 0.0, 4.0);
        let r = p.rotated_about(std::f64::consts::FRAC_PI_2, &Point3::new(0.0, 0.0, -7.0));
        assert!(r.x.abs() < 1e-12);
        assert!((r.y - 1.0).abs() < 1e-12);
        assert_eq!(r.z, 4.0);
    }
}
